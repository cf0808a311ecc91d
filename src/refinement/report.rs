//! Refinement run reports.

use serde::{Deserialize, Serialize};

use crate::labeler::Acceptance;
use crate::refinement::state::RefinementStatus;

/// What happened during one refinement iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationReport {
    /// 1-based iteration number.
    pub iteration: usize,
    /// "Other" rows at the start of the iteration.
    pub other_count: usize,
    /// Mined tokens with their frequencies.
    pub tokens: Vec<(String, usize)>,
    /// Representative phrases offered for assignment.
    pub phrases: Vec<String>,
    /// Exemplars appended to the store.
    pub accepted: Vec<Acceptance>,
    /// Rows that left the "Other" bucket when re-labeled.
    pub relabeled: usize,
}

impl IterationReport {
    /// "Other" rows left after this iteration.
    pub fn remaining(&self) -> usize {
        self.other_count - self.relabeled
    }
}

/// Outcome of a full refinement run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinementReport {
    pub status: RefinementStatus,
    pub iterations: Vec<IterationReport>,
    /// "Other" rows before the first iteration.
    pub initial_other_count: usize,
    /// "Other" rows when the loop stopped.
    pub final_other_count: usize,
}

impl RefinementReport {
    /// Number of iterations run.
    pub fn iteration_count(&self) -> usize {
        self.iterations.len()
    }

    /// Check whether every row ended up labeled.
    pub fn converged(&self) -> bool {
        self.status == RefinementStatus::Converged
    }

    /// Total exemplars added across iterations.
    pub fn accepted_count(&self) -> usize {
        self.iterations.iter().map(|it| it.accepted.len()).sum()
    }
}
