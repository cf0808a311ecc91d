//! Refinement loop state and phases.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Phases of the refinement state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RefinementPhase {
    /// Partition rows into labeled and "Other".
    Scanning,
    /// Mine tokens and phrases from the "Other" residue.
    Mining,
    /// Fold mined candidates into categories.
    Assigning,
    /// Re-label the rows that were "Other" at scan time.
    Relabeling,
    /// No "Other" rows remain.
    Converged,
    /// The "Other" count stopped moving; the loop gave up.
    Stalled,
}

impl RefinementPhase {
    /// Check whether the loop ends in this phase.
    pub fn is_terminal(self) -> bool {
        matches!(self, RefinementPhase::Converged | RefinementPhase::Stalled)
    }
}

impl fmt::Display for RefinementPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RefinementPhase::Scanning => "SCANNING",
            RefinementPhase::Mining => "MINING",
            RefinementPhase::Assigning => "ASSIGNING",
            RefinementPhase::Relabeling => "RELABELING",
            RefinementPhase::Converged => "CONVERGED",
            RefinementPhase::Stalled => "STALLED",
        };
        f.write_str(name)
    }
}

/// How a refinement run ended.
///
/// Both outcomes yield the same output; the difference is diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefinementStatus {
    Converged,
    Stalled,
}

impl From<RefinementStatus> for RefinementPhase {
    fn from(status: RefinementStatus) -> Self {
        match status {
            RefinementStatus::Converged => RefinementPhase::Converged,
            RefinementStatus::Stalled => RefinementPhase::Stalled,
        }
    }
}

impl fmt::Display for RefinementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        RefinementPhase::from(*self).fmt(f)
    }
}

/// Progress counters carried across iterations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinementState {
    /// Completed iterations.
    pub iteration_count: usize,
    /// "Other" count observed at the previous iteration's scan.
    pub previous_other_count: Option<usize>,
    /// Consecutive iterations whose scan saw the same "Other" count.
    pub stall_count: usize,
}

impl RefinementState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished iteration whose scan saw `other_count` rows.
    ///
    /// Returns the updated stall count.
    pub fn record_iteration(&mut self, other_count: usize) -> usize {
        self.iteration_count += 1;
        if self.previous_other_count == Some(other_count) {
            self.stall_count += 1;
        } else {
            self.stall_count = 0;
        }
        self.previous_other_count = Some(other_count);
        self.stall_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_iteration_never_stalls() {
        let mut state = RefinementState::new();
        assert_eq!(state.record_iteration(5), 0);
        assert_eq!(state.previous_other_count, Some(5));
        assert_eq!(state.iteration_count, 1);
    }

    #[test]
    fn test_stall_count_grows_and_resets() {
        let mut state = RefinementState::new();
        state.record_iteration(5);
        assert_eq!(state.record_iteration(5), 1);
        assert_eq!(state.record_iteration(5), 2);
        assert_eq!(state.record_iteration(3), 0);
        assert_eq!(state.record_iteration(3), 1);
        assert_eq!(state.iteration_count, 5);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(RefinementPhase::Relabeling.to_string(), "RELABELING");
        assert_eq!(RefinementStatus::Stalled.to_string(), "STALLED");
        assert!(RefinementPhase::Converged.is_terminal());
        assert!(!RefinementPhase::Mining.is_terminal());
    }
}
