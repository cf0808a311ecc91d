//! The refinement loop.

use log::{debug, info, warn};

use crate::category::CategoryStore;
use crate::config::RefinementConfig;
use crate::dataset::LabeledResponse;
use crate::error::Result;
use crate::labeler::{Acceptance, Labeler};
use crate::miner::{KeywordMiner, MinedKeywords};
use crate::refinement::report::{IterationReport, RefinementReport};
use crate::refinement::state::{RefinementPhase, RefinementState, RefinementStatus};

/// A phase together with the data it hands to the next one.
enum Step {
    Scanning,
    Mining {
        residue: Vec<usize>,
    },
    Assigning {
        residue: Vec<usize>,
        mined: MinedKeywords,
    },
    Relabeling {
        residue: Vec<usize>,
        mined: MinedKeywords,
        accepted: Vec<Acceptance>,
    },
    Done(RefinementStatus),
}

impl Step {
    fn phase(&self) -> RefinementPhase {
        match self {
            Step::Scanning => RefinementPhase::Scanning,
            Step::Mining { .. } => RefinementPhase::Mining,
            Step::Assigning { .. } => RefinementPhase::Assigning,
            Step::Relabeling { .. } => RefinementPhase::Relabeling,
            Step::Done(status) => (*status).into(),
        }
    }
}

fn unlabeled_rows(rows: &[LabeledResponse]) -> Vec<usize> {
    rows.iter()
        .enumerate()
        .filter(|(_, row)| row.is_unlabeled())
        .map(|(index, _)| index)
        .collect()
}

fn texts_of<'a>(rows: &'a [LabeledResponse], residue: &[usize]) -> Vec<&'a str> {
    residue.iter().map(|&index| rows[index].text()).collect()
}

/// Grows the category store from the "Other" residue until every row is
/// labeled or progress stops.
///
/// Each iteration mines the texts still labeled "Other", lets the labeler fold
/// the mined candidates into the store, and re-labels exactly those rows.
/// Rows that already carry a category are never touched. The loop stops as
/// [`RefinementStatus::Stalled`] once the "Other" count seen at scan time has
/// repeated `max_stall` times in a row, or when `max_iterations` is reached.
pub struct RefinementLoop<'a> {
    labeler: &'a dyn Labeler,
    config: RefinementConfig,
    miner: KeywordMiner,
}

impl<'a> RefinementLoop<'a> {
    pub fn new(labeler: &'a dyn Labeler, config: RefinementConfig) -> Self {
        let miner = KeywordMiner::new(config.top_n);
        Self {
            labeler,
            config,
            miner,
        }
    }

    /// The loop settings.
    pub fn config(&self) -> &RefinementConfig {
        &self.config
    }

    /// Run the loop to termination, re-labeling `rows` in place and growing
    /// `store`.
    ///
    /// Provider errors abort the run; rows and store keep whatever changes
    /// were made before the failure.
    pub async fn run(
        &self,
        rows: &mut [LabeledResponse],
        store: &mut CategoryStore,
    ) -> Result<RefinementReport> {
        let mut state = RefinementState::new();
        let mut iterations = Vec::new();
        let initial_other_count = rows.iter().filter(|row| row.is_unlabeled()).count();

        let mut step = Step::Scanning;
        let status = loop {
            debug!("Refinement phase {}", step.phase());
            step = match step {
                Step::Scanning => {
                    let residue = unlabeled_rows(rows);
                    info!("{} response(s) remain unlabeled", residue.len());

                    if residue.is_empty() {
                        Step::Done(RefinementStatus::Converged)
                    } else if let Some(max) = self.config.max_iterations
                        && state.iteration_count >= max
                    {
                        warn!("Reached the limit of {max} refinement iteration(s)");
                        Step::Done(RefinementStatus::Stalled)
                    } else {
                        Step::Mining { residue }
                    }
                }
                Step::Mining { residue } => {
                    let mined = self.miner.mine_all(&texts_of(rows, &residue));
                    for (rank, (token, count)) in mined.tokens.iter().enumerate() {
                        debug!("  keyword {}. {token} ({count})", rank + 1);
                    }
                    for (rank, phrase) in mined.phrases.iter().enumerate() {
                        debug!("  phrase {}. {phrase}", rank + 1);
                    }
                    Step::Assigning { residue, mined }
                }
                Step::Assigning { residue, mined } => {
                    let texts = texts_of(rows, &residue);
                    let accepted = self
                        .labeler
                        .assign_candidates(&mined, &texts, store, &self.config)
                        .await?;
                    Step::Relabeling {
                        residue,
                        mined,
                        accepted,
                    }
                }
                Step::Relabeling {
                    residue,
                    mined,
                    accepted,
                } => {
                    let mut relabeled = 0;
                    for &index in &residue {
                        let outcome = self.labeler.label(rows[index].text(), store).await?;
                        if !outcome.label.is_unlabeled() {
                            relabeled += 1;
                        }
                        rows[index].label = outcome.label;
                        rows[index].similarity = outcome.similarity;
                    }

                    let other_count = residue.len();
                    let stall_count = state.record_iteration(other_count);
                    iterations.push(IterationReport {
                        iteration: state.iteration_count,
                        other_count,
                        tokens: mined.tokens,
                        phrases: mined.phrases,
                        accepted,
                        relabeled,
                    });

                    if stall_count >= self.config.max_stall {
                        warn!(
                            "Unlabeled count stuck at {other_count} for {stall_count} consecutive iteration(s); stopping"
                        );
                        Step::Done(RefinementStatus::Stalled)
                    } else {
                        Step::Scanning
                    }
                }
                Step::Done(status) => break status,
            };
        };

        let final_other_count = rows.iter().filter(|row| row.is_unlabeled()).count();
        match status {
            RefinementStatus::Converged => info!(
                "Refinement converged after {} iteration(s)",
                state.iteration_count
            ),
            RefinementStatus::Stalled => warn!(
                "Refinement stalled after {} iteration(s) with {final_other_count} response(s) unlabeled",
                state.iteration_count
            ),
        }

        Ok(RefinementReport {
            status,
            iterations,
            initial_other_count,
            final_other_count,
        })
    }
}
