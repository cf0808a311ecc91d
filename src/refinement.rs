//! Iterative refinement of the category dictionary.
//!
//! After the first labeling pass some responses are left in the "Other"
//! bucket. The [`RefinementLoop`] mines that residue for frequent tokens and
//! representative phrases, lets the active [`Labeler`](crate::labeler::Labeler)
//! fold them into the store, and re-labels the residue. It moves through the
//! phases of [`RefinementPhase`] until nothing is left unlabeled
//! (`CONVERGED`) or the residue stops shrinking (`STALLED`).

pub mod engine;
pub mod report;
pub mod state;

pub use crate::config::RefinementConfig;
pub use engine::RefinementLoop;
pub use report::{IterationReport, RefinementReport};
pub use state::{RefinementPhase, RefinementState, RefinementStatus};
