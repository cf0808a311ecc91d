//! Labeling strategies.
//!
//! A [`Labeler`] assigns a category to one response and, during refinement,
//! decides where mined candidates from the unlabeled residue belong. Two
//! strategies exist behind the same trait:
//!
//! - [`SemanticLabeler`]: cosine similarity between sentence embeddings.
//! - [`KeywordLabeler`]: first literal substring match on normalized text.
//!
//! Both read categories in store insertion order, so ties always resolve to
//! the category that was defined first.

pub mod keyword;
pub mod semantic;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::category::{CategoryStore, Label};
use crate::config::RefinementConfig;
use crate::error::Result;
use crate::miner::MinedKeywords;

pub use keyword::{KeywordLabeler, RELATED_PREFIX, UNMATCHED_RELATED_NAME, label_keyword};
pub use semantic::SemanticLabeler;

/// Result of labeling a single response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelOutcome {
    /// The assigned category, or [`Label::Unlabeled`].
    pub label: Label,
    /// Best similarity seen across categories, for strategies that score.
    pub similarity: Option<f32>,
}

impl LabelOutcome {
    /// An outcome without a similarity score.
    pub fn unscored(label: Label) -> Self {
        Self {
            label,
            similarity: None,
        }
    }
}

/// A mined candidate folded into a category during refinement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Acceptance {
    /// The phrase or token appended to the category.
    pub candidate: String,
    /// The receiving category.
    pub category: String,
    /// Similarity at acceptance time, for strategies that score.
    pub similarity: Option<f32>,
    /// Whether the category was created for this candidate.
    pub created: bool,
}

/// A labeling strategy.
#[async_trait]
pub trait Labeler: Send + Sync {
    /// Label one response against the current store.
    async fn label(&self, text: &str, store: &CategoryStore) -> Result<LabelOutcome>;

    /// Fold mined candidates into the store.
    ///
    /// `residue` holds the raw texts of the responses that are still
    /// unlabeled. Returns one entry per exemplar actually appended.
    async fn assign_candidates(
        &self,
        mined: &MinedKeywords,
        residue: &[&str],
        store: &mut CategoryStore,
        config: &RefinementConfig,
    ) -> Result<Vec<Acceptance>>;

    /// Short strategy name for diagnostics.
    fn name(&self) -> &str;
}

/// Map a winning category to a label; a category named like the "Other"
/// sentinel counts as unlabeled.
pub(crate) fn resolve_label(category: &str, other_label: &str) -> Label {
    if category == other_label {
        Label::Unlabeled
    } else {
        Label::assigned(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_label() {
        assert_eq!(resolve_label("Costos", "Otros"), Label::assigned("Costos"));
        assert_eq!(resolve_label("Otros", "Otros"), Label::Unlabeled);
    }
}
