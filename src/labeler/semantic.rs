//! Embedding-based labeling.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use crate::category::{CategoryStore, DEFAULT_OTHER_LABEL, Label};
use crate::config::RefinementConfig;
use crate::embedding::CachedEmbedder;
use crate::embedding::text_embedder::TextEmbedder;
use crate::error::Result;
use crate::labeler::{Acceptance, LabelOutcome, Labeler, resolve_label};
use crate::miner::MinedKeywords;
use crate::vector::Vector;

/// Default similarity a category must exceed to be assigned.
pub const DEFAULT_SEMANTIC_THRESHOLD: f32 = 0.5;

/// Labels responses by cosine similarity to category anchors.
///
/// A category is represented by its anchors (exemplars plus its own name)
/// and scores the maximum similarity of any anchor. The best category wins
/// only if its score is strictly greater than the threshold; on equal scores
/// the category defined first is kept.
#[derive(Debug, Clone)]
pub struct SemanticLabeler {
    embedder: Arc<CachedEmbedder>,
    threshold: f32,
    other_label: String,
}

impl SemanticLabeler {
    /// Create a labeler with the default threshold.
    pub fn new(embedder: Arc<CachedEmbedder>) -> Self {
        Self {
            embedder,
            threshold: DEFAULT_SEMANTIC_THRESHOLD,
            other_label: DEFAULT_OTHER_LABEL.to_string(),
        }
    }

    /// Set the assignment threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the sentinel label; a category with this name never counts as a match.
    pub fn with_other_label<S: Into<String>>(mut self, other_label: S) -> Self {
        self.other_label = other_label.into();
        self
    }

    /// The assignment threshold.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// The embedder in use.
    pub fn embedder(&self) -> &Arc<CachedEmbedder> {
        &self.embedder
    }

    /// Best anchor similarity of every category, in store order.
    async fn score_categories(&self, vector: &Vector, store: &CategoryStore) -> Result<Vec<f32>> {
        let mut scores = Vec::with_capacity(store.len());
        for name in store.categories() {
            let anchors = store.anchors(name);
            let anchor_vectors = self.embedder.embed_many(&anchors).await?;

            let mut best = f32::NEG_INFINITY;
            for anchor in &anchor_vectors {
                best = best.max(vector.cosine_similarity(anchor)?);
            }
            scores.push(best);
        }
        Ok(scores)
    }
}

/// Index and score of the first category scoring strictly above `floor`
/// with the highest score.
fn pick_best(scores: &[f32], floor: f32) -> Option<(usize, f32)> {
    let mut best = None;
    let mut best_score = floor;
    for (index, &score) in scores.iter().enumerate() {
        if score > best_score {
            best_score = score;
            best = Some((index, score));
        }
    }
    best
}

fn max_score(scores: &[f32]) -> f32 {
    scores.iter().copied().reduce(f32::max).unwrap_or(0.0)
}

#[async_trait]
impl Labeler for SemanticLabeler {
    async fn label(&self, text: &str, store: &CategoryStore) -> Result<LabelOutcome> {
        if text.trim().is_empty() {
            return Ok(LabelOutcome {
                label: Label::Unlabeled,
                similarity: Some(0.0),
            });
        }

        let vector = self.embedder.embed(text).await?;
        let scores = self.score_categories(&vector, store).await?;
        let similarity = max_score(&scores);

        let label = pick_best(&scores, self.threshold)
            .and_then(|(index, _)| store.name_at(index))
            .map(|name| resolve_label(name, &self.other_label))
            .unwrap_or(Label::Unlabeled);
        debug!("{text:?} -> {label} ({similarity:.3})");

        Ok(LabelOutcome {
            label,
            similarity: Some(similarity),
        })
    }

    async fn assign_candidates(
        &self,
        mined: &MinedKeywords,
        _residue: &[&str],
        store: &mut CategoryStore,
        config: &RefinementConfig,
    ) -> Result<Vec<Acceptance>> {
        let mut candidates: Vec<&str> = mined.phrases.iter().map(String::as_str).collect();
        if config.assign_tokens {
            candidates.extend(mined.token_strings());
        }

        let mut accepted = Vec::new();
        for candidate in candidates {
            if candidate.is_empty() {
                continue;
            }
            let vector = self.embedder.embed(candidate).await?;
            let scores = self.score_categories(&vector, store).await?;

            let Some((index, similarity)) = pick_best(&scores, 0.0) else {
                continue;
            };
            if similarity <= config.mining_threshold {
                continue;
            }
            let Some(category) = store.name_at(index).map(str::to_string) else {
                continue;
            };

            if store.add_exemplar(&category, candidate) {
                info!(
                    "Phrase {candidate:?} added to category {category:?} (similarity: {similarity:.2})"
                );
                accepted.push(Acceptance {
                    candidate: candidate.to_string(),
                    category,
                    similarity: Some(similarity),
                    created: false,
                });
            }
        }
        Ok(accepted)
    }

    fn name(&self) -> &str {
        "semantic"
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::embedding::TextEmbedder;
    use crate::error::MotifError;

    /// Returns hand-written vectors; unknown texts embed to the zero vector.
    struct TableEmbedder {
        vectors: HashMap<String, Vec<f32>>,
    }

    impl TableEmbedder {
        fn new(entries: &[(&str, [f32; 3])]) -> Self {
            Self {
                vectors: entries
                    .iter()
                    .map(|(text, v)| (text.to_string(), v.to_vec()))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl TextEmbedder for TableEmbedder {
        async fn embed(&self, text: &str) -> Result<Vector> {
            Ok(Vector::new(
                self.vectors.get(text).cloned().unwrap_or_else(|| vec![0.0; 3]),
            ))
        }

        fn dimension(&self) -> usize {
            3
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl TextEmbedder for FailingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vector> {
            Err(MotifError::provider("model unavailable"))
        }

        fn dimension(&self) -> usize {
            3
        }
    }

    fn labeler(entries: &[(&str, [f32; 3])]) -> SemanticLabeler {
        SemanticLabeler::new(Arc::new(CachedEmbedder::new(Arc::new(TableEmbedder::new(
            entries,
        )))))
    }

    #[tokio::test]
    async fn test_best_category_above_threshold_wins() {
        let labeler = labeler(&[
            ("A", [1.0, 0.0, 0.0]),
            ("B", [0.0, 1.0, 0.0]),
            ("mostly b", [0.1, 0.9, 0.0]),
        ]);
        let store = CategoryStore::from_pairs([("A", Vec::<&str>::new()), ("B", Vec::new())]);

        let outcome = labeler.label("mostly b", &store).await.unwrap();
        assert_eq!(outcome.label, Label::assigned("B"));
        assert!(outcome.similarity.unwrap() > 0.9);
    }

    #[tokio::test]
    async fn test_score_equal_to_threshold_is_unlabeled() {
        let labeler = labeler(&[("A", [1.0, 0.0, 0.0]), ("text", [1.0, 0.0, 0.0])])
            .with_threshold(1.0);
        let store = CategoryStore::from_pairs([("A", Vec::<&str>::new())]);

        let outcome = labeler.label("text", &store).await.unwrap();
        assert_eq!(outcome.label, Label::Unlabeled);
    }

    #[tokio::test]
    async fn test_first_category_wins_ties() {
        let labeler = labeler(&[
            ("A", [1.0, 0.0, 0.0]),
            ("B", [1.0, 0.0, 0.0]),
            ("text", [1.0, 0.0, 0.0]),
        ]);
        let store = CategoryStore::from_pairs([("A", Vec::<&str>::new()), ("B", Vec::new())]);

        let outcome = labeler.label("text", &store).await.unwrap();
        assert_eq!(outcome.label, Label::assigned("A"));
    }

    #[tokio::test]
    async fn test_exemplars_act_as_anchors() {
        let labeler = labeler(&[
            ("A", [1.0, 0.0, 0.0]),
            ("atencion", [0.0, 0.0, 1.0]),
            ("buena atencion", [0.0, 0.0, 1.0]),
        ]);
        let store = CategoryStore::from_pairs([("A", vec!["atencion"])]);

        let outcome = labeler.label("buena atencion", &store).await.unwrap();
        assert_eq!(outcome.label, Label::assigned("A"));
    }

    #[tokio::test]
    async fn test_empty_text_short_circuits() {
        let labeler = SemanticLabeler::new(Arc::new(CachedEmbedder::new(Arc::new(
            FailingEmbedder,
        ))));
        let store = CategoryStore::from_pairs([("A", Vec::<&str>::new())]);

        let outcome = labeler.label("", &store).await.unwrap();
        assert_eq!(outcome.label, Label::Unlabeled);
        assert_eq!(outcome.similarity, Some(0.0));
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let labeler = SemanticLabeler::new(Arc::new(CachedEmbedder::new(Arc::new(
            FailingEmbedder,
        ))));
        let store = CategoryStore::from_pairs([("A", Vec::<&str>::new())]);

        let err = labeler.label("hola", &store).await.unwrap_err();
        assert!(matches!(err, MotifError::Provider(_)));
    }

    #[tokio::test]
    async fn test_sentinel_named_category_counts_as_unlabeled() {
        let labeler = labeler(&[("Otros", [1.0, 0.0, 0.0]), ("text", [1.0, 0.0, 0.0])]);
        let store = CategoryStore::from_pairs([("Otros", Vec::<&str>::new())]);

        let outcome = labeler.label("text", &store).await.unwrap();
        assert_eq!(outcome.label, Label::Unlabeled);
    }

    #[tokio::test]
    async fn test_assign_candidates_uses_mining_threshold() {
        let labeler = labeler(&[
            ("A", [1.0, 0.0, 0.0]),
            ("close", [0.45, 0.893, 0.0]),
            ("far", [0.3, 0.0, 0.954]),
        ]);
        let mut store = CategoryStore::from_pairs([("A", Vec::<&str>::new())]);
        let mined = MinedKeywords {
            tokens: Vec::new(),
            phrases: vec!["close".to_string(), "far".to_string()],
        };

        let accepted = labeler
            .assign_candidates(&mined, &[], &mut store, &RefinementConfig::default())
            .await
            .unwrap();

        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].candidate, "close");
        assert_eq!(accepted[0].category, "A");
        assert_eq!(store.exemplars("A").unwrap(), ["close"]);
    }

    #[test]
    fn test_pick_best() {
        assert_eq!(pick_best(&[0.2, 0.7, 0.7], 0.5), Some((1, 0.7)));
        assert_eq!(pick_best(&[0.5, 0.5], 0.5), None);
        assert_eq!(pick_best(&[], 0.0), None);
    }
}
