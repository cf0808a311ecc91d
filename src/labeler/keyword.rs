//! Substring-based labeling.

use async_trait::async_trait;
use log::{debug, info};

use crate::analysis::normalize;
use crate::category::{CategoryStore, DEFAULT_OTHER_LABEL, Label};
use crate::config::RefinementConfig;
use crate::error::Result;
use crate::labeler::{Acceptance, LabelOutcome, Labeler, resolve_label};
use crate::miner::MinedKeywords;
use crate::util::levenshtein::closest_match;

/// Prefix of categories synthesized during keyword refinement.
pub const RELATED_PREFIX: &str = "Related to ";

/// Name of the synthesized category when no existing name is close enough.
pub const UNMATCHED_RELATED_NAME: &str = "Related to Other reasons";

/// Label `text` with the first category having an exemplar contained in it.
///
/// The text is normalized; exemplars are matched literally. Categories are
/// tried in insertion order and the first hit wins, even when a later
/// category has a longer match.
pub fn label_keyword(text: &str, store: &CategoryStore) -> Label {
    let normalized = normalize(text);
    store
        .iter()
        .find(|(_, exemplars)| {
            exemplars
                .iter()
                .any(|phrase| normalized.contains(phrase.as_str()))
        })
        .map(|(name, _)| Label::assigned(name))
        .unwrap_or(Label::Unlabeled)
}

/// Labels responses by keyword containment.
#[derive(Debug, Clone)]
pub struct KeywordLabeler {
    other_label: String,
}

impl Default for KeywordLabeler {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordLabeler {
    pub fn new() -> Self {
        Self {
            other_label: DEFAULT_OTHER_LABEL.to_string(),
        }
    }

    /// Set the sentinel label; a category with this name never counts as a match.
    pub fn with_other_label<S: Into<String>>(mut self, other_label: S) -> Self {
        self.other_label = other_label.into();
        self
    }

    /// Number of residue texts containing at least one exemplar, per category.
    fn votes(residue: &[String], store: &CategoryStore) -> Vec<usize> {
        store
            .iter()
            .map(|(_, exemplars)| {
                residue
                    .iter()
                    .filter(|text| {
                        exemplars
                            .iter()
                            .any(|phrase| text.contains(phrase.as_str()))
                    })
                    .count()
            })
            .collect()
    }

    /// Name for a new category grouping `tokens`.
    fn related_name(tokens: &[&str], store: &CategoryStore, cutoff: f64) -> String {
        let query = tokens.join(" ");
        let names: Vec<&str> = store.categories().collect();
        let normalized: Vec<String> = names.iter().map(|name| normalize(name)).collect();

        closest_match(&query, normalized.iter().map(String::as_str), cutoff)
            .map(|index| format!("{RELATED_PREFIX}{}", names[index]))
            .unwrap_or_else(|| UNMATCHED_RELATED_NAME.to_string())
    }
}

#[async_trait]
impl Labeler for KeywordLabeler {
    async fn label(&self, text: &str, store: &CategoryStore) -> Result<LabelOutcome> {
        let label = match label_keyword(text, store) {
            Label::Assigned(name) => resolve_label(&name, &self.other_label),
            Label::Unlabeled => Label::Unlabeled,
        };
        Ok(LabelOutcome::unscored(label))
    }

    async fn assign_candidates(
        &self,
        mined: &MinedKeywords,
        residue: &[&str],
        store: &mut CategoryStore,
        config: &RefinementConfig,
    ) -> Result<Vec<Acceptance>> {
        let tokens: Vec<&str> = mined.token_strings().collect();
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let normalized: Vec<String> = residue.iter().map(|text| normalize(text)).collect();
        let votes = Self::votes(&normalized, store);
        debug!("Category votes: {votes:?}");

        let mut winner: Option<(usize, usize)> = None;
        for (index, &count) in votes.iter().enumerate() {
            if count > winner.map_or(0, |(_, best)| best) {
                winner = Some((index, count));
            }
        }

        let (category, created) = match winner.and_then(|(index, _)| store.name_at(index)) {
            Some(name) => (name.to_string(), false),
            None => {
                let name = Self::related_name(&tokens, store, config.fuzzy_cutoff);
                let created = store.ensure_category(&name);
                if created {
                    info!("Created category {name:?}");
                }
                (name, created)
            }
        };

        let mut accepted = Vec::new();
        for token in tokens {
            if store.add_exemplar(&category, token) {
                accepted.push(Acceptance {
                    candidate: token.to_string(),
                    category: category.clone(),
                    similarity: None,
                    created: created && accepted.is_empty(),
                });
            }
        }
        if !accepted.is_empty() {
            info!(
                "Added {} keyword(s) to category {category:?}",
                accepted.len()
            );
        }
        Ok(accepted)
    }

    fn name(&self) -> &str {
        "keyword"
    }
}
