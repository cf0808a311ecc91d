//! Run configuration.
//!
//! Every tunable of a labeling run lives here: column names, labeling
//! thresholds, refinement limits and the embedding backend. Defaults match the
//! survey export the tool was built for; a JSON file can override any subset
//! and CLI flags override the file.

use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::category::DEFAULT_OTHER_LABEL;
use crate::error::{MotifError, Result};

/// How responses are matched to categories.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelingStrategy {
    /// Cosine similarity between sentence embeddings.
    #[default]
    Semantic,
    /// Substring matching against normalized text.
    Keyword,
}

/// Embedding backend used by the semantic strategy.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderKind {
    /// Offline feature-hashing embedder.
    #[default]
    Hashing,
    /// OpenAI embeddings API (`embeddings-openai` feature).
    Openai,
    /// Local sentence-transformers model (`embeddings-candle` feature).
    Candle,
}

/// Column names of the input and output tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub id_column: String,
    pub text_column: String,
    pub label_column: String,
    pub similarity_column: String,
    pub category_name_column: String,
    pub category_keywords_column: String,
    pub keyword_separator: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            id_column: "id".to_string(),
            text_column: "MotivoAdherencia".to_string(),
            label_column: "CategoriaDescriptiva".to_string(),
            similarity_column: "Similitud".to_string(),
            category_name_column: "categoria".to_string(),
            category_keywords_column: "palabrasClave".to_string(),
            keyword_separator: ";".to_string(),
        }
    }
}

/// Initial labeling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelingConfig {
    pub strategy: LabelingStrategy,
    /// A category must score strictly above this to be assigned.
    pub threshold: f32,
    /// Label written for responses that match no category.
    pub other_label: String,
    /// Drop unlabeled rows from the exported table.
    ///
    /// `None` picks the strategy default: keyword runs without refinement drop
    /// them, every other run keeps them.
    pub drop_unlabeled: Option<bool>,
}

impl Default for LabelingConfig {
    fn default() -> Self {
        Self {
            strategy: LabelingStrategy::Semantic,
            threshold: 0.5,
            other_label: DEFAULT_OTHER_LABEL.to_string(),
            drop_unlabeled: None,
        }
    }
}

/// Refinement loop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinementConfig {
    pub enabled: bool,
    /// Number of mined tokens and representative phrases per iteration.
    pub top_n: usize,
    /// Acceptance threshold when folding mined phrases into categories.
    pub mining_threshold: f32,
    /// Consecutive iterations without progress before giving up.
    pub max_stall: usize,
    /// Hard cap on iterations.
    pub max_iterations: Option<usize>,
    /// Also offer mined tokens (not only phrases) to the semantic assigner.
    pub assign_tokens: bool,
    /// Minimum name similarity for "Related to <category>" naming.
    pub fuzzy_cutoff: f64,
}

impl Default for RefinementConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            top_n: 8,
            mining_threshold: 0.4,
            max_stall: 3,
            max_iterations: None,
            assign_tokens: false,
            fuzzy_cutoff: 0.6,
        }
    }
}

/// Embedding backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedderConfig {
    pub kind: EmbedderKind,
    /// Model identifier for the OpenAI and Candle backends.
    pub model: Option<String>,
    /// Bucket count of the hashing embedder.
    pub dimension: usize,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            kind: EmbedderKind::Hashing,
            model: None,
            dimension: 384,
        }
    }
}

/// Complete configuration of a labeling run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotifConfig {
    pub columns: ColumnConfig,
    pub labeling: LabelingConfig,
    pub refinement: RefinementConfig,
    pub embedder: EmbedderConfig,
}

impl MotifConfig {
    /// Load a configuration from a JSON file; absent keys keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(MotifError::file_not_found(path));
        }
        let content = std::fs::read_to_string(path)?;
        let config: MotifConfig = serde_json::from_str(&content).map_err(|e| {
            MotifError::configuration(format!("invalid config {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<()> {
        let columns = [
            ("id_column", &self.columns.id_column),
            ("text_column", &self.columns.text_column),
            ("label_column", &self.columns.label_column),
            ("similarity_column", &self.columns.similarity_column),
            ("category_name_column", &self.columns.category_name_column),
            (
                "category_keywords_column",
                &self.columns.category_keywords_column,
            ),
            ("keyword_separator", &self.columns.keyword_separator),
        ];
        for (key, value) in columns {
            if value.trim().is_empty() {
                return Err(MotifError::configuration(format!("{key} must not be empty")));
            }
        }

        let columns = &self.columns;
        let output_columns = [
            ("label_column", &columns.label_column),
            ("similarity_column", &columns.similarity_column),
        ];
        let other_columns = [
            ("similarity_column", &columns.similarity_column),
            ("id_column", &columns.id_column),
            ("text_column", &columns.text_column),
        ];
        for (key, value) in output_columns {
            for (other_key, other) in other_columns {
                if key != other_key && value == other {
                    return Err(MotifError::configuration(format!(
                        "{key} and {other_key} must differ, both are '{value}'"
                    )));
                }
            }
        }

        for (key, value) in [
            ("threshold", self.labeling.threshold),
            ("mining_threshold", self.refinement.mining_threshold),
        ] {
            if !(-1.0..=1.0).contains(&value) {
                return Err(MotifError::configuration(format!(
                    "{key} must be within [-1, 1], got {value}"
                )));
            }
        }

        if self.labeling.other_label.trim().is_empty() {
            return Err(MotifError::configuration("other_label must not be empty"));
        }
        if self.refinement.top_n == 0 {
            return Err(MotifError::configuration("top_n must be at least 1"));
        }
        if self.refinement.max_stall == 0 {
            return Err(MotifError::configuration("max_stall must be at least 1"));
        }
        if self.refinement.max_iterations == Some(0) {
            return Err(MotifError::configuration("max_iterations must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.refinement.fuzzy_cutoff) {
            return Err(MotifError::configuration(format!(
                "fuzzy_cutoff must be within [0, 1], got {}",
                self.refinement.fuzzy_cutoff
            )));
        }
        if self.embedder.dimension == 0 {
            return Err(MotifError::configuration(
                "embedder dimension must be at least 1",
            ));
        }
        Ok(())
    }

    /// Whether unlabeled rows are left out of the exported table.
    pub fn drop_unlabeled(&self) -> bool {
        self.labeling.drop_unlabeled.unwrap_or(
            self.labeling.strategy == LabelingStrategy::Keyword && !self.refinement.enabled,
        )
    }
}
