//! End-to-end labeling runs.
//!
//! [`label_responses`] is the in-memory core: filter, label, refine. The
//! [`Pipeline`] wraps it with file loading and export and produces a
//! [`PipelineSummary`] for reporting.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::analysis::{FilterReport, ValidityFilter};
use crate::category::{CategoryStore, default_keyword_store, default_semantic_store};
use crate::config::{LabelingStrategy, MotifConfig};
use crate::dataset::{
    ExportOptions, LabeledResponse, LabeledSheet, Response, TableReader, load_categories,
    responses_from_table, save_categories,
};
use crate::embedding::{CachedEmbedder, TextEmbedder, build_embedder};
use crate::error::Result;
use crate::labeler::{KeywordLabeler, Labeler, SemanticLabeler};
use crate::refinement::{RefinementLoop, RefinementReport, RefinementStatus};

/// Result of labeling a batch of responses in memory.
#[derive(Debug, Clone)]
pub struct LabelingRun {
    /// Retained responses with their final labels, in input order.
    pub rows: Vec<LabeledResponse>,
    /// The store after refinement, with every produced label as a key.
    pub store: CategoryStore,
    pub filter: FilterReport,
    /// Present when refinement was enabled.
    pub refinement: Option<RefinementReport>,
}

impl LabelingRun {
    /// Responses still in the "Other" bucket.
    pub fn unlabeled_count(&self) -> usize {
        self.rows.iter().filter(|row| row.is_unlabeled()).count()
    }
}

/// Filter, label and optionally refine `responses`.
pub async fn label_responses(
    responses: Vec<Response>,
    mut store: CategoryStore,
    labeler: &dyn Labeler,
    config: &MotifConfig,
) -> Result<LabelingRun> {
    let (valid, filter) = ValidityFilter::new().filter(responses, |r| r.text.as_str());

    let mut rows = Vec::with_capacity(valid.len());
    for response in valid {
        let outcome = labeler.label(&response.text, &store).await?;
        rows.push(LabeledResponse {
            response,
            label: outcome.label,
            similarity: outcome.similarity,
        });
    }
    let unlabeled = rows.iter().filter(|row| row.is_unlabeled()).count();
    info!(
        "Initial {} labeling: {} of {} response(s) unlabeled",
        labeler.name(),
        unlabeled,
        rows.len()
    );

    let refinement = if config.refinement.enabled {
        let refinement_loop = RefinementLoop::new(labeler, config.refinement.clone());
        Some(refinement_loop.run(&mut rows, &mut store).await?)
    } else {
        None
    };

    finalize_store(&mut store, &rows, &config.labeling.other_label);
    Ok(LabelingRun {
        rows,
        store,
        filter,
        refinement,
    })
}

/// Make every label in `rows` a key of `store`.
///
/// The "Other" sentinel is added too when any row is still unlabeled.
pub fn finalize_store(store: &mut CategoryStore, rows: &[LabeledResponse], other_label: &str) {
    for row in rows {
        store.ensure_category(row.label.display_name(other_label));
    }
}

/// Number of rows per label, in store order; labels without rows are omitted.
pub fn label_counts(
    rows: &[LabeledResponse],
    store: &CategoryStore,
    other_label: &str,
) -> IndexMap<String, usize> {
    let mut counts: IndexMap<String, usize> = store
        .categories()
        .map(|name| (name.to_string(), 0))
        .collect();
    for row in rows {
        *counts
            .entry(row.label.display_name(other_label).to_string())
            .or_insert(0) += 1;
    }
    counts.retain(|_, count| *count > 0);
    counts
}

/// Build the labeler selected by `config`.
///
/// `embedder` overrides the configured embedding backend.
pub fn build_labeler(
    config: &MotifConfig,
    embedder: Option<Arc<dyn TextEmbedder>>,
) -> Result<Box<dyn Labeler>> {
    let other_label = config.labeling.other_label.as_str();
    Ok(match config.labeling.strategy {
        LabelingStrategy::Keyword => Box::new(KeywordLabeler::new().with_other_label(other_label)),
        LabelingStrategy::Semantic => {
            let embedder = match embedder {
                Some(embedder) => embedder,
                None => build_embedder(&config.embedder)?,
            };
            Box::new(
                SemanticLabeler::new(Arc::new(CachedEmbedder::new(embedder)))
                    .with_threshold(config.labeling.threshold)
                    .with_other_label(other_label),
            )
        }
    })
}

/// Files read and written by a [`Pipeline`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineInputs {
    /// Responses to label.
    pub data: PathBuf,
    /// Category dictionary; the built-in one for the strategy when absent.
    pub categories: Option<PathBuf>,
    /// Labeled rows; `.xlsx` or CSV by extension.
    pub output: Option<PathBuf>,
    /// Grown category dictionary.
    pub categories_output: Option<PathBuf>,
}

impl PipelineInputs {
    pub fn new<P: Into<PathBuf>>(data: P) -> Self {
        PipelineInputs {
            data: data.into(),
            ..Default::default()
        }
    }
}

/// What a pipeline run did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub input: PathBuf,
    pub strategy: LabelingStrategy,
    pub total_rows: usize,
    pub dropped_rows: usize,
    pub retained_rows: usize,
    pub exported_rows: usize,
    pub unlabeled_rows: usize,
    pub status: Option<RefinementStatus>,
    pub iterations: usize,
    pub exemplars_added: usize,
    pub category_count: usize,
    pub label_counts: IndexMap<String, usize>,
    pub output: PathBuf,
    pub categories_output: PathBuf,
}

/// Sibling of `data` named `name`.
fn beside(data: &Path, name: String) -> PathBuf {
    match data.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

fn file_stem(data: &Path) -> String {
    data.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "data".to_string())
}

/// Default path of the labeled output for `data`.
pub fn default_output_path(data: &Path, config: &MotifConfig) -> PathBuf {
    let name = match config.labeling.strategy {
        LabelingStrategy::Semantic => {
            format!("categorias_nuevas_umbral_{}.xlsx", config.labeling.threshold)
        }
        LabelingStrategy::Keyword => format!("{}_categorizado.xlsx", file_stem(data)),
    };
    beside(data, name)
}

/// Default path of the exported category dictionary for `data`.
pub fn default_categories_output_path(data: &Path) -> PathBuf {
    beside(data, format!("{}_categorias_final.csv", file_stem(data)))
}

/// File-to-file labeling run.
pub struct Pipeline {
    config: MotifConfig,
    embedder: Option<Arc<dyn TextEmbedder>>,
}

impl Pipeline {
    /// Create a pipeline; the configuration is validated here.
    pub fn new(config: MotifConfig) -> Result<Self> {
        config.validate()?;
        Ok(Pipeline {
            config,
            embedder: None,
        })
    }

    /// Use `embedder` instead of the configured backend.
    pub fn with_embedder(mut self, embedder: Arc<dyn TextEmbedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn config(&self) -> &MotifConfig {
        &self.config
    }

    /// Load, label, refine and export.
    ///
    /// All inputs are loaded and checked before any labeling starts, so a
    /// missing file or column aborts the run without output.
    pub async fn run(&self, inputs: &PipelineInputs) -> Result<PipelineSummary> {
        let config = &self.config;
        let columns = &config.columns;

        let table = TableReader::new().read_path(&inputs.data)?;
        let responses = responses_from_table(&table, columns)?;
        let store = match &inputs.categories {
            Some(path) => load_categories(path, columns)?,
            None => match config.labeling.strategy {
                LabelingStrategy::Keyword => default_keyword_store(),
                LabelingStrategy::Semantic => default_semantic_store(),
            },
        };
        if store.is_empty() {
            warn!("The category dictionary is empty; every response will be unlabeled");
        }

        let labeler = build_labeler(config, self.embedder.clone())?;
        let run = label_responses(responses, store, labeler.as_ref(), config).await?;

        let output = inputs
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&inputs.data, config));
        let categories_output = inputs
            .categories_output
            .clone()
            .unwrap_or_else(|| default_categories_output_path(&inputs.data));

        let options = ExportOptions {
            columns,
            other_label: &config.labeling.other_label,
            drop_unlabeled: config.drop_unlabeled(),
            include_similarity: config.labeling.strategy == LabelingStrategy::Semantic,
        };
        let sheet = LabeledSheet::build(&table, &run.rows, &options);
        sheet.save(&output)?;
        save_categories(&categories_output, &run.store, columns)?;

        Ok(PipelineSummary {
            input: inputs.data.clone(),
            strategy: config.labeling.strategy,
            total_rows: run.filter.total,
            dropped_rows: run.filter.dropped,
            retained_rows: run.filter.retained,
            exported_rows: sheet.rows.len(),
            unlabeled_rows: run.unlabeled_count(),
            status: run.refinement.as_ref().map(|report| report.status),
            iterations: run
                .refinement
                .as_ref()
                .map_or(0, RefinementReport::iteration_count),
            exemplars_added: run
                .refinement
                .as_ref()
                .map_or(0, RefinementReport::accepted_count),
            category_count: run.store.len(),
            label_counts: label_counts(&run.rows, &run.store, &config.labeling.other_label),
            output,
            categories_output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Label;

    fn keyword_config(refine: bool) -> MotifConfig {
        let mut config = MotifConfig::default();
        config.labeling.strategy = LabelingStrategy::Keyword;
        config.refinement.enabled = refine;
        config
    }

    #[tokio::test]
    async fn test_label_responses_filters_then_labels() {
        let store = CategoryStore::from_pairs([
            ("Buena experiencia con ejecutivos", vec!["ejecutivo"]),
            ("Cercanía geográfica o conveniencia", vec!["faena"]),
        ]);
        let responses = vec![
            Response::new("1", "Buena atencion del ejecutivo"),
            Response::new("2", "..."),
            Response::new("3", "Cercania a mi faena"),
        ];
        let config = keyword_config(false);

        let run = label_responses(responses, store, &KeywordLabeler::new(), &config)
            .await
            .unwrap();

        assert_eq!(run.filter.dropped, 1);
        assert_eq!(run.rows.len(), 2);
        assert_eq!(
            run.rows[0].label,
            Label::assigned("Buena experiencia con ejecutivos")
        );
        assert_eq!(
            run.rows[1].label,
            Label::assigned("Cercanía geográfica o conveniencia")
        );
        assert!(run.refinement.is_none());
    }

    #[tokio::test]
    async fn test_unlabeled_rows_add_sentinel_key() {
        let store = CategoryStore::from_pairs([("Costos", vec!["precio"])]);
        let responses = vec![Response::new("1", "ok"), Response::new("2", "buen precio")];
        let config = keyword_config(false);

        let run = label_responses(responses, store, &KeywordLabeler::new(), &config)
            .await
            .unwrap();

        assert!(run.store.contains("Otros"));
        let counts = label_counts(&run.rows, &run.store, "Otros");
        assert_eq!(counts.get("Costos"), Some(&1));
        assert_eq!(counts.get("Otros"), Some(&1));
    }

    #[test]
    fn test_default_output_paths() {
        let data = Path::new("/data/encuesta.csv");
        let semantic = MotifConfig::default();
        assert_eq!(
            default_output_path(data, &semantic),
            PathBuf::from("/data/categorias_nuevas_umbral_0.5.xlsx")
        );
        assert_eq!(
            default_output_path(data, &keyword_config(false)),
            PathBuf::from("/data/encuesta_categorizado.xlsx")
        );
        assert_eq!(
            default_categories_output_path(data),
            PathBuf::from("/data/encuesta_categorias_final.csv")
        );
    }

    #[test]
    fn test_build_labeler_by_strategy() {
        assert_eq!(build_labeler(&keyword_config(true), None).unwrap().name(), "keyword");
        assert_eq!(
            build_labeler(&MotifConfig::default(), None).unwrap().name(),
            "semantic"
        );
    }

    #[test]
    fn test_pipeline_rejects_invalid_config() {
        let mut config = MotifConfig::default();
        config.refinement.top_n = 0;
        assert!(Pipeline::new(config).is_err());
    }
}
