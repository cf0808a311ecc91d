//! Command line argument parsing for the motif CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::{EmbedderKind, LabelingStrategy, MotifConfig};
use crate::dataset::prepare::{RAW_ID_COLUMN, RAW_QUESTION_COLUMN};

/// Motif - categorize free-text survey responses
#[derive(Parser, Debug, Clone)]
#[command(name = "motif")]
#[command(about = "Categorize free-text survey responses by keywords or sentence embeddings")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct MotifArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl MotifArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Clean a raw survey export into an id/answer table
    Prepare(PrepareArgs),

    /// Label responses and grow the category dictionary
    Label(LabelArgs),

    /// Show a category dictionary
    Categories(CategoriesArgs),
}

/// Arguments for preparing a raw export
#[derive(Parser, Debug, Clone)]
pub struct PrepareArgs {
    /// Raw survey export
    #[arg(value_name = "RAW_CSV")]
    pub input: PathBuf,

    /// Cleaned output file
    #[arg(short, long, value_name = "OUT", default_value = "data_limpia.csv")]
    pub output: PathBuf,

    /// Response id column of the raw export
    #[arg(long, default_value = RAW_ID_COLUMN)]
    pub id_column: String,

    /// Free-text question column of the raw export
    #[arg(long, default_value = RAW_QUESTION_COLUMN)]
    pub question_column: String,

    /// Field delimiter of the raw export
    #[arg(long, default_value = ";")]
    pub delimiter: char,
}

/// Arguments for labeling responses
#[derive(Parser, Debug, Clone)]
pub struct LabelArgs {
    /// Responses to label (CSV or spreadsheet)
    #[arg(value_name = "DATA_CSV")]
    pub data: PathBuf,

    /// Category dictionary (CSV); the built-in one is used when absent
    #[arg(short, long, value_name = "CATEGORIES_CSV")]
    pub categories: Option<PathBuf>,

    /// Configuration file (JSON)
    #[arg(long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Labeling strategy
    #[arg(short, long)]
    pub strategy: Option<LabelingStrategy>,

    /// Similarity a category must exceed to be assigned
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Similarity a mined phrase must exceed to join a category
    #[arg(long)]
    pub mining_threshold: Option<f32>,

    /// Tokens and phrases mined per refinement iteration
    #[arg(long)]
    pub top_n: Option<usize>,

    /// Iterations without progress before refinement stops
    #[arg(long)]
    pub max_stall: Option<usize>,

    /// Hard limit on refinement iterations
    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// Skip the refinement loop
    #[arg(long)]
    pub no_refine: bool,

    /// Leave unlabeled rows out of the output
    #[arg(long)]
    pub drop_unlabeled: bool,

    /// Keep unlabeled rows in the output
    #[arg(long, conflicts_with = "drop_unlabeled")]
    pub keep_unlabeled: bool,

    /// Column holding the response text
    #[arg(long)]
    pub text_column: Option<String>,

    /// Column holding the response id
    #[arg(long)]
    pub id_column: Option<String>,

    /// Labeled output (.xlsx or .csv)
    #[arg(short, long, value_name = "OUT")]
    pub output: Option<PathBuf>,

    /// Exported category dictionary
    #[arg(long, value_name = "OUT_CSV")]
    pub categories_output: Option<PathBuf>,

    /// Embedding backend for the semantic strategy
    #[arg(long)]
    pub embedder: Option<EmbedderKind>,

    /// Embedding model identifier
    #[arg(long)]
    pub model: Option<String>,
}

impl LabelArgs {
    /// Apply the flags that were given on top of `config`.
    pub fn apply_to(&self, config: &mut MotifConfig) {
        if let Some(strategy) = self.strategy {
            config.labeling.strategy = strategy;
        }
        if let Some(threshold) = self.threshold {
            config.labeling.threshold = threshold;
        }
        if let Some(mining_threshold) = self.mining_threshold {
            config.refinement.mining_threshold = mining_threshold;
        }
        if let Some(top_n) = self.top_n {
            config.refinement.top_n = top_n;
        }
        if let Some(max_stall) = self.max_stall {
            config.refinement.max_stall = max_stall;
        }
        if self.max_iterations.is_some() {
            config.refinement.max_iterations = self.max_iterations;
        }
        if self.no_refine {
            config.refinement.enabled = false;
        }
        if self.drop_unlabeled {
            config.labeling.drop_unlabeled = Some(true);
        } else if self.keep_unlabeled {
            config.labeling.drop_unlabeled = Some(false);
        }
        if let Some(text_column) = &self.text_column {
            config.columns.text_column = text_column.clone();
        }
        if let Some(id_column) = &self.id_column {
            config.columns.id_column = id_column.clone();
        }
        if let Some(embedder) = self.embedder {
            config.embedder.kind = embedder;
        }
        if let Some(model) = &self.model {
            config.embedder.model = Some(model.clone());
        }
    }
}

/// Arguments for showing a category dictionary
#[derive(Parser, Debug, Clone)]
pub struct CategoriesArgs {
    /// Category dictionary (CSV)
    #[arg(value_name = "CATEGORIES_CSV")]
    pub path: PathBuf,

    /// Configuration file (JSON) naming the dictionary columns and separator
    #[arg(long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_command() {
        let args = MotifArgs::try_parse_from([
            "motif",
            "label",
            "data_limpia.csv",
            "-c",
            "categorias.csv",
            "--strategy",
            "keyword",
            "--threshold",
            "0.6",
            "--no-refine",
            "-vv",
        ])
        .unwrap();

        assert_eq!(args.verbosity(), 2);
        if let Command::Label(label_args) = args.command {
            assert_eq!(label_args.data, PathBuf::from("data_limpia.csv"));
            assert_eq!(label_args.categories, Some(PathBuf::from("categorias.csv")));
            assert_eq!(label_args.strategy, Some(LabelingStrategy::Keyword));

            let mut config = MotifConfig::default();
            label_args.apply_to(&mut config);
            assert_eq!(config.labeling.strategy, LabelingStrategy::Keyword);
            assert_eq!(config.labeling.threshold, 0.6);
            assert!(!config.refinement.enabled);
            assert_eq!(config.refinement.top_n, 8);
        } else {
            panic!("Expected Label command");
        }
    }

    #[test]
    fn test_prepare_command_defaults() {
        let args = MotifArgs::try_parse_from(["motif", "prepare", "export.csv"]).unwrap();

        if let Command::Prepare(prepare_args) = args.command {
            assert_eq!(prepare_args.output, PathBuf::from("data_limpia.csv"));
            assert_eq!(prepare_args.id_column, RAW_ID_COLUMN);
            assert_eq!(prepare_args.question_column, RAW_QUESTION_COLUMN);
            assert_eq!(prepare_args.delimiter, ';');
        } else {
            panic!("Expected Prepare command");
        }
    }

    #[test]
    fn test_global_flags_and_quiet() {
        let args =
            MotifArgs::try_parse_from(["motif", "categories", "c.csv", "-q", "-f", "json"]).unwrap();
        assert_eq!(args.verbosity(), 0);
        assert_eq!(args.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_drop_and_keep_conflict() {
        let result = MotifArgs::try_parse_from([
            "motif",
            "label",
            "d.csv",
            "--drop-unlabeled",
            "--keep-unlabeled",
        ]);
        assert!(result.is_err());
    }
}
