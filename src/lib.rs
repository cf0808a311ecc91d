//! # Motif
//!
//! Categorization of free-text survey responses.
//!
//! ## Features
//!
//! - Keyword labeling by normalized substring match
//! - Semantic labeling by cosine similarity over sentence embeddings
//! - Iterative refinement that mines unlabeled responses for new exemplars
//! - CSV input, CSV or spreadsheet output
//! - Pluggable embedding backends (hashing, OpenAI, Candle)

pub mod analysis;
pub mod category;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod embedding;
pub mod error;
pub mod labeler;
pub mod miner;
pub mod pipeline;
pub mod refinement;
pub mod util;
pub mod vector;

pub mod prelude {
    pub use crate::category::{CategoryStore, Label};
    pub use crate::config::{LabelingStrategy, MotifConfig};
    pub use crate::embedding::{CachedEmbedder, TextEmbedder};
    pub use crate::error::{MotifError, Result};
    pub use crate::labeler::{KeywordLabeler, Labeler, SemanticLabeler};
    pub use crate::pipeline::{Pipeline, PipelineInputs, PipelineSummary};
    pub use crate::refinement::{RefinementLoop, RefinementStatus};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
