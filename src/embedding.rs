//! Text embedding providers for semantic labeling.
//!
//! The labeler only sees the [`TextEmbedder`] trait. Three backends exist:
//!
//! - [`HashingTextEmbedder`]: offline feature hashing, always available.
//! - `OpenAITextEmbedder`: OpenAI embeddings API (`embeddings-openai`).
//! - `CandleTextEmbedder`: local sentence-transformers model (`embeddings-candle`).
//!
//! Whatever backend is selected is wrapped in a [`CachedEmbedder`] by the
//! pipeline so that category anchors are embedded once per run.
//!
//! # Example
//!
//! ```
//! use motif::embedding::{HashingTextEmbedder, TextEmbedder};
//!
//! # async fn example() -> motif::error::Result<()> {
//! let embedder = HashingTextEmbedder::default();
//! let vector = embedder.embed("Buena atención").await?;
//! assert_eq!(vector.dimension(), embedder.dimension());
//! # Ok(())
//! # }
//! ```

pub mod cached;
pub mod hashing;
pub mod text_embedder;

#[cfg(feature = "embeddings-openai")]
pub mod openai_text_embedder;

#[cfg(feature = "embeddings-candle")]
pub mod candle_text_embedder;

use std::sync::Arc;

use log::info;

pub use cached::{CacheStats, CachedEmbedder};
pub use hashing::{DEFAULT_HASHING_DIMENSION, HashingTextEmbedder};
pub use text_embedder::TextEmbedder;

#[cfg(feature = "embeddings-openai")]
pub use openai_text_embedder::OpenAITextEmbedder;

#[cfg(feature = "embeddings-candle")]
pub use candle_text_embedder::CandleTextEmbedder;

use crate::config::{EmbedderConfig, EmbedderKind};
use crate::error::{MotifError, Result};

/// Model used by the OpenAI backend when none is configured.
pub const DEFAULT_OPENAI_MODEL: &str = "text-embedding-3-small";

/// Build the configured embedding provider.
///
/// Backends compiled out of this binary, or missing credentials, are reported
/// as configuration errors.
pub fn build_embedder(config: &EmbedderConfig) -> Result<Arc<dyn TextEmbedder>> {
    let embedder: Arc<dyn TextEmbedder> = match config.kind {
        EmbedderKind::Hashing => Arc::new(HashingTextEmbedder::new(config.dimension)?),
        EmbedderKind::Openai => build_openai(config)?,
        EmbedderKind::Candle => build_candle(config)?,
    };
    info!(
        "Using {} embeddings ({} dimensions)",
        embedder.name(),
        embedder.dimension()
    );
    Ok(embedder)
}

#[cfg(feature = "embeddings-openai")]
fn build_openai(config: &EmbedderConfig) -> Result<Arc<dyn TextEmbedder>> {
    let api_key = std::env::var("OPENAI_API_KEY")
        .map_err(|_| MotifError::configuration("OPENAI_API_KEY is not set"))?;
    let model = config
        .model
        .clone()
        .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());
    Ok(Arc::new(OpenAITextEmbedder::new(api_key, model)?))
}

#[cfg(not(feature = "embeddings-openai"))]
fn build_openai(_config: &EmbedderConfig) -> Result<Arc<dyn TextEmbedder>> {
    Err(MotifError::configuration(
        "the openai embedder requires the `embeddings-openai` feature",
    ))
}

#[cfg(feature = "embeddings-candle")]
fn build_candle(config: &EmbedderConfig) -> Result<Arc<dyn TextEmbedder>> {
    let model = config
        .model
        .as_deref()
        .unwrap_or(candle_text_embedder::DEFAULT_SENTENCE_MODEL);
    Ok(Arc::new(CandleTextEmbedder::new(model)?))
}

#[cfg(not(feature = "embeddings-candle"))]
fn build_candle(_config: &EmbedderConfig) -> Result<Arc<dyn TextEmbedder>> {
    Err(MotifError::configuration(
        "the candle embedder requires the `embeddings-candle` feature",
    ))
}
