#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use motif::embedding::{CachedEmbedder, TextEmbedder};
use motif::error::{MotifError, Result};
use motif::vector::Vector;

/// Embedder answering from a fixed table; unknown texts map to the zero vector.
pub struct LookupEmbedder {
    dimension: usize,
    vectors: HashMap<String, Vec<f32>>,
}

impl LookupEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: HashMap::new(),
        }
    }

    pub fn with(mut self, texts: &[&str], vector: &[f32]) -> Self {
        assert_eq!(vector.len(), self.dimension);
        for text in texts {
            self.vectors.insert(text.to_string(), vector.to_vec());
        }
        self
    }

    pub fn cached(self) -> Arc<CachedEmbedder> {
        Arc::new(CachedEmbedder::new(Arc::new(self)))
    }
}

#[async_trait]
impl TextEmbedder for LookupEmbedder {
    async fn embed(&self, text: &str) -> Result<Vector> {
        Ok(Vector::new(
            self.vectors
                .get(text)
                .cloned()
                .unwrap_or_else(|| vec![0.0; self.dimension]),
        ))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "lookup"
    }
}

/// Embedder whose every call fails.
pub struct FailingEmbedder;

#[async_trait]
impl TextEmbedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vector> {
        Err(MotifError::provider("model unavailable"))
    }

    fn dimension(&self) -> usize {
        3
    }
}
