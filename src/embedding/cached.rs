//! Memoizing wrapper around a text embedder.

use std::sync::Arc;

use ahash::AHashMap;
use async_trait::async_trait;
use log::debug;
use parking_lot::Mutex;

use crate::embedding::text_embedder::TextEmbedder;
use crate::error::{MotifError, Result};
use crate::vector::Vector;

/// Cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: usize,
    /// Texts that had to be sent to the provider.
    pub misses: usize,
    /// Calls made to the underlying provider.
    pub provider_calls: usize,
}

/// Embedder that remembers every vector it has produced, keyed by text.
///
/// Category anchors are compared against every response during labeling, so
/// without a cache the same exemplar would be re-embedded once per response.
/// Embeddings of a given text never change during a run, which makes the text
/// itself a sufficient key. Misses within one [`embed_many`](Self::embed_many)
/// call are sent to the provider as a single batch.
pub struct CachedEmbedder {
    inner: Arc<dyn TextEmbedder>,
    cache: Mutex<AHashMap<String, Vector>>,
    stats: Mutex<CacheStats>,
}

impl std::fmt::Debug for CachedEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedEmbedder")
            .field("inner", &self.inner.name())
            .field("cached", &self.cache.lock().len())
            .field("stats", &*self.stats.lock())
            .finish()
    }
}

impl CachedEmbedder {
    /// Wrap an embedder with an empty cache.
    pub fn new(inner: Arc<dyn TextEmbedder>) -> Self {
        Self {
            inner,
            cache: Mutex::new(AHashMap::new()),
            stats: Mutex::new(CacheStats::default()),
        }
    }

    /// Embed several texts, answering from the cache where possible.
    ///
    /// The result has one vector per input text, in input order.
    pub async fn embed_many(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        let mut missing: Vec<&str> = Vec::new();
        {
            let cache = self.cache.lock();
            for text in texts {
                if !cache.contains_key(*text) && !missing.contains(text) {
                    missing.push(text);
                }
            }
        }

        {
            let mut stats = self.stats.lock();
            stats.misses += missing.len();
            stats.hits += texts.len() - missing.len();
        }

        if !missing.is_empty() {
            debug!(
                "Embedding {} uncached text(s) with {}",
                missing.len(),
                self.inner.name()
            );
            let vectors = self.inner.embed_batch(&missing).await?;
            self.stats.lock().provider_calls += 1;

            if vectors.len() != missing.len() {
                return Err(MotifError::provider(format!(
                    "{} returned {} vectors for {} texts",
                    self.inner.name(),
                    vectors.len(),
                    missing.len()
                )));
            }

            let expected_dim = self.inner.dimension();
            let mut cache = self.cache.lock();
            for (text, vector) in missing.into_iter().zip(vectors) {
                vector.validate_dimension(expected_dim)?;
                if !vector.is_valid() {
                    return Err(MotifError::provider(format!(
                        "{} produced a non-finite embedding for {text:?}",
                        self.inner.name()
                    )));
                }
                cache.insert(text.to_string(), vector);
            }
        }

        let cache = self.cache.lock();
        texts
            .iter()
            .map(|text| {
                cache.get(*text).cloned().ok_or_else(|| {
                    MotifError::other(format!("embedding for {text:?} missing from cache"))
                })
            })
            .collect()
    }

    /// Number of cached embeddings.
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Check whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    /// Current cache counters.
    pub fn stats(&self) -> CacheStats {
        *self.stats.lock()
    }
}

#[async_trait]
impl TextEmbedder for CachedEmbedder {
    async fn embed(&self, text: &str) -> Result<Vector> {
        let mut vectors = self.embed_many(&[text]).await?;
        vectors
            .pop()
            .ok_or_else(|| MotifError::other("empty embedding batch"))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        self.embed_many(texts).await
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
