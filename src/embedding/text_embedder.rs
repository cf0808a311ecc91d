//! Text embedding trait used by the semantic labeler.

use async_trait::async_trait;

use crate::error::Result;
use crate::vector::Vector;

/// Trait for converting text to vector embeddings.
///
/// This is the contract every embedding provider fulfils: a fixed-length
/// vector per text, or one per text in a batch. Provider failures are
/// reported as [`MotifError::Provider`](crate::error::MotifError::Provider)
/// and are never retried.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use motif::embedding::TextEmbedder;
/// use motif::error::Result;
/// use motif::vector::Vector;
///
/// struct MyCustomEmbedder {
///     dimension: usize,
/// }
///
/// #[async_trait]
/// impl TextEmbedder for MyCustomEmbedder {
///     async fn embed(&self, text: &str) -> Result<Vector> {
///         let mut data = vec![0.0; self.dimension];
///         data[text.len() % self.dimension] = 1.0;
///         Ok(Vector::new(data))
///     }
///
///     fn dimension(&self) -> usize {
///         self.dimension
///     }
/// }
/// ```
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Generate an embedding vector for the given text.
    async fn embed(&self, text: &str) -> Result<Vector>;

    /// Generate embeddings for multiple texts in batch.
    ///
    /// The default implementation calls `embed` sequentially.
    /// Override this method for better performance with batch processing.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Get the dimension of generated embeddings.
    fn dimension(&self) -> usize;

    /// Get the name/identifier of this embedder, for logging.
    fn name(&self) -> &str {
        "unknown"
    }
}
