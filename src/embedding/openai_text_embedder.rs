//! OpenAI API-based text embedder implementation.
//!
//! Requires the `embeddings-openai` feature to be enabled.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::embedding::text_embedder::TextEmbedder;
use crate::error::{MotifError, Result};
use crate::vector::Vector;

const EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";

/// Request structure for OpenAI Embeddings API.
#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

/// Response structure from OpenAI Embeddings API.
#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

/// OpenAI API-based text embedder.
///
/// Every call is one HTTP request; batches are sent as a single request.
/// Transport and API errors surface as provider errors and abort the run.
///
/// # Examples
///
/// ```no_run
/// use motif::embedding::TextEmbedder;
/// use motif::embedding::openai_text_embedder::OpenAITextEmbedder;
///
/// # async fn example() -> motif::error::Result<()> {
/// let embedder = OpenAITextEmbedder::new(
///     std::env::var("OPENAI_API_KEY").unwrap(),
///     "text-embedding-3-small".to_string(),
/// )?;
///
/// let vectors = embedder.embed_batch(&["Buena atención", "Cercanía"]).await?;
/// # Ok(())
/// # }
/// ```
pub struct OpenAITextEmbedder {
    client: Client,
    api_key: String,
    model: String,
    dimension: usize,
}

impl OpenAITextEmbedder {
    /// Create a new OpenAI embedder.
    ///
    /// Supported models: `text-embedding-3-small` (1536 dimensions),
    /// `text-embedding-3-large` (3072) and `text-embedding-ada-002` (1536).
    pub fn new(api_key: String, model: String) -> Result<Self> {
        let dimension = Self::default_dimension(&model).ok_or_else(|| {
            MotifError::configuration(format!(
                "Unknown OpenAI embedding model: {model}. Supported models: \
                 text-embedding-3-small, text-embedding-3-large, text-embedding-ada-002"
            ))
        })?;

        Ok(Self {
            client: Client::new(),
            api_key,
            model,
            dimension,
        })
    }

    fn default_dimension(model: &str) -> Option<usize> {
        match model {
            "text-embedding-3-small" | "text-embedding-ada-002" => Some(1536),
            "text-embedding-3-large" => Some(3072),
            _ => None,
        }
    }

    async fn request(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: texts.to_vec(),
        };

        let http_response = self
            .client
            .post(EMBEDDINGS_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| MotifError::provider(format!("OpenAI API request failed: {e}")))?;

        let status = http_response.status();
        let response_text = http_response
            .text()
            .await
            .map_err(|e| MotifError::provider(format!("Failed to read response text: {e}")))?;

        if !status.is_success() {
            return Err(MotifError::provider(format!(
                "OpenAI API error (status {status}): {response_text}"
            )));
        }

        let mut response: EmbeddingResponse = serde_json::from_str(&response_text)
            .map_err(|e| MotifError::provider(format!("Failed to parse OpenAI response: {e}")))?;

        if response.data.len() != texts.len() {
            return Err(MotifError::provider(format!(
                "OpenAI returned {} embeddings for {} inputs",
                response.data.len(),
                texts.len()
            )));
        }

        response.data.sort_by_key(|d| d.index);
        Ok(response
            .data
            .into_iter()
            .map(|d| Vector::new(d.embedding))
            .collect())
    }
}

#[async_trait]
impl TextEmbedder for OpenAITextEmbedder {
    async fn embed(&self, text: &str) -> Result<Vector> {
        self.request(&[text])
            .await?
            .pop()
            .ok_or_else(|| MotifError::provider("No embedding in response"))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request(texts).await
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        &self.model
    }
}
