//! Candle-based sentence embedder.
//!
//! Runs a BERT-family sentence-transformers model locally with mean pooling
//! and L2 normalization. Requires the `embeddings-candle` feature.

use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use hf_hub::api::sync::ApiBuilder;
use tokenizers::Tokenizer;

use crate::embedding::text_embedder::TextEmbedder;
use crate::error::{MotifError, Result};
use crate::vector::Vector;

/// Model used when none is configured.
pub const DEFAULT_SENTENCE_MODEL: &str = "sentence-transformers/paraphrase-MiniLM-L6-v2";

fn model_error<E: std::fmt::Display>(context: &str) -> impl FnOnce(E) -> MotifError + '_ {
    move |e| MotifError::provider(format!("{context}: {e}"))
}

/// Candle-based text embedder using BERT models from HuggingFace.
///
/// The model is downloaded from the HuggingFace Hub on first use and cached
/// under `HF_HOME` (or `~/.cache/huggingface`).
pub struct CandleTextEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    dimension: usize,
    model_name: String,
}

impl CandleTextEmbedder {
    /// Load a sentence-transformers model from the HuggingFace Hub.
    pub fn new(model_name: &str) -> Result<Self> {
        let device = Device::cuda_if_available(0).map_err(model_error("Device setup failed"))?;

        let cache_dir = std::env::var("HF_HOME")
            .or_else(|_| std::env::var("HOME").map(|home| format!("{home}/.cache/huggingface")))
            .unwrap_or_else(|_| "/tmp/huggingface".to_string());

        let api = ApiBuilder::new()
            .with_cache_dir(cache_dir.into())
            .build()
            .map_err(model_error("HF API initialization failed"))?;
        let repo = api.model(model_name.to_string());

        let config_filename = repo
            .get("config.json")
            .map_err(model_error("Config download failed"))?;
        let config_str =
            std::fs::read_to_string(config_filename).map_err(model_error("Config read failed"))?;
        let config: Config =
            serde_json::from_str(&config_str).map_err(model_error("Config parse failed"))?;

        let weights_filename = repo
            .get("model.safetensors")
            .map_err(model_error("Weights download failed"))?;
        // SAFETY: the safetensors file is owned by the HF cache and not mutated while mapped.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_filename], DType::F32, &device)
                .map_err(model_error("VarBuilder creation failed"))?
        };
        let model = BertModel::load(vb, &config).map_err(model_error("Model load failed"))?;

        let tokenizer_filename = repo
            .get("tokenizer.json")
            .map_err(model_error("Tokenizer download failed"))?;
        let tokenizer =
            Tokenizer::from_file(tokenizer_filename).map_err(model_error("Tokenizer load failed"))?;

        Ok(Self {
            model,
            tokenizer,
            device,
            dimension: config.hidden_size,
            model_name: model_name.to_string(),
        })
    }

    /// Average token embeddings, ignoring padding via the attention mask.
    fn mean_pool(&self, embeddings: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
        let mask = attention_mask
            .unsqueeze(2)
            .and_then(|m| m.expand(embeddings.shape()))
            .and_then(|m| m.to_dtype(embeddings.dtype()))
            .map_err(model_error("Mask expansion failed"))?;

        let summed = embeddings
            .mul(&mask)
            .and_then(|masked| masked.sum(1))
            .map_err(model_error("Pooling failed"))?;
        let counts = mask.sum(1).map_err(model_error("Pooling failed"))?;

        summed.div(&counts).map_err(model_error("Pooling failed"))
    }
}

#[async_trait]
impl TextEmbedder for CandleTextEmbedder {
    async fn embed(&self, text: &str) -> Result<Vector> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(model_error("Tokenization failed"))?;

        let token_ids = Tensor::new(encoding.get_ids(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(model_error("Tensor creation failed"))?;
        let attention_mask = Tensor::new(encoding.get_attention_mask(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(model_error("Tensor creation failed"))?;
        let token_type_ids = token_ids
            .zeros_like()
            .map_err(model_error("Tensor creation failed"))?;

        let embeddings = self
            .model
            .forward(&token_ids, &token_type_ids, Some(&attention_mask))
            .map_err(model_error("Model forward failed"))?;

        let pooled = self.mean_pool(&embeddings, &attention_mask)?;
        let data: Vec<f32> = pooled
            .squeeze(0)
            .and_then(|t| t.to_vec1())
            .map_err(model_error("Tensor conversion failed"))?;

        let mut vector = Vector::new(data);
        vector.normalize();
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}
