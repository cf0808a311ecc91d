//! Deterministic feature-hashing embedder.
//!
//! Maps a text onto a fixed number of buckets using hashed word unigrams and
//! character trigrams, then L2-normalizes the result. It needs no model files
//! or network access, so it is the default provider and the one used when a
//! run must be reproducible offline. It captures lexical overlap only; use a
//! sentence-transformer backend for paraphrase-level similarity.

use ahash::RandomState;
use async_trait::async_trait;

use crate::analysis::normalize;
use crate::embedding::text_embedder::TextEmbedder;
use crate::error::{MotifError, Result};
use crate::vector::Vector;

/// Default number of buckets.
pub const DEFAULT_HASHING_DIMENSION: usize = 384;

const SEEDS: [u64; 4] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
];

/// Feature-hashing text embedder.
#[derive(Debug, Clone)]
pub struct HashingTextEmbedder {
    dimension: usize,
    hasher: RandomState,
}

impl Default for HashingTextEmbedder {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_HASHING_DIMENSION,
            hasher: RandomState::with_seeds(SEEDS[0], SEEDS[1], SEEDS[2], SEEDS[3]),
        }
    }
}

impl HashingTextEmbedder {
    /// Create an embedder with the given number of buckets.
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(MotifError::configuration(
                "hashing embedder dimension must be greater than zero",
            ));
        }
        Ok(Self {
            dimension,
            ..Self::default()
        })
    }

    fn accumulate(&self, data: &mut [f32], feature: &str, weight: f32) {
        let hash = self.hasher.hash_one(feature);
        let bucket = (hash % self.dimension as u64) as usize;
        let sign = if hash & (1 << 63) == 0 { 1.0 } else { -1.0 };
        data[bucket] += sign * weight;
    }

    fn vectorize(&self, text: &str) -> Vector {
        let mut data = vec![0.0; self.dimension];
        let normalized = normalize(text);

        for word in normalized.split_whitespace() {
            self.accumulate(&mut data, word, 1.0);

            let padded: Vec<char> = format!("#{word}#").chars().collect();
            for window in padded.windows(3) {
                let trigram: String = window.iter().collect();
                self.accumulate(&mut data, &trigram, 0.5);
            }
        }

        let mut vector = Vector::new(data);
        vector.normalize();
        vector
    }
}

#[async_trait]
impl TextEmbedder for HashingTextEmbedder {
    async fn embed(&self, text: &str) -> Result<Vector> {
        Ok(self.vectorize(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "hashing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_same_text_same_vector() {
        let embedder = HashingTextEmbedder::default();
        let a = embedder.embed("Buena atención del ejecutivo").await.unwrap();
        let b = embedder.embed("buena atención, del ejecutivo!").await.unwrap();

        assert_eq!(a.dimension(), DEFAULT_HASHING_DIMENSION);
        assert!((a.cosine_similarity(&b).unwrap() - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_shared_words_score_higher() {
        let embedder = HashingTextEmbedder::new(512).unwrap();
        let text = embedder.embed("atencion del ejecutivo").await.unwrap();
        let related = embedder.embed("ejecutivo").await.unwrap();
        let unrelated = embedder.embed("sucursal cercana").await.unwrap();

        let related_sim = text.cosine_similarity(&related).unwrap();
        let unrelated_sim = text.cosine_similarity(&unrelated).unwrap();
        assert!(related_sim > unrelated_sim);
        assert!(related_sim > 0.3);
    }

    #[tokio::test]
    async fn test_empty_text_is_zero_vector() {
        let embedder = HashingTextEmbedder::new(16).unwrap();
        let vector = embedder.embed("...").await.unwrap();
        assert_eq!(vector.norm(), 0.0);
    }

    #[test]
    fn test_zero_dimension_is_rejected() {
        assert!(HashingTextEmbedder::new(0).is_err());
    }
}
