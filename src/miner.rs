//! Keyword mining over unlabeled responses.
//!
//! The miner looks at the residue of responses that no category claimed and
//! proposes material to grow the dictionary with: the most frequent long
//! tokens and a handful of representative phrases.

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::analysis::{extract_terms, normalize};

/// Default number of tokens and phrases mined per pass.
pub const DEFAULT_TOP_N: usize = 8;

/// Output of one mining pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinedKeywords {
    /// Most frequent tokens with their counts, most frequent first.
    pub tokens: Vec<(String, usize)>,
    /// The first texts of the batch, trimmed, in input order.
    pub phrases: Vec<String>,
}

impl MinedKeywords {
    /// The mined tokens without their counts.
    pub fn token_strings(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|(token, _)| token.as_str())
    }

    /// Check whether nothing was mined.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.phrases.is_empty()
    }
}

/// Extracts frequent tokens and representative phrases from a batch of texts.
#[derive(Debug, Clone, Copy)]
pub struct KeywordMiner {
    top_n: usize,
}

impl Default for KeywordMiner {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_N)
    }
}

impl KeywordMiner {
    /// Create a miner returning at most `top_n` tokens and phrases.
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }

    /// Maximum number of tokens and phrases returned.
    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Count tokens of every text and return the `top_n` most frequent.
    ///
    /// Ties keep the order in which tokens were first seen.
    pub fn mine<S: AsRef<str>>(&self, texts: &[S]) -> Vec<(String, usize)> {
        let mut counts: IndexMap<String, usize> = IndexMap::new();
        for text in texts {
            for term in extract_terms(&normalize(text.as_ref())) {
                *counts.entry(term).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
        // sort_by is stable, so equal counts stay in first-seen order.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(self.top_n);
        ranked
    }

    /// The first `top_n` texts, trimmed, in input order.
    pub fn representative_phrases<S: AsRef<str>>(&self, texts: &[S]) -> Vec<String> {
        texts
            .iter()
            .take(self.top_n)
            .map(|text| text.as_ref().trim().to_string())
            .collect()
    }

    /// Run both mining operations over the same batch.
    pub fn mine_all<S: AsRef<str>>(&self, texts: &[S]) -> MinedKeywords {
        let mined = MinedKeywords {
            tokens: self.mine(texts),
            phrases: self.representative_phrases(texts),
        };
        debug!(
            "Mined {} token(s) and {} phrase(s) from {} text(s)",
            mined.tokens.len(),
            mined.phrases.len(),
            texts.len()
        );
        mined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mine_orders_by_frequency() {
        let miner = KeywordMiner::new(3);
        let texts = [
            "Por el precio y la cercanía",
            "Precio conveniente",
            "La cercanía de la sucursal, y el precio",
        ];

        let tokens = miner.mine(&texts);
        assert_eq!(
            tokens,
            vec![
                ("precio".to_string(), 3),
                ("cercanía".to_string(), 2),
                ("conveniente".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let miner = KeywordMiner::new(10);
        let tokens = miner.mine(&["zorro gatos", "perros zorro gatos perros"]);
        let order: Vec<&str> = tokens.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(order, vec!["zorro", "gatos", "perros"]);
    }

    #[test]
    fn test_short_words_and_punctuation_are_ignored() {
        let miner = KeywordMiner::default();
        let tokens = miner.mine(&["¡Muy bien! ok, sí."]);
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_representative_phrases_are_first_texts() {
        let miner = KeywordMiner::new(2);
        let phrases = miner.representative_phrases(&["  Primero ", "Segundo", "Tercero"]);
        assert_eq!(phrases, vec!["Primero".to_string(), "Segundo".to_string()]);
    }

    #[test]
    fn test_mine_all_on_empty_batch() {
        let miner = KeywordMiner::default();
        let mined = miner.mine_all::<&str>(&[]);
        assert!(mined.is_empty());
    }
}
