//! Validity filtering for free-text responses.

use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Characters that make a raw export cell count as noise during preparation.
pub const NOISE_CHARACTERS: &str = ". ,;:-_¡!¿?\"";

/// Check whether a response is substantive.
///
/// A response is invalid when, after trimming, it is empty or consists only of
/// dots and whitespace.
pub fn is_valid(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && !trimmed.chars().all(|c| c == '.' || c.is_whitespace())
}

/// Check whether a raw export cell holds only punctuation noise.
///
/// This is the broader rule used when preparing a raw survey export, where
/// cells such as `"-"` or `"¿?"` are discarded along with empty ones.
pub fn is_noise(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty()
        || trimmed
            .chars()
            .all(|c| c.is_whitespace() || NOISE_CHARACTERS.contains(c))
}

/// Row counts produced by a filtering pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterReport {
    /// Rows seen before filtering.
    pub total: usize,
    /// Rows dropped as non-substantive.
    pub dropped: usize,
    /// Rows kept for labeling.
    pub retained: usize,
}

/// Drops non-substantive rows and reports how many were removed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidityFilter;

impl ValidityFilter {
    /// Create a new validity filter.
    pub fn new() -> Self {
        ValidityFilter
    }

    /// Keep the items whose text passes [`is_valid`], preserving order.
    pub fn filter<T, F>(&self, items: Vec<T>, text_of: F) -> (Vec<T>, FilterReport)
    where
        F: Fn(&T) -> &str,
    {
        let total = items.len();
        let retained: Vec<T> = items
            .into_iter()
            .filter(|item| is_valid(text_of(item)))
            .collect();

        let report = FilterReport {
            total,
            dropped: total - retained.len(),
            retained: retained.len(),
        };

        info!("Total rows loaded: {}", report.total);
        if report.dropped > 0 {
            warn!(
                "Rows dropped as empty or punctuation-only: {}",
                report.dropped
            );
        }
        info!("Rows retained for labeling: {}", report.retained);

        (retained, report)
    }
}
