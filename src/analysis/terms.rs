//! Candidate keyword extraction.

use std::sync::LazyLock;

use regex::Regex;

/// Minimum number of word characters for a term to be considered a keyword.
pub const MIN_TERM_LENGTH: usize = 5;

static TERM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b\w{{{MIN_TERM_LENGTH},}}\b")).expect("term pattern should be valid")
});

/// Extract every word of at least [`MIN_TERM_LENGTH`] word characters, in order.
///
/// The input is expected to be normalized already; duplicates are kept so the
/// caller can count frequencies.
pub fn extract_terms(normalized: &str) -> Vec<String> {
    TERM_PATTERN
        .find_iter(normalized)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_words_are_skipped() {
        let terms = extract_terms("por la buena atencion del ejecutivo");
        assert_eq!(terms, vec!["buena", "atencion", "ejecutivo"]);
    }

    #[test]
    fn test_accented_letters_count_as_word_characters() {
        let terms = extract_terms("cercanía geográfica");
        assert_eq!(terms, vec!["cercanía", "geográfica"]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let terms = extract_terms("precio precio bajo precio");
        assert_eq!(terms, vec!["precio", "precio", "precio"]);
    }
}
