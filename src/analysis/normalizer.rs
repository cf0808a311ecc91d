//! Text normalization for keyword matching.

use std::sync::LazyLock;

use regex::Regex;

/// Characters removed by [`normalize`].
pub const STRIPPED_CHARACTERS: &str = ".,;:!¡¿?\"'()[]{}<>-_/\\";

static STRIPPED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[.,;:!¡¿?"'()\[\]{}<>\-_/\\]"#).expect("stripped character class should be valid")
});

/// Lowercase `text` and strip the punctuation in [`STRIPPED_CHARACTERS`].
///
/// Whitespace is preserved so that multi-word keyword phrases keep matching
/// after normalization. The function is idempotent.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    STRIPPED_PATTERN.replace_all(&lowered, "").into_owned()
}
