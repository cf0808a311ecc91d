//! Edit distance and fuzzy name matching.
//!
//! Used to relate a mined token string to the closest existing category name
//! when no category phrase occurs in the residue.

use std::cmp::min;

/// Minimum number of single-character insertions, deletions or substitutions
/// turning `s1` into `s2`. Counts characters, not bytes.
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();

    if s1_chars.is_empty() {
        return s2_chars.len();
    }
    if s2_chars.is_empty() {
        return s1_chars.len();
    }

    let mut prev_row: Vec<usize> = (0..=s2_chars.len()).collect();
    let mut curr_row = vec![0; s2_chars.len() + 1];

    for (i, c1) in s1_chars.iter().enumerate() {
        curr_row[0] = i + 1;
        for (j, c2) in s2_chars.iter().enumerate() {
            let cost = usize::from(c1 != c2);
            curr_row[j + 1] = min(
                min(prev_row[j + 1] + 1, curr_row[j] + 1),
                prev_row[j] + cost,
            );
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[s2_chars.len()]
}

/// Similarity in `[0, 1]` derived from the edit distance; 1.0 means identical.
///
/// Two empty strings are considered identical.
pub fn levenshtein_similarity(s1: &str, s2: &str) -> f64 {
    let max_len = s1.chars().count().max(s2.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein_distance(s1, s2) as f64 / max_len as f64
}

/// Index of the candidate most similar to `query`, if it reaches `cutoff`.
///
/// Ties keep the earliest candidate.
pub fn closest_match<'a, I>(query: &str, candidates: I, cutoff: f64) -> Option<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(usize, f64)> = None;
    for (index, candidate) in candidates.into_iter().enumerate() {
        let score = levenshtein_similarity(query, candidate);
        if score < cutoff {
            continue;
        }
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((index, score));
        }
    }
    best.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("", "a"), 1);
        assert_eq!(levenshtein_distance("a", ""), 1);
        assert_eq!(levenshtein_distance("ab", "ac"), 1);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("atención", "atencion"), 1);
    }

    #[test]
    fn test_levenshtein_similarity() {
        assert!((levenshtein_similarity("", "") - 1.0).abs() < 1e-9);
        assert!((levenshtein_similarity("precio", "precio") - 1.0).abs() < 1e-9);
        assert!(levenshtein_similarity("abc", "xyz").abs() < 1e-9);

        let similarity = levenshtein_similarity("precios", "precio");
        assert!(similarity > 0.8 && similarity < 1.0);
    }

    #[test]
    fn test_closest_match() {
        let names = ["beneficios", "precios", "atencion"];
        assert_eq!(closest_match("precio", names, 0.6), Some(1));
        assert_eq!(closest_match("zzzzzz", names, 0.6), None);
        assert_eq!(closest_match("anything", Vec::<&str>::new(), 0.0), None);
    }

    #[test]
    fn test_closest_match_keeps_first_on_ties() {
        assert_eq!(closest_match("abcd", ["abce", "abcf"], 0.5), Some(0));
    }
}
