//! Text analysis for survey responses.
//!
//! This module contains the leaf components every labeling strategy builds on:
//!
//! - [`normalize`]: lowercases and strips punctuation before keyword matching
//! - [`is_valid`] / [`ValidityFilter`]: decides whether a response is substantive
//! - [`extract_terms`]: pulls candidate keywords (words of five or more characters)

pub mod normalizer;
pub mod terms;
pub mod validity;

pub use normalizer::normalize;
pub use terms::{MIN_TERM_LENGTH, extract_terms};
pub use validity::{FilterReport, ValidityFilter, is_noise, is_valid};
