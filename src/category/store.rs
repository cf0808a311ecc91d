//! Insertion-ordered category dictionary.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Mapping from category name to its exemplar phrases.
///
/// Iteration follows insertion order, which is what makes first-match and
/// first-maximum tie-breaking reproducible. Exemplars only grow: there is no
/// removal operation, and duplicates are rejected by exact string comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryStore {
    categories: IndexMap<String, Vec<String>>,
}

impl CategoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `(name, exemplars)` pairs.
    ///
    /// Repeated names are merged into the first occurrence and repeated
    /// exemplars are skipped.
    pub fn from_pairs<I, N, E, P>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, E)>,
        N: Into<String>,
        E: IntoIterator<Item = P>,
        P: Into<String>,
    {
        let mut store = Self::new();
        for (name, exemplars) in pairs {
            let name = name.into();
            store.ensure_category(&name);
            for phrase in exemplars {
                store.add_exemplar(&name, phrase);
            }
        }
        store
    }

    /// Create an entry with no exemplars if `name` is absent.
    ///
    /// Returns `true` if the category was created.
    pub fn ensure_category(&mut self, name: &str) -> bool {
        if self.categories.contains_key(name) {
            return false;
        }
        self.categories.insert(name.to_string(), Vec::new());
        true
    }

    /// Append `phrase` to `category` unless it is already present.
    ///
    /// The category is created when missing. Returns `true` if the phrase was
    /// appended.
    pub fn add_exemplar<P: Into<String>>(&mut self, category: &str, phrase: P) -> bool {
        let phrase = phrase.into();
        let exemplars = self.categories.entry(category.to_string()).or_default();
        if exemplars.contains(&phrase) {
            return false;
        }
        exemplars.push(phrase);
        true
    }

    /// Category names in insertion order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Iterate over `(name, exemplars)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.categories
            .iter()
            .map(|(name, exemplars)| (name.as_str(), exemplars.as_slice()))
    }

    /// Name of the category at `index` in insertion order.
    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.categories
            .get_index(index)
            .map(|(name, _)| name.as_str())
    }

    /// Exemplars of a category.
    pub fn exemplars(&self, name: &str) -> Option<&[String]> {
        self.categories.get(name).map(Vec::as_slice)
    }

    /// Comparison anchors for a category: its exemplars followed by its name.
    ///
    /// A category without exemplars is anchored on its name alone.
    pub fn anchors<'a>(&'a self, name: &'a str) -> Vec<&'a str> {
        let mut anchors: Vec<&str> = self
            .exemplars(name)
            .map(|exemplars| exemplars.iter().map(String::as_str).collect())
            .unwrap_or_default();
        anchors.push(name);
        anchors
    }

    /// Check whether a category exists.
    pub fn contains(&self, name: &str) -> bool {
        self.categories.contains_key(name)
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Check whether the store has no categories.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total number of exemplars across all categories.
    pub fn exemplar_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }
}
