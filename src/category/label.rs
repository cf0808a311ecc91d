//! Labeling outcome for a single response.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sentinel written for responses that matched no category.
pub const DEFAULT_OTHER_LABEL: &str = "Otros";

/// The category assigned to a response, or the absence of one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// The response matched the named category.
    Assigned(String),
    /// No category matched; rendered with the configured "Other" sentinel.
    Unlabeled,
}

impl Label {
    /// Create an assigned label.
    pub fn assigned<S: Into<String>>(category: S) -> Self {
        Label::Assigned(category.into())
    }

    /// Check whether this label is the "Other" sentinel.
    pub fn is_unlabeled(&self) -> bool {
        matches!(self, Label::Unlabeled)
    }

    /// Get the category name if one was assigned.
    pub fn category(&self) -> Option<&str> {
        match self {
            Label::Assigned(name) => Some(name),
            Label::Unlabeled => None,
        }
    }

    /// Render the label, using `other_label` for [`Label::Unlabeled`].
    pub fn display_name<'a>(&'a self, other_label: &'a str) -> &'a str {
        self.category().unwrap_or(other_label)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name(DEFAULT_OTHER_LABEL))
    }
}
