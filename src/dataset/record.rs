//! Response records.

use serde::{Deserialize, Serialize};

use crate::category::Label;

/// A survey response to be labeled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Row identifier, taken from the id column or the row number.
    pub id: String,
    /// The free-text answer.
    pub text: String,
    /// Position of the source row in its table, used to write the row back.
    /// `None` for responses built by hand.
    pub row: Option<usize>,
}

impl Response {
    /// Create a response that does not come from a table.
    pub fn new<I: Into<String>, T: Into<String>>(id: I, text: T) -> Self {
        Response {
            id: id.into(),
            text: text.into(),
            row: None,
        }
    }

    /// Set the source row index.
    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }
}

/// A response together with its current label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledResponse {
    pub response: Response,
    pub label: Label,
    /// Best similarity, present in semantic mode only.
    pub similarity: Option<f32>,
}

impl LabeledResponse {
    /// Wrap a response that has not been labeled yet.
    pub fn unlabeled(response: Response) -> Self {
        LabeledResponse {
            response,
            label: Label::Unlabeled,
            similarity: None,
        }
    }

    /// The response text.
    pub fn text(&self) -> &str {
        &self.response.text
    }

    /// Check whether the response is still in the "Other" bucket.
    pub fn is_unlabeled(&self) -> bool {
        self.label.is_unlabeled()
    }
}
