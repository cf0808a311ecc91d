//! Categories, their exemplars and the label produced for each response.

pub mod defaults;
pub mod label;
pub mod store;

pub use defaults::{default_keyword_store, default_semantic_store};
pub use label::{DEFAULT_OTHER_LABEL, Label};
pub use store::CategoryStore;
