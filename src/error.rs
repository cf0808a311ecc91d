//! Error types for the Motif library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`MotifError`] enum. Configuration problems (missing files, missing
//! columns, invalid settings) and embedding provider failures are fatal and
//! abort a run; rows rejected by the validity filter are not errors and are
//! only reported as counts.
//!
//! # Examples
//!
//! ```
//! use motif::error::{MotifError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(MotifError::configuration("column 'MotivoAdherencia' not found"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;
use std::path::Path;

use thiserror::Error;

/// The main error type for Motif operations.
#[derive(Error, Debug)]
pub enum MotifError {
    /// I/O errors (file operations, network, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Missing input files, missing columns or invalid settings.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The embedding provider failed to produce a vector.
    #[error("Embedding provider error: {0}")]
    Provider(String),

    /// Malformed input data.
    #[error("Parse error: {0}")]
    Parse(String),

    /// CSV reader/writer errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet export errors
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid argument passed to an operation
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with MotifError.
pub type Result<T> = std::result::Result<T, MotifError>;

impl MotifError {
    /// Create a new configuration error.
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        MotifError::Configuration(msg.into())
    }

    /// Create a configuration error for an input file that does not exist.
    pub fn file_not_found<P: AsRef<Path>>(path: P) -> Self {
        MotifError::Configuration(format!("file not found: {}", path.as_ref().display()))
    }

    /// Create a configuration error for a column missing from a loaded table.
    pub fn missing_column<S: AsRef<str>>(column: S) -> Self {
        MotifError::Configuration(format!("required column '{}' not found", column.as_ref()))
    }

    /// Create a new embedding provider error.
    pub fn provider<S: Into<String>>(msg: S) -> Self {
        MotifError::Provider(msg.into())
    }

    /// Create a new parse error.
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        MotifError::Parse(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        MotifError::InvalidArgument(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        MotifError::Other(msg.into())
    }

    /// Whether this error aborts a run before any processing.
    pub fn is_configuration(&self) -> bool {
        matches!(self, MotifError::Configuration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = MotifError::configuration("bad threshold");
        assert_eq!(error.to_string(), "Configuration error: bad threshold");

        let error = MotifError::provider("model unavailable");
        assert_eq!(
            error.to_string(),
            "Embedding provider error: model unavailable"
        );

        let error = MotifError::missing_column("MotivoAdherencia");
        assert_eq!(
            error.to_string(),
            "Configuration error: required column 'MotivoAdherencia' not found"
        );
        assert!(error.is_configuration());
    }

    #[test]
    fn test_file_not_found_names_path() {
        let error = MotifError::file_not_found("data_limpia.csv");
        assert!(error.to_string().contains("data_limpia.csv"));
        assert!(error.is_configuration());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let motif_error = MotifError::from(io_error);

        match motif_error {
            MotifError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
