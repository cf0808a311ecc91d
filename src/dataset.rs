//! Tabular input and output.
//!
//! Everything that touches files lives here: loading survey rows, reading and
//! writing category dictionaries, exporting labeled rows and cleaning raw
//! survey exports.

pub mod categories;
pub mod export;
pub mod prepare;
pub mod record;
pub mod table;

pub use categories::{
    categories_from_table, load_categories, save_categories, split_keywords, split_on_reload,
};
pub use export::{Cell, ExportOptions, LabeledSheet};
pub use prepare::{PrepareOptions, PrepareReport, prepare_file, prepare_table};
pub use record::{LabeledResponse, Response};
pub use table::{Table, TableReader};

use crate::config::ColumnConfig;
use crate::error::Result;

/// Extract responses from a loaded table.
///
/// The text column is required. Without an id column the 1-based row number
/// is used as the id.
pub fn responses_from_table(table: &Table, columns: &ColumnConfig) -> Result<Vec<Response>> {
    let text_index = table.require_column(&columns.text_column)?;
    let id_index = table.column_index(&columns.id_column);

    Ok((0..table.len())
        .map(|row| {
            let id = match id_index {
                Some(index) => table.cell(row, index).to_string(),
                None => (row + 1).to_string(),
            };
            Response::new(id, table.cell(row, text_index)).with_row(row)
        })
        .collect())
}
