//! Category dictionary files.
//!
//! Two columns: the category name and its exemplar phrases joined by a
//! separator (`;` by default):
//! ```csv
//! categoria,palabrasClave
//! Costos o beneficios económicos,costo;beneficio;precio
//! Confianza en la mutual,
//! ```

use std::path::Path;

use csv::WriterBuilder;
use log::{info, warn};

use crate::category::CategoryStore;
use crate::config::ColumnConfig;
use crate::dataset::table::{Table, TableReader};
use crate::error::Result;

/// Split a keyword cell into trimmed, non-empty phrases.
pub fn split_keywords<'a>(cell: &'a str, separator: &'a str) -> impl Iterator<Item = &'a str> {
    cell.split(separator)
        .map(str::trim)
        .filter(|phrase| !phrase.is_empty())
}

/// Build a store from a loaded dictionary table.
pub fn categories_from_table(table: &Table, columns: &ColumnConfig) -> Result<CategoryStore> {
    let name_index = table.require_column(&columns.category_name_column)?;
    let keywords_index = table.require_column(&columns.category_keywords_column)?;

    let mut store = CategoryStore::new();
    for row in 0..table.len() {
        let name = table.cell(row, name_index).trim();
        if name.is_empty() {
            warn!("Skipping category row {} without a name", row + 1);
            continue;
        }
        store.ensure_category(name);
        for phrase in split_keywords(table.cell(row, keywords_index), &columns.keyword_separator) {
            store.add_exemplar(name, phrase);
        }
    }
    Ok(store)
}

/// Load a category dictionary from a CSV file.
pub fn load_categories<P: AsRef<Path>>(path: P, columns: &ColumnConfig) -> Result<CategoryStore> {
    let path = path.as_ref();
    let table = TableReader::new().read_path(path)?;
    let store = categories_from_table(&table, columns)?;
    info!(
        "Loaded {} categories with {} exemplar(s) from {}",
        store.len(),
        store.exemplar_count(),
        path.display()
    );
    Ok(store)
}

/// Exemplars that contain `separator` and would be split apart on reload.
pub fn split_on_reload<'a>(
    store: &'a CategoryStore,
    separator: &'a str,
) -> impl Iterator<Item = (&'a str, &'a str)> {
    store.iter().flat_map(move |(name, exemplars)| {
        exemplars
            .iter()
            .filter(move |phrase| phrase.contains(separator))
            .map(move |phrase| (name, phrase.as_str()))
    })
}

/// Write a category dictionary in the same two-column format it is read from.
///
/// Exemplars containing the keyword separator are written as is and logged,
/// since they come back as several phrases when the file is loaded.
pub fn save_categories<P: AsRef<Path>>(
    path: P,
    store: &CategoryStore,
    columns: &ColumnConfig,
) -> Result<()> {
    let path = path.as_ref();
    for (name, phrase) in split_on_reload(store, &columns.keyword_separator) {
        warn!(
            "Exemplar {phrase:?} of category {name:?} contains the separator {:?} and will be split when reloaded",
            columns.keyword_separator
        );
    }

    let mut writer = WriterBuilder::new().from_path(path)?;
    writer.write_record([
        columns.category_name_column.as_str(),
        columns.category_keywords_column.as_str(),
    ])?;
    for (name, exemplars) in store.iter() {
        let keywords = exemplars.join(&columns.keyword_separator);
        writer.write_record([name, keywords.as_str()])?;
    }
    writer.flush()?;
    info!("Wrote {} categories to {}", store.len(), path.display());
    Ok(())
}
