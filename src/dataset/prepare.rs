//! Cleanup of raw survey exports.
//!
//! The survey platform exports every question of the form, `;`-separated.
//! Preparation keeps the response id and the free-text question, renames them
//! to the columns the labeler reads, and drops empty and punctuation-only
//! answers.

use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::analysis::is_noise;
use crate::config::ColumnConfig;
use crate::dataset::table::{Table, TableReader};
use crate::error::Result;

/// Response id column of the raw export.
pub const RAW_ID_COLUMN: &str = "ID de respuesta";

/// Free-text question column of the raw export.
pub const RAW_QUESTION_COLUMN: &str = "¿Cuales son las tres principales razones por las que te adheriste a Mutual de Seguridad?  Comentalas en orden de importancia";

/// Default name of the cleaned file.
pub const DEFAULT_PREPARED_FILE: &str = "data_limpia.csv";

/// Where to find the two columns of interest in a raw export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrepareOptions {
    pub id_column: String,
    pub question_column: String,
    pub delimiter: u8,
}

impl Default for PrepareOptions {
    fn default() -> Self {
        PrepareOptions {
            id_column: RAW_ID_COLUMN.to_string(),
            question_column: RAW_QUESTION_COLUMN.to_string(),
            delimiter: b';',
        }
    }
}

/// Row counts of a preparation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepareReport {
    /// Rows in the raw export.
    pub total: usize,
    /// Rows whose answer cell was empty.
    pub missing: usize,
    /// Rows whose answer held only whitespace or punctuation.
    pub noise: usize,
    /// Rows written to the cleaned table.
    pub retained: usize,
}

/// Reduce a raw export to the id and answer columns, without unusable answers.
pub fn prepare_table(
    raw: &Table,
    options: &PrepareOptions,
    columns: &ColumnConfig,
) -> Result<(Table, PrepareReport)> {
    let id_index = raw.require_column(&options.id_column)?;
    let question_index = raw.require_column(&options.question_column)?;

    let mut cleaned = Table::new([columns.id_column.as_str(), columns.text_column.as_str()]);
    let mut report = PrepareReport {
        total: raw.len(),
        ..PrepareReport::default()
    };

    for row in 0..raw.len() {
        let answer = raw.cell(row, question_index);
        if answer.is_empty() {
            report.missing += 1;
        } else if is_noise(answer) {
            report.noise += 1;
        } else {
            cleaned.push_row([raw.cell(row, id_index), answer]);
        }
    }
    report.retained = cleaned.len();
    Ok((cleaned, report))
}

/// Clean the raw export at `input` and write the result to `output`.
pub fn prepare_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: &PrepareOptions,
    columns: &ColumnConfig,
) -> Result<PrepareReport> {
    let raw = TableReader::new()
        .with_delimiter(options.delimiter)
        .read_path(input)?;
    let (cleaned, report) = prepare_table(&raw, options, columns)?;

    info!("Total rows: {}", report.total);
    if report.missing > 0 || report.noise > 0 {
        warn!(
            "Dropped {} empty and {} punctuation-only answer(s)",
            report.missing, report.noise
        );
    }
    info!("Rows retained for analysis: {}", report.retained);

    cleaned.write_csv(output.as_ref(), b',')?;
    info!("Cleaned data written to {}", output.as_ref().display());
    Ok(report)
}
