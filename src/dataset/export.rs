//! Export of labeled rows.
//!
//! The output keeps every column of the source table and adds the label
//! column, plus a similarity column in semantic mode. The format follows the
//! file extension: `.xlsx` writes a spreadsheet, anything else CSV.

use std::path::Path;

use csv::WriterBuilder;
use log::info;
use rust_xlsxwriter::{Format, Workbook};

use crate::config::ColumnConfig;
use crate::dataset::record::LabeledResponse;
use crate::dataset::table::Table;
use crate::error::{MotifError, Result};

const SHEET_NAME: &str = "Categorias";

/// A single output cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    fn to_text(&self) -> String {
        match self {
            Cell::Text(text) => text.clone(),
            Cell::Number(number) => format!("{number:.4}"),
            Cell::Empty => String::new(),
        }
    }
}

/// Rows ready to be written: the source columns plus the added ones.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Options controlling which rows and columns are exported.
#[derive(Debug, Clone)]
pub struct ExportOptions<'a> {
    pub columns: &'a ColumnConfig,
    /// Rendering of [`Label::Unlabeled`](crate::category::Label::Unlabeled).
    pub other_label: &'a str,
    /// Leave out rows that are still unlabeled.
    pub drop_unlabeled: bool,
    /// Add the similarity column.
    pub include_similarity: bool,
}

/// Position of `name` in `headers`, appending it when missing.
fn column_slot(headers: &mut Vec<String>, name: &str) -> usize {
    match headers.iter().position(|header| header == name) {
        Some(index) => index,
        None => {
            headers.push(name.to_string());
            headers.len() - 1
        }
    }
}

impl LabeledSheet {
    /// Merge labels back into their source rows.
    ///
    /// A label or similarity column already present in the source is
    /// overwritten in place instead of duplicated. Responses without a
    /// source row (or whose row is out of range) fill only the id and text
    /// columns from the response itself.
    pub fn build(table: &Table, labeled: &[LabeledResponse], options: &ExportOptions<'_>) -> Self {
        let mut headers = table.headers().to_vec();
        let label_index = column_slot(&mut headers, &options.columns.label_column);
        let similarity_index = options
            .include_similarity
            .then(|| column_slot(&mut headers, &options.columns.similarity_column));

        let id_index = table.column_index(&options.columns.id_column);
        let text_index = table.column_index(&options.columns.text_column);

        let rows = labeled
            .iter()
            .filter(|row| !(options.drop_unlabeled && row.is_unlabeled()))
            .map(|row| {
                let source = row.response.row.and_then(|index| table.rows().get(index));
                let mut cells: Vec<Cell> = match source {
                    Some(source) => source.iter().cloned().map(Cell::Text).collect(),
                    None => Vec::new(),
                };
                cells.resize(headers.len(), Cell::Empty);
                if source.is_none() {
                    if let Some(index) = id_index {
                        cells[index] = Cell::Text(row.response.id.clone());
                    }
                    if let Some(index) = text_index {
                        cells[index] = Cell::Text(row.response.text.clone());
                    }
                }

                cells[label_index] =
                    Cell::Text(row.label.display_name(options.other_label).to_string());
                if let Some(index) = similarity_index {
                    cells[index] = row
                        .similarity
                        .map_or(Cell::Empty, |similarity| Cell::Number(f64::from(similarity)));
                }
                cells
            })
            .collect();

        LabeledSheet { headers, rows }
    }

    /// Write to `path`, choosing the format from its extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let is_xlsx = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("xlsx"));
        if is_xlsx {
            self.write_xlsx(path)?;
        } else {
            self.write_csv(path)?;
        }
        info!("Saved {} row(s) to {}", self.rows.len(), path.display());
        Ok(())
    }

    fn write_csv(&self, path: &Path) -> Result<()> {
        let mut writer = WriterBuilder::new().from_path(path)?;
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(Cell::to_text))?;
        }
        writer.flush()?;
        Ok(())
    }

    fn write_xlsx(&self, path: &Path) -> Result<()> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        for (col, header) in self.headers.iter().enumerate() {
            worksheet.write_string_with_format(0, column_number(col)?, header, &header_format)?;
        }

        for (index, row) in self.rows.iter().enumerate() {
            let row_number = u32::try_from(index + 1)
                .map_err(|_| MotifError::invalid_argument("too many rows for a worksheet"))?;
            for (col, cell) in row.iter().enumerate() {
                let col = column_number(col)?;
                match cell {
                    Cell::Text(text) => {
                        worksheet.write_string(row_number, col, text)?;
                    }
                    Cell::Number(number) => {
                        worksheet.write_number(row_number, col, *number)?;
                    }
                    Cell::Empty => {}
                }
            }
        }

        workbook.save(path)?;
        Ok(())
    }
}

fn column_number(index: usize) -> Result<u16> {
    u16::try_from(index)
        .map_err(|_| MotifError::invalid_argument("too many columns for a worksheet"))
}
