//! Delimited-text and spreadsheet tables.
//!
//! Loads a CSV file, or the first worksheet of a workbook, into memory as a
//! header row plus string cells:
//! ```csv
//! id,MotivoAdherencia
//! 1,Buena atencion del ejecutivo
//! 2,Cercania a mi faena
//! ```
//! Invalid UTF-8 is replaced rather than rejected, since survey exports often
//! come from spreadsheet tools with mixed encodings.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, bail};
use calamine::{Reader, open_workbook_auto};
use csv::{ByteRecord, ReaderBuilder, WriterBuilder};
use log::info;

use crate::error::{MotifError, Result};

const BOM: char = '\u{feff}';

const SPREADSHEET_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];

fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| {
            SPREADSHEET_EXTENSIONS
                .iter()
                .any(|known| e.eq_ignore_ascii_case(known))
        })
}

/// Read the first worksheet of a workbook; its first row holds the headers.
fn read_workbook(path: &Path) -> anyhow::Result<Table> {
    let mut workbook = open_workbook_auto(path).context("cannot open workbook")?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.context("cannot read the first worksheet")?,
        None => bail!("workbook has no worksheet"),
    };

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect(),
        None => bail!("first worksheet is empty"),
    };
    if headers.iter().all(String::is_empty) {
        bail!("header row is empty");
    }

    let mut table = Table::new(headers);
    for row in rows {
        table.push_row(row.iter().map(|cell| cell.to_string()));
    }
    Ok(table)
}

/// An in-memory table of string cells.
///
/// Every row has exactly as many cells as there are headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table with the given headers.
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Table {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row, padding or truncating it to the header width.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells.into_iter().map(Into::into).collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Position of a column that must be present.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| MotifError::missing_column(name))
    }

    /// Cell at `row`, `column`; empty when out of range.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Write the table as CSV.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P, delimiter: u8) -> Result<()> {
        let mut writer = WriterBuilder::new()
            .delimiter(delimiter)
            .from_path(path.as_ref())?;
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Reads delimited text into a [`Table`].
#[derive(Debug, Clone, Copy)]
pub struct TableReader {
    delimiter: u8,
}

impl Default for TableReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TableReader {
    /// Create a reader for comma-separated input.
    pub fn new() -> Self {
        TableReader { delimiter: b',' }
    }

    /// Set a custom delimiter character.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Load a table from a file.
    ///
    /// Spreadsheets (`.xlsx`, `.xlsm`, `.xls`, `.ods`) are read from their
    /// first worksheet and ignore the delimiter. A missing file is a
    /// configuration error.
    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<Table> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(MotifError::file_not_found(path));
        }

        let table = if is_spreadsheet(path) {
            read_workbook(path)
                .map_err(|e| MotifError::parse(format!("{}: {e:#}", path.display())))?
        } else {
            let file = std::fs::File::open(path)?;
            self.read(file)
                .map_err(|e| MotifError::parse(format!("{}: {e}", path.display())))?
        };
        info!("Loaded {} row(s) from {}", table.len(), path.display());
        Ok(table)
    }

    /// Load a table from any reader.
    pub fn read<R: Read>(&self, input: R) -> Result<Table> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_reader(input);

        let headers: Vec<String> = reader
            .byte_headers()
            .map_err(|e| MotifError::parse(format!("Failed to read CSV headers: {e}")))?
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let header = String::from_utf8_lossy(field);
                let header = if i == 0 {
                    header.trim_start_matches(BOM)
                } else {
                    &header
                };
                header.trim().to_string()
            })
            .collect();

        if headers.iter().all(String::is_empty) {
            return Err(MotifError::parse("CSV header is empty"));
        }

        let mut table = Table::new(headers);
        let mut record = ByteRecord::new();
        while reader
            .read_byte_record(&mut record)
            .map_err(|e| MotifError::parse(format!("Failed to read CSV record: {e}")))?
        {
            table.push_row(
                record
                    .iter()
                    .map(|field| String::from_utf8_lossy(field).into_owned()),
            );
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use rust_xlsxwriter::Workbook;
    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_read_basic() {
        let table = TableReader::new()
            .read("id,MotivoAdherencia\n1,Buena atencion\n2,\"Precio, y cercania\"\n".as_bytes())
            .unwrap();

        assert_eq!(table.headers(), ["id", "MotivoAdherencia"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(1, 1), "Precio, y cercania");
        assert_eq!(table.require_column("MotivoAdherencia").unwrap(), 1);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = TableReader::new()
            .read("a,b,c\n1\n1,2,3,4\n".as_bytes())
            .unwrap();
        assert_eq!(table.rows()[0], ["1", "", ""]);
        assert_eq!(table.rows()[1], ["1", "2", "3"]);
    }

    #[test]
    fn test_bom_and_custom_delimiter() {
        let table = TableReader::new()
            .with_delimiter(b';')
            .read("\u{feff}ID de respuesta;Otra\n7;x\n".as_bytes())
            .unwrap();
        assert_eq!(table.column_index("ID de respuesta"), Some(0));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let table = TableReader::new().read(&b"t\ncaf\xe9\n"[..]).unwrap();
        assert_eq!(table.cell(0, 0), "caf\u{fffd}");
    }

    #[test]
    fn test_missing_column_is_configuration_error() {
        let table = Table::new(["id"]);
        let err = table.require_column("MotivoAdherencia").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let reader = TableReader::new();
        assert!(reader.read_path("/nonexistent/data.csv").unwrap_err().is_configuration());
        assert!(reader.read_path("/nonexistent/data.xlsx").unwrap_err().is_configuration());
    }

    #[test]
    fn test_read_workbook_first_sheet() {
        let file = NamedTempFile::with_suffix(".xlsx").unwrap();
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "id").unwrap();
        worksheet.write_string(0, 1, " MotivoAdherencia ").unwrap();
        worksheet.write_number(1, 0, 10).unwrap();
        worksheet.write_string(1, 1, "Buena atención").unwrap();
        worksheet.write_number(2, 0, 11).unwrap();
        workbook.save(file.path()).unwrap();

        let table = TableReader::new().read_path(file.path()).unwrap();
        assert_eq!(table.headers(), ["id", "MotivoAdherencia"]);
        assert_eq!(table.rows()[0], ["10", "Buena atención"]);
        assert_eq!(table.rows()[1], ["11", ""]);
    }

    #[test]
    fn test_corrupt_workbook_is_parse_error() {
        let file = NamedTempFile::with_suffix(".xlsx").unwrap();
        std::fs::write(file.path(), "id,MotivoAdherencia\n").unwrap();

        let err = TableReader::new().read_path(file.path()).unwrap_err();
        assert!(matches!(err, MotifError::Parse(_)));
        assert!(err.to_string().contains("cannot open workbook"));
    }

    #[test]
    fn test_write_then_read_file() {
        let file = NamedTempFile::new().unwrap();

        let mut table = Table::new(["id", "text"]);
        table.push_row(["1", "hola; chao"]);
        table.write_csv(file.path(), b',').unwrap();

        let read = TableReader::new().read_path(file.path()).unwrap();
        assert_eq!(read, table);
    }
}
