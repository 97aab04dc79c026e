//! Loosely typed CSV table
//!
//! Export batches and the saved appointments file have no fixed schema, so
//! cells are kept as strings and columns are addressed by header name.

use std::path::Path;

use thiserror::Error;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Errors reading or writing a table
#[derive(Error, Debug)]
pub enum TableError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Header row plus string cells. Every row has exactly `headers.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Parse comma-delimited bytes with a header row. A leading UTF-8 BOM is
    /// skipped; short rows are padded with empty cells and long rows truncated.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self, TableError> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(bytes);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    /// Read and parse a CSV file
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let bytes = std::fs::read(path)?;
        Self::from_csv_bytes(&bytes)
    }

    /// Serialize back to CSV bytes (header row first)
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, TableError> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.into_inner().map_err(|e| TableError::Io(e.into_error()))
    }

    /// Write to a CSV file, replacing any existing content
    pub fn write_path(&self, path: &Path) -> Result<(), TableError> {
        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Number of records (header excluded)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the column with exactly this header
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Position of the first column whose header equals `name` ignoring case
    /// and surrounding whitespace
    pub fn column_index_ignore_case(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    /// Copy of the first `n` rows, for previews
    pub fn head(&self, n: usize) -> Table {
        Table {
            headers: self.headers.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_with_bom_and_ragged_rows() {
        let bytes = b"\xEF\xBB\xBFID,Status,Notes\n1,Approved\n2,Pending,late,extra\n";
        let table = Table::from_csv_bytes(bytes).unwrap();

        assert_eq!(table.headers, vec!["ID", "Status", "Notes"]);
        assert_eq!(table.rows[0], vec!["1", "Approved", ""]);
        assert_eq!(table.rows[1], vec!["2", "Pending", "late"]);
    }

    #[test]
    fn test_quoted_fields_survive_write() {
        let bytes = b"ID,Service\n7,\"Workshop, level 2\"\n";
        let table = Table::from_csv_bytes(bytes).unwrap();
        assert_eq!(table.rows[0][1], "Workshop, level 2");

        let written = table.to_csv_bytes().unwrap();
        let text = String::from_utf8(written.clone()).unwrap();
        assert!(text.contains("\"Workshop, level 2\""));
        assert_eq!(Table::from_csv_bytes(&written).unwrap(), table);
    }

    #[test]
    fn test_column_lookup() {
        let table = Table::new(vec!["ID".into(), " Customer Email ".into()]);
        assert_eq!(table.column_index("ID"), Some(0));
        assert_eq!(table.column_index("id"), None);
        assert_eq!(table.column_index_ignore_case("id"), Some(0));
        assert_eq!(table.column_index_ignore_case("customer email"), Some(1));
    }

    #[test]
    fn test_empty_input_has_no_headers() {
        let table = Table::from_csv_bytes(b"").unwrap();
        assert!(table.headers.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn test_write_and_read_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        let mut table = Table::new(vec!["ID".into(), "Status".into()]);
        table.rows.push(vec!["1".into(), "Done".into()]);
        table.write_path(&path).unwrap();

        let read = Table::from_path(&path).unwrap();
        assert_eq!(read, table);
        assert_eq!(read.head(0).len(), 0);
    }
}
