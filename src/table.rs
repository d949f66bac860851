//! Delimited input table with named columns.
//!
//! Supported format:
//! - UTF-8, comma-separated
//! - Mandatory header row; exact column names are part of the contract
//! - Double-quoted fields with embedded commas are handled
//!
//! Rows are immutable once read; a `Table` lives for a single pipeline
//! invocation. Numeric coercion failures and missing cells become 0.0 at
//! the accessor level, never errors.

use std::collections::HashMap;
use std::path::Path;

use crate::error::FedsimError;

/// One parsed input table.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Read and parse a table from disk.
    pub fn from_path(path: &Path) -> Result<Table, FedsimError> {
        let text = std::fs::read_to_string(path).map_err(|e| FedsimError::MissingArtifact {
            kind: "input data",
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        Self::from_str(&text)
    }

    /// Parse a table from text. The first non-empty line is the header.
    pub fn from_str(text: &str) -> Result<Table, FedsimError> {
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());

        let header_line = lines
            .next()
            .ok_or_else(|| FedsimError::Parse("input table is empty".to_string()))?;
        let headers: Vec<String> = parse_row(header_line)
            .into_iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut index = HashMap::with_capacity(headers.len());
        for (i, h) in headers.iter().enumerate() {
            index.insert(h.clone(), i);
        }

        let mut rows = Vec::new();
        for line in lines {
            let mut cells = parse_row(line);
            // Ragged short rows read as missing cells
            cells.resize(headers.len(), String::new());
            rows.push(cells);
        }

        Ok(Table { headers, index, rows })
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Whether the table carries the named column.
    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Cell value by row index and column name. `None` when the column is
    /// absent; an empty string when the cell itself was missing.
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let col = *self.index.get(column)?;
        self.rows.get(row).map(|r| r[col].as_str())
    }

    /// A whole column coerced to floats; absent columns, unparsable cells,
    /// and missing values all become 0.0.
    pub fn numeric_column(&self, column: &str) -> Vec<f64> {
        (0..self.len())
            .map(|row| {
                self.value(row, column)
                    .and_then(|v| v.trim().parse::<f64>().ok())
                    .unwrap_or(0.0)
            })
            .collect()
    }

    /// Errors when a contract column is missing from the header.
    pub fn require_column(&self, column: &str) -> Result<(), FedsimError> {
        if self.has_column(column) {
            Ok(())
        } else {
            Err(FedsimError::Parse(format!(
                "required column '{}' not found in header [{}]",
                column,
                self.headers.join(", ")
            )))
        }
    }
}

/// Parses a single delimited row, handling double-quoted fields.
fn parse_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '"' => {
                if in_quotes && i + 1 < chars.len() && chars[i + 1] == '"' {
                    // Escaped quote inside quoted field
                    current.push('"');
                    i += 2;
                    continue;
                }
                in_quotes = !in_quotes;
            }
            ',' if !in_quotes => {
                fields.push(current.clone());
                current.clear();
            }
            c => current.push(c),
        }
        i += 1;
    }
    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_header() {
        let table = Table::from_str("Amount,Payment_type\n10.5,Card\n20,\"Cash, small\"\n").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.headers(), &["Amount", "Payment_type"]);
        assert_eq!(table.value(0, "Payment_type"), Some("Card"));
        assert_eq!(table.value(1, "Payment_type"), Some("Cash, small"));
    }

    #[test]
    fn test_numeric_coercion_failures_become_zero() {
        let table = Table::from_str("Amount,Label\n10,1\nabc,0\n,1\n").unwrap();
        assert_eq!(table.numeric_column("Amount"), vec![10.0, 0.0, 0.0]);
        // absent column is all zeros too
        assert_eq!(table.numeric_column("Nope"), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_short_rows_pad_as_missing() {
        let table = Table::from_str("A,B,C\n1,2\n").unwrap();
        assert_eq!(table.value(0, "C"), Some(""));
    }

    #[test]
    fn test_empty_input_is_parse_error() {
        assert!(matches!(Table::from_str("\n\n"), Err(FedsimError::Parse(_))));
    }

    #[test]
    fn test_require_column() {
        let table = Table::from_str("X,y\n1,2\n").unwrap();
        assert!(table.require_column("X").is_ok());
        assert!(table.require_column("Time").is_err());
    }
}
