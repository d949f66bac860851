//! Schema encoder: one-hot expansion with a frozen column schema.
//!
//! Two-phase protocol:
//! 1. `fit` runs once per client lineage, discovers the one-hot columns
//!    from the training data, and captures them as a `Schema`.
//! 2. `transform` runs every round, expands the same way, then reindexes
//!    onto the frozen schema: columns the schema expects but the data never
//!    produced are zero-filled, columns the data produced but the schema
//!    never captured are dropped. Drift never raises.
//!
//! Determinism rule: per field (in caller order), observed values are
//! sorted lexicographically, so identical input always yields an identical
//! column list regardless of row order hashing or process boundary.

use std::collections::{BTreeSet, HashMap};

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::table::Table;

/// Frozen, ordered one-hot column list. Serialized as a plain JSON array
/// of strings; immutable once persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of a one-hot column within the frozen order.
    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }
}

/// One-hot column name for a field/value pair, `field_value` style.
fn column_name(field: &str, value: &str) -> String {
    format!("{}_{}", field, value)
}

/// Cell lookup with string coercion. A missing cell encodes as the empty
/// string, so fit captures it as a bare `field_` column; that name in
/// `schema.json` means the training data held rows without a value for
/// `field`.
fn cell<'a>(table: &'a Table, row: usize, field: &str) -> &'a str {
    table.value(row, field).unwrap_or("")
}

/// Fit mode: discovers the schema from the given rows and encodes them.
pub fn fit(table: &Table, fields: &[&str]) -> (Array2<f64>, Schema) {
    let mut columns = Vec::new();
    for field in fields {
        let observed: BTreeSet<&str> = (0..table.len()).map(|r| cell(table, r, field)).collect();
        for value in observed {
            columns.push(column_name(field, value));
        }
    }
    let schema = Schema::new(columns);
    let matrix = transform(table, fields, &schema);
    (matrix, schema)
}

/// Transform mode: encodes rows against a previously frozen schema.
///
/// Given identical rows and an identical schema this is byte-identical
/// across process invocations.
pub fn transform(table: &Table, fields: &[&str], schema: &Schema) -> Array2<f64> {
    // Hashed reindex: schema order stays the contract, cell lookup is O(1)
    // even when account columns blow the schema up to thousands of entries
    let positions: HashMap<&str, usize> = schema
        .columns
        .iter()
        .enumerate()
        .map(|(i, c)| (c.as_str(), i))
        .collect();

    let mut matrix = Array2::zeros((table.len(), schema.len()));
    for row in 0..table.len() {
        for field in fields {
            let name = column_name(field, cell(table, row, field));
            // Unseen values fall outside the schema and are dropped here
            if let Some(&col) = positions.get(name.as_str()) {
                matrix[[row, col]] = 1.0;
            }
        }
    }
    matrix
}
