//! Feature pipeline: raw table rows to model-ready tensors.
//!
//! **CRITICAL: column order is the feature contract**
//!
//! The numeric block comes first, in `NUMERIC_COLUMNS` order, followed by
//! the one-hot block in frozen-schema order. The train pass that fits the
//! schema and every later eval pass (a separate process, possibly another
//! machine) must produce bit-for-bit identical layouts for identical input.

pub mod calendar;
pub mod encoder;
pub mod scaler;
pub mod window;

#[cfg(test)]
mod tests;

use ndarray::Array2;

use crate::table::Table;
use calendar::CalendarRow;

/// Numeric feature columns, in exact matrix order. `Amount` is read from
/// the raw table; the rest are derived by the calendar extractor.
pub const NUMERIC_COLUMNS: [&str; 10] = [
    "Amount",
    "seconds_since_midnight",
    "hour",
    "minute",
    "second",
    "year",
    "month",
    "day",
    "weekday",
    "dayofyear",
];

/// Categorical columns always one-hot encoded.
pub const CATEGORICAL_COLUMNS: [&str; 5] = [
    "Payment_type",
    "Payment_currency",
    "Received_currency",
    "Sender_bank_location",
    "Receiver_bank_location",
];

/// Account identifier columns, appended behind the include-accounts flag.
pub const ACCOUNT_COLUMNS: [&str; 2] = ["Sender_account", "Receiver_account"];

/// Ground-truth label column for the sequence client.
pub const LABEL_COLUMN: &str = "Is_laundering";

/// Categorical field set for one invocation.
pub fn categorical_fields(include_accounts: bool) -> Vec<&'static str> {
    let mut fields: Vec<&'static str> = CATEGORICAL_COLUMNS.to_vec();
    if include_accounts {
        fields.extend_from_slice(&ACCOUNT_COLUMNS);
    }
    fields
}

/// Assembles the numeric block: one row per record, `NUMERIC_COLUMNS` order.
/// Null calendar markers (malformed date/time strings) become 0.0 here.
pub fn numeric_block(table: &Table, cal: &[CalendarRow]) -> Array2<f64> {
    let rows = table.len();
    let mut out = Array2::zeros((rows, NUMERIC_COLUMNS.len()));

    let amounts = table.numeric_column("Amount");
    for (i, row) in cal.iter().enumerate().take(rows) {
        out[[i, 0]] = amounts[i];
        for (j, name) in NUMERIC_COLUMNS.iter().enumerate().skip(1) {
            out[[i, j]] = row.get(name).unwrap_or(0.0);
        }
    }
    out
}

/// Concatenates the scaled numeric block and the encoded categorical block.
/// Both sides always share a row count; they come from the same table.
pub fn concat_features(numeric: &Array2<f64>, categorical: &Array2<f64>) -> Array2<f64> {
    let rows = numeric.nrows();
    let (kn, kc) = (numeric.ncols(), categorical.ncols());
    let mut out = Array2::zeros((rows, kn + kc));
    for i in 0..rows {
        for j in 0..kn {
            out[[i, j]] = numeric[[i, j]];
        }
        for j in 0..kc {
            out[[i, kn + j]] = categorical[[i, j]];
        }
    }
    out
}
