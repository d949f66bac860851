use ndarray::{array, Array2};

use super::calendar::{self, CalendarRow};
use super::{encoder, scaler::Scaler, window};
use crate::error::FedsimError;
use crate::table::Table;

fn toy_table() -> Table {
    Table::from_str(
        "Time,Date,Amount,Payment_type,Is_laundering\n\
         01:00:00,2024-01-01,10,A,0\n\
         02:30:15,2024-01-02,20,B,1\n\
         03:45:59,2024-01-03,30,A,0\n",
    )
    .unwrap()
}

// ---------------------------------------------------------------------------
// Calendar extraction
// ---------------------------------------------------------------------------

#[test]
fn test_calendar_valid_row() {
    let row = calendar::extract_row(Some("13:05:09"), Some("2024-03-01"));
    assert_eq!(row.hour, Some(13.0));
    assert_eq!(row.minute, Some(5.0));
    assert_eq!(row.second, Some(9.0));
    assert_eq!(row.seconds_since_midnight, Some(13.0 * 3600.0 + 5.0 * 60.0 + 9.0));
    assert_eq!(row.year, Some(2024.0));
    assert_eq!(row.month, Some(3.0));
    assert_eq!(row.day, Some(1.0));
    // 2024-03-01 is a Friday; Monday = 0
    assert_eq!(row.weekday, Some(4.0));
    // 2024 is a leap year: Jan 31 + Feb 29 + 1
    assert_eq!(row.dayofyear, Some(61.0));
}

#[test]
fn test_calendar_malformed_inputs_are_none() {
    let row = calendar::extract_row(Some("not a time"), Some("01/02/2024"));
    assert_eq!(row, CalendarRow::default());

    // time and date degrade independently
    let row = calendar::extract_row(Some("01:00:00"), Some("garbage"));
    assert_eq!(row.hour, Some(1.0));
    assert_eq!(row.year, None);
}

#[test]
fn test_numeric_block_zero_fills_null_markers() {
    let table = Table::from_str("Time,Date,Amount\nbad,bad,5\n").unwrap();
    let cal = calendar::extract(&table);
    let block = super::numeric_block(&table, &cal);
    assert_eq!(block.nrows(), 1);
    assert_eq!(block[[0, 0]], 5.0);
    for j in 1..super::NUMERIC_COLUMNS.len() {
        assert_eq!(block[[0, j]], 0.0);
    }
}

// ---------------------------------------------------------------------------
// Schema encoder
// ---------------------------------------------------------------------------

#[test]
fn test_fit_discovers_sorted_columns() {
    let table = toy_table();
    let (matrix, schema) = encoder::fit(&table, &["Payment_type"]);

    assert_eq!(schema.columns(), &["Payment_type_A", "Payment_type_B"]);
    assert_eq!(matrix, array![[1.0, 0.0], [0.0, 1.0], [1.0, 0.0]]);
}

#[test]
fn test_transform_is_deterministic() {
    let table = toy_table();
    let (_, schema) = encoder::fit(&table, &["Payment_type"]);

    let a = encoder::transform(&table, &["Payment_type"], &schema);
    let b = encoder::transform(&table, &["Payment_type"], &schema);
    assert_eq!(a, b);
}

#[test]
fn test_unseen_category_encodes_to_zeros() {
    // schema frozen as [cat_A, cat_B]; a later row with cat C yields [0, 0]
    let train = Table::from_str("cat\nA\nB\nA\n").unwrap();
    let (_, schema) = encoder::fit(&train, &["cat"]);
    assert_eq!(schema.columns(), &["cat_A", "cat_B"]);

    let unseen = Table::from_str("cat\nC\n").unwrap();
    let matrix = encoder::transform(&unseen, &["cat"], &schema);
    assert_eq!(matrix, array![[0.0, 0.0]]);
}

#[test]
fn test_schema_column_missing_from_data_zero_fills() {
    let train = Table::from_str("cat\nA\nB\n").unwrap();
    let (_, schema) = encoder::fit(&train, &["cat"]);

    let only_a = Table::from_str("cat\nA\nA\n").unwrap();
    let matrix = encoder::transform(&only_a, &["cat"], &schema);
    assert_eq!(matrix, array![[1.0, 0.0], [1.0, 0.0]]);
}

#[test]
fn test_missing_cell_fits_bare_field_column() {
    // second row is short: the cat cell is absent and coerces to ""
    let table = Table::from_str("cat,other\nA,x\n,y\n").unwrap();
    let (matrix, schema) = encoder::fit(&table, &["cat"]);

    assert_eq!(schema.columns(), &["cat_", "cat_A"]);
    assert_eq!(matrix, array![[0.0, 1.0], [1.0, 0.0]]);
}

#[test]
fn test_schema_json_round_trip() {
    let (_, schema) = encoder::fit(&toy_table(), &["Payment_type"]);
    let json = serde_json::to_string(&schema).unwrap();
    assert_eq!(json, r#"["Payment_type_A","Payment_type_B"]"#);

    let back: encoder::Schema = serde_json::from_str(&json).unwrap();
    assert_eq!(back, schema);
}

#[test]
fn test_categorical_fields_flag() {
    assert_eq!(super::categorical_fields(false).len(), 5);
    let with_accounts = super::categorical_fields(true);
    assert_eq!(with_accounts.len(), 7);
    assert!(with_accounts.contains(&"Sender_account"));
}

// ---------------------------------------------------------------------------
// Scaler
// ---------------------------------------------------------------------------

#[test]
fn test_scaler_fit_and_transform() {
    let block = array![[1.0, 10.0], [3.0, 10.0]];
    let scaler = Scaler::fit(&block);

    assert_eq!(scaler.mean(), &[2.0, 10.0]);
    // population stddev of [1, 3] is 1; constant column guards to 1.0
    assert_eq!(scaler.scale(), &[1.0, 1.0]);

    let out = scaler.transform(&block).unwrap();
    assert_eq!(out, array![[-1.0, 0.0], [1.0, 0.0]]);
}

#[test]
fn test_scaler_replay_matches_manual_application() {
    let train = array![[2.0], [4.0], [6.0]];
    let scaler = Scaler::fit(&train);

    let test = array![[3.0], [9.0]];
    let out = scaler.transform(&test).unwrap();

    // applying the stored parameters manually must agree, with no refit
    for i in 0..test.nrows() {
        let manual = (test[[i, 0]] - scaler.mean()[0]) / scaler.scale()[0];
        assert_eq!(out[[i, 0]], manual);
    }
}

#[test]
fn test_scaler_round_trips_exactly_through_json() {
    let scaler = Scaler::fit(&array![[1.5, -2.25], [3.75, 8.5]]);
    let json = serde_json::to_string(&scaler).unwrap();
    let back: Scaler = serde_json::from_str(&json).unwrap();
    assert_eq!(back, scaler);
}

#[test]
fn test_scaler_width_mismatch_is_error() {
    let scaler = Scaler::fit(&array![[1.0, 2.0]]);
    let narrow: Array2<f64> = array![[1.0]];
    assert!(matches!(scaler.transform(&narrow), Err(FedsimError::Parse(_))));
}

// ---------------------------------------------------------------------------
// Window builder
// ---------------------------------------------------------------------------

#[test]
fn test_window_count_and_coverage() {
    let features = array![[0.0], [1.0], [2.0], [3.0], [4.0]];
    let labels = [10.0, 11.0, 12.0, 13.0, 14.0];

    let (x, y) = window::build(&features, &labels, 2).unwrap();
    assert_eq!(x.dim(), (3, 2, 1));

    // sample i covers rows [i, i+2), label from row i+2
    for i in 0..3 {
        assert_eq!(x[[i, 0, 0]], i as f64);
        assert_eq!(x[[i, 1, 0]], (i + 1) as f64);
        assert_eq!(y[i], labels[i + 2]);
    }
}

#[test]
fn test_window_insufficient_data() {
    let features = array![[0.0], [1.0], [2.0]];
    let labels = [0.0, 1.0, 0.0];

    // N == w and N < w both signal insufficient data, not a panic
    for w in [3, 5] {
        match window::build(&features, &labels, w) {
            Err(FedsimError::InsufficientData { rows, window }) => {
                assert_eq!(rows, 3);
                assert_eq!(window, w);
            }
            other => panic!("expected InsufficientData, got {:?}", other.map(|_| ())),
        }
    }
}

#[test]
fn test_window_label_length_mismatch() {
    let features = array![[0.0], [1.0], [2.0]];
    assert!(matches!(
        window::build(&features, &[0.0, 1.0], 1),
        Err(FedsimError::Parse(_))
    ));
}
