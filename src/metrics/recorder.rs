//! Local metric persistence.
//!
//! Two files per client: a snapshot JSON holding only the latest round,
//! overwritten every time, and an append-only CSV history that gets a
//! header exactly once and never rewrites prior rows. Both are written
//! before any remote report is attempted.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use super::MetricsRecord;
use crate::error::FedsimError;

#[derive(Serialize)]
struct Snapshot {
    accuracy: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    auc: Option<f64>,
    round: u64,
}

/// Overwrites the snapshot file with the current round's metrics.
pub fn write_snapshot(path: &Path, record: &MetricsRecord) -> Result<(), FedsimError> {
    let snapshot = Snapshot {
        accuracy: record.accuracy,
        auc: record.auc,
        round: record.round,
    };
    let content = serde_json::to_string_pretty(&snapshot)
        .map_err(|e| FedsimError::Parse(e.to_string()))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, content)?;
    log::info!("Metrics snapshot saved to {}", path.display());
    Ok(())
}

/// Appends one row to the history log, writing the header first if the
/// file does not exist yet.
///
/// The column layout is a property of the client lineage, not of one
/// record: `with_auc` lineages carry an `auc` column in every row, with an
/// empty cell on rounds where the metric is undefined, so row width always
/// matches the header.
pub fn append_history(
    path: &Path,
    record: &MetricsRecord,
    with_auc: bool,
) -> Result<(), FedsimError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let needs_header = !path.exists();
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;

    if needs_header {
        if with_auc {
            writeln!(file, "round,accuracy,auc")?;
        } else {
            writeln!(file, "round,accuracy")?;
        }
    }

    if with_auc {
        match record.auc {
            Some(auc) => writeln!(file, "{},{},{}", record.round, record.accuracy, auc)?,
            None => writeln!(file, "{},{},", record.round, record.accuracy)?,
        }
    } else {
        writeln!(file, "{},{}", record.round, record.accuracy)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(round: u64, accuracy: f64, auc: Option<f64>) -> MetricsRecord {
        MetricsRecord {
            round,
            accuracy,
            auc,
            model_kind: "SequenceClassifier".to_string(),
        }
    }

    #[test]
    fn test_snapshot_overwrites_and_omits_missing_auc() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("metrics.json");

        write_snapshot(&path, &record(1, 0.5, Some(0.6))).unwrap();
        write_snapshot(&path, &record(2, 0.75, None)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["round"], 2);
        assert_eq!(value["accuracy"], 0.75);
        assert!(value.get("auc").is_none());
    }

    #[test]
    fn test_history_accumulates_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("accuracy_log.csv");

        append_history(&path, &record(1, 0.5, Some(0.55)), true).unwrap();
        append_history(&path, &record(2, 0.6, Some(0.65)), true).unwrap();
        append_history(&path, &record(3, 0.7, Some(0.75)), true).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "round,accuracy,auc");
        assert_eq!(lines[1], "1,0.5,0.55");
        assert_eq!(lines[2], "2,0.6,0.65");
        assert_eq!(lines[3], "3,0.7,0.75");
    }

    #[test]
    fn test_history_without_auc_uses_two_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("accuracy_log.csv");

        append_history(&path, &record(1, 0.25, None), false).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "round,accuracy\n1,0.25\n");
    }

    #[test]
    fn test_history_keeps_row_width_when_auc_undefined() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("accuracy_log.csv");

        // round 1's evaluation labels held a single class, round 2's both
        append_history(&path, &record(1, 0.5, None), true).unwrap();
        append_history(&path, &record(2, 0.6, Some(0.65)), true).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "round,accuracy,auc");
        assert_eq!(lines[1], "1,0.5,");
        assert_eq!(lines[2], "2,0.6,0.65");

        // every row matches the header's column count
        for line in &lines {
            assert_eq!(line.matches(',').count(), 2, "ragged row: {}", line);
        }
    }
}
