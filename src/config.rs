//! Per-client configuration aggregate.
//!
//! Every path and knob a round touches is enumerated here explicitly and
//! passed into the components, replacing scattered per-client file-path
//! constants. Defaults come from `constants`; the entry points override
//! them from positional arguments.

use std::path::{Path, PathBuf};

use crate::constants;

/// Everything one client process needs for one round.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Client identifier sent with every remote report
    pub client_id: String,

    /// Input data table (delimited, named columns)
    pub data_path: PathBuf,

    /// Warm-start / trained weight artifact
    pub weights_path: PathBuf,

    /// Frozen one-hot schema (sequence client only)
    pub schema_path: PathBuf,

    /// Fitted scaler parameters (sequence client only)
    pub scaler_path: PathBuf,

    /// Shared round counter
    pub counter_path: PathBuf,

    /// Metrics snapshot, overwritten each round
    pub metrics_path: PathBuf,

    /// Append-only metric history
    pub history_path: PathBuf,

    /// Aggregator endpoint for the remote report
    pub server_url: String,

    /// Sliding window size (sequence client only)
    pub window_size: usize,

    /// Whether account identifier columns join the categorical set
    pub include_accounts: bool,
}

impl ClientConfig {
    /// Config for the sequence (transaction) client.
    ///
    /// Schema and scaler artifacts live next to the weight artifact; the
    /// history log defaults to `accuracy_log.csv` next to the snapshot.
    pub fn sequence(
        data_path: PathBuf,
        weights_path: PathBuf,
        metrics_path: PathBuf,
        server_url: String,
        history_path: Option<PathBuf>,
        window_size: Option<usize>,
        include_accounts: bool,
    ) -> Self {
        let state_dir = parent_dir(&weights_path);
        Self {
            client_id: constants::SEQUENCE_CLIENT_ID.to_string(),
            schema_path: state_dir.join(constants::SCHEMA_FILE),
            scaler_path: state_dir.join(constants::SCALER_FILE),
            counter_path: constants::get_round_counter_path(),
            history_path: history_path
                .unwrap_or_else(|| parent_dir(&metrics_path).join(constants::HISTORY_FILE)),
            window_size: window_size.unwrap_or_else(constants::get_window_size),
            include_accounts,
            data_path,
            weights_path,
            metrics_path,
            server_url,
        }
    }

    /// Config for the tabular (regression) client.
    ///
    /// The tabular pipeline has no schema or scaler; those paths are still
    /// derived so the state store is constructed uniformly, they are simply
    /// never written.
    pub fn tabular(
        data_path: PathBuf,
        weights_path: PathBuf,
        metrics_path: PathBuf,
        server_url: String,
        history_path: Option<PathBuf>,
    ) -> Self {
        let state_dir = parent_dir(&weights_path);
        Self {
            client_id: constants::TABULAR_CLIENT_ID.to_string(),
            schema_path: state_dir.join(constants::SCHEMA_FILE),
            scaler_path: state_dir.join(constants::SCALER_FILE),
            counter_path: constants::get_round_counter_path(),
            history_path: history_path
                .unwrap_or_else(|| parent_dir(&metrics_path).join(constants::HISTORY_FILE)),
            window_size: 0,
            include_accounts: false,
            data_path,
            weights_path,
            metrics_path,
            server_url,
        }
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_defaults() {
        let cfg = ClientConfig::sequence(
            PathBuf::from("data/train.csv"),
            PathBuf::from("client1_data/weights.json"),
            PathBuf::from("client1_data/metrics.json"),
            "http://localhost:8080/metrics".to_string(),
            None,
            None,
            false,
        );

        assert_eq!(cfg.client_id, "client1");
        assert_eq!(cfg.schema_path, PathBuf::from("client1_data/schema.json"));
        assert_eq!(cfg.scaler_path, PathBuf::from("client1_data/scaler.json"));
        assert_eq!(cfg.history_path, PathBuf::from("client1_data/accuracy_log.csv"));
        assert_eq!(cfg.window_size, crate::constants::DEFAULT_WINDOW_SIZE);
        assert!(!cfg.include_accounts);
    }

    #[test]
    fn test_history_override() {
        let cfg = ClientConfig::tabular(
            PathBuf::from("data.csv"),
            PathBuf::from("weights.json"),
            PathBuf::from("metrics.json"),
            "http://localhost:8080/metrics".to_string(),
            Some(PathBuf::from("logs/history.csv")),
        );

        assert_eq!(cfg.client_id, "client2");
        assert_eq!(cfg.history_path, PathBuf::from("logs/history.csv"));
        // bare file name resolves its state dir to the working directory
        assert_eq!(cfg.schema_path, PathBuf::from("./schema.json"));
    }
}
