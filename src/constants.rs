//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change the default aggregator endpoint, only edit this file.

/// Default aggregator endpoint URL
///
/// This is the fallback URL when no environment variable is set and the
/// entry point received no endpoint argument.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080/metrics";

/// Default sliding window size for the sequence client
pub const DEFAULT_WINDOW_SIZE: usize = 5;

/// Round counter file, shared between both clients via the orchestrator
pub const ROUND_COUNTER_FILE: &str = "round_counter.txt";

/// Frozen one-hot column schema, written once at the end of the fit round
pub const SCHEMA_FILE: &str = "schema.json";

/// Fitted scaler parameters, written alongside the schema
pub const SCALER_FILE: &str = "scaler.json";

/// Append-only metric history log
pub const HISTORY_FILE: &str = "accuracy_log.csv";

/// Client identifier for the sequence (transaction) client
pub const SEQUENCE_CLIENT_ID: &str = "client1";

/// Client identifier for the tabular (regression) client
pub const TABULAR_CLIENT_ID: &str = "client2";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get aggregator URL from environment or use default
pub fn get_server_url() -> String {
    std::env::var("FEDSIM_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string())
}

/// Get window size from environment or use default
pub fn get_window_size() -> usize {
    std::env::var("FEDSIM_WINDOW_SIZE")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_WINDOW_SIZE)
}

/// Get round counter path from environment or use the working-directory default
pub fn get_round_counter_path() -> std::path::PathBuf {
    std::env::var("FEDSIM_ROUND_COUNTER")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::path::PathBuf::from(ROUND_COUNTER_FILE))
}
