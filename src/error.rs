//! Error taxonomy for round execution.
//!
//! Only conditions that abort a round live here. Schema drift is never an
//! error (the encoder reindexes), a corrupt round counter or warm-start
//! artifact falls back to safe defaults inside the store, and report
//! transport failures are carried in `metrics::reporter::ReportOutcome`.

use std::path::PathBuf;

/// Fatal round errors
#[derive(Debug)]
pub enum FedsimError {
    /// Schema, scaler, or model artifact absent or unreadable at eval time
    MissingArtifact {
        kind: &'static str,
        path: PathBuf,
        detail: String,
    },

    /// Row count too small for the configured window size
    InsufficientData { rows: usize, window: usize },

    /// File I/O failure
    Io(std::io::Error),

    /// Malformed input table or artifact content
    Parse(String),
}

impl std::fmt::Display for FedsimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingArtifact { kind, path, detail } => {
                write!(f, "missing {} artifact at {}: {}", kind, path.display(), detail)
            }
            Self::InsufficientData { rows, window } => {
                write!(
                    f,
                    "not enough data: {} rows for window size {} (need at least {})",
                    rows,
                    window,
                    window + 1
                )
            }
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Parse(e) => write!(f, "parse error: {}", e),
        }
    }
}

impl std::error::Error for FedsimError {}

impl From<std::io::Error> for FedsimError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
