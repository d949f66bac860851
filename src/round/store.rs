//! Round state persistence.
//!
//! Everything that must outlive one process invocation lives here: the
//! shared round counter, warm-start weights, the frozen schema, and the
//! fitted scaler. Reads are lenient where recovery is safe (counter and
//! warm start fall back to defaults) and strict where an artifact is
//! load-bearing (schema/scaler/weights on an eval round). Writes go
//! through a temp-file-then-rename step so a round that dies mid-write
//! never leaves a partially written artifact for the next round to load.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ClientConfig;
use crate::error::FedsimError;
use crate::model::WeightBlob;
use crate::pipeline::encoder::Schema;
use crate::pipeline::scaler::Scaler;

/// Handle over one client's persisted round artifacts.
#[derive(Debug, Clone)]
pub struct RoundStateStore {
    counter_path: PathBuf,
    weights_path: PathBuf,
    schema_path: PathBuf,
    scaler_path: PathBuf,
}

impl RoundStateStore {
    pub fn from_config(cfg: &ClientConfig) -> Self {
        Self {
            counter_path: cfg.counter_path.clone(),
            weights_path: cfg.weights_path.clone(),
            schema_path: cfg.schema_path.clone(),
            scaler_path: cfg.scaler_path.clone(),
        }
    }

    // ------------------------------------------------------------------
    // Round counter
    // ------------------------------------------------------------------

    /// Current round number. A missing or unparsable counter file defaults
    /// to round 1 and is never fatal.
    pub fn round_number(&self) -> u64 {
        match fs::read_to_string(&self.counter_path) {
            Ok(content) => match content.trim().parse::<u64>() {
                Ok(n) => n,
                Err(_) => {
                    log::warn!(
                        "Round counter at {} is not an integer ({:?}), defaulting to round 1",
                        self.counter_path.display(),
                        content.trim()
                    );
                    1
                }
            },
            Err(e) => {
                log::warn!(
                    "Could not read round counter at {}: {}, defaulting to round 1",
                    self.counter_path.display(),
                    e
                );
                1
            }
        }
    }

    /// Writes the round counter. Clients normally only read it (the
    /// orchestrator advances it), but the write half of the contract lives
    /// here with the same atomicity as every other artifact.
    pub fn write_round_number(&self, round: u64) -> Result<(), FedsimError> {
        write_atomic(&self.counter_path, round.to_string().as_bytes())?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Warm-start weights
    // ------------------------------------------------------------------

    /// Loads the warm-start blob if a usable one exists. Missing, empty,
    /// or undecodable artifacts are logged and treated as no warm start.
    pub fn load_warm_start(&self) -> Option<WeightBlob> {
        let content = match fs::read_to_string(&self.weights_path) {
            Ok(c) => c,
            Err(e) => {
                log::info!(
                    "No warm-start weights at {} ({}), training from scratch",
                    self.weights_path.display(),
                    e
                );
                return None;
            }
        };

        if content.trim().is_empty() {
            log::warn!(
                "Warm-start file {} is empty, training from scratch",
                self.weights_path.display()
            );
            return None;
        }

        match serde_json::from_str::<WeightBlob>(&content) {
            Ok(blob) => Some(blob),
            Err(e) => {
                log::warn!(
                    "Could not decode warm-start weights at {}: {}, training from scratch",
                    self.weights_path.display(),
                    e
                );
                None
            }
        }
    }

    /// Loads weights for an eval round, where their absence aborts.
    pub fn load_weights_required(&self) -> Result<WeightBlob, FedsimError> {
        let content = fs::read_to_string(&self.weights_path).map_err(|e| {
            FedsimError::MissingArtifact {
                kind: "model weights",
                path: self.weights_path.clone(),
                detail: e.to_string(),
            }
        })?;
        serde_json::from_str(&content).map_err(|e| FedsimError::MissingArtifact {
            kind: "model weights",
            path: self.weights_path.clone(),
            detail: e.to_string(),
        })
    }

    pub fn save_weights(&self, blob: &WeightBlob) -> Result<(), FedsimError> {
        let content = serde_json::to_string_pretty(blob)
            .map_err(|e| FedsimError::Parse(e.to_string()))?;
        write_atomic(&self.weights_path, content.as_bytes())?;
        log::info!("Weights saved to {}", self.weights_path.display());
        Ok(())
    }

    // ------------------------------------------------------------------
    // Schema / scaler
    // ------------------------------------------------------------------

    pub fn load_schema(&self) -> Result<Schema, FedsimError> {
        let content =
            fs::read_to_string(&self.schema_path).map_err(|e| FedsimError::MissingArtifact {
                kind: "schema",
                path: self.schema_path.clone(),
                detail: e.to_string(),
            })?;
        serde_json::from_str(&content).map_err(|e| FedsimError::MissingArtifact {
            kind: "schema",
            path: self.schema_path.clone(),
            detail: e.to_string(),
        })
    }

    pub fn save_schema(&self, schema: &Schema) -> Result<(), FedsimError> {
        let content = serde_json::to_string(schema)
            .map_err(|e| FedsimError::Parse(e.to_string()))?;
        write_atomic(&self.schema_path, content.as_bytes())?;
        log::info!(
            "Schema frozen with {} columns at {}",
            schema.len(),
            self.schema_path.display()
        );
        Ok(())
    }

    pub fn load_scaler(&self) -> Result<Scaler, FedsimError> {
        let content =
            fs::read_to_string(&self.scaler_path).map_err(|e| FedsimError::MissingArtifact {
                kind: "scaler",
                path: self.scaler_path.clone(),
                detail: e.to_string(),
            })?;
        serde_json::from_str(&content).map_err(|e| FedsimError::MissingArtifact {
            kind: "scaler",
            path: self.scaler_path.clone(),
            detail: e.to_string(),
        })
    }

    pub fn save_scaler(&self, scaler: &Scaler) -> Result<(), FedsimError> {
        let content = serde_json::to_string(scaler)
            .map_err(|e| FedsimError::Parse(e.to_string()))?;
        write_atomic(&self.scaler_path, content.as_bytes())?;
        log::info!("Scaler saved to {}", self.scaler_path.display());
        Ok(())
    }
}

/// Write-temp-then-rename within the target directory, creating parent
/// directories on first use.
fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)
}
