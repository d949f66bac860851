//! Federated round client simulator.
//!
//! Two heterogeneous clients (a windowed transaction classifier and a
//! tabular regressor) train independently, one process per communication
//! round, and report evaluation metrics to a central aggregator over HTTP.
//! Cross-round state (round counter, warm-start weights, frozen feature
//! schema, fitted scaler) lives on the filesystem.

pub mod config;
pub mod constants;
pub mod error;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod round;
pub mod table;

pub use config::ClientConfig;
pub use error::FedsimError;
