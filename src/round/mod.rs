//! Round lifecycle orchestration.
//!
//! One process invocation drives one round through a fixed sequence:
//! load state, build features, fit or predict, persist state (fit rounds
//! only), evaluate, report. The terminal report step is reached whether or
//! not delivery succeeds; local persistence always happens first.

pub mod store;

use ndarray::{Array1, Array2};

use crate::config::ClientConfig;
use crate::error::FedsimError;
use crate::metrics::{self, recorder, reporter, MetricsRecord};
use crate::model::linear::LeastSquares;
use crate::model::logistic::WindowClassifier;
use crate::model::{SequenceModel, TabularModel};
use crate::pipeline::{self, calendar, encoder, scaler::Scaler, window};
use crate::table::Table;
use store::RoundStateStore;

/// Input feature column for the tabular client.
pub const TABULAR_FEATURE_COLUMN: &str = "X";

/// Target column for the tabular client.
pub const TABULAR_TARGET_COLUMN: &str = "y";

/// Whether this invocation fits the model or replays frozen state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundMode {
    /// Fit round: defines schema and scaler, trains, persists artifacts.
    Train,
    /// Evaluation round: loads frozen artifacts, never refits anything.
    Eval,
}

/// Everything one completed round produced.
#[derive(Debug)]
pub struct RoundSummary {
    pub record: MetricsRecord,
    pub report: reporter::ReportOutcome,
}

// ---------------------------------------------------------------------------
// Sequence client (windowed transaction classifier)
// ---------------------------------------------------------------------------

/// Runs one round of the sequence client.
pub fn run_sequence_round(
    cfg: &ClientConfig,
    mode: RoundMode,
) -> Result<RoundSummary, FedsimError> {
    let store = RoundStateStore::from_config(cfg);
    let round = store.round_number();
    log::info!(
        "Sequence client round {} ({:?}), window size {}",
        round,
        mode,
        cfg.window_size
    );

    let (probs, truth, kind) = match mode {
        RoundMode::Train => sequence_fit(cfg, &store)?,
        RoundMode::Eval => sequence_eval(cfg, &store)?,
    };

    let accuracy = metrics::accuracy(&probs, &truth);
    let auc = metrics::roc_auc(&probs, &truth);
    if auc.is_none() {
        log::warn!("ROC AUC undefined for round {}: labels hold a single class", round);
    }
    log::info!("Round {} accuracy: {:.4}, auc: {:?}", round, accuracy, auc);

    let record = MetricsRecord {
        round,
        accuracy,
        auc,
        model_kind: kind.to_string(),
    };
    // the classifier lineage always carries the AUC column, empty or not
    finalize(cfg, record, true)
}

/// Builds the feature inputs shared by both sequence modes.
fn sequence_inputs(cfg: &ClientConfig) -> Result<(Table, Array2<f64>, Vec<f64>), FedsimError> {
    let table = Table::from_path(&cfg.data_path)?;
    table.require_column(pipeline::LABEL_COLUMN)?;

    let cal = calendar::extract(&table);
    let numeric = pipeline::numeric_block(&table, &cal);
    let labels = table.numeric_column(pipeline::LABEL_COLUMN);
    Ok((table, numeric, labels))
}

fn sequence_fit(
    cfg: &ClientConfig,
    store: &RoundStateStore,
) -> Result<(Array1<f64>, Array1<f64>, &'static str), FedsimError> {
    let (table, numeric, labels) = sequence_inputs(cfg)?;
    let fields = pipeline::categorical_fields(cfg.include_accounts);

    // Fit round defines the lineage: schema and scaler are derived here
    // once and frozen for every later invocation.
    let (cat, schema) = encoder::fit(&table, &fields);
    let scaler = Scaler::fit(&numeric);
    let scaled = scaler.transform(&numeric)?;
    let features = pipeline::concat_features(&scaled, &cat);

    let (x, y) = window::build(&features, &labels, cfg.window_size)?;
    let (_, w, k) = x.dim();

    let mut model = WindowClassifier::new(w * k);
    if let Some(blob) = store.load_warm_start() {
        match model.import_weights(&blob) {
            Ok(()) => log::info!("Warm-start weights applied"),
            Err(e) => log::warn!("Warm start rejected: {}; training from a fresh model", e),
        }
    }
    model.fit(&x, &y);

    // Artifacts are written only after fitting completed, so a failed
    // round leaves the previous round's state loadable.
    store.save_weights(&model.export_weights())?;
    store.save_schema(&schema)?;
    store.save_scaler(&scaler)?;

    Ok((model.predict(&x), y, model.kind()))
}

fn sequence_eval(
    cfg: &ClientConfig,
    store: &RoundStateStore,
) -> Result<(Array1<f64>, Array1<f64>, &'static str), FedsimError> {
    let (table, numeric, labels) = sequence_inputs(cfg)?;
    let fields = pipeline::categorical_fields(cfg.include_accounts);

    let schema = store.load_schema()?;
    let scaler = store.load_scaler()?;

    let cat = encoder::transform(&table, &fields, &schema);
    let scaled = scaler.transform(&numeric)?;
    let features = pipeline::concat_features(&scaled, &cat);

    let (x, y) = window::build(&features, &labels, cfg.window_size)?;
    let (_, w, k) = x.dim();

    let mut model = WindowClassifier::new(w * k);
    let blob = store.load_weights_required()?;
    model
        .import_weights(&blob)
        .map_err(|e| FedsimError::MissingArtifact {
            kind: "model weights",
            path: cfg.weights_path.clone(),
            detail: e.to_string(),
        })?;

    Ok((model.predict(&x), y, model.kind()))
}

// ---------------------------------------------------------------------------
// Tabular client (least-squares regressor)
// ---------------------------------------------------------------------------

/// Runs one round of the tabular client. The primary metric is MSE,
/// reported under the shared `accuracy` key.
pub fn run_tabular_round(cfg: &ClientConfig, mode: RoundMode) -> Result<RoundSummary, FedsimError> {
    let store = RoundStateStore::from_config(cfg);
    let round = store.round_number();
    log::info!("Tabular client round {} ({:?})", round, mode);

    let (x, y) = tabular_inputs(cfg)?;

    let mut model = LeastSquares::new();
    match mode {
        RoundMode::Train => {
            if let Some(blob) = store.load_warm_start() {
                match model.import_weights(&blob) {
                    Ok(()) => log::info!(
                        "Warm start parameters loaded: w={}, c={}",
                        model.slope(),
                        model.intercept()
                    ),
                    Err(e) => log::warn!("Warm start rejected: {}; fitting from scratch", e),
                }
            }
            model.fit(&x, &y);
            store.save_weights(&model.export_weights())?;
        }
        RoundMode::Eval => {
            let blob = store.load_weights_required()?;
            model
                .import_weights(&blob)
                .map_err(|e| FedsimError::MissingArtifact {
                    kind: "model weights",
                    path: cfg.weights_path.clone(),
                    detail: e.to_string(),
                })?;
        }
    }

    let pred = model.predict(&x);
    let mse = metrics::mse(&pred, &y);
    log::info!("Round {} MSE: {}", round, mse);

    let record = MetricsRecord {
        round,
        accuracy: mse,
        auc: None,
        model_kind: model.kind().to_string(),
    };
    finalize(cfg, record, false)
}

fn tabular_inputs(cfg: &ClientConfig) -> Result<(Array2<f64>, Array1<f64>), FedsimError> {
    let table = Table::from_path(&cfg.data_path)?;
    table.require_column(TABULAR_FEATURE_COLUMN)?;
    table.require_column(TABULAR_TARGET_COLUMN)?;
    if table.is_empty() {
        return Err(FedsimError::Parse("input table has no data rows".to_string()));
    }

    let xs = table.numeric_column(TABULAR_FEATURE_COLUMN);
    let mut x = Array2::zeros((xs.len(), 1));
    for (i, v) in xs.iter().enumerate() {
        x[[i, 0]] = *v;
    }
    let y = Array1::from_vec(table.numeric_column(TABULAR_TARGET_COLUMN));
    Ok((x, y))
}

// ---------------------------------------------------------------------------
// Shared tail: EVALUATE results already in hand, persist then report
// ---------------------------------------------------------------------------

fn finalize(
    cfg: &ClientConfig,
    record: MetricsRecord,
    with_auc: bool,
) -> Result<RoundSummary, FedsimError> {
    recorder::write_snapshot(&cfg.metrics_path, &record)?;
    recorder::append_history(&cfg.history_path, &record, with_auc)?;

    let report = reporter::post_metrics(&cfg.server_url, &cfg.client_id, &record);
    if !report.delivered {
        log::warn!(
            "Round {} report not delivered ({}); local snapshot and history remain durable",
            record.round,
            report.detail
        );
    }

    Ok(RoundSummary { record, report })
}
