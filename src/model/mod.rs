//! Model capability seam.
//!
//! Training internals are a collaborator capability: the round lifecycle
//! only needs `fit(X, y)` / `predict(X)` plus a way to exchange trainable
//! parameters as an opaque tensor list. The traits keep the round code
//! independent of which numeric backend actually fits the model.

pub mod linear;
pub mod logistic;

use ndarray::{Array1, Array2, Array3};

/// Opaque trainable-parameter blob: a JSON array of nested numeric arrays,
/// one entry per trainable tensor, in model parameter order. Only the model
/// that produced a blob interprets it; the state store round-trips it
/// verbatim.
pub type WeightBlob = serde_json::Value;

/// Failure to apply a warm-start blob (wrong structure or shape). Never
/// fatal on a fit round; the caller logs and keeps the fresh model.
#[derive(Debug, Clone)]
pub struct WeightError(pub String);

impl std::fmt::Display for WeightError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for WeightError {}

/// Capability over windowed sequences: input shape (samples, window, k),
/// probability output per sample.
pub trait SequenceModel {
    fn fit(&mut self, x: &Array3<f64>, y: &Array1<f64>);
    fn predict(&self, x: &Array3<f64>) -> Array1<f64>;
    fn export_weights(&self) -> WeightBlob;
    fn import_weights(&mut self, blob: &WeightBlob) -> Result<(), WeightError>;
    /// Model kind tag sent with remote reports.
    fn kind(&self) -> &'static str;
}

/// Capability over flat tabular rows.
pub trait TabularModel {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>);
    fn predict(&self, x: &Array2<f64>) -> Array1<f64>;
    fn export_weights(&self) -> WeightBlob;
    fn import_weights(&mut self, blob: &WeightBlob) -> Result<(), WeightError>;
    fn kind(&self) -> &'static str;
}

/// Decodes one tensor entry of a blob as a flat numeric vector.
pub(crate) fn tensor_as_vec(blob: &WeightBlob, index: usize) -> Result<Vec<f64>, WeightError> {
    let entry = blob
        .get(index)
        .ok_or_else(|| WeightError(format!("tensor {} missing from weight blob", index)))?;
    let arr = entry
        .as_array()
        .ok_or_else(|| WeightError(format!("tensor {} is not an array", index)))?;
    arr.iter()
        .map(|v| {
            v.as_f64()
                .ok_or_else(|| WeightError(format!("tensor {} holds a non-numeric value", index)))
        })
        .collect()
}
