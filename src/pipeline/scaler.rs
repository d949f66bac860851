//! Fit-once standardization for the numeric feature block.
//!
//! Fitted exactly once, on the training round; every later round reloads
//! the stored parameters verbatim and only applies them. Refitting on eval
//! data is a correctness violation, so there is no combined fit-transform
//! entry point for callers holding a persisted state.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::FedsimError;

/// Per-column mean / standard deviation, serialized as JSON and required to
/// round-trip exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl Scaler {
    /// Fits per-column mean and population standard deviation. Constant
    /// columns get scale 1.0 so they pass through centered at zero.
    pub fn fit(block: &Array2<f64>) -> Scaler {
        let rows = block.nrows().max(1) as f64;
        let cols = block.ncols();

        let mut mean = vec![0.0; cols];
        let mut scale = vec![0.0; cols];

        for j in 0..cols {
            let mut sum = 0.0;
            for i in 0..block.nrows() {
                sum += block[[i, j]];
            }
            mean[j] = sum / rows;

            let mut var = 0.0;
            for i in 0..block.nrows() {
                let d = block[[i, j]] - mean[j];
                var += d * d;
            }
            let sd = (var / rows).sqrt();
            scale[j] = if sd == 0.0 { 1.0 } else { sd };
        }

        Scaler { mean, scale }
    }

    /// Applies the stored parameters. The block width must match the width
    /// the scaler was fitted on.
    pub fn transform(&self, block: &Array2<f64>) -> Result<Array2<f64>, FedsimError> {
        if block.ncols() != self.mean.len() {
            return Err(FedsimError::Parse(format!(
                "scaler fitted on {} columns, got {}",
                self.mean.len(),
                block.ncols()
            )));
        }

        let mut out = block.clone();
        for j in 0..out.ncols() {
            for i in 0..out.nrows() {
                out[[i, j]] = (out[[i, j]] - self.mean[j]) / self.scale[j];
            }
        }
        Ok(out)
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }
}
