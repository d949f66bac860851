//! Windowed sequence classifier capability.
//!
//! Logistic regression over flattened windows, trained with plain batch
//! gradient descent. A heavier sequence network can replace it behind the
//! same fit/predict seam; the round lifecycle neither knows nor cares
//! which backend fits the probabilities.

use ndarray::{Array1, Array2, Array3};
use rand::Rng;
use serde_json::json;

use super::{tensor_as_vec, SequenceModel, WeightBlob, WeightError};

const DEFAULT_LEARNING_RATE: f64 = 0.05;
const DEFAULT_EPOCHS: usize = 200;

/// Probability classifier over `(samples, window, k)` batches.
#[derive(Debug, Clone)]
pub struct WindowClassifier {
    weights: Vec<f64>,
    bias: f64,
    learning_rate: f64,
    epochs: usize,
}

impl WindowClassifier {
    /// Freshly initialized model for a given flattened input length
    /// (`window * feature count`). Weights start small and random.
    pub fn new(input_len: usize) -> Self {
        let mut rng = rand::thread_rng();
        let weights = (0..input_len).map(|_| rng.gen::<f64>() * 0.02 - 0.01).collect();
        Self {
            weights,
            bias: 0.0,
            learning_rate: DEFAULT_LEARNING_RATE,
            epochs: DEFAULT_EPOCHS,
        }
    }

    pub fn input_len(&self) -> usize {
        self.weights.len()
    }

    /// Flattens a windowed batch row-major: window position major, feature
    /// minor. Layout must match between fit and predict, and it does - both
    /// go through here.
    fn flatten(x: &Array3<f64>) -> Array2<f64> {
        let (n, w, k) = x.dim();
        let mut flat = Array2::zeros((n, w * k));
        for i in 0..n {
            for j in 0..w {
                for l in 0..k {
                    flat[[i, j * k + l]] = x[[i, j, l]];
                }
            }
        }
        flat
    }

    fn sigmoid(z: f64) -> f64 {
        1.0 / (1.0 + (-z).exp())
    }

    fn forward(&self, flat: &Array2<f64>) -> Array1<f64> {
        let n = flat.nrows();
        let mut out = Array1::zeros(n);
        for i in 0..n {
            let mut z = self.bias;
            for (j, w) in self.weights.iter().enumerate() {
                z += w * flat[[i, j]];
            }
            out[i] = Self::sigmoid(z);
        }
        out
    }
}

impl SequenceModel for WindowClassifier {
    fn fit(&mut self, x: &Array3<f64>, y: &Array1<f64>) {
        let flat = Self::flatten(x);
        let n = flat.nrows();
        if n == 0 {
            return;
        }

        for _ in 0..self.epochs {
            let probs = self.forward(&flat);

            let mut grad_w = vec![0.0; self.weights.len()];
            let mut grad_b = 0.0;
            for i in 0..n {
                let err = probs[i] - y[i];
                grad_b += err;
                for j in 0..self.weights.len() {
                    grad_w[j] += err * flat[[i, j]];
                }
            }

            let step = self.learning_rate / n as f64;
            for j in 0..self.weights.len() {
                self.weights[j] -= step * grad_w[j];
            }
            self.bias -= step * grad_b;
        }
    }

    fn predict(&self, x: &Array3<f64>) -> Array1<f64> {
        self.forward(&Self::flatten(x))
    }

    fn export_weights(&self) -> WeightBlob {
        json!([self.weights, [self.bias]])
    }

    fn import_weights(&mut self, blob: &WeightBlob) -> Result<(), WeightError> {
        let weights = tensor_as_vec(blob, 0)?;
        let bias = tensor_as_vec(blob, 1)?;

        if weights.len() != self.weights.len() {
            return Err(WeightError(format!(
                "weight tensor length {} does not match model input length {}",
                weights.len(),
                self.weights.len()
            )));
        }
        if bias.len() != 1 {
            return Err(WeightError(format!(
                "bias tensor has {} entries, expected 1",
                bias.len()
            )));
        }

        self.weights = weights;
        self.bias = bias[0];
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "SequenceClassifier"
    }
}
