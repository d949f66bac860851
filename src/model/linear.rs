//! Tabular least-squares regressor capability.
//!
//! One-feature ordinary least squares: slope `w`, intercept `c`, fitted in
//! closed form. Warm-start parameters load into the model but the next fit
//! overwrites them; the closed-form solution does not iterate from them.

use ndarray::{Array1, Array2};
use serde_json::json;

use super::{tensor_as_vec, TabularModel, WeightBlob, WeightError};

/// `y = w * x + c` over the first input column.
#[derive(Debug, Clone, Default)]
pub struct LeastSquares {
    w: f64,
    c: f64,
}

impl LeastSquares {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slope(&self) -> f64 {
        self.w
    }

    pub fn intercept(&self) -> f64 {
        self.c
    }
}

impl TabularModel for LeastSquares {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) {
        let n = x.nrows().min(y.len());
        if n == 0 {
            return;
        }

        let mean_x = (0..n).map(|i| x[[i, 0]]).sum::<f64>() / n as f64;
        let mean_y = (0..n).map(|i| y[i]).sum::<f64>() / n as f64;

        let mut cov = 0.0;
        let mut var = 0.0;
        for i in 0..n {
            let dx = x[[i, 0]] - mean_x;
            cov += dx * (y[i] - mean_y);
            var += dx * dx;
        }

        // Degenerate input (all x equal) fits the constant predictor
        self.w = if var == 0.0 { 0.0 } else { cov / var };
        self.c = mean_y - self.w * mean_x;
    }

    fn predict(&self, x: &Array2<f64>) -> Array1<f64> {
        let n = x.nrows();
        let mut out = Array1::zeros(n);
        for i in 0..n {
            out[i] = self.w * x[[i, 0]] + self.c;
        }
        out
    }

    fn export_weights(&self) -> WeightBlob {
        json!([[self.w], [self.c]])
    }

    fn import_weights(&mut self, blob: &WeightBlob) -> Result<(), WeightError> {
        let w = tensor_as_vec(blob, 0)?;
        let c = tensor_as_vec(blob, 1)?;
        if w.len() != 1 || c.len() != 1 {
            return Err(WeightError(format!(
                "expected [[w], [c]] tensors, got lengths {} and {}",
                w.len(),
                c.len()
            )));
        }
        self.w = w[0];
        self.c = c[0];
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "LinearRegression"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_fit_exact_line() {
        let x = array![[0.0], [1.0], [2.0], [3.0]];
        let y = array![1.0, 3.0, 5.0, 7.0];

        let mut model = LeastSquares::new();
        model.fit(&x, &y);

        assert!((model.slope() - 2.0).abs() < 1e-12);
        assert!((model.intercept() - 1.0).abs() < 1e-12);

        let pred = model.predict(&array![[10.0]]);
        assert!((pred[0] - 21.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_input_fits_constant() {
        let x = array![[5.0], [5.0], [5.0]];
        let y = array![1.0, 2.0, 3.0];

        let mut model = LeastSquares::new();
        model.fit(&x, &y);

        assert_eq!(model.slope(), 0.0);
        assert_eq!(model.intercept(), 2.0);
    }

    #[test]
    fn test_weight_round_trip() {
        let mut model = LeastSquares::new();
        model.fit(&array![[0.0], [2.0]], &array![1.0, 5.0]);

        let blob = model.export_weights();
        assert_eq!(blob, serde_json::json!([[2.0], [1.0]]));

        let mut restored = LeastSquares::new();
        restored.import_weights(&blob).unwrap();
        assert_eq!(restored.slope(), model.slope());
        assert_eq!(restored.intercept(), model.intercept());
    }

    #[test]
    fn test_import_rejects_wrong_structure() {
        let mut model = LeastSquares::new();
        assert!(model.import_weights(&serde_json::json!([[1.0, 2.0], [0.5]])).is_err());
        assert!(model.import_weights(&serde_json::json!({"w": 1.0})).is_err());
    }
}
