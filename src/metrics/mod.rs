//! Evaluation metrics.
//!
//! One record per round. The primary metric travels under the `accuracy`
//! key for both clients - the regressor reports its MSE there, matching
//! the aggregator's wire contract - and the classifier adds ROC AUC as the
//! secondary metric when it is defined.

pub mod recorder;
pub mod reporter;

use ndarray::Array1;

/// One round's evaluation result.
#[derive(Debug, Clone)]
pub struct MetricsRecord {
    pub round: u64,
    /// Primary metric: classification accuracy, or MSE for the regressor.
    pub accuracy: f64,
    /// Secondary metric: ROC AUC, when both classes are present.
    pub auc: Option<f64>,
    /// Model kind tag, e.g. "SequenceClassifier".
    pub model_kind: String,
}

/// Fraction of samples whose thresholded probability matches the label.
pub fn accuracy(probs: &Array1<f64>, truth: &Array1<f64>) -> f64 {
    let n = probs.len().min(truth.len());
    if n == 0 {
        return 0.0;
    }
    let hits = (0..n)
        .filter(|&i| {
            let predicted = if probs[i] >= 0.5 { 1.0 } else { 0.0 };
            predicted == truth[i]
        })
        .count();
    hits as f64 / n as f64
}

/// Mean squared error.
pub fn mse(pred: &Array1<f64>, truth: &Array1<f64>) -> f64 {
    let n = pred.len().min(truth.len());
    if n == 0 {
        return 0.0;
    }
    (0..n).map(|i| (pred[i] - truth[i]).powi(2)).sum::<f64>() / n as f64
}

/// ROC AUC via the rank-sum (Mann-Whitney) formulation, with tied scores
/// assigned their average rank. `None` when only one class is present,
/// where the curve is undefined.
pub fn roc_auc(scores: &Array1<f64>, truth: &Array1<f64>) -> Option<f64> {
    let n = scores.len().min(truth.len());
    let n_pos = (0..n).filter(|&i| truth[i] > 0.5).count();
    let n_neg = n - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return None;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        scores[a].partial_cmp(&scores[b]).unwrap_or(std::cmp::Ordering::Equal)
    });

    // 1-based ranks, ties averaged
    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && scores[order[j + 1]] == scores[order[i]] {
            j += 1;
        }
        let avg_rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = avg_rank;
        }
        i = j + 1;
    }

    let rank_sum_pos: f64 = (0..n).filter(|&i| truth[i] > 0.5).map(|i| ranks[i]).sum();
    let u = rank_sum_pos - (n_pos * (n_pos + 1)) as f64 / 2.0;
    Some(u / (n_pos * n_neg) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_accuracy_thresholds_at_half() {
        let probs = array![0.9, 0.4, 0.5, 0.1];
        let truth = array![1.0, 0.0, 1.0, 1.0];
        // 0.9->1 hit, 0.4->0 hit, 0.5->1 hit, 0.1->0 miss
        assert_eq!(accuracy(&probs, &truth), 0.75);
    }

    #[test]
    fn test_mse() {
        let pred = array![1.0, 2.0, 3.0];
        let truth = array![1.0, 4.0, 3.0];
        assert!((mse(&pred, &truth) - 4.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_roc_auc_perfect_and_inverted() {
        let truth = array![0.0, 0.0, 1.0, 1.0];
        assert_eq!(roc_auc(&array![0.1, 0.2, 0.8, 0.9], &truth), Some(1.0));
        assert_eq!(roc_auc(&array![0.9, 0.8, 0.2, 0.1], &truth), Some(0.0));
    }

    #[test]
    fn test_roc_auc_ties_average() {
        // all scores equal: AUC is exactly chance
        let truth = array![0.0, 1.0, 0.0, 1.0];
        let scores = array![0.5, 0.5, 0.5, 0.5];
        assert_eq!(roc_auc(&scores, &truth), Some(0.5));
    }

    #[test]
    fn test_roc_auc_single_class_undefined() {
        assert_eq!(roc_auc(&array![0.1, 0.9], &array![1.0, 1.0]), None);
        assert_eq!(roc_auc(&array![0.1, 0.9], &array![0.0, 0.0]), None);
    }
}
