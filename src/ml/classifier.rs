// ============================================================
// Layer 5 — Classifier Parameters
// ============================================================
// The fitted logistic model as plain numbers:
//
//   p(churn) = sigmoid(w · x + b),  sigmoid(z) = 1 / (1 + e^-z)
//
// Scoring needs no tensor runtime; the burn model in model.rs
// is only used while fitting and is converted into these
// parameters afterwards.

use serde::{Deserialize, Serialize};

use crate::domain::error::ChurnError;

/// Weight vector + bias of a binary logistic regression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierParams {
    pub weights: Vec<f64>,
    pub bias:    f64,
}

impl ClassifierParams {
    pub fn new(weights: Vec<f64>, bias: f64) -> Self {
        Self { weights, bias }
    }

    /// Number of features this model expects.
    pub fn width(&self) -> usize {
        self.weights.len()
    }

    /// Raw score `w · x + b`.
    pub fn decision_function(&self, features: &[f64]) -> Result<f64, ChurnError> {
        if features.len() != self.weights.len() {
            return Err(ChurnError::DimensionMismatch {
                features: features.len(),
                weights:  self.weights.len(),
            });
        }
        let dot: f64 = self.weights.iter().zip(features).map(|(w, x)| w * x).sum();
        Ok(dot + self.bias)
    }

    /// Churn probability for one encoded record.
    pub fn predict_proba(&self, features: &[f64]) -> Result<f64, ChurnError> {
        self.decision_function(features).map(sigmoid)
    }

    /// Churn probabilities for many encoded records.
    pub fn predict_proba_batch(&self, features: &[Vec<f64>]) -> Result<Vec<f64>, ChurnError> {
        features.iter().map(|x| self.predict_proba(x)).collect()
    }
}

/// Logistic function, written to avoid overflow of `exp` for large |z|.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

// ─── Evaluation Helpers ───────────────────────────────────────────────────────

/// Fraction of rows where `p >= 0.5` agrees with the label.
pub fn accuracy(probabilities: &[f64], labels: &[u8]) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }
    let correct = probabilities
        .iter()
        .zip(labels)
        .filter(|(p, y)| crate::domain::prediction::is_churn(**p) == (**y == 1))
        .count();
    correct as f64 / labels.len() as f64
}

/// Mean binary cross-entropy, with probabilities clipped away from 0 and 1.
pub fn log_loss(probabilities: &[f64], labels: &[u8]) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }
    const EPS: f64 = 1e-15;
    let total: f64 = probabilities
        .iter()
        .zip(labels)
        .map(|(p, y)| {
            let p = p.clamp(EPS, 1.0 - EPS);
            if *y == 1 {
                -p.ln()
            } else {
                -(1.0 - p).ln()
            }
        })
        .sum();
    total / labels.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid_known_values() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!((sigmoid(2.0) - 0.880_797_077_977_882_3).abs() < 1e-12);
        assert!((sigmoid(-2.0) - 0.119_202_922_022_117_7).abs() < 1e-12);
        assert!(sigmoid(-1000.0) >= 0.0);
        assert!(sigmoid(1000.0) <= 1.0);
    }

    #[test]
    fn test_predict_proba() {
        let params = ClassifierParams::new(vec![1.0, -2.0], 0.5);
        let p = params.predict_proba(&[2.0, 1.0]).unwrap();
        assert!((p - sigmoid(0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_width_mismatch_is_an_error() {
        let params = ClassifierParams::new(vec![1.0, 2.0, 3.0], 0.0);
        match params.predict_proba(&[1.0, 2.0]) {
            Err(ChurnError::DimensionMismatch { features, weights }) => {
                assert_eq!((features, weights), (2, 3));
            }
            other => panic!("expected dimension mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_accuracy_and_log_loss() {
        let probs = [0.9, 0.2, 0.6, 0.4];
        let labels = [1, 0, 0, 1];
        assert_eq!(accuracy(&probs, &labels), 0.5);
        assert!(log_loss(&[1.0, 0.0], &[1, 0]) < 1e-12);
        assert!(log_loss(&probs, &labels) > 0.0);
    }
}
