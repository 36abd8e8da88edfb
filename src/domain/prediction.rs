// ============================================================
// Layer 3 — Prediction / Decision Rule
// ============================================================
// Turns a churn probability into the response the transport
// sends back:
//
//   churn       = probability >= 0.5   (0.5 itself is churn)
//   probability = whole percent, rounded half away from zero
//                 (0.554 → 55, 0.556 → 56, 0.005 → 1)

use std::fmt;

use serde::{Deserialize, Serialize};

/// Probabilities at or above this value are classified as churn.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Inference response body: `{ "churn": bool, "probability": 0..=100 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub churn:       bool,
    pub probability: u8,
}

impl Prediction {
    pub fn from_probability(probability: f64) -> Self {
        Self {
            churn:       is_churn(probability),
            probability: to_percent(probability),
        }
    }

    /// Human label for logs and the CLI.
    pub fn label(&self) -> &'static str {
        if self.churn {
            "churn"
        } else {
            "no churn"
        }
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}%)", self.label(), self.probability)
    }
}

pub fn is_churn(probability: f64) -> bool {
    probability >= DECISION_THRESHOLD
}

/// Probability → whole percent in 0..=100.
pub fn to_percent(probability: f64) -> u8 {
    (probability.clamp(0.0, 1.0) * 100.0).round() as u8
}
