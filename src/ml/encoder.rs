// ============================================================
// Layer 5 — Feature Encoder
// ============================================================
// Turns a NormalizedRecord into the fixed-width numeric vector
// the classifier consumes:
//
//   [ gender=Female, gender=Male, seniorCitizen=No, ... ,   ← indicator blocks
//     tenure, monthlyCharges, totalCharges ]                ← standardized
//
// fit()       — learns the category vocabulary of every
//               categorical field and (mean, std) of every
//               numeric field from the training table
// transform() — applies that frozen state to any record
//
// The column layout is decided once, at fit time, and is
// serialized inside the model artifact. Inference never
// recomputes it, so training and serving see identical columns.
//
//   unseen category → all-zero block
//   std == 0        → standardized value 0.0

use serde::{Deserialize, Serialize};

use crate::domain::error::ChurnError;
use crate::domain::record::{NormalizedRecord, CATEGORICAL_FIELDS, NUMERIC_FIELDS};
use crate::domain::table::TrainingTable;

/// Fitted vocabulary of one categorical field. `categories` is sorted
/// and its order is the indicator column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalBlock {
    pub field:      String,
    pub categories: Vec<String>,
}

impl CategoricalBlock {
    fn position(&self, value: &str) -> Option<usize> {
        self.categories.binary_search_by(|c| c.as_str().cmp(value)).ok()
    }
}

/// Fitted statistics of one numeric field (population std).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericScale {
    pub field: String,
    pub mean:  f64,
    pub std:   f64,
}

impl NumericScale {
    pub fn standardize(&self, value: f64) -> f64 {
        if self.std == 0.0 {
            0.0
        } else {
            (value - self.mean) / self.std
        }
    }
}

/// One-hot + standard-scaling encoder with frozen fit-time state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureEncoder {
    categorical: Vec<CategoricalBlock>,
    numeric:     Vec<NumericScale>,
}

impl FeatureEncoder {
    /// Learn the encoding from a cleaned training table.
    pub fn fit(table: &TrainingTable) -> Result<Self, ChurnError> {
        Self::fit_records(table.records())
    }

    /// Learn the encoding from bare records. Replaces nothing: a refit
    /// produces a brand-new encoder.
    pub fn fit_records(records: &[NormalizedRecord]) -> Result<Self, ChurnError> {
        if records.is_empty() {
            return Err(ChurnError::EmptyTrainingSet);
        }

        let categorical = CATEGORICAL_FIELDS
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let mut categories: Vec<String> =
                    records.iter().map(|r| r.categorical(i).to_string()).collect();
                categories.sort();
                categories.dedup();
                CategoricalBlock { field: field.to_string(), categories }
            })
            .collect();

        let n = records.len() as f64;
        let numeric = NUMERIC_FIELDS
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let mean = records.iter().map(|r| r.numeric(i)).sum::<f64>() / n;
                let var = records
                    .iter()
                    .map(|r| (r.numeric(i) - mean).powi(2))
                    .sum::<f64>()
                    / n;
                NumericScale { field: field.to_string(), mean, std: var.sqrt() }
            })
            .collect();

        let encoder = Self { categorical, numeric };
        tracing::debug!("Fitted encoder: {} output columns", encoder.width());
        Ok(encoder)
    }

    /// Number of output columns.
    pub fn width(&self) -> usize {
        self.categorical.iter().map(|b| b.categories.len()).sum::<usize>() + self.numeric.len()
    }

    pub fn categorical_blocks(&self) -> &[CategoricalBlock] {
        &self.categorical
    }

    pub fn numeric_scales(&self) -> &[NumericScale] {
        &self.numeric
    }

    /// Column names in output order: `field=value` for indicators,
    /// bare field name for numerics.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.width());
        for block in &self.categorical {
            for c in &block.categories {
                names.push(format!("{}={}", block.field, c));
            }
        }
        names.extend(self.numeric.iter().map(|s| s.field.clone()));
        names
    }

    /// Encode one record.
    pub fn transform(&self, record: &NormalizedRecord) -> Vec<f64> {
        let mut out = vec![0.0; self.width()];
        let mut offset = 0;

        for (i, block) in self.categorical.iter().enumerate() {
            if let Some(pos) = block.position(record.categorical(i)) {
                out[offset + pos] = 1.0;
            }
            offset += block.categories.len();
        }
        for (i, scale) in self.numeric.iter().enumerate() {
            out[offset + i] = scale.standardize(record.numeric(i));
        }
        out
    }

    /// Encode many records.
    pub fn transform_batch(&self, records: &[NormalizedRecord]) -> Vec<Vec<f64>> {
        records.iter().map(|r| self.transform(r)).collect()
    }

    /// Check that a deserialized encoder still matches the record layout:
    /// one block per categorical field in order, sorted unique categories,
    /// one finite scale per numeric field.
    pub fn check_layout(&self) -> Result<(), String> {
        let block_fields: Vec<&str> = self.categorical.iter().map(|b| b.field.as_str()).collect();
        if block_fields != CATEGORICAL_FIELDS {
            return Err(format!("categorical blocks {block_fields:?} do not match the record fields"));
        }
        let scale_fields: Vec<&str> = self.numeric.iter().map(|s| s.field.as_str()).collect();
        if scale_fields != NUMERIC_FIELDS {
            return Err(format!("numeric scales {scale_fields:?} do not match the record fields"));
        }
        for block in &self.categorical {
            if block.categories.windows(2).any(|w| w[0] >= w[1]) {
                return Err(format!("categories of '{}' are not sorted and unique", block.field));
            }
        }
        for scale in &self.numeric {
            if !scale.mean.is_finite() || !scale.std.is_finite() || scale.std < 0.0 {
                return Err(format!("invalid statistics for '{}'", scale.field));
            }
        }
        Ok(())
    }
}
