// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// Every failure the core can report to a caller. The outer
// layers (application, CLI) wrap these in anyhow with context;
// the transport collaborator matches on the variants to pick a
// response (reject the request, ask for training, or fail hard).
//
// Numeric coercion failures at inference are NOT errors (they
// degrade to 0.0), and neither is a classifier fit that hits its
// iteration cap.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Canonical error type for the churn core.
#[derive(Debug, Error)]
pub enum ChurnError {
    /// The request does not carry exactly the recognised field set.
    #[error("schema error: {0}")]
    Schema(SchemaViolation),

    /// No artifact exists at the configured location.
    #[error(
        "model artifact not found at '{}'. Train it first with: churn-predictor train",
        path.display()
    )]
    ArtifactNotFound { path: PathBuf },

    /// The encoder output width and the classifier weight count disagree.
    #[error(
        "dimension mismatch: encoder produces {features} features \
         but the classifier has {weights} weights"
    )]
    DimensionMismatch { features: usize, weights: usize },

    /// The artifact exists but cannot be decoded into a consistent bundle.
    #[error("model artifact at '{}' is corrupt: {reason}", path.display())]
    ArtifactCorrupt { path: PathBuf, reason: String },

    /// Any other filesystem failure while reading or writing the artifact.
    #[error("cannot access model artifact at '{}': {source}", path.display())]
    ArtifactIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Nothing left to fit after cleaning.
    #[error("training table is empty after cleaning")]
    EmptyTrainingSet,
}

impl ChurnError {
    /// True when the caller sent a malformed request.
    pub fn is_schema(&self) -> bool {
        matches!(self, ChurnError::Schema(_))
    }
}

// ─── SchemaViolation ──────────────────────────────────────────────────────────
/// Details of a rejected record: which fields were absent, which were
/// not recognised, and which were present but not text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaViolation {
    pub missing:      Vec<String>,
    pub unexpected:   Vec<String>,
    pub non_string:   Vec<String>,
    /// Position of the offending record inside a batch, if any.
    pub record_index: Option<usize>,
}

impl SchemaViolation {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.unexpected.is_empty() && self.non_string.is_empty()
    }

    /// Tag the violation with the batch position it came from.
    pub fn at_index(mut self, index: usize) -> Self {
        self.record_index = Some(index);
        self
    }

    /// A payload that is not a field map at all.
    pub fn not_an_object() -> Self {
        Self {
            non_string: vec!["<record>".to_string()],
            ..Self::default()
        }
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if !self.missing.is_empty() {
            parts.push(format!("missing fields [{}]", self.missing.join(", ")));
        }
        if !self.unexpected.is_empty() {
            parts.push(format!("unrecognised fields [{}]", self.unexpected.join(", ")));
        }
        if !self.non_string.is_empty() {
            parts.push(format!("non-text values [{}]", self.non_string.join(", ")));
        }
        if let Some(i) = self.record_index {
            write!(f, "record {i}: ")?;
        }
        write!(f, "{}", parts.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_message_lists_fields() {
        let v = SchemaViolation {
            missing: vec!["tenure".into()],
            unexpected: vec!["customerID".into()],
            ..SchemaViolation::default()
        };
        let msg = ChurnError::Schema(v).to_string();
        assert!(msg.contains("missing fields [tenure]"));
        assert!(msg.contains("unrecognised fields [customerID]"));
    }

    #[test]
    fn test_not_found_mentions_training() {
        let e = ChurnError::ArtifactNotFound { path: PathBuf::from("models/x.json") };
        assert!(e.to_string().contains("churn-predictor train"));
        assert!(!e.is_schema());
    }
}
