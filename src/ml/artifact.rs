// ============================================================
// Layer 5 — Model Artifact
// ============================================================
// The unit of persistence: fitted encoder + classifier
// parameters, always together. A ModelArtifact can only be
// constructed (or deserialized through `validate`) when the
// encoder width equals the classifier weight count.

use serde::{Deserialize, Serialize};

use crate::domain::error::ChurnError;
use crate::domain::record::NormalizedRecord;
use crate::ml::classifier::ClassifierParams;
use crate::ml::encoder::FeatureEncoder;

/// Bumped whenever the serialized layout changes.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    format_version: u32,
    encoder:        FeatureEncoder,
    classifier:     ClassifierParams,
}

/// Why a deserialized artifact was refused.
#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactDefect {
    Version(u32),
    Layout(String),
    Width { features: usize, weights: usize },
}

impl ModelArtifact {
    /// Pair a fitted encoder with classifier parameters of matching width.
    pub fn new(encoder: FeatureEncoder, classifier: ClassifierParams) -> Result<Self, ChurnError> {
        if encoder.width() != classifier.width() {
            return Err(ChurnError::DimensionMismatch {
                features: encoder.width(),
                weights:  classifier.width(),
            });
        }
        Ok(Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            encoder,
            classifier,
        })
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    pub fn classifier(&self) -> &ClassifierParams {
        &self.classifier
    }

    pub fn format_version(&self) -> u32 {
        self.format_version
    }

    /// Consistency check for artifacts read back from storage.
    pub fn validate(&self) -> Result<(), ArtifactDefect> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ArtifactDefect::Version(self.format_version));
        }
        self.encoder.check_layout().map_err(ArtifactDefect::Layout)?;
        if self.encoder.width() != self.classifier.width() {
            return Err(ArtifactDefect::Width {
                features: self.encoder.width(),
                weights:  self.classifier.width(),
            });
        }
        Ok(())
    }

    /// Encode a record with the frozen encoder.
    pub fn encode(&self, record: &NormalizedRecord) -> Vec<f64> {
        self.encoder.transform(record)
    }

    /// Churn probability for one record.
    pub fn score(&self, record: &NormalizedRecord) -> Result<f64, ChurnError> {
        let features = self.encode(record);
        self.classifier.predict_proba(&features)
    }
}
