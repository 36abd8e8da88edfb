// ============================================================
// Layer 5 — ML / Model Layer
// ============================================================
// Everything that turns cleaned records into a churn
// probability. Burn is only touched by model.rs and trainer.rs;
// scoring works on plain f64 vectors.
//
//   encoder.rs    — one-hot + standard scaling, fitted once
//   classifier.rs — logistic parameters, sigmoid, metrics
//   model.rs      — burn Linear model and its loss
//   trainer.rs    — Adam fitting loop with iteration cap
//   artifact.rs   — encoder + classifier bundle
//   pipeline.rs   — fits encoder and classifier together

/// Indicator encoding and standardization
pub mod encoder;

/// Fitted logistic regression parameters
pub mod classifier;

/// Burn logistic model used while fitting
pub mod model;

/// Fitting loop
pub mod trainer;

/// Encoder + classifier bundle
pub mod artifact;

/// Joint encoder/classifier fit and evaluation
pub mod pipeline;

pub use artifact::ModelArtifact;
pub use classifier::ClassifierParams;
pub use encoder::FeatureEncoder;
pub use trainer::{FitOptions, FitSummary};
