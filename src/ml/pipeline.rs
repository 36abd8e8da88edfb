// ============================================================
// Layer 5 — Pipeline Fit
// ============================================================
// Fits the encoder and the classifier as one unit:
//
//   TrainingTable ─► FeatureEncoder::fit ─► transform_batch
//                                              │
//                                              ▼
//                                        fit_logistic
//                                              │
//                                              ▼
//                                        ModelArtifact
//
// The classifier is always trained on the output of the very
// encoder it is bundled with.

use anyhow::{Context, Result};

use crate::domain::error::ChurnError;
use crate::domain::table::TrainingTable;
use crate::ml::artifact::ModelArtifact;
use crate::ml::classifier::{accuracy, log_loss};
use crate::ml::encoder::FeatureEncoder;
use crate::ml::trainer::{fit_logistic, FitOptions, FitSummary};

/// Fitted artifact plus what happened while fitting it.
#[derive(Debug, Clone)]
pub struct FittedPipeline {
    pub artifact: ModelArtifact,
    pub summary:  FitSummary,
}

/// Accuracy and log-loss of an artifact on a labelled table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub rows:     usize,
    pub accuracy: f64,
    pub log_loss: f64,
}

pub fn fit_pipeline(table: &TrainingTable, opts: &FitOptions) -> Result<FittedPipeline> {
    if table.is_empty() {
        return Err(ChurnError::EmptyTrainingSet.into());
    }

    let encoder = FeatureEncoder::fit(table)?;
    let features = encoder.transform_batch(table.records());
    tracing::info!(
        "Encoded {} rows into {} features ({} churned)",
        table.len(),
        encoder.width(),
        table.positives()
    );

    let (params, summary) =
        fit_logistic(&features, table.labels(), opts).context("Classifier fit failed")?;
    let artifact = ModelArtifact::new(encoder, params)?;

    Ok(FittedPipeline { artifact, summary })
}

pub fn evaluate(artifact: &ModelArtifact, table: &TrainingTable) -> Result<Evaluation, ChurnError> {
    let probabilities = table
        .records()
        .iter()
        .map(|r| artifact.score(r))
        .collect::<Result<Vec<f64>, ChurnError>>()?;

    Ok(Evaluation {
        rows:     table.len(),
        accuracy: accuracy(&probabilities, table.labels()),
        log_loss: log_loss(&probabilities, table.labels()),
    })
}
