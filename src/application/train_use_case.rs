// ============================================================
// Layer 2 — TrainUseCase (Training Orchestrator)
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load the historical table      (Layer 4 - data)
//   Step 2: Clean / rename / impute        (Layer 4 - data)
//   Step 3: Optional hold-out split        (Layer 4 - data)
//   Step 4: Fit encoder + classifier       (Layer 5 - ml)
//   Step 5: Evaluate                       (Layer 5 - ml)
//   Step 6: Persist the model artifact     (Layer 6 - infra)
//   Step 7: Append run metrics             (Layer 6 - infra)
//
// A single batch run to completion; nothing is checkpointed.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::{
    loader::CsvLoader,
    preprocessor::{CleaningStats, Preprocessor},
    splitter::split_table,
};
use crate::domain::traits::TableSource;
use crate::infra::{
    artifact_store::{ArtifactStore, FileArtifactStore},
    metrics::{MetricsLogger, RunMetrics},
};
use crate::ml::{
    pipeline::{evaluate, fit_pipeline, Evaluation},
    trainer::{FitOptions, FitSummary},
};

pub const DEFAULT_DATA_PATH: &str = "data/WA_Fn-UseC_-Telco-Customer-Churn.csv";
pub const DEFAULT_MODEL_PATH: &str = "models/churn_pipeline.json";

// ─── Training Configuration ──────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_path:  String,
    pub model_path: String,
    /// Fraction of cleaned rows held out for evaluation (0 = fit on all)
    pub holdout:    f64,
    pub seed:       u64,
    pub fit:        FitOptions,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_path:  DEFAULT_DATA_PATH.to_string(),
            model_path: DEFAULT_MODEL_PATH.to_string(),
            holdout:    0.0,
            seed:       42,
            fit:        FitOptions::default(),
        }
    }
}

/// What a training run produced.
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub cleaning: CleaningStats,
    pub features: usize,
    pub fit:      FitSummary,
    pub train:    Evaluation,
    pub holdout:  Option<Evaluation>,
    pub location: String,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Run against the configured CSV file and artifact path.
    pub fn execute(&self) -> Result<TrainReport> {
        let source = CsvLoader::new(&self.config.data_path);
        let store = FileArtifactStore::new(&self.config.model_path);
        let report = self.execute_with(&source, &store)?;

        MetricsLogger::beside(&self.config.model_path)?.log(&run_metrics(&report))?;
        Ok(report)
    }

    /// Run against any table source and artifact store.
    pub fn execute_with(&self, source: &dyn TableSource, store: &dyn ArtifactStore) -> Result<TrainReport> {
        let cfg = &self.config;
        if !(0.0..1.0).contains(&cfg.holdout) {
            anyhow::bail!("Hold-out fraction must be in [0, 1), got {}", cfg.holdout);
        }

        // ── Step 1: Load the labelled history ────────────────────────────────
        let raw = source.load_table()?;

        // ── Step 2: Clean into a TrainingTable ───────────────────────────────
        let (table, cleaning) = Preprocessor::new().clean(raw)?;

        // ── Step 3: Hold-out split (reporting only) ──────────────────────────
        let (train, holdout) = split_table(table, cfg.holdout, cfg.seed);
        tracing::info!("Fitting on {} rows, holding out {}", train.len(), holdout.len());

        // ── Step 4: Fit encoder + classifier together ────────────────────────
        let fitted = fit_pipeline(&train, &cfg.fit)?;
        let features = fitted.artifact.encoder().width();

        // ── Step 5: Evaluate ─────────────────────────────────────────────────
        let train_eval = evaluate(&fitted.artifact, &train)?;
        let holdout_eval = if holdout.is_empty() {
            None
        } else {
            Some(evaluate(&fitted.artifact, &holdout)?)
        };
        tracing::info!(
            "Train accuracy={:.4} log_loss={:.4}",
            train_eval.accuracy,
            train_eval.log_loss
        );
        if let Some(h) = &holdout_eval {
            tracing::info!("Hold-out accuracy={:.4} log_loss={:.4}", h.accuracy, h.log_loss);
        }

        // ── Step 6: Persist the artifact ─────────────────────────────────────
        store
            .save(&fitted.artifact)
            .with_context(|| format!("Cannot save model to '{}'", store.location()))?;

        Ok(TrainReport {
            cleaning,
            features,
            fit: fitted.summary,
            train: train_eval,
            holdout: holdout_eval,
            location: store.location(),
        })
    }
}

fn run_metrics(report: &TrainReport) -> RunMetrics {
    RunMetrics {
        rows_train:       report.train.rows,
        rows_holdout:     report.holdout.map(|h| h.rows).unwrap_or(0),
        features:         report.features,
        iterations:       report.fit.iterations,
        converged:        report.fit.converged,
        final_loss:       report.fit.final_loss,
        train_accuracy:   report.train.accuracy,
        train_log_loss:   report.train.log_loss,
        holdout_accuracy: report.holdout.map(|h| h.accuracy),
        holdout_log_loss: report.holdout.map(|h| h.log_loss),
    }
}
