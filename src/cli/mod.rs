// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap and delegates everything else to Layer 2.
//
//   1. `train`   — fits the pipeline and writes the artifact
//   2. `predict` — scores JSON records against the artifact
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use std::io::Read;

use crate::application::{
    predict_use_case::PredictUseCase,
    train_use_case::{TrainReport, TrainUseCase},
};
use crate::domain::error::ChurnError;
use commands::{Commands, PredictArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "churn-predictor",
    version,
    about = "Train a customer churn model on the Telco dataset, then score customers."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Route to the matching use case; the CLI never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)   => run_train(args),
            Commands::Predict(args) => run_predict(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    tracing::info!("Training on: {}", args.data_path);
    let report = TrainUseCase::new(args.into()).execute()?;
    print_report(&report);
    Ok(())
}

fn print_report(r: &TrainReport) {
    println!("Training complete. Model saved to {}", r.location);
    println!(
        "  rows: {} in, {} kept ({} imputed totalCharges)",
        r.cleaning.rows_in, r.cleaning.rows_out, r.cleaning.imputed_total_charges
    );
    println!(
        "  features: {}  iterations: {}  converged: {}",
        r.features, r.fit.iterations, r.fit.converged
    );
    println!("  train   accuracy={:.4} log_loss={:.4}", r.train.accuracy, r.train.log_loss);
    if let Some(h) = &r.holdout {
        println!("  holdout accuracy={:.4} log_loss={:.4}", h.accuracy, h.log_loss);
    }
}

fn run_predict(args: PredictArgs) -> Result<()> {
    let service = PredictUseCase::new((&args).into());
    let body = read_body(&args)?;

    let out = match &body {
        Value::Array(items) => {
            let mut results = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let p = service.predict_json(item).map_err(|e| match e {
                    ChurnError::Schema(v) => ChurnError::Schema(v.at_index(i)),
                    other => other,
                })?;
                results.push(p);
            }
            serde_json::to_string_pretty(&results)?
        }
        single => serde_json::to_string_pretty(&service.predict_json(single)?)?,
    };

    println!("{out}");
    Ok(())
}

fn read_body(args: &PredictArgs) -> Result<Value> {
    let text = match (&args.record, &args.input) {
        (Some(inline), _) => inline.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?,
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Cannot read record from stdin")?;
            buf
        }
    };
    serde_json::from_str(&text).context("Request body is not valid JSON")
}
