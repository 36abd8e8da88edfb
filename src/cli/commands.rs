// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `train` and `predict`, and all
// their configurable flags. Paths fall back to the DATA_PATH /
// MODEL_PATH environment variables, then to the defaults below.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::{
    predict_use_case::PredictConfig,
    train_use_case::{TrainConfig, DEFAULT_DATA_PATH, DEFAULT_MODEL_PATH},
};
use crate::ml::trainer::FitOptions;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fit the churn pipeline on the historical CSV and save the artifact
    Train(TrainArgs),

    /// Score one or more customer records with a saved artifact
    Predict(PredictArgs),
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Labelled customer history (Telco churn CSV layout)
    #[arg(long, env = "DATA_PATH", default_value = DEFAULT_DATA_PATH)]
    pub data_path: String,

    /// Where the fitted artifact is written
    #[arg(long, env = "MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    pub model_path: String,

    /// Fraction of rows held out for evaluation; 0 fits on everything
    #[arg(long, default_value_t = 0.0)]
    pub holdout: f64,

    /// Seed for the hold-out shuffle
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Optimizer iteration cap
    #[arg(long, default_value_t = 1000)]
    pub max_iter: usize,

    #[arg(long, default_value_t = 0.05)]
    pub learning_rate: f64,

    /// Inverse L2 regularization strength
    #[arg(long, default_value_t = 1.0)]
    pub c: f64,
}

impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_path:  a.data_path,
            model_path: a.model_path,
            holdout:    a.holdout,
            seed:       a.seed,
            fit: FitOptions {
                max_iter:      a.max_iter,
                learning_rate: a.learning_rate,
                c:             a.c,
                ..FitOptions::default()
            },
        }
    }
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Artifact produced by `train`
    #[arg(long, env = "MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    pub model_path: String,

    /// Inline JSON record, e.g. '{"gender":"Female",...}'
    #[arg(long, conflicts_with = "input")]
    pub record: Option<String>,

    /// File holding a JSON record or an array of records; stdin if omitted
    #[arg(long)]
    pub input: Option<PathBuf>,
}

impl From<&PredictArgs> for PredictConfig {
    fn from(a: &PredictArgs) -> Self {
        PredictConfig { model_path: a.model_path.clone() }
    }
}
