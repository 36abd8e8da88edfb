// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Appends one row per training run to a CSV file next to the
// model artifact, so successive runs can be compared.
//
// Output file: <artifact dir>/metrics.csv
//
//   rows_train,rows_holdout,features,iterations,converged,final_loss,
//   train_accuracy,train_log_loss,holdout_accuracy,holdout_log_loss
//
// Hold-out columns are left empty when the run had no hold-out.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

const HEADER: &str = "rows_train,rows_holdout,features,iterations,converged,final_loss,\
train_accuracy,train_log_loss,holdout_accuracy,holdout_log_loss";

/// Summary of one training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    pub rows_train:       usize,
    pub rows_holdout:     usize,
    pub features:         usize,
    pub iterations:       usize,
    pub converged:        bool,
    pub final_loss:       f64,
    pub train_accuracy:   f64,
    pub train_log_loss:   f64,
    pub holdout_accuracy: Option<f64>,
    pub holdout_log_loss: Option<f64>,
}

impl RunMetrics {
    fn to_csv_row(&self) -> String {
        let opt = |v: Option<f64>| v.map(|x| format!("{x:.6}")).unwrap_or_default();
        format!(
            "{},{},{},{},{},{:.6},{:.6},{:.6},{},{}",
            self.rows_train,
            self.rows_holdout,
            self.features,
            self.iterations,
            self.converged,
            self.final_loss,
            self.train_accuracy,
            self.train_log_loss,
            opt(self.holdout_accuracy),
            opt(self.holdout_log_loss),
        )
    }
}

/// Appends [`RunMetrics`] rows to a CSV file.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Logger writing `metrics.csv` inside `dir`. Creates the directory
    /// and the header row if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create metrics directory '{}'", dir.display()))?;

        let csv_path = dir.join("metrics.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            writeln!(f, "{HEADER}")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Logger placed next to the artifact file at `artifact_path`.
    pub fn beside(artifact_path: impl AsRef<Path>) -> Result<Self> {
        let dir = artifact_path
            .as_ref()
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Self::new(dir)
    }

    pub fn log(&self, m: &RunMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;
        writeln!(f, "{}", m.to_csv_row())?;

        tracing::debug!(
            "Logged run metrics: iterations={}, train_accuracy={:.4}",
            m.iterations,
            m.train_accuracy
        );
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(holdout: Option<f64>) -> RunMetrics {
        RunMetrics {
            rows_train: 4,
            rows_holdout: 0,
            features: 22,
            iterations: 120,
            converged: true,
            final_loss: 0.25,
            train_accuracy: 1.0,
            train_log_loss: 0.2,
            holdout_accuracy: holdout,
            holdout_log_loss: holdout,
        }
    }

    #[test]
    fn test_header_written_once_and_rows_appended() {
        let dir = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path()).unwrap();
        logger.log(&metrics(None)).unwrap();
        let logger = MetricsLogger::new(dir.path()).unwrap();
        logger.log(&metrics(Some(0.75))).unwrap();

        let text = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("rows_train,"));
        assert!(lines[1].ends_with(",,"));
        assert!(lines[2].ends_with("0.750000,0.750000"));
    }

    #[test]
    fn test_beside_uses_artifact_directory() {
        let dir = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::beside(dir.path().join("models/churn.json")).unwrap();
        assert_eq!(logger.csv_path(), dir.path().join("models/metrics.csv"));
    }
}
