// ============================================================
// Layer 5 — Classifier Fitting
// ============================================================
// Full-batch gradient descent with Adam on the burn ndarray
// backend. Every iteration sees the whole (already encoded)
// training matrix; the loop stops when the loss changes by less
// than `tol` or after `max_iter` iterations.
//
// Hitting the iteration cap is not an error: the parameters
// from the last step are kept and a warning is logged.
//
// Reference: Kingma & Ba (2015) Adam

use anyhow::{bail, Result};
use burn::{
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::TensorData,
};
use serde::{Deserialize, Serialize};

use crate::ml::classifier::ClassifierParams;
use crate::ml::model::{LogisticModel, LogisticModelConfig};

type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;

// ─── Fit Options ──────────────────────────────────────────────────────────────
/// Hyperparameters of the logistic fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitOptions {
    /// Iteration cap
    pub max_iter:      usize,
    /// Adam step size
    pub learning_rate: f64,
    /// Inverse regularisation strength; the penalty is ‖w‖² / (2·C·n)
    pub c:             f64,
    /// Stop when |loss_t - loss_t-1| < tol
    pub tol:           f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_iter:      1000,
            learning_rate: 0.05,
            c:             1.0,
            tol:           1e-6,
        }
    }
}

/// Outcome of a fit, reported alongside the parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitSummary {
    pub iterations: usize,
    pub converged:  bool,
    pub final_loss: f64,
}

// ─── Fitting ──────────────────────────────────────────────────────────────────

/// Fit a logistic regression on encoded `features` (one row per sample,
/// all rows the same width) and 0/1 `labels`.
pub fn fit_logistic(
    features: &[Vec<f64>],
    labels:   &[u8],
    opts:     &FitOptions,
) -> Result<(ClassifierParams, FitSummary)> {
    let n = features.len();
    if n == 0 {
        bail!("Cannot fit a classifier on zero samples");
    }
    if n != labels.len() {
        bail!("Got {} feature rows but {} labels", n, labels.len());
    }
    let d = features[0].len();
    if let Some(i) = features.iter().position(|row| row.len() != d) {
        bail!("Feature row {} has width {} but row 0 has width {}", i, features[i].len(), d);
    }
    if opts.c <= 0.0 {
        bail!("Regularisation strength C must be positive, got {}", opts.c);
    }

    let device = burn::backend::ndarray::NdArrayDevice::default();

    let flat: Vec<f32> = features
        .iter()
        .flat_map(|row| row.iter().map(|&v| v as f32))
        .collect();
    let targets: Vec<f32> = labels.iter().map(|&y| f32::from(y.min(1))).collect();

    let x = Tensor::<TrainBackend, 2>::from_data(TensorData::new(flat, [n, d]), &device);
    let y = Tensor::<TrainBackend, 1>::from_data(TensorData::new(targets, [n]), &device);

    let mut model: LogisticModel<TrainBackend> = LogisticModelConfig::new(d).init(&device);
    let mut optim = AdamConfig::new().init();
    let l2 = 1.0 / (opts.c * n as f64);

    tracing::info!(
        "Fitting logistic regression: {} samples, {} features, max_iter={}",
        n, d, opts.max_iter
    );

    let mut previous = f64::INFINITY;
    let mut summary = FitSummary { iterations: 0, converged: false, final_loss: f64::NAN };

    for iter in 1..=opts.max_iter {
        let loss = model.forward_loss(x.clone(), y.clone(), l2);
        let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();

        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &model);
        model = optim.step(opts.learning_rate, model, grads);

        summary.iterations = iter;
        summary.final_loss = loss_val;

        if iter % 100 == 0 {
            tracing::debug!("iter {:>5} | loss={:.6}", iter, loss_val);
        }
        if (previous - loss_val).abs() < opts.tol {
            summary.converged = true;
            break;
        }
        previous = loss_val;
    }

    if summary.converged {
        tracing::info!(
            "Converged after {} iterations (loss={:.6})",
            summary.iterations, summary.final_loss
        );
    } else {
        tracing::warn!(
            "Did not converge within {} iterations; keeping last parameters (loss={:.6})",
            opts.max_iter, summary.final_loss
        );
    }

    // drop the autodiff graph before reading the parameters
    let params = model.valid().to_params()?;
    Ok((params, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::classifier::accuracy;

    fn separable() -> (Vec<Vec<f64>>, Vec<u8>) {
        let features = vec![
            vec![-2.0, 1.0],
            vec![-1.5, 0.5],
            vec![-1.0, 1.5],
            vec![1.0, -1.0],
            vec![1.5, -0.5],
            vec![2.0, -1.5],
        ];
        (features, vec![0, 0, 0, 1, 1, 1])
    }

    #[test]
    fn test_fits_separable_data() {
        let (x, y) = separable();
        let (params, summary) = fit_logistic(&x, &y, &FitOptions::default()).unwrap();
        assert_eq!(params.width(), 2);
        assert!(summary.iterations > 0);
        assert!(summary.final_loss < std::f64::consts::LN_2);

        let probs = params.predict_proba_batch(&x).unwrap();
        assert_eq!(accuracy(&probs, &y), 1.0);
        assert!(params.weights[0] > 0.0);
    }

    #[test]
    fn test_iteration_cap_is_not_an_error() {
        let (x, y) = separable();
        let opts = FitOptions { max_iter: 3, tol: 0.0, ..FitOptions::default() };
        let (_, summary) = fit_logistic(&x, &y, &opts).unwrap();
        assert_eq!(summary.iterations, 3);
        assert!(!summary.converged);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let (x, y) = separable();
        let a = fit_logistic(&x, &y, &FitOptions::default()).unwrap();
        let b = fit_logistic(&x, &y, &FitOptions::default()).unwrap();
        assert_eq!(a.0, b.0);
    }

    #[test]
    fn test_rejects_bad_input() {
        let opts = FitOptions::default();
        assert!(fit_logistic(&[], &[], &opts).is_err());
        assert!(fit_logistic(&[vec![1.0]], &[1, 0], &opts).is_err());
        assert!(fit_logistic(&[vec![1.0], vec![1.0, 2.0]], &[1, 0], &opts).is_err());
        let bad_c = FitOptions { c: 0.0, ..FitOptions::default() };
        assert!(fit_logistic(&[vec![1.0]], &[1], &bad_c).is_err());
    }
}
