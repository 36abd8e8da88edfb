// ============================================================
// Layer 5 — Logistic Regression Model (Burn)
// ============================================================
// A single Linear(n_features → 1) layer trained with an
// L2-penalised binary cross-entropy:
//
//   loss = -mean( y·log σ(z) + (1-y)·log σ(-z) ) + (l2 / 2)·‖w‖²
//
// log σ(·) is used instead of log(σ(·)) so large logits do not
// produce log(0). The bias is not penalised. Weights start at
// zero, which makes fitting deterministic.

use anyhow::Result;
use burn::{
    nn::{Initializer, Linear, LinearConfig},
    prelude::*,
    tensor::activation::log_sigmoid,
};

use crate::ml::classifier::ClassifierParams;

#[derive(Config, Debug)]
pub struct LogisticModelConfig {
    pub n_features: usize,
}

impl LogisticModelConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> LogisticModel<B> {
        let linear = LinearConfig::new(self.n_features, 1)
            .with_bias(true)
            .with_initializer(Initializer::Zeros)
            .init(device);
        LogisticModel { linear }
    }
}

#[derive(Module, Debug)]
pub struct LogisticModel<B: Backend> {
    pub linear: Linear<B>,
}

impl<B: Backend> LogisticModel<B> {
    /// features: [n, n_features] → logits: [n]
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 1> {
        let [n, _] = features.dims();
        self.linear.forward(features).reshape([n])
    }

    /// Penalised mean cross-entropy for 0/1 `labels` of shape [n].
    pub fn forward_loss(&self, features: Tensor<B, 2>, labels: Tensor<B, 1>, l2: f64) -> Tensor<B, 1> {
        let logits = self.forward(features);

        let positive = log_sigmoid(logits.clone()) * labels.clone();
        let negative = log_sigmoid(logits.neg()) * labels.neg().add_scalar(1.0);
        let data_loss = (positive + negative).mean().neg();

        let penalty = self
            .linear
            .weight
            .val()
            .powf_scalar(2.0)
            .sum()
            .mul_scalar(0.5 * l2);

        data_loss + penalty
    }

    /// Copy the learned weights and bias out of the tensor runtime.
    pub fn to_params(&self) -> Result<ClassifierParams> {
        // weight is stored as [n_features, 1]
        let weights: Vec<f32> = self
            .linear
            .weight
            .val()
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow::anyhow!("Cannot read model weights: {e:?}"))?;

        let bias: f32 = match &self.linear.bias {
            Some(b) => b
                .val()
                .into_data()
                .to_vec::<f32>()
                .map_err(|e| anyhow::anyhow!("Cannot read model bias: {e:?}"))?
                .first()
                .copied()
                .unwrap_or(0.0),
            None => 0.0,
        };

        Ok(ClassifierParams::new(
            weights.into_iter().map(f64::from).collect(),
            f64::from(bias),
        ))
    }
}
