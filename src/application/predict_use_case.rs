// ============================================================
// Layer 2 — PredictUseCase (Inference Service)
// ============================================================
// Scores one customer:
//
//   RawRecord
//     → schema check + numeric coercion (bad numbers → 0.0)
//     → cached artifact (loaded on first call, then shared)
//     → encoder.transform → classifier.predict_proba
//     → Prediction { churn: p >= 0.5, probability: round(p·100) }
//
// Apart from the one-time artifact load this is a pure function
// of the record. The use case is Send + Sync; wrap it in an Arc
// and call it from as many request handlers as needed.

use serde_json::Value;

use crate::domain::{
    error::ChurnError,
    prediction::Prediction,
    record::{NormalizedRecord, RawRecord},
    schema,
    traits::Scorer,
};
use crate::infra::{
    artifact_store::{ArtifactStore, FileArtifactStore},
    cache::ArtifactCache,
};

/// Where the inference service finds its artifact.
#[derive(Debug, Clone)]
pub struct PredictConfig {
    pub model_path: String,
}

pub struct PredictUseCase<S = FileArtifactStore> {
    cache: ArtifactCache<S>,
}

impl PredictUseCase<FileArtifactStore> {
    /// Service backed by the artifact file in `config`. Nothing is read yet.
    pub fn new(config: PredictConfig) -> Self {
        Self::with_store(FileArtifactStore::new(config.model_path))
    }
}

impl<S: ArtifactStore> PredictUseCase<S> {
    pub fn with_store(store: S) -> Self {
        Self { cache: ArtifactCache::new(store) }
    }

    /// Churn probability for one raw record.
    pub fn probability(&self, raw: &RawRecord) -> Result<f64, ChurnError> {
        let record = NormalizedRecord::from_raw(raw)?;
        let artifact = self.cache.get()?;
        artifact.score(&record)
    }

    /// Decision and whole-percent score for one raw record.
    pub fn predict(&self, raw: &RawRecord) -> Result<Prediction, ChurnError> {
        let p = self.probability(raw)?;
        let prediction = Prediction::from_probability(p);
        tracing::debug!("p={:.4} → {}", p, prediction);
        Ok(prediction)
    }

    /// Score a JSON request body (an object of 19 string fields).
    pub fn predict_json(&self, body: &Value) -> Result<Prediction, ChurnError> {
        let raw = schema::record_from_json(body)?;
        self.predict(&raw)
    }

    /// Load the artifact now instead of on the first request.
    pub fn warm_up(&self) -> Result<(), ChurnError> {
        self.cache.get().map(|_| ())
    }

    pub fn is_loaded(&self) -> bool {
        self.cache.is_loaded()
    }

    pub fn store(&self) -> &S {
        self.cache.store()
    }
}

impl<S: ArtifactStore> Scorer for PredictUseCase<S> {
    fn score(&self, record: &RawRecord) -> Result<Prediction, ChurnError> {
        self.predict(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};

    use crate::application::train_use_case::{TrainConfig, TrainUseCase};
    use crate::data::loader::read_table;
    use crate::data::preprocessor::tests::{customer_request, customers_csv, CUSTOMERS};
    use crate::domain::record::tests::sample_raw;
    use crate::domain::table::RawTable;
    use crate::domain::traits::TableSource;
    use crate::infra::cache::tests::{small_artifact, CountingStore};

    struct InlineSource(String);

    impl TableSource for InlineSource {
        fn load_table(&self) -> anyhow::Result<RawTable> {
            read_table(self.0.as_bytes())
        }
    }

    fn request(senior: &str, tenure: &str, internet: &str, contract: &str, monthly: &str, total: &str) -> RawRecord {
        let mut raw = sample_raw();
        raw.insert("seniorCitizen", senior);
        raw.insert("tenure", tenure);
        raw.insert("internetService", internet);
        raw.insert("contract", contract);
        raw.insert("monthlyCharges", monthly);
        raw.insert("totalCharges", total);
        raw
    }

    fn trained_store(dir: &std::path::Path) -> FileArtifactStore {
        let csv = customers_csv();
        let store = FileArtifactStore::new(dir.join("models/churn_pipeline.json"));
        TrainUseCase::new(TrainConfig::default())
            .execute_with(&InlineSource(csv), &store)
            .unwrap();
        store
    }

    #[test]
    fn test_trained_model_scores_training_rows_correctly() {
        let dir = tempfile::tempdir().unwrap();
        let service = PredictUseCase::with_store(trained_store(dir.path()));

        for (values, churn) in &CUSTOMERS {
            let raw = customer_request(values);
            let p = service.probability(&raw).unwrap();
            if *churn == "Yes" {
                assert!(p > 0.5, "{values:?} scored {p}");
            } else {
                assert!(p < 0.5, "{values:?} scored {p}");
            }
            assert_eq!(service.predict(&raw).unwrap().churn, *churn == "Yes");
        }
    }

    #[test]
    fn test_missing_field_is_schema_error() {
        let dir = tempfile::tempdir().unwrap();
        let service = PredictUseCase::with_store(trained_store(dir.path()));
        let mut raw = sample_raw();
        raw.remove("paymentMethod");
        assert!(matches!(service.predict(&raw), Err(ChurnError::Schema(_))));
    }

    #[test]
    fn test_unseen_values_and_bad_numbers_still_score() {
        let dir = tempfile::tempdir().unwrap();
        let service = PredictUseCase::with_store(trained_store(dir.path()));
        let raw = request("maybe", "n/a", "Satellite", "Ten year", "", "lots");
        let p = service.predict(&raw).unwrap();
        assert!(p.probability <= 100);
    }

    #[test]
    fn test_no_artifact_is_not_found_and_nothing_cached() {
        let dir = tempfile::tempdir().unwrap();
        let service = PredictUseCase::new(PredictConfig {
            model_path: dir.path().join("missing.json").display().to_string(),
        });
        assert!(matches!(
            service.predict(&sample_raw()),
            Err(ChurnError::ArtifactNotFound { .. })
        ));
        assert!(!service.is_loaded());
    }

    #[test]
    fn test_json_body() {
        let dir = tempfile::tempdir().unwrap();
        let service = PredictUseCase::with_store(trained_store(dir.path()));
        let body = serde_json::to_value(sample_raw()).unwrap();
        let p = service.predict_json(&body).unwrap();
        let out = serde_json::to_value(p).unwrap();
        assert!(out["churn"].is_boolean());
        assert!(out["probability"].is_u64());
    }

    #[test]
    fn test_concurrent_first_requests_read_once() {
        const N: usize = 12;
        let service = Arc::new(PredictUseCase::with_store(CountingStore::new(Some(small_artifact()))));
        let barrier = Arc::new(Barrier::new(N));

        let handles: Vec<_> = (0..N)
            .map(|_| {
                let service = Arc::clone(&service);
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    service.predict(&sample_raw())
                })
            })
            .collect();

        for h in handles {
            // all-zero weights: every request scores exactly 0.5
            let p = h.join().unwrap().unwrap();
            assert_eq!(p, Prediction { churn: true, probability: 50 });
        }
        assert_eq!(service.store().reads(), 1);
    }
}
