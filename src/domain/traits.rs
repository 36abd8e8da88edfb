// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams between the core and its collaborators:
//
//   TableSource — whatever hands the orchestrator a raw table
//                 (CsvLoader today)
//   Scorer      — whatever turns one request into a Prediction
//                 (PredictUseCase today)
//
// Artifact persistence has its own seam, `ArtifactStore`, next
// to the artifact type in the infra layer.

use anyhow::Result;

use crate::domain::error::ChurnError;
use crate::domain::prediction::Prediction;
use crate::domain::record::RawRecord;
use crate::domain::table::RawTable;

// ─── TableSource ──────────────────────────────────────────────────────────────
/// Any component that can produce the labelled historical table.
pub trait TableSource {
    fn load_table(&self) -> Result<RawTable>;
}

// ─── Scorer ───────────────────────────────────────────────────────────────────
/// Any component that can score a single customer.
pub trait Scorer {
    fn score(&self, record: &RawRecord) -> Result<Prediction, ChurnError>;
}
