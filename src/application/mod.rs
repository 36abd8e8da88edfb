// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Workflow coordination only: no model math, no printing, no
// direct file formats.
//
//   train_use_case   — load → clean → fit → save (offline job)
//   predict_use_case — validate → encode → score (per request)

/// The offline training workflow
pub mod train_use_case;

/// The per-request inference workflow
pub mod predict_use_case;

pub use predict_use_case::{PredictConfig, PredictUseCase};
pub use train_use_case::{TrainConfig, TrainReport, TrainUseCase};
