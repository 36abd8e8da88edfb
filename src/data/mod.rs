// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// From the historical CSV export to a cleaned TrainingTable:
//
//   churn.csv
//       │
//       ▼
//   CsvLoader     → RawTable of text cells
//       │
//       ▼
//   Preprocessor  → rename, filter, impute, map labels
//       │
//       ▼
//   splitter      → optional seeded hold-out
//       │
//       ▼
//   TrainingTable → handed to ml::pipeline
//
// Reference: csv crate documentation, rand crate documentation

/// Reads the CSV export into a RawTable
pub mod loader;

/// Cleans a RawTable into a labelled TrainingTable
pub mod preprocessor;

/// Seeded train/hold-out split
pub mod splitter;
