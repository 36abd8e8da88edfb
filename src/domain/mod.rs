// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types describing a customer, the schema gate in
// front of the model, the decision rule, and the error
// taxonomy. No tensors, no file I/O.

/// The core error taxonomy
pub mod error;

/// Raw and normalized customer records, field vocabulary
pub mod record;

/// Recognised-field validation for single records and batches
pub mod schema;

/// Probability → decision and whole-percent score
pub mod prediction;

/// Untyped input table and cleaned training table
pub mod table;

/// Seams to the table source and the scorer
pub mod traits;

pub use error::{ChurnError, SchemaViolation};
pub use prediction::Prediction;
pub use record::{NormalizedRecord, RawRecord};
pub use table::{RawTable, TrainingTable};
