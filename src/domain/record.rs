// ============================================================
// Layer 3 — Customer Records
// ============================================================
// Two shapes of the same customer:
//
//   RawRecord        — field name → text, exactly as the caller
//                      sent it (all 19 values are strings)
//   NormalizedRecord — the three numeric fields parsed to f64,
//                      the other sixteen kept as category text
//
// A NormalizedRecord can only be built from a RawRecord that
// passed the schema check, or by the training cleaner which has
// its own (median-based) numeric policy. Once built it is never
// mutated.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::error::ChurnError;
use crate::domain::schema;

// ─── Field Vocabulary ─────────────────────────────────────────────────────────

/// Categorical fields in encoder column order.
pub const CATEGORICAL_FIELDS: [&str; 16] = [
    "gender",
    "seniorCitizen",
    "partner",
    "dependents",
    "phoneService",
    "multipleLines",
    "internetService",
    "onlineSecurity",
    "onlineBackup",
    "deviceProtection",
    "techSupport",
    "streamingTV",
    "streamingMovies",
    "contract",
    "paperlessBilling",
    "paymentMethod",
];

/// Numeric-as-text fields in encoder column order.
pub const NUMERIC_FIELDS: [&str; 3] = ["tenure", "monthlyCharges", "totalCharges"];

/// All 19 recognised request fields, in request order.
pub const FIELDS: [&str; 19] = [
    "gender",
    "seniorCitizen",
    "partner",
    "dependents",
    "tenure",
    "phoneService",
    "multipleLines",
    "internetService",
    "onlineSecurity",
    "onlineBackup",
    "deviceProtection",
    "techSupport",
    "streamingTV",
    "streamingMovies",
    "contract",
    "paperlessBilling",
    "paymentMethod",
    "monthlyCharges",
    "totalCharges",
];

pub const SENIOR_CITIZEN_FIELD: &str = "seniorCitizen";

/// True if `name` is one of the 19 recognised fields.
pub fn is_recognised(name: &str) -> bool {
    FIELDS.contains(&name)
}

// ─── Value Normalisation ──────────────────────────────────────────────────────

/// Parse a numeric-as-text value. Anything unparsable, empty or
/// non-finite becomes `None`; callers decide the fallback.
pub fn parse_numeric(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Inference-time numeric policy: invalid or missing → 0.0.
pub fn coerce_numeric(value: &str) -> f64 {
    parse_numeric(value).unwrap_or(0.0)
}

/// The historical data encodes the senior-citizen flag as 0/1 while the
/// other binary fields use No/Yes. Both training and inference map it
/// onto No/Yes so the two phases see the same category vocabulary.
pub fn normalize_senior_citizen(value: &str) -> String {
    match value.trim() {
        "0" => "No".to_string(),
        "1" => "Yes".to_string(),
        _ => value.to_string(),
    }
}

// ─── RawRecord ────────────────────────────────────────────────────────────────
/// A customer exactly as received: every value is text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    values: BTreeMap<String, String>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.values.insert(field.into(), value.into());
    }

    /// Remove a field and return its value.
    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.values.remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Field names present on this record, sorted.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

// ─── NormalizedRecord ─────────────────────────────────────────────────────────
/// A schema-valid customer with typed numeric fields.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    categorical: [String; 16],
    numeric:     [f64; 3],
}

impl NormalizedRecord {
    /// Build directly from typed parts. `categorical` follows
    /// [`CATEGORICAL_FIELDS`] and `numeric` follows [`NUMERIC_FIELDS`].
    /// The senior-citizen value is normalised here so every producer
    /// shares the same vocabulary: a request sending "1" scores exactly
    /// like one sending "Yes".
    pub fn new(mut categorical: [String; 16], numeric: [f64; 3]) -> Self {
        let senior = categorical_index(SENIOR_CITIZEN_FIELD);
        categorical[senior] = normalize_senior_citizen(&categorical[senior]);
        Self { categorical, numeric }
    }

    /// Validate and coerce an incoming request. Numeric fields that do
    /// not parse become 0.0.
    pub fn from_raw(raw: &RawRecord) -> Result<Self, ChurnError> {
        schema::validate(raw)?;

        let categorical = CATEGORICAL_FIELDS.map(|f| raw.get(f).unwrap_or_default().to_string());
        let numeric = NUMERIC_FIELDS.map(|f| coerce_numeric(raw.get(f).unwrap_or_default()));

        Ok(Self::new(categorical, numeric))
    }

    /// Category text of the `index`-th categorical field.
    pub fn categorical(&self, index: usize) -> &str {
        &self.categorical[index]
    }

    /// Parsed value of the `index`-th numeric field.
    pub fn numeric(&self, index: usize) -> f64 {
        self.numeric[index]
    }

    pub fn tenure(&self) -> f64 {
        self.numeric[0]
    }

    pub fn monthly_charges(&self) -> f64 {
        self.numeric[1]
    }

    pub fn total_charges(&self) -> f64 {
        self.numeric[2]
    }

    /// Look a field up by its request name.
    pub fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        if let Some(i) = CATEGORICAL_FIELDS.iter().position(|f| *f == name) {
            return Some(FieldValue::Category(&self.categorical[i]));
        }
        NUMERIC_FIELDS
            .iter()
            .position(|f| *f == name)
            .map(|i| FieldValue::Number(self.numeric[i]))
    }
}

/// A single typed field of a [`NormalizedRecord`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Category(&'a str),
    Number(f64),
}

fn categorical_index(name: &str) -> usize {
    CATEGORICAL_FIELDS
        .iter()
        .position(|f| *f == name)
        .unwrap_or_default()
}
