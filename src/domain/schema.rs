// ============================================================
// Layer 3 — Schema Validator
// ============================================================
// A pure gate in front of the model: a record must carry all
// 19 recognised fields, nothing else, and every value as text.
//
// Values are NOT checked against a category whitelist. The
// feature encoder maps unknown categories to an all-zero block,
// so an unexpected "contract" value is scored, not rejected.

use serde_json::Value;

use crate::domain::error::{ChurnError, SchemaViolation};
use crate::domain::record::{is_recognised, RawRecord, FIELDS};

/// Check one record against the recognised field set.
pub fn validate(record: &RawRecord) -> Result<(), ChurnError> {
    let violation = inspect(record);
    if violation.is_empty() {
        Ok(())
    } else {
        Err(ChurnError::Schema(violation))
    }
}

/// Check a batch; the error names the first failing record.
pub fn validate_batch(records: &[RawRecord]) -> Result<(), ChurnError> {
    for (i, record) in records.iter().enumerate() {
        let violation = inspect(record);
        if !violation.is_empty() {
            return Err(ChurnError::Schema(violation.at_index(i)));
        }
    }
    Ok(())
}

/// Convert a JSON request body into a [`RawRecord`], then validate it.
/// Every value must be a JSON string.
pub fn record_from_json(value: &Value) -> Result<RawRecord, ChurnError> {
    let Value::Object(map) = value else {
        return Err(ChurnError::Schema(SchemaViolation::not_an_object()));
    };

    let mut record = RawRecord::new();
    let mut non_string = Vec::new();
    for (key, v) in map {
        match v {
            Value::String(s) => record.insert(key.as_str(), s.as_str()),
            _ => non_string.push(key.clone()),
        }
    }

    let mut violation = inspect(&record);
    // a non-text value is reported once, not also as "missing"
    violation.missing.retain(|f| !non_string.contains(f));
    violation.non_string = non_string;

    if violation.is_empty() {
        Ok(record)
    } else {
        Err(ChurnError::Schema(violation))
    }
}

fn inspect(record: &RawRecord) -> SchemaViolation {
    let missing = FIELDS
        .iter()
        .filter(|f| record.get(f).is_none())
        .map(|f| f.to_string())
        .collect();
    let unexpected = record
        .field_names()
        .filter(|f| !is_recognised(f))
        .map(str::to_string)
        .collect();

    SchemaViolation {
        missing,
        unexpected,
        ..SchemaViolation::default()
    }
}
