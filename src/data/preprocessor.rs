// ============================================================
// Layer 4 — Training Table Cleaner
// ============================================================
// Turns the raw historical export into a TrainingTable.
//
// Cleaning steps (applied in order):
//   1. Rename PascalCase source columns to request field names
//   2. Parse tenure; drop rows with tenure < 0 (or unparsable)
//   3. Map the Churn label Yes/No (or 1/0) to 1/0; skip others
//   4. Parse totalCharges; impute blanks with the median of the
//      rows retained by steps 2–3
//   5. Normalise seniorCitizen 0/1 → No/Yes
//   6. Keep exactly the 19 request fields plus the label
//
// Only steps 2 and 3 drop rows. A bad totalCharges is imputed,
// a bad monthlyCharges becomes 0.0.

use anyhow::{bail, Result};
use serde::Serialize;

use crate::domain::record::{parse_numeric, NormalizedRecord, CATEGORICAL_FIELDS, FIELDS};
use crate::domain::table::{RawTable, TrainingTable};

/// Source column → request field name.
pub const COLUMN_RENAMES: [(&str, &str); 17] = [
    ("SeniorCitizen", "seniorCitizen"),
    ("Partner", "partner"),
    ("Dependents", "dependents"),
    ("PhoneService", "phoneService"),
    ("MultipleLines", "multipleLines"),
    ("InternetService", "internetService"),
    ("OnlineSecurity", "onlineSecurity"),
    ("OnlineBackup", "onlineBackup"),
    ("DeviceProtection", "deviceProtection"),
    ("TechSupport", "techSupport"),
    ("StreamingTV", "streamingTV"),
    ("StreamingMovies", "streamingMovies"),
    ("Contract", "contract"),
    ("PaperlessBilling", "paperlessBilling"),
    ("PaymentMethod", "paymentMethod"),
    ("MonthlyCharges", "monthlyCharges"),
    ("TotalCharges", "totalCharges"),
];

/// Name of the target column in the source data.
pub const LABEL_COLUMN: &str = "Churn";

/// What the cleaner did to the input.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleaningStats {
    pub rows_in:                 usize,
    pub rows_out:                usize,
    pub dropped_negative_tenure: usize,
    pub dropped_invalid_tenure:  usize,
    pub dropped_invalid_label:   usize,
    pub imputed_total_charges:   usize,
    pub total_charges_median:    f64,
}

pub struct Preprocessor;

/// A row that survived the filters, before imputation.
struct Retained {
    categorical:   [String; 16],
    tenure:        f64,
    monthly:       f64,
    total_charges: Option<f64>,
    label:         u8,
}

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Clean a raw table into a labelled training table.
    pub fn clean(&self, mut table: RawTable) -> Result<(TrainingTable, CleaningStats)> {
        // ── Step 1: Canonical column names ────────────────────────────────────
        table.rename_columns(&COLUMN_RENAMES);

        let missing: Vec<&str> = FIELDS
            .iter()
            .chain(std::iter::once(&LABEL_COLUMN))
            .filter(|f| table.column(f).is_none())
            .copied()
            .collect();
        if !missing.is_empty() {
            bail!("Training data is missing required columns: {}", missing.join(", "));
        }

        // Every lookup below is present: checked just above.
        let col = |name: &str| table.column(name).unwrap_or_default();
        let cat_cols = CATEGORICAL_FIELDS.map(|f| col(f));
        let tenure_col = col("tenure");
        let monthly_col = col("monthlyCharges");
        let total_col = col("totalCharges");
        let label_col = col(LABEL_COLUMN);

        let mut stats = CleaningStats { rows_in: table.len(), ..CleaningStats::default() };

        // ── Steps 2–3: Row filters ────────────────────────────────────────────
        let mut retained = Vec::with_capacity(table.len());
        for row in table.rows() {
            let Some(tenure) = parse_numeric(&row[tenure_col]) else {
                stats.dropped_invalid_tenure += 1;
                continue;
            };
            if tenure < 0.0 {
                stats.dropped_negative_tenure += 1;
                continue;
            }
            let Some(label) = parse_label(&row[label_col]) else {
                stats.dropped_invalid_label += 1;
                continue;
            };

            retained.push(Retained {
                categorical: cat_cols.map(|c| row[c].clone()),
                tenure,
                monthly: parse_numeric(&row[monthly_col]).unwrap_or(0.0),
                total_charges: parse_numeric(&row[total_col]),
                label,
            });
        }

        // ── Step 4: Median imputation of totalCharges ─────────────────────────
        let observed: Vec<f64> = retained.iter().filter_map(|r| r.total_charges).collect();
        let median = median(&observed).unwrap_or(0.0);
        stats.total_charges_median = median;

        // ── Steps 5–6: Typed records (senior normalisation happens in
        //    NormalizedRecord::new, shared with inference) ─────────────────────
        let mut out = TrainingTable::new();
        for r in retained {
            let total = r.total_charges.unwrap_or_else(|| {
                stats.imputed_total_charges += 1;
                median
            });
            out.push(NormalizedRecord::new(r.categorical, [r.tenure, r.monthly, total]), r.label);
        }
        stats.rows_out = out.len();

        if stats.dropped_negative_tenure + stats.dropped_invalid_tenure > 0 {
            tracing::warn!(
                "Dropped {} rows with negative and {} with unparsable tenure",
                stats.dropped_negative_tenure,
                stats.dropped_invalid_tenure
            );
        }
        if stats.dropped_invalid_label > 0 {
            tracing::warn!("Dropped {} rows with an unrecognised Churn label", stats.dropped_invalid_label);
        }
        tracing::info!(
            "Cleaned {} → {} rows; imputed {} totalCharges with median {:.2}",
            stats.rows_in,
            stats.rows_out,
            stats.imputed_total_charges,
            median
        );

        Ok((out, stats))
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Yes/No (or 1/0) → 1/0.
pub fn parse_label(value: &str) -> Option<u8> {
    match value.trim() {
        "Yes" | "1" => Some(1),
        "No" | "0" => Some(0),
        _ => None,
    }
}

/// Median of the values; mean of the two middle values for even counts.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    Some(if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data::loader::read_table;
    use crate::domain::record::{FieldValue, RawRecord};

    const HEADER: &str = "customerID,gender,SeniorCitizen,Partner,Dependents,tenure,PhoneService,\
MultipleLines,InternetService,OnlineSecurity,OnlineBackup,DeviceProtection,TechSupport,\
StreamingTV,StreamingMovies,Contract,PaperlessBilling,PaymentMethod,MonthlyCharges,TotalCharges,Churn";

    /// One CSV line in source column order.
    pub(crate) fn source_row(
        id: &str,
        senior: &str,
        tenure: &str,
        internet: &str,
        contract: &str,
        monthly: &str,
        total: &str,
        churn: &str,
    ) -> String {
        format!(
            "{id},Female,{senior},Yes,No,{tenure},Yes,No,{internet},No,Yes,No,No,Yes,No,\
{contract},Yes,Electronic check,{monthly},{total},{churn}"
        )
    }

    /// Four labelled customers, values in [`FIELDS`] order. Two churn and
    /// two stay, and every categorical field takes at least two values.
    pub(crate) const CUSTOMERS: [([&str; 19], &str); 4] = [
        (
            ["Female", "1", "No", "No", "1", "Yes", "No", "Fiber optic", "No", "No", "No",
             "No", "Yes", "Yes", "Month-to-month", "Yes", "Electronic check", "95.5", "95.5"],
            "Yes",
        ),
        (
            ["Male", "0", "Yes", "No", "2", "Yes", "Yes", "Fiber optic", "No", "Yes", "No",
             "No", "No", "Yes", "Month-to-month", "Yes", "Mailed check", "89.1", "178.2"],
            "Yes",
        ),
        (
            ["Male", "0", "Yes", "Yes", "60", "No", "No phone service", "DSL", "Yes", "Yes",
             "Yes", "Yes", "No", "No", "Two year", "No", "Bank transfer (automatic)", "25.0",
             "1500.0"],
            "No",
        ),
        (
            ["Female", "1", "No", "Yes", "48", "Yes", "Yes", "No", "No internet service",
             "No internet service", "No internet service", "No internet service",
             "No internet service", "No internet service", "One year", "No",
             "Credit card (automatic)", "20.3", "974.4"],
            "No",
        ),
    ];

    /// [`CUSTOMERS`] as CSV lines in source column order.
    pub(crate) fn customer_rows() -> Vec<String> {
        CUSTOMERS
            .iter()
            .enumerate()
            .map(|(i, (values, churn))| format!("{},{},{churn}", i + 1, values.join(",")))
            .collect()
    }

    /// [`CUSTOMERS`] as a source CSV export.
    pub(crate) fn customers_csv() -> String {
        source_csv(&customer_rows())
    }

    /// One of [`CUSTOMERS`] as an inference request.
    pub(crate) fn customer_request(values: &[&str; 19]) -> RawRecord {
        FIELDS.iter().copied().zip(values.iter().copied()).collect()
    }

    pub(crate) fn source_csv(rows: &[String]) -> String {
        let mut csv = String::from(HEADER);
        for r in rows {
            csv.push('\n');
            csv.push_str(r);
        }
        csv.push('\n');
        csv
    }

    fn clean(rows: &[String]) -> (TrainingTable, CleaningStats) {
        let raw = read_table(source_csv(rows).as_bytes()).unwrap();
        Preprocessor::new().clean(raw).unwrap()
    }

    #[test]
    fn test_renames_and_selects_fields() {
        let (t, stats) = clean(&[source_row("1", "0", "5", "DSL", "Two year", "50.0", "250.0", "No")]);
        assert_eq!(stats.rows_out, 1);
        let r = &t.records()[0];
        assert_eq!(r.field("contract"), Some(FieldValue::Category("Two year")));
        assert_eq!(r.field("internetService"), Some(FieldValue::Category("DSL")));
        assert_eq!(r.field("totalCharges"), Some(FieldValue::Number(250.0)));
        assert_eq!(t.labels(), [0]);
    }

    #[test]
    fn test_negative_tenure_dropped_before_median() {
        let (t, stats) = clean(&[
            source_row("1", "0", "10", "DSL", "Two year", "20", "100", "No"),
            source_row("2", "0", "-1", "DSL", "Two year", "20", "100000", "No"),
            source_row("3", "0", "20", "DSL", "One year", "20", "300", "Yes"),
            source_row("4", "1", "0", "Fiber optic", "Month-to-month", "20", " ", "Yes"),
        ]);
        assert_eq!(stats.dropped_negative_tenure, 1);
        assert_eq!(stats.imputed_total_charges, 1);
        // median of the retained 100 and 300, not of the dropped 100000
        assert_eq!(stats.total_charges_median, 200.0);
        assert_eq!(t.len(), 3);
        assert_eq!(t.records()[2].total_charges(), 200.0);
        assert_eq!(t.labels(), [0, 1, 1]);
    }

    #[test]
    fn test_bad_total_charges_imputed_not_dropped() {
        let (t, stats) = clean(&[
            source_row("1", "0", "1", "DSL", "Two year", "20", "abc", "No"),
            source_row("2", "0", "2", "DSL", "Two year", "20", "40", "Yes"),
        ]);
        assert_eq!(t.len(), 2);
        assert_eq!(stats.imputed_total_charges, 1);
        assert_eq!(t.records()[0].total_charges(), 40.0);
    }

    #[test]
    fn test_senior_citizen_mapped_to_yes_no() {
        let (t, _) = clean(&[
            source_row("1", "0", "1", "DSL", "Two year", "20", "20", "No"),
            source_row("2", "1", "2", "DSL", "Two year", "20", "40", "Yes"),
        ]);
        assert_eq!(t.records()[0].field("seniorCitizen"), Some(FieldValue::Category("No")));
        assert_eq!(t.records()[1].field("seniorCitizen"), Some(FieldValue::Category("Yes")));
    }

    #[test]
    fn test_unknown_label_skipped() {
        let (t, stats) = clean(&[
            source_row("1", "0", "1", "DSL", "Two year", "20", "20", "Maybe"),
            source_row("2", "0", "2", "DSL", "Two year", "20", "40", "Yes"),
        ]);
        assert_eq!(t.len(), 1);
        assert_eq!(stats.dropped_invalid_label, 1);
    }

    #[test]
    fn test_customer_fixture_covers_every_category_twice() {
        let (t, stats) = clean(&customer_rows());
        assert_eq!(stats.rows_out, 4);
        for (i, field) in CATEGORICAL_FIELDS.iter().enumerate() {
            let mut seen: Vec<&str> = t.records().iter().map(|r| r.categorical(i)).collect();
            seen.sort_unstable();
            seen.dedup();
            assert!(seen.len() >= 2, "{field} has a single value");
        }
        assert_eq!(t.labels(), [1, 1, 0, 0]);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let raw = read_table("gender,tenure,Churn\nMale,1,No\n".as_bytes()).unwrap();
        let err = Preprocessor::new().clean(raw).unwrap_err();
        assert!(err.to_string().contains("contract"));
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }
}
