// ============================================================
// Layer 3 — Tables
// ============================================================
// RawTable      — header row + text cells, as handed over by the
//                 file-loading collaborator (no typing at all)
// TrainingTable — cleaned rows ready for fitting: one
//                 NormalizedRecord and one 0/1 label per row

use crate::domain::record::NormalizedRecord;

// ─── RawTable ─────────────────────────────────────────────────────────────────
/// Untyped tabular data: every cell is text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    headers: Vec<String>,
    rows:    Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self { headers, rows: Vec::new() }
    }

    /// Append a row. Short rows are padded with empty cells so every
    /// row is as wide as the header.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the column called `name`, if present.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Rename every header found in `map` (source → target). Headers
    /// not in the map keep their name.
    pub fn rename_columns(&mut self, map: &[(&str, &str)]) {
        for header in &mut self.headers {
            if let Some((_, to)) = map.iter().find(|(from, _)| *from == header.as_str()) {
                *header = to.to_string();
            }
        }
    }
}

// ─── TrainingTable ────────────────────────────────────────────────────────────
/// Cleaned labelled rows. Records and labels always have equal length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingTable {
    records: Vec<NormalizedRecord>,
    labels:  Vec<u8>,
}

impl TrainingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one row; any non-zero label counts as churned.
    pub fn push(&mut self, record: NormalizedRecord, label: u8) {
        self.records.push(record);
        self.labels.push(u8::from(label != 0));
    }

    pub fn records(&self) -> &[NormalizedRecord] {
        &self.records
    }

    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of churned rows.
    pub fn positives(&self) -> usize {
        self.labels.iter().filter(|&&l| l == 1).count()
    }

    /// Split into owned (record, label) rows.
    pub fn into_rows(self) -> Vec<(NormalizedRecord, u8)> {
        self.records.into_iter().zip(self.labels).collect()
    }
}

impl FromIterator<(NormalizedRecord, u8)> for TrainingTable {
    fn from_iter<I: IntoIterator<Item = (NormalizedRecord, u8)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (record, label) in iter {
            table.push(record, label);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_columns() {
        let mut t = RawTable::new(vec!["customerID".into(), "Contract".into()]);
        t.rename_columns(&[("Contract", "contract")]);
        assert_eq!(t.column("contract"), Some(1));
        assert_eq!(t.column("Contract"), None);
        assert_eq!(t.column("customerID"), Some(0));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let mut t = RawTable::new(vec!["a".into(), "b".into()]);
        t.push_row(vec!["1".into()]);
        assert_eq!(t.rows()[0], vec!["1".to_string(), String::new()]);
    }
}
