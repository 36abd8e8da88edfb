// ============================================================
// Layer 4 — CSV Loader
// ============================================================
// Reads the historical churn table (e.g. the Telco customer
// churn export) into a RawTable of text cells. No typing or
// cleaning happens here; that is the preprocessor's job.
//
// Reference: csv crate documentation

use anyhow::{Context, Result};
use std::{io::Read, path::PathBuf};

use crate::domain::table::RawTable;
use crate::domain::traits::TableSource;

/// Loads a headered CSV file from disk.
pub struct CsvLoader {
    path: PathBuf,
}

impl CsvLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TableSource for CsvLoader {
    fn load_table(&self) -> Result<RawTable> {
        let file = std::fs::File::open(&self.path)
            .with_context(|| format!("Cannot open training data '{}'", self.path.display()))?;
        let table = read_table(file)
            .with_context(|| format!("Cannot parse training data '{}'", self.path.display()))?;

        tracing::info!(
            "Loaded {} rows x {} columns from '{}'",
            table.len(),
            table.headers().len(),
            self.path.display()
        );
        Ok(table)
    }
}

/// Parse CSV text from any reader. The first record is the header.
/// Rows with a different number of cells are accepted and padded.
pub fn read_table<R: Read>(reader: R) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .context("Cannot read CSV header row")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut table = RawTable::new(headers);
    for (i, row) in reader.records().enumerate() {
        // +2: one for the header line, one for 1-based numbering
        let row = row.with_context(|| format!("Malformed CSV record at line {}", i + 2))?;
        table.push_row(row.iter().map(str::to_string).collect());
    }
    Ok(table)
}
