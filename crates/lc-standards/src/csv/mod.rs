#![deny(unsafe_code)]

pub mod fields;
pub mod messages;
pub mod rules;
pub mod ucp_rules;

use std::path::{Path, PathBuf};

use csv::StringRecord;

use crate::error::StandardsError;

/// A CSV file read fully into memory, with header lookup by name.
pub(crate) struct Table {
    path: PathBuf,
    headers: StringRecord,
    rows: Vec<StringRecord>,
}

impl Table {
    pub(crate) fn read(path: &Path) -> Result<Self, StandardsError> {
        let bytes = std::fs::read(path).map_err(|e| StandardsError::io(path, e))?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(bytes.as_slice());
        let headers = reader
            .headers()
            .map_err(|e| StandardsError::csv(path, e.to_string()))?
            .iter()
            .map(|h| h.trim().trim_matches('\u{feff}'))
            .collect::<StringRecord>();

        let mut rows = Vec::new();
        for row in reader.records() {
            rows.push(row.map_err(|e| StandardsError::csv(path, e.to_string()))?);
        }

        Ok(Self {
            path: path.to_path_buf(),
            headers,
            rows,
        })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Trimmed, non-empty value of column `name`.
    pub(crate) fn get(&self, row: &StringRecord, name: &str) -> Option<String> {
        self.headers
            .iter()
            .position(|h| h == name)
            .and_then(|i| row.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
    }

    pub(crate) fn require(
        &self,
        row: &StringRecord,
        line: usize,
        name: &str,
    ) -> Result<String, StandardsError> {
        self.get(row, name).ok_or_else(|| {
            StandardsError::csv(&self.path, format!("row {line}: missing {name}"))
        })
    }

    pub(crate) fn number<T: std::str::FromStr>(
        &self,
        row: &StringRecord,
        line: usize,
        name: &str,
    ) -> Result<Option<T>, StandardsError> {
        match self.get(row, name) {
            None => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(|_| {
                StandardsError::csv(&self.path, format!("row {line}: {name} '{raw}' is not a number"))
            }),
        }
    }

    /// Rows paired with their 1-based data line numbers.
    pub(crate) fn numbered(&self) -> impl Iterator<Item = (usize, &StringRecord)> {
        self.rows.iter().enumerate().map(|(i, row)| (i + 1, row))
    }
}
