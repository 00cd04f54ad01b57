pub mod loader;
pub mod normalize;
pub mod region;
pub mod schema;
pub mod store;

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

pub use loader::{Cell, RawTable};
pub use region::Region;
pub use schema::{ResolvedColumn, COLUMN_MAP};
pub use store::DatasetStore;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Dataset file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Dataset I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unreadable workbook: {0}")]
    Workbook(String),

    #[error("Workbook has no worksheets")]
    EmptyWorkbook,

    #[error("Missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("Dataset task failed: {0}")]
    Task(String),
}

impl DatasetError {
    /// True when the bytes themselves are unusable, as opposed to a storage failure.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            DatasetError::Workbook(_) | DatasetError::EmptyWorkbook | DatasetError::MissingColumn(_)
        )
    }
}

/// One reservation, typed and normalized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingRecord {
    pub listing_name: Option<String>,
    pub channel: Option<String>,
    pub check_in: Option<NaiveDateTime>,
    pub check_out: Option<NaiveDateTime>,
    pub nights: Option<f64>,
    pub invoice_total: Option<f64>,
    pub company_commission: Option<f64>,
    pub cleaning_fee: Option<f64>,
    /// Derived from `listing_name` on every load
    pub region: Region,
}

/// Immutable snapshot of the booking spreadsheet.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Vec<BookingRecord>,
    pub malformed_rows: usize,
    pub columns: Vec<ResolvedColumn>,
    /// Hex SHA-256 of the source bytes
    pub fingerprint: String,
    pub loaded_at: DateTime<Utc>,
}

impl Dataset {
    /// Parse and normalize workbook bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DatasetError> {
        let table = loader::read_workbook(bytes)?;
        Self::from_table(&table, fingerprint(bytes))
    }

    pub fn from_table(table: &RawTable, fingerprint: String) -> Result<Self, DatasetError> {
        let normalized = normalize::normalize(table)?;
        Ok(Self {
            records: normalized.records,
            malformed_rows: normalized.malformed_rows,
            columns: normalized.columns.columns().to_vec(),
            fingerprint,
            loaded_at: Utc::now(),
        })
    }

    /// Distinct non-null channels in order of first appearance.
    pub fn channels(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter_map(|r| r.channel.as_ref())
            .filter(|c| seen.insert(c.as_str()))
            .cloned()
            .collect()
    }

    /// Earliest and latest check-in date present.
    pub fn check_in_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.records.iter().filter_map(|r| r.check_in.map(|ts| ts.date()));
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            rows: self.records.len(),
            malformed_rows: self.malformed_rows,
            channels: self.channels(),
            check_in_span: self.check_in_span().map(|(first, last)| DateSpan { first, last }),
            columns: self.columns.clone(),
            fingerprint: self.fingerprint.clone(),
            loaded_at: self.loaded_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DateSpan {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

/// Load diagnostics exposed to administrators.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub malformed_rows: usize,
    pub channels: Vec<String>,
    pub check_in_span: Option<DateSpan>,
    pub columns: Vec<ResolvedColumn>,
    pub fingerprint: String,
    pub loaded_at: DateTime<Utc>,
}

pub fn fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
