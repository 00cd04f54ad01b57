//! KPI engine: normalized bookings -> filter stage -> aggregator -> [`KpiSnapshot`].

pub mod aggregate;
pub mod filter;

use chrono::{Days, NaiveDate};
use thiserror::Error;

use crate::dataset::Dataset;
use crate::settings::KpiSettings;

pub use aggregate::KpiSnapshot;

/// Query date format, `YYYY-MM-DD`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Default look-back when `start_date` is omitted.
pub const DEFAULT_WINDOW_DAYS: u64 = 30;

#[derive(Debug, Error)]
pub enum KpiError {
    #[error("Invalid {field}: '{value}'")]
    InvalidDate { field: &'static str, value: String },

    #[error("end_date {end} is before start_date {start}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

/// A validated KPI request: inclusive date range plus optional categorical filters.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub region: Option<String>,
    pub channel: Option<String>,
}

impl KpiQuery {
    /// Build a query from raw parameters. Missing dates default to the 30 days ending `today`.
    pub fn parse(
        start_date: Option<&str>,
        end_date: Option<&str>,
        region: Option<String>,
        channel: Option<String>,
        today: NaiveDate,
    ) -> Result<Self, KpiError> {
        let end = match non_blank(end_date) {
            Some(s) => parse_date("end_date", s)?,
            None => today,
        };
        let start = match non_blank(start_date) {
            Some(s) => parse_date("start_date", s)?,
            None => today
                .checked_sub_days(Days::new(DEFAULT_WINDOW_DAYS))
                .unwrap_or(today),
        };

        if end < start {
            return Err(KpiError::InvertedRange { start, end });
        }

        Ok(Self {
            start,
            end,
            region,
            channel,
        })
    }

    /// Days covered by the range, counting both endpoints.
    pub fn days_in_period(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, KpiError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| KpiError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// Run the full pipeline over one dataset snapshot and one settings read.
pub fn compute(dataset: &Dataset, query: &KpiQuery, settings: &KpiSettings) -> KpiSnapshot {
    let views = filter::apply(&dataset.records, query);
    aggregate::aggregate(&views, query.days_in_period(), settings)
}
