use chrono::{NaiveDate, NaiveDateTime};

use super::KpiQuery;
use crate::dataset::BookingRecord;

/// Filter values meaning "no restriction". `Todos` is what the legacy dashboard sends.
pub const ALL_SENTINELS: &[&str] = &["All", "Todos"];

/// The two independent sub-views the aggregator consumes.
#[derive(Debug, Default)]
pub struct FilteredViews<'a> {
    /// Bookings whose check-in date falls in range
    pub check_in: Vec<&'a BookingRecord>,
    /// Bookings whose check-out date falls in range
    pub check_out: Vec<&'a BookingRecord>,
}

/// True when a categorical filter value should not restrict anything.
pub fn is_unrestricted(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        None => true,
        Some(v) => v.is_empty() || ALL_SENTINELS.contains(&v),
    }
}

pub fn apply<'a>(records: &'a [BookingRecord], query: &KpiQuery) -> FilteredViews<'a> {
    let region = query.region.as_deref().filter(|v| !is_unrestricted(Some(*v)));
    let channel = query.channel.as_deref().filter(|v| !is_unrestricted(Some(*v)));

    let mut views = FilteredViews::default();
    for record in records {
        if let Some(region) = region {
            if !record.region.matches_label(region) {
                continue;
            }
        }
        if let Some(channel) = channel {
            if record.channel.as_deref() != Some(channel) {
                continue;
            }
        }

        if in_range(record.check_in, query.start, query.end) {
            views.check_in.push(record);
        }
        if in_range(record.check_out, query.start, query.end) {
            views.check_out.push(record);
        }
    }
    views
}

/// Compares calendar dates; a null timestamp never matches.
fn in_range(ts: Option<NaiveDateTime>, start: NaiveDate, end: NaiveDate) -> bool {
    ts.map(|ts| ts.date())
        .is_some_and(|date| start <= date && date <= end)
}
