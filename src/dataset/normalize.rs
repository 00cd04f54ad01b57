use chrono::{NaiveDate, NaiveDateTime};

use super::loader::{Cell, RawTable, EMPTY_CELL};
use super::region::Region;
use super::schema::{ColumnIndex, Field};
use super::{BookingRecord, DatasetError};

/// Text layouts accepted for date cells stored as strings.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// Outcome of coercing one cell into a typed value.
#[derive(Debug, Clone, PartialEq)]
enum Coerced<T> {
    Present(T),
    Absent,
    Malformed,
}

impl<T> Coerced<T> {
    fn value(self) -> Option<T> {
        match self {
            Coerced::Present(v) => Some(v),
            _ => None,
        }
    }

    fn is_malformed(&self) -> bool {
        matches!(self, Coerced::Malformed)
    }
}

/// Typed records plus load diagnostics.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub records: Vec<BookingRecord>,
    /// Rows where a present value failed coercion or check-in falls after check-out
    pub malformed_rows: usize,
    pub columns: ColumnIndex,
}

/// Map a raw sheet onto [`BookingRecord`]s. Rows are never dropped; unusable values become `None`.
pub fn normalize(table: &RawTable) -> Result<Normalized, DatasetError> {
    let columns = ColumnIndex::resolve(&table.headers)?;
    let mut records = Vec::with_capacity(table.rows.len());
    let mut malformed_rows = 0;

    for row in 0..table.rows.len() {
        let cell = |field: Field| match columns.position(field) {
            Some(col) => table.cell(row, col),
            None => &EMPTY_CELL,
        };

        let listing_name = coerce_text(cell(Field::ListingName));
        let channel = coerce_text(cell(Field::Channel));
        let check_in = coerce_datetime(cell(Field::CheckIn));
        let check_out = coerce_datetime(cell(Field::CheckOut));
        let nights = coerce_number(cell(Field::Nights));
        let invoice_total = coerce_number(cell(Field::InvoiceTotal));
        let company_commission = coerce_number(cell(Field::CompanyCommission));
        let cleaning_fee = coerce_number(cell(Field::CleaningFee));

        let inverted_stay = matches!(
            (&check_in, &check_out),
            (Coerced::Present(arrival), Coerced::Present(departure)) if arrival > departure
        );

        let malformed = inverted_stay
            || listing_name.is_malformed()
            || channel.is_malformed()
            || check_in.is_malformed()
            || check_out.is_malformed()
            || nights.is_malformed()
            || invoice_total.is_malformed()
            || company_commission.is_malformed()
            || cleaning_fee.is_malformed();
        if malformed {
            malformed_rows += 1;
        }

        let listing_name = listing_name.value();
        records.push(BookingRecord {
            region: Region::from_listing_name(listing_name.as_deref()),
            listing_name,
            channel: channel.value(),
            check_in: check_in.value(),
            check_out: check_out.value(),
            nights: nights.value(),
            invoice_total: invoice_total.value(),
            company_commission: company_commission.value(),
            cleaning_fee: cleaning_fee.value(),
        });
    }

    if malformed_rows > 0 {
        tracing::warn!(
            "{} of {} booking rows had values that could not be coerced",
            malformed_rows,
            records.len()
        );
    }

    Ok(Normalized {
        records,
        malformed_rows,
        columns,
    })
}

fn coerce_text(cell: &Cell) -> Coerced<String> {
    match cell {
        Cell::Empty => Coerced::Absent,
        Cell::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                Coerced::Absent
            } else {
                Coerced::Present(s.to_string())
            }
        }
        Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => Coerced::Present(format!("{}", *n as i64)),
        Cell::Number(n) => Coerced::Present(n.to_string()),
        Cell::Bool(b) => Coerced::Present(b.to_string()),
        Cell::DateTime(ts) => Coerced::Present(ts.to_string()),
        Cell::Error(_) => Coerced::Malformed,
    }
}

fn coerce_number(cell: &Cell) -> Coerced<f64> {
    match cell {
        Cell::Empty => Coerced::Absent,
        Cell::Number(n) if n.is_finite() => Coerced::Present(*n),
        Cell::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Coerced::Absent;
            }
            match parse_number(s) {
                Some(n) => Coerced::Present(n),
                None => Coerced::Malformed,
            }
        }
        _ => Coerced::Malformed,
    }
}

fn coerce_datetime(cell: &Cell) -> Coerced<NaiveDateTime> {
    match cell {
        Cell::Empty => Coerced::Absent,
        Cell::DateTime(ts) => Coerced::Present(*ts),
        Cell::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Coerced::Absent;
            }
            match parse_datetime(s) {
                Some(ts) => Coerced::Present(ts),
                None => Coerced::Malformed,
            }
        }
        _ => Coerced::Malformed,
    }
}

/// Parse a decimal number, accepting a decimal comma when no point is present.
pub fn parse_number(s: &str) -> Option<f64> {
    let parsed = s.parse::<f64>().ok().or_else(|| {
        if s.contains(',') && !s.contains('.') {
            s.replace(',', ".").parse::<f64>().ok()
        } else {
            None
        }
    })?;
    parsed.is_finite().then_some(parsed)
}

pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::schema::COLUMN_MAP;

    fn headers() -> Vec<String> {
        COLUMN_MAP.iter().map(|m| m.sources[0].to_string()).collect()
    }

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn date(s: &str) -> Cell {
        Cell::DateTime(parse_datetime(s).unwrap())
    }

    #[test]
    fn normalizes_typed_cells() {
        let table = RawTable::new(
            headers(),
            vec![vec![
                text("C101"),
                text("Airbnb"),
                date("2025-03-01 15:00"),
                date("2025-03-03 11:00"),
                Cell::Number(2.0),
                Cell::Number(200.0),
                Cell::Number(30.0),
                Cell::Number(80.0),
            ]],
        );

        let normalized = normalize(&table).unwrap();
        assert_eq!(normalized.malformed_rows, 0);
        let record = &normalized.records[0];
        assert_eq!(record.listing_name.as_deref(), Some("C101"));
        assert_eq!(record.region, Region::A);
        assert_eq!(record.channel.as_deref(), Some("Airbnb"));
        assert_eq!(record.check_in.unwrap().to_string(), "2025-03-01 15:00:00");
        assert_eq!(record.nights, Some(2.0));
        assert_eq!(record.cleaning_fee, Some(80.0));
    }

    #[test]
    fn unparseable_values_become_null_and_are_counted() {
        let table = RawTable::new(
            headers(),
            vec![
                vec![
                    text("B7"),
                    Cell::Empty,
                    text("not a date"),
                    text("31/03/2025"),
                    text("three"),
                    text("1.234,5"),
                    Cell::Empty,
                    Cell::Error("#N/A".into()),
                ],
                vec![text("G2"), text("Booking.com"), text("2025-03-02")],
            ],
        );

        let normalized = normalize(&table).unwrap();
        assert_eq!(normalized.records.len(), 2, "rows are never dropped");
        assert_eq!(normalized.malformed_rows, 1);

        let bad = &normalized.records[0];
        assert_eq!(bad.region, Region::B);
        assert_eq!(bad.channel, None);
        assert_eq!(bad.check_in, None);
        assert_eq!(bad.check_out.unwrap().date(), NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
        assert_eq!(bad.nights, None);
        assert_eq!(bad.invoice_total, None);
        assert_eq!(bad.cleaning_fee, None);

        let short = &normalized.records[1];
        assert_eq!(short.region, Region::A);
        assert!(short.check_in.is_some());
        assert_eq!(short.check_out, None);
    }

    #[test]
    fn check_in_after_check_out_is_counted_but_kept() {
        let table = RawTable::new(
            headers(),
            vec![
                vec![text("C9"), text("Airbnb"), date("2025-03-05"), date("2025-03-01")],
                vec![text("C9"), text("Airbnb"), date("2025-03-01"), date("2025-03-01")],
            ],
        );

        let normalized = normalize(&table).unwrap();
        assert_eq!(normalized.records.len(), 2);
        assert_eq!(normalized.malformed_rows, 1);

        let inverted = &normalized.records[0];
        assert_eq!(inverted.check_in.unwrap().date(), NaiveDate::from_ymd_opt(2025, 3, 5).unwrap());
        assert_eq!(inverted.check_out.unwrap().date(), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    }

    #[test]
    fn missing_listing_name_falls_into_region_b() {
        let table = RawTable::new(headers(), vec![vec![Cell::Empty]]);
        let normalized = normalize(&table).unwrap();
        assert_eq!(normalized.records[0].region, Region::B);
    }

    #[test]
    fn numeric_listing_names_render_without_fraction() {
        assert_eq!(coerce_text(&Cell::Number(123.0)), Coerced::Present("123".to_string()));
    }

    #[test]
    fn parses_numbers_with_decimal_comma() {
        assert_eq!(parse_number("12,5"), Some(12.5));
        assert_eq!(parse_number(" 7 ".trim()), Some(7.0));
        assert_eq!(parse_number("1.234,5"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn parses_supported_date_layouts() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        for s in ["2025-01-31", "31/01/2025", "2025-01-31 10:30", "2025-01-31T10:30:00", "31/01/2025 10:30:00"] {
            assert_eq!(parse_datetime(s).map(|ts| ts.date()), Some(expected), "{}", s);
        }
        assert_eq!(parse_datetime("01-31-2025"), None);
    }
}
