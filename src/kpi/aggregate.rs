use serde::Serialize;

use super::filter::FilteredViews;
use crate::dataset::BookingRecord;
use crate::settings::KpiSettings;

/// Aggregated KPIs for one query. Field names on the wire follow the dashboard contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSnapshot {
    #[serde(rename = "unidadesAtivas")]
    pub active_units: i64,
    #[serde(rename = "totalFaturado")]
    pub total_revenue: f64,
    #[serde(rename = "totalReservas")]
    pub total_reservations: usize,
    /// Same value as `total_reservations`; the dashboard shows both
    #[serde(rename = "checkIns")]
    pub check_ins: usize,
    #[serde(rename = "checkOuts")]
    pub check_outs: usize,
    #[serde(rename = "ticketMedio")]
    pub average_nightly_rate: f64,
    #[serde(rename = "taxaOcupacao")]
    pub occupancy_rate: f64,
    #[serde(rename = "comissaoEmpresa")]
    pub company_commission: f64,
    #[serde(rename = "totalTaxaLimpeza")]
    pub cleaning_fee_total: f64,
    /// Flat per-booking amount, not a share of revenue
    #[serde(rename = "comissaoGonzagaCalculada")]
    pub partner_commission: f64,
    #[serde(skip)]
    pub total_nights: f64,
}

pub fn aggregate(views: &FilteredViews<'_>, days_in_period: i64, settings: &KpiSettings) -> KpiSnapshot {
    let check_in = &views.check_in;

    let total_revenue = sum(check_in, |r| r.invoice_total);
    let total_nights = sum(check_in, |r| r.nights);
    let total_reservations = check_in.len();

    KpiSnapshot {
        active_units: settings.active_units,
        total_revenue,
        total_reservations,
        check_ins: total_reservations,
        check_outs: views.check_out.len(),
        average_nightly_rate: average_nightly_rate(total_revenue, total_nights),
        occupancy_rate: occupancy_rate(total_nights, days_in_period, settings.active_units),
        company_commission: sum(check_in, |r| r.company_commission),
        cleaning_fee_total: sum(check_in, |r| r.cleaning_fee),
        partner_commission: finite_or_zero(settings.commission_multiplier * total_reservations as f64),
        total_nights,
    }
}

/// Sum of a numeric field; null values contribute nothing.
fn sum(view: &[&BookingRecord], field: impl Fn(&BookingRecord) -> Option<f64>) -> f64 {
    finite_or_zero(view.iter().filter_map(|&r| field(r)).sum())
}

pub fn average_nightly_rate(total_revenue: f64, total_nights: f64) -> f64 {
    if total_nights > 0.0 {
        finite_or_zero(total_revenue / total_nights)
    } else {
        0.0
    }
}

/// Booked nights over available unit-nights, as a percentage.
pub fn occupancy_rate(total_nights: f64, days_in_period: i64, active_units: i64) -> f64 {
    if active_units <= 0 || days_in_period <= 0 {
        return 0.0;
    }
    let capacity = days_in_period as f64 * active_units as f64;
    finite_or_zero(total_nights / capacity * 100.0)
}

pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_rate_guards_zero_nights() {
        assert_eq!(average_nightly_rate(500.0, 5.0), 100.0);
        assert_eq!(average_nightly_rate(500.0, 0.0), 0.0);
        assert_eq!(average_nightly_rate(0.0, 0.0), 0.0);
        for nights in [0.0, 0.5, 1.0, 3.0, 1e-300, 1e9] {
            assert!(average_nightly_rate(1234.5, nights).is_finite());
        }
    }

    #[test]
    fn occupancy_is_zero_without_active_units() {
        for units in [0, -1, -137] {
            assert_eq!(occupancy_rate(10.0, 31, units), 0.0);
            assert_eq!(occupancy_rate(0.0, 1, units), 0.0);
        }
    }

    #[test]
    fn occupancy_is_percentage_of_capacity() {
        assert_eq!(occupancy_rate(31.0, 31, 1), 100.0);
        assert_eq!(occupancy_rate(15.5, 31, 1), 50.0);
        assert_eq!(occupancy_rate(62.0, 31, 4), 50.0);
    }

    #[test]
    fn empty_views_yield_zeroes() {
        let snapshot = aggregate(&FilteredViews::default(), 31, &KpiSettings::default());
        assert_eq!(snapshot.total_reservations, 0);
        assert_eq!(snapshot.check_outs, 0);
        assert_eq!(snapshot.total_revenue, 0.0);
        assert_eq!(snapshot.average_nightly_rate, 0.0);
        assert_eq!(snapshot.occupancy_rate, 0.0);
        assert_eq!(snapshot.partner_commission, 0.0);
        assert_eq!(snapshot.active_units, 137);
    }

    #[test]
    fn non_finite_values_are_clamped() {
        assert_eq!(finite_or_zero(f64::NAN), 0.0);
        assert_eq!(finite_or_zero(f64::INFINITY), 0.0);
        assert_eq!(finite_or_zero(-2.5), -2.5);
    }

    #[test]
    fn serializes_ten_dashboard_fields() {
        let snapshot = aggregate(&FilteredViews::default(), 1, &KpiSettings::default());
        let value = serde_json::to_value(&snapshot).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 10);
        for key in [
            "unidadesAtivas",
            "totalFaturado",
            "totalReservas",
            "checkIns",
            "checkOuts",
            "ticketMedio",
            "taxaOcupacao",
            "comissaoEmpresa",
            "totalTaxaLimpeza",
            "comissaoGonzagaCalculada",
        ] {
            assert!(obj.contains_key(key), "missing {}", key);
        }
    }
}
