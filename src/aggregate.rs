use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;

use crate::constants::BOX_PLOT_TYPES;
use crate::types::JoinedRecord;

/// Calendar-month bucket, `YYYY-MM`.
pub fn month_label(ts: &NaiveDateTime) -> String {
    format!("{:04}-{:02}", ts.year(), ts.month())
}

/// ISO-week bucket, `YYYY-Www`. The ISO year can differ from the
/// calendar year around January 1st.
pub fn week_label(ts: &NaiveDateTime) -> String {
    let week = ts.iso_week();
    format!("{:04}-W{:02}", week.year(), week.week())
}

/// Calendar-year bucket, `YYYY`.
pub fn year_label(ts: &NaiveDateTime) -> String {
    format!("{:04}", ts.year())
}

/// A joined row annotated with its calendar buckets.
#[derive(Debug, Clone)]
pub struct PeriodRecord<'a> {
    pub record: &'a JoinedRecord,
    pub month: String,
    pub week: String,
    pub year: String,
}

/// Annotates every joined row that carries a purchase timestamp with
/// its month, week and year labels. Rows without a timestamp have no
/// bucket and are skipped.
pub fn derive_periods(joined: &[JoinedRecord]) -> Vec<PeriodRecord<'_>> {
    joined
        .iter()
        .filter_map(|record| {
            let ts = record.order_purchase_timestamp.as_ref()?;
            Some(PeriodRecord {
                record,
                month: month_label(ts),
                week: week_label(ts),
                year: year_label(ts),
            })
        })
        .collect()
}

/// Sum of payment value per month, in ascending period order. The
/// zero-padded labels make lexicographic order chronological.
pub fn monthly_revenue(periods: &[PeriodRecord]) -> Vec<(String, f64)> {
    let mut by_month: BTreeMap<String, f64> = BTreeMap::new();
    for period in periods {
        *by_month.entry(period.month.clone()).or_insert(0.0) += period.record.payment_value;
    }
    by_month.into_iter().collect()
}

/// Per-person totals across all their orders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerTotals {
    pub customer_unique_id: String,
    pub payment_value: f64,
    pub payment_installments: u64,
}

/// Sum of payment value and installments per distinct
/// `customer_unique_id`, in stable id order.
pub fn customer_totals(joined: &[JoinedRecord]) -> Vec<CustomerTotals> {
    let mut totals: BTreeMap<&str, (f64, u64)> = BTreeMap::new();
    for record in joined {
        let entry = totals.entry(record.customer_unique_id.as_str()).or_insert((0.0, 0));
        entry.0 += record.payment_value;
        entry.1 += u64::from(record.payment_installments);
    }
    totals
        .into_iter()
        .map(|(id, (value, installments))| CustomerTotals {
            customer_unique_id: id.to_string(),
            payment_value: value,
            payment_installments: installments,
        })
        .collect()
}

/// Revenue grouped by (payment type, month), pivoted so payment types
/// become columns against a month row axis. Absent combinations hold
/// zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenuePivot {
    pub months: Vec<String>,
    pub payment_types: Vec<String>,
    /// values[month_index][type_index]
    pub values: Vec<Vec<f64>>,
}

pub fn revenue_by_type_and_month(periods: &[PeriodRecord]) -> RevenuePivot {
    let mut cells: BTreeMap<(String, String), f64> = BTreeMap::new();
    for period in periods {
        let key = (period.month.clone(), period.record.payment_type.clone());
        *cells.entry(key).or_insert(0.0) += period.record.payment_value;
    }

    let mut months: Vec<String> = cells.keys().map(|(month, _)| month.clone()).collect();
    months.sort();
    months.dedup();
    let mut payment_types: Vec<String> = cells.keys().map(|(_, ty)| ty.clone()).collect();
    payment_types.sort();
    payment_types.dedup();

    let values = months
        .iter()
        .map(|month| {
            payment_types
                .iter()
                .map(|ty| {
                    cells
                        .get(&(month.clone(), ty.clone()))
                        .copied()
                        .unwrap_or(0.0)
                })
                .collect()
        })
        .collect();

    RevenuePivot {
        months,
        payment_types,
        values,
    }
}

/// Payment value distributions for the four fixed payment types. Other
/// types present in the data do not get a series.
pub fn box_plot_series(joined: &[JoinedRecord]) -> Vec<(&'static str, Vec<f64>)> {
    BOX_PLOT_TYPES
        .iter()
        .map(|payment_type| {
            let values = joined
                .iter()
                .filter(|record| record.payment_type == *payment_type)
                .map(|record| record.payment_value)
                .collect();
            (*payment_type, values)
        })
        .collect()
}
