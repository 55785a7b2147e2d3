//! Year-over-year comparison and cumulative totals.

use crate::aggregation::AggregatedPoint;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;
use wb_core::Granularity;

/// A bucket of the current year next to the same bucket a year earlier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComparisonPoint {
    pub date: NaiveDate,
    pub previous_date: NaiveDate,
    pub current: f64,
    pub previous: f64,
    /// current - previous
    pub difference: f64,
    /// Change relative to the previous value; `None` when that value is zero
    pub percent_change: Option<f64>,
}

/// Position of a bucket within its year, independent of the year itself.
///
/// Weeks do not line up with calendar dates from one year to the next, so
/// they are counted from `start`, the first day of the series' window.
fn position_in_year(granularity: Granularity, date: NaiveDate, start: NaiveDate) -> (i64, i64) {
    match granularity {
        Granularity::Day => (date.month().into(), date.day().into()),
        Granularity::Dekada => (date.month().into(), (date.day0() / 10).into()),
        Granularity::Week => ((date - start).num_days().div_euclid(7), 0),
        Granularity::Month => (date.month().into(), 0),
    }
}

/// Pair each current point with the previous-year point at the same position.
///
/// `current_start` and `previous_start` are the first days of the two
/// windows. Buckets present in only one of the series (Feb 29, a 53rd week,
/// gaps) produce no comparison point.
pub fn compare(
    current: &[AggregatedPoint],
    previous: &[AggregatedPoint],
    granularity: Granularity,
    current_start: NaiveDate,
    previous_start: NaiveDate,
) -> Vec<ComparisonPoint> {
    let by_position: HashMap<(i64, i64), &AggregatedPoint> = previous
        .iter()
        .map(|point| (position_in_year(granularity, point.date, previous_start), point))
        .collect();
    current
        .iter()
        .filter_map(|point| {
            let position = position_in_year(granularity, point.date, current_start);
            let earlier = by_position.get(&position)?;
            let difference = point.value - earlier.value;
            let percent_change =
                (earlier.value != 0.0).then(|| difference / earlier.value.abs() * 100.0);
            Some(ComparisonPoint {
                date: point.date,
                previous_date: earlier.date,
                current: point.value,
                previous: earlier.value,
                difference,
                percent_change,
            })
        })
        .collect()
}

/// Running total of a series, keeping dates and flags.
pub fn cumulative(series: &[AggregatedPoint]) -> Vec<AggregatedPoint> {
    series
        .iter()
        .scan(0.0, |total, point| {
            *total += point.value;
            Some(point.with_value(*total))
        })
        .collect()
}
