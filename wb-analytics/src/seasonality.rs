//! Mean value per calendar month.

use crate::units::{conversion_days, flow_to_million_m3};
use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;
use wb_core::{Granularity, Measurement};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyMean {
    /// Calendar month, 1 = January
    pub month: u32,
    pub value: f64,
    /// Present readings behind the mean
    pub count: usize,
}

/// Mean of the present readings per calendar month, January first.
///
/// Months without a numeric reading are left out. When `to_volume` is set
/// each mean is converted as a flat 30-day month.
pub fn seasonal_profile<'a, I>(measurements: I, to_volume: bool) -> Vec<MonthlyMean>
where
    I: IntoIterator<Item = &'a Measurement>,
{
    let mut months: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for measurement in measurements {
        if let Some(value) = measurement.reading().value() {
            let entry = months.entry(measurement.date.month()).or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }
    }
    months
        .into_iter()
        .map(|(month, (sum, count))| {
            let mean = sum / count as f64;
            let value = if to_volume {
                flow_to_million_m3(mean, conversion_days(Granularity::Month))
            } else {
                mean
            };
            MonthlyMean { month, value, count }
        })
        .collect()
}
