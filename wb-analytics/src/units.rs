//! Conversion from averaged flow rate (m³/s) to accumulated volume (million m³).

use crate::aggregation::AggregatedPoint;
use serde::Serialize;
use wb_core::{Granularity, QueryConfig, UnitMode};

pub const SECONDS_PER_DAY: f64 = 86_400.0;
pub const CUBIC_METRES_PER_MILLION: f64 = 1_000_000.0;

/// Measure-name fragments that mark a volume quantity (lowercase).
const VOLUME_MARKERS: [&str; 3] = ["объем", "объём", "volume"];

/// Unit of a reported series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutputUnit {
    #[serde(rename = "m3/s")]
    CubicMetresPerSecond,
    #[serde(rename = "million-m3")]
    MillionCubicMetres,
}

/// Volume in million m³ accumulated by a mean flow of `value` m³/s over `days` days.
pub fn flow_to_million_m3(value: f64, days: f64) -> f64 {
    value * days * SECONDS_PER_DAY / CUBIC_METRES_PER_MILLION
}

/// Days a bucket of `granularity` stands for when converting.
///
/// Months are a flat 30 days and dekadas a flat 10, whatever the calendar
/// length of the bucket. Historical exports were produced this way.
pub fn conversion_days(granularity: Granularity) -> f64 {
    match granularity {
        Granularity::Day => 1.0,
        Granularity::Week => 7.0,
        Granularity::Dekada => 10.0,
        Granularity::Month => 30.0,
    }
}

pub fn is_volume_measure(measure: &str) -> bool {
    let lower = measure.to_lowercase();
    VOLUME_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Whether a query's series is reported as volume.
pub fn converts_to_volume(config: &QueryConfig) -> bool {
    config.unit_mode == UnitMode::Volume || is_volume_measure(&config.measure)
}

pub fn output_unit(config: &QueryConfig) -> OutputUnit {
    if converts_to_volume(config) {
        OutputUnit::MillionCubicMetres
    } else {
        OutputUnit::CubicMetresPerSecond
    }
}

/// Rescale every point of a series produced at `granularity`.
pub fn convert_series(
    points: &[AggregatedPoint],
    granularity: Granularity,
) -> Vec<AggregatedPoint> {
    let days = conversion_days(granularity);
    points
        .iter()
        .map(|point| point.with_value(flow_to_million_m3(point.value, days)))
        .collect()
}
