//! End-to-end queries: filter, aggregate, convert.
//!
//! Each function resolves the configuration first, so a malformed
//! configuration fails before any data is touched.

use crate::aggregation::{aggregate, AggregatedPoint};
use crate::comparison::{compare, ComparisonPoint};
use crate::correlation::{correlate_series, CrossCorrelation};
use crate::seasonality::{seasonal_profile, MonthlyMean};
use crate::units::{convert_series, converts_to_volume};
use chrono::NaiveDate;
use log::{debug, info};
use serde::Serialize;
use wb_core::{error::Result, Measurement, MeasurementFilter, QueryConfig, QueryError, UnitMode};

/// Raw measurements admitted by the configuration, in input order.
pub fn filter<'a>(
    measurements: &'a [Measurement],
    config: &QueryConfig,
) -> Result<Vec<&'a Measurement>> {
    let selected = MeasurementFilter::new(config)?.apply(measurements);
    debug!(
        "{} of {} measurements match {:?}/{:?}",
        selected.len(),
        measurements.len(),
        config.object,
        config.measure
    );
    Ok(selected)
}

/// The aggregated, unit-converted series for a configuration.
///
/// Points of a configuration with a negative year offset carry the
/// previous-year flag.
pub fn series(
    measurements: &[Measurement],
    config: &QueryConfig,
) -> Result<Vec<AggregatedPoint>> {
    let selected = filter(measurements, config)?;
    let mut points = aggregate(selected, config.granularity);
    if converts_to_volume(config) {
        points = convert_series(&points, config.granularity);
    }
    if config.is_previous() {
        points = points.into_iter().map(AggregatedPoint::as_previous).collect();
    }
    Ok(points)
}

/// The same series one water year earlier.
pub fn previous_series(
    measurements: &[Measurement],
    config: &QueryConfig,
) -> Result<Vec<AggregatedPoint>> {
    series(measurements, &config.previous_year()?)
}

/// Monthly profile of the filtered readings.
///
/// Means are converted only when volume is asked for explicitly; a volume
/// measure on its own does not convert the profile.
pub fn seasonality(
    measurements: &[Measurement],
    config: &QueryConfig,
) -> Result<Vec<MonthlyMean>> {
    let selected = filter(measurements, config)?;
    Ok(seasonal_profile(selected, config.unit_mode == UnitMode::Volume))
}

/// First day of the window a configuration selects.
fn window_start(config: &QueryConfig) -> Result<NaiveDate> {
    MeasurementFilter::new(config)?
        .dates()
        .first_day()
        .ok_or(QueryError::OffsetOutOfRange(config.year_offset))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearOverYear {
    pub current: Vec<AggregatedPoint>,
    pub previous: Vec<AggregatedPoint>,
    pub comparison: Vec<ComparisonPoint>,
}

pub fn year_over_year(measurements: &[Measurement], config: &QueryConfig) -> Result<YearOverYear> {
    let previous_config = config.previous_year()?;
    let current = series(measurements, config)?;
    let previous = series(measurements, &previous_config)?;
    let comparison = compare(
        &current,
        &previous,
        config.granularity,
        window_start(config)?,
        window_start(&previous_config)?,
    );
    info!(
        "Compared {} current and {} previous points, {} aligned",
        current.len(),
        previous.len(),
        comparison.len()
    );
    Ok(YearOverYear {
        current,
        previous,
        comparison,
    })
}

/// Lag correlation between the series of two configurations.
///
/// Both series are bucketed at the granularity of `a`.
pub fn lag_analysis(
    measurements: &[Measurement],
    a: &QueryConfig,
    b: &QueryConfig,
    max_lag: usize,
) -> Result<CrossCorrelation> {
    let b = QueryConfig {
        granularity: a.granularity,
        ..b.clone()
    };
    let series_a = series(measurements, a)?;
    let series_b = series(measurements, &b)?;
    let result = correlate_series(&series_a, &series_b, a.granularity, max_lag);
    info!(
        "Correlated {:?} ({} points) with {:?} ({} points), best {:?}",
        a.object,
        series_a.len(),
        b.object,
        series_b.len(),
        result.best
    );
    Ok(result)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectSeries {
    pub object: String,
    pub points: Vec<AggregatedPoint>,
}

/// The configuration evaluated for each object in turn.
pub fn series_by_object(
    measurements: &[Measurement],
    config: &QueryConfig,
    objects: &[String],
) -> Result<Vec<ObjectSeries>> {
    objects
        .iter()
        .map(|object| {
            Ok(ObjectSeries {
                object: object.clone(),
                points: series(measurements, &config.for_object(object))?,
            })
        })
        .collect()
}
