//! Resolution of a [`QueryConfig`] into predicates over measurements.
//!
//! # Water Year Convention
//!
//! Water year `S/E` shifted by offset `o` admits a date when its month is
//! October-December and its year is `S+o`, or its month is January-September
//! and its year is `E+o`. Seasonal periods narrow that by month; the custom
//! period replaces it with explicit calendar dates.

use crate::{
    date_range::DateRange,
    error::{QueryError, Result},
    measurement::Measurement,
    period::Period,
    query::QueryConfig,
    water_year::WaterYear,
};
use chrono::{Datelike, NaiveDate};
use log::debug;
use wb_utils::dates::shift_years;

/// The calendar part of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
    /// A (possibly offset) water year narrowed by a seasonal period
    Season {
        water_year: WaterYear,
        period: Period,
    },
    /// Explicit inclusive calendar dates
    Range(DateRange),
}

impl DateFilter {
    pub fn resolve(config: &QueryConfig) -> Result<DateFilter> {
        match config.period {
            Period::Custom => {
                let (start, end) = match (config.custom_start, config.custom_end) {
                    (Some(start), Some(end)) => (start, end),
                    _ => return Err(QueryError::MissingCustomBound),
                };
                if start > end {
                    return Err(QueryError::InvertedCustomRange { start, end });
                }
                // custom bounds follow the offset so previous-year comparison works
                let shift = |date: NaiveDate| {
                    shift_years(&date, config.year_offset)
                        .ok_or(QueryError::OffsetOutOfRange(config.year_offset))
                };
                Ok(DateFilter::Range(DateRange(shift(start)?, shift(end)?)))
            }
            period => Ok(DateFilter::Season {
                water_year: config
                    .water_year
                    .offset(config.year_offset)
                    .ok_or(QueryError::OffsetOutOfRange(config.year_offset))?,
                period,
            }),
        }
    }

    /// First calendar day of the window.
    pub fn first_day(&self) -> Option<NaiveDate> {
        match self {
            DateFilter::Season { water_year, .. } => water_year.first_day(),
            DateFilter::Range(range) => Some(range.0),
        }
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        match self {
            DateFilter::Season { water_year, period } => {
                water_year.contains(date) && period.admits_month(date.month())
            }
            DateFilter::Range(range) => range.contains(date),
        }
    }
}

/// Object, measure and date predicate for a query.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementFilter {
    object: String,
    measure: String,
    dates: DateFilter,
}

impl MeasurementFilter {
    pub fn new(config: &QueryConfig) -> Result<MeasurementFilter> {
        let dates = DateFilter::resolve(config)?;
        debug!("Resolved {:?} for object {:?}", dates, config.object);
        Ok(MeasurementFilter {
            object: config.object.clone(),
            measure: config.measure.to_lowercase(),
            dates,
        })
    }

    pub fn dates(&self) -> &DateFilter {
        &self.dates
    }

    pub fn matches(&self, measurement: &Measurement) -> bool {
        (self.object.is_empty() || measurement.object == self.object)
            && (self.measure.is_empty()
                || measurement.measure.to_lowercase().contains(&self.measure))
            && self.dates.contains(&measurement.date)
    }

    /// Measurements admitted by the filter, in input order.
    pub fn apply<'a>(&self, measurements: &'a [Measurement]) -> Vec<&'a Measurement> {
        measurements.iter().filter(|m| self.matches(m)).collect()
    }
}
