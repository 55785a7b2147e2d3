use crate::{
    error::{QueryError, Result},
    granularity::Granularity,
    period::Period,
    resolver::DateFilter,
    water_year::WaterYear,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Unit the aggregated values are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum UnitMode {
    /// Whatever the measurements carry, typically m³/s
    #[default]
    #[serde(alias = "m3/s")]
    Native,
    /// Accumulated volume in million m³
    #[serde(alias = "million-m3")]
    Volume,
}

/// An immutable description of one analytical slice of the measurements.
///
/// Every computation takes the configuration by reference; comparing two
/// objects or two years means building two configurations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Exact object name; empty matches every object
    #[serde(default)]
    pub object: String,
    /// Case-insensitive substring of the measure name; empty matches every measure
    #[serde(default)]
    pub measure: String,
    pub water_year: WaterYear,
    #[serde(default)]
    pub period: Period,
    /// Used only when `period` is `Custom`
    #[serde(default)]
    pub custom_start: Option<NaiveDate>,
    /// Used only when `period` is `Custom`
    #[serde(default)]
    pub custom_end: Option<NaiveDate>,
    #[serde(default)]
    pub granularity: Granularity,
    #[serde(default)]
    pub unit_mode: UnitMode,
    /// 0 for the labelled water year, -1 for the one before it
    #[serde(default)]
    pub year_offset: i32,
}

impl QueryConfig {
    pub fn new(object: &str, measure: &str, water_year: WaterYear) -> QueryConfig {
        QueryConfig {
            object: object.to_string(),
            measure: measure.to_string(),
            water_year,
            period: Period::FullYear,
            custom_start: None,
            custom_end: None,
            granularity: Granularity::Day,
            unit_mode: UnitMode::Native,
            year_offset: 0,
        }
    }

    pub fn with_period(mut self, period: Period) -> QueryConfig {
        self.period = period;
        self
    }

    /// Select the custom period with the given inclusive bounds.
    pub fn with_custom_range(mut self, start: NaiveDate, end: NaiveDate) -> QueryConfig {
        self.period = Period::Custom;
        self.custom_start = Some(start);
        self.custom_end = Some(end);
        self
    }

    pub fn with_granularity(mut self, granularity: Granularity) -> QueryConfig {
        self.granularity = granularity;
        self
    }

    pub fn with_unit_mode(mut self, unit_mode: UnitMode) -> QueryConfig {
        self.unit_mode = unit_mode;
        self
    }

    pub fn with_year_offset(mut self, year_offset: i32) -> QueryConfig {
        self.year_offset = year_offset;
        self
    }

    /// This query for a different object.
    pub fn for_object(&self, object: &str) -> QueryConfig {
        QueryConfig {
            object: object.to_string(),
            ..self.clone()
        }
    }

    /// The same slice one water year earlier.
    pub fn previous_year(&self) -> Result<QueryConfig> {
        let year_offset = self
            .year_offset
            .checked_sub(1)
            .ok_or(QueryError::OffsetOutOfRange(self.year_offset))?;
        Ok(self.clone().with_year_offset(year_offset))
    }

    /// Whether this configuration describes a comparison series.
    pub fn is_previous(&self) -> bool {
        self.year_offset < 0
    }

    /// Fail fast on a configuration that cannot be resolved.
    pub fn validate(&self) -> Result<()> {
        DateFilter::resolve(self).map(|_| ())
    }
}
