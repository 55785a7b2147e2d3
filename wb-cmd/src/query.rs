//! Query flags shared by the analysis subcommands.

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::Args;
use log::info;
use std::path::PathBuf;
use wb_analytics::catalog;
use wb_core::{Granularity, Measurement, Period, QueryConfig, UnitMode, WaterYear};

#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Measurement CSV, optionally gzip compressed (.gz)
    #[arg(short, long)]
    pub input: PathBuf,

    /// JSON file holding the whole query; the query flags below are ignored
    #[arg(long)]
    pub query_file: Option<PathBuf>,

    /// Object name (reservoir, gauge, canal); empty matches all
    #[arg(short, long, default_value = "")]
    pub object: String,

    /// Measure name fragment, case-insensitive; empty matches all
    #[arg(short, long, default_value = "")]
    pub measure: String,

    /// Water year label such as 2023/2024 (default: latest in the data)
    #[arg(short, long)]
    pub water_year: Option<WaterYear>,

    #[arg(short, long, value_enum, default_value_t = Period::FullYear)]
    pub period: Period,

    /// First day of a custom period (YYYY-MM-DD); implies --period custom
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last day of a custom period (YYYY-MM-DD); implies --period custom
    #[arg(long)]
    pub end: Option<NaiveDate>,

    #[arg(short, long, value_enum, default_value_t = Granularity::Day)]
    pub granularity: Granularity,

    #[arg(short, long = "unit", value_enum, default_value_t = UnitMode::Native)]
    pub unit_mode: UnitMode,

    /// Shift the window by whole water years, -1 for the year before
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub year_offset: i32,
}

impl QueryArgs {
    /// Build and validate the query configuration.
    ///
    /// `measurements` supply the default water year when none is given.
    pub fn to_config(&self, measurements: &[Measurement]) -> anyhow::Result<QueryConfig> {
        let config = match &self.query_file {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read query file {}", path.display()))?;
                serde_json::from_str::<QueryConfig>(&text)
                    .with_context(|| format!("Failed to parse query file {}", path.display()))?
            }
            None => self.config_from_flags(measurements)?,
        };
        config.validate()?;
        info!(
            "Query {:?}/{:?} water year {} ({:?}, {:?}, offset {})",
            config.object,
            config.measure,
            config.water_year,
            config.period,
            config.granularity,
            config.year_offset
        );
        Ok(config)
    }

    fn config_from_flags(&self, measurements: &[Measurement]) -> anyhow::Result<QueryConfig> {
        let water_year = match self.water_year {
            Some(water_year) => water_year,
            None => match catalog::water_years(measurements).last() {
                Some(latest) => *latest,
                None => bail!("No measurements to take a default water year from"),
            },
        };
        let period = if self.start.is_some() || self.end.is_some() {
            Period::Custom
        } else {
            self.period
        };
        Ok(QueryConfig {
            period,
            custom_start: self.start,
            custom_end: self.end,
            ..QueryConfig::new(&self.object, &self.measure, water_year)
                .with_granularity(self.granularity)
                .with_unit_mode(self.unit_mode)
                .with_year_offset(self.year_offset)
        })
    }
}
