//! JSON documents printed by the subcommands.

use serde::Serialize;
use std::io::{self, Write};
use wb_analytics::comparison::ComparisonPoint;
use wb_analytics::correlation::Leader;
use wb_analytics::pipeline::ObjectSeries;
use wb_analytics::seasonality::MonthlyMean;
use wb_analytics::units::OutputUnit;
use wb_analytics::{AggregatedPoint, CrossCorrelation, Kpi, Statistics};
use wb_core::{QueryConfig, WaterYear};

#[derive(Debug, Serialize)]
pub struct SeriesReport<'a> {
    pub query: &'a QueryConfig,
    pub unit: OutputUnit,
    pub kpi: Kpi,
    pub points: Vec<AggregatedPoint>,
    pub cumulative: Vec<AggregatedPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<Vec<AggregatedPoint>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub objects: Vec<ObjectSeries>,
}

#[derive(Debug, Serialize)]
pub struct StatsReport<'a> {
    pub query: &'a QueryConfig,
    pub unit: OutputUnit,
    /// Over the aggregated series
    pub series: Statistics,
    /// Over the raw readings before aggregation
    pub readings: Statistics,
    pub kpi: Kpi,
}

#[derive(Debug, Serialize)]
pub struct LagReport<'a> {
    pub series_a: &'a QueryConfig,
    pub series_b: &'a QueryConfig,
    pub leader: Option<Leader>,
    pub correlation: CrossCorrelation,
}

#[derive(Debug, Serialize)]
pub struct SeasonalityReport<'a> {
    pub query: &'a QueryConfig,
    pub unit: OutputUnit,
    pub months: Vec<MonthlyMean>,
}

#[derive(Debug, Serialize)]
pub struct CompareReport<'a> {
    pub query: &'a QueryConfig,
    pub unit: OutputUnit,
    pub current_kpi: Kpi,
    pub previous_kpi: Kpi,
    pub comparison: Vec<ComparisonPoint>,
}

#[derive(Debug, Serialize)]
pub struct CatalogEntry {
    pub object: String,
    pub measures: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CatalogReport {
    pub objects: Vec<CatalogEntry>,
    pub water_years: Vec<WaterYear>,
    pub measurements: usize,
    pub skipped_rows: usize,
}

/// Pretty-print a report to stdout.
pub fn emit<T: Serialize>(report: &T) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, report)?;
    writeln!(out)?;
    Ok(())
}
