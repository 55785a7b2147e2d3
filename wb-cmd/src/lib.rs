//! Command implementations for the WB CLI.
//!
//! Every subcommand loads a measurement CSV, resolves a query and prints a
//! JSON report to stdout.

use anyhow::Context;
use clap::Subcommand;
use log::info;
use std::io;
use std::path::{Path, PathBuf};
use wb_analytics::comparison::cumulative;
use wb_analytics::units::output_unit;
use wb_analytics::{catalog, pipeline, Kpi, Statistics};
use wb_core::QueryConfig;

pub mod input;
pub mod query;
pub mod report;

use input::load_measurements;
use query::QueryArgs;
use report::{
    emit, CatalogEntry, CatalogReport, CompareReport, LagReport, SeasonalityReport, SeriesReport,
    StatsReport,
};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Aggregated series for a query
    Series {
        #[command(flatten)]
        query: QueryArgs,

        /// Also compute the same series one water year earlier
        #[arg(long)]
        compare_previous: bool,

        /// Evaluate the query for these objects as well (repeatable)
        #[arg(long = "with-object")]
        with_objects: Vec<String>,
    },

    /// Descriptive statistics and KPIs for a query
    Stats {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Lag correlation between the query's series and a second object/measure
    Lag {
        #[command(flatten)]
        query: QueryArgs,

        /// Object of the second series (default: same object)
        #[arg(long)]
        other_object: Option<String>,

        /// Measure of the second series (default: same measure)
        #[arg(long)]
        other_measure: Option<String>,

        /// Largest lag in buckets, searched in both directions
        #[arg(long, default_value_t = 10)]
        max_lag: usize,
    },

    /// Mean per calendar month
    Seasonality {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Bucket-by-bucket comparison with the previous water year
    Compare {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Filtered raw rows as CSV, for export
    Rows {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Objects, measures and water years present in a measurement CSV
    Catalog {
        /// Measurement CSV, optionally gzip compressed (.gz)
        #[arg(short, long)]
        input: PathBuf,

        /// Objects listed first, in this order (comma separated)
        #[arg(long, value_delimiter = ',')]
        priority: Vec<String>,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Series {
            query,
            compare_previous,
            with_objects,
        } => run_series(&query, compare_previous, &with_objects),
        Command::Stats { query } => run_stats(&query),
        Command::Lag {
            query,
            other_object,
            other_measure,
            max_lag,
        } => run_lag(&query, other_object, other_measure, max_lag),
        Command::Seasonality { query } => run_seasonality(&query),
        Command::Compare { query } => run_compare(&query),
        Command::Rows { query } => run_rows(&query),
        Command::Catalog { input, priority } => run_catalog(&input, &priority),
    }
}

fn run_series(
    args: &QueryArgs,
    compare_previous: bool,
    with_objects: &[String],
) -> anyhow::Result<()> {
    let measurements = load_measurements(&args.input)?.measurements;
    let config = args.to_config(&measurements)?;
    let points = pipeline::series(&measurements, &config)?;
    let previous = if compare_previous {
        Some(pipeline::previous_series(&measurements, &config)?)
    } else {
        None
    };
    let objects = pipeline::series_by_object(&measurements, &config, with_objects)?;
    info!("Series has {} points", points.len());
    emit(&SeriesReport {
        query: &config,
        unit: output_unit(&config),
        kpi: Kpi::of_series(&points),
        cumulative: cumulative(&points),
        points,
        previous,
        objects,
    })
}

fn run_stats(args: &QueryArgs) -> anyhow::Result<()> {
    let measurements = load_measurements(&args.input)?.measurements;
    let config = args.to_config(&measurements)?;
    let points = pipeline::series(&measurements, &config)?;
    let readings = pipeline::filter(&measurements, &config)?
        .into_iter()
        .map(|m| m.reading());
    let series = Statistics::of_series(&points);
    emit(&StatsReport {
        query: &config,
        unit: output_unit(&config),
        series,
        readings: Statistics::from_readings(readings),
        kpi: Kpi::from(&series),
    })
}

fn run_lag(
    args: &QueryArgs,
    other_object: Option<String>,
    other_measure: Option<String>,
    max_lag: usize,
) -> anyhow::Result<()> {
    let measurements = load_measurements(&args.input)?.measurements;
    let config = args.to_config(&measurements)?;
    let other = QueryConfig {
        object: other_object.unwrap_or_else(|| config.object.clone()),
        measure: other_measure.unwrap_or_else(|| config.measure.clone()),
        ..config.clone()
    };
    let correlation = pipeline::lag_analysis(&measurements, &config, &other, max_lag)?;
    emit(&LagReport {
        series_a: &config,
        series_b: &other,
        leader: correlation.best.map(|best| best.leader()),
        correlation,
    })
}

fn run_seasonality(args: &QueryArgs) -> anyhow::Result<()> {
    let measurements = load_measurements(&args.input)?.measurements;
    let config = args.to_config(&measurements)?;
    emit(&SeasonalityReport {
        query: &config,
        unit: output_unit(&config),
        months: pipeline::seasonality(&measurements, &config)?,
    })
}

fn run_compare(args: &QueryArgs) -> anyhow::Result<()> {
    let measurements = load_measurements(&args.input)?.measurements;
    let config = args.to_config(&measurements)?;
    let result = pipeline::year_over_year(&measurements, &config)?;
    emit(&CompareReport {
        query: &config,
        unit: output_unit(&config),
        current_kpi: Kpi::of_series(&result.current),
        previous_kpi: Kpi::of_series(&result.previous),
        comparison: result.comparison,
    })
}

fn run_rows(args: &QueryArgs) -> anyhow::Result<()> {
    let measurements = load_measurements(&args.input)?.measurements;
    let config = args.to_config(&measurements)?;
    let selected = pipeline::filter(&measurements, &config)?;
    let mut wtr = csv::Writer::from_writer(io::stdout().lock());
    for measurement in &selected {
        wtr.serialize(measurement)
            .context("Failed to write measurement row")?;
    }
    wtr.flush()?;
    info!("Wrote {} rows", selected.len());
    Ok(())
}

fn run_catalog(input: &Path, priority: &[String]) -> anyhow::Result<()> {
    let table = load_measurements(input)?;
    let priority: Vec<&str> = priority.iter().map(String::as_str).collect();
    let objects = catalog::objects(&table.measurements, &priority)
        .into_iter()
        .map(|object| CatalogEntry {
            measures: catalog::measures(&table.measurements, &object),
            object,
        })
        .collect();
    emit(&CatalogReport {
        objects,
        water_years: catalog::water_years(&table.measurements),
        measurements: table.measurements.len(),
        skipped_rows: table.skipped_rows,
    })
}
