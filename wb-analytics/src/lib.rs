//! Analytics over hydrological measurements.
//!
//! This crate turns a filtered measurement slice into calendar-bucketed
//! series and derives everything the dashboard views consume from them:
//! unit-converted values, descriptive statistics, seasonality, year-over-year
//! comparison and lag correlation between two series.
//!
//! All functions are pure over borrowed input; the measurement sequence is
//! never mutated, so independent queries can run concurrently.

pub mod aggregation;
pub mod catalog;
pub mod comparison;
pub mod correlation;
pub mod pipeline;
pub mod seasonality;
pub mod statistics;
pub mod units;

pub use aggregation::{aggregate, bucketize, AggregatedPoint, Bucket};
pub use correlation::{correlate_series, cross_correlate, CrossCorrelation};
pub use statistics::{Kpi, Statistics};
