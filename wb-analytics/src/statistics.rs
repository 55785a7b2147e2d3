//! Descriptive statistics over numeric sequences.
//!
//! Standard deviation is the population deviation (divide by N). Percentiles
//! interpolate linearly between closest ranks, rank = p/100 * (N - 1).

use crate::aggregation::AggregatedPoint;
use serde::Serialize;
use wb_core::Reading;

/// Statistics of a non-empty sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub std_dev: f64,
    pub median: f64,
    pub p25: f64,
    pub p75: f64,
}

/// Statistics of a sequence; `summary` is `None` when there are no values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Statistics {
    pub count: usize,
    #[serde(flatten)]
    pub summary: Option<Summary>,
}

impl Statistics {
    /// Statistics over the finite values of `values`.
    pub fn compute(values: &[f64]) -> Statistics {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        sorted.sort_by(f64::total_cmp);
        let count = sorted.len();
        if count == 0 {
            return Statistics::empty();
        }
        let sum: f64 = sorted.iter().sum();
        let mean = sum / count as f64;
        let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;
        let at = |p: f64| percentile(&sorted, p).unwrap_or(mean);
        Statistics {
            count,
            summary: Some(Summary {
                mean,
                min: sorted[0],
                max: sorted[count - 1],
                sum,
                std_dev: variance.sqrt(),
                median: at(50.0),
                p25: at(25.0),
                p75: at(75.0),
            }),
        }
    }

    pub fn empty() -> Statistics {
        Statistics {
            count: 0,
            summary: None,
        }
    }

    /// Statistics over present readings; missing readings are not counted.
    pub fn from_readings<I>(readings: I) -> Statistics
    where
        I: IntoIterator<Item = Reading>,
    {
        let values: Vec<f64> = readings.into_iter().filter_map(Reading::value).collect();
        Statistics::compute(&values)
    }

    /// Statistics over raw value strings.
    pub fn from_raw<'a, I>(raw: I) -> Statistics
    where
        I: IntoIterator<Item = &'a str>,
    {
        Statistics::from_readings(raw.into_iter().map(Reading::parse))
    }

    pub fn of_series(points: &[AggregatedPoint]) -> Statistics {
        let values: Vec<f64> = points.iter().map(|p| p.value).collect();
        Statistics::compute(&values)
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn mean(&self) -> Option<f64> {
        self.summary.map(|s| s.mean)
    }

    pub fn min(&self) -> Option<f64> {
        self.summary.map(|s| s.min)
    }

    pub fn max(&self) -> Option<f64> {
        self.summary.map(|s| s.max)
    }

    pub fn std_dev(&self) -> Option<f64> {
        self.summary.map(|s| s.std_dev)
    }
}

/// The `p`-th percentile (0-100) of an ascending slice.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=100.0).contains(&p) {
        return None;
    }
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Headline figures for the current series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Kpi {
    pub average: Option<f64>,
    pub maximum: Option<f64>,
    pub minimum: Option<f64>,
    pub data_points: usize,
}

impl From<&Statistics> for Kpi {
    fn from(stats: &Statistics) -> Self {
        Kpi {
            average: stats.mean(),
            maximum: stats.max(),
            minimum: stats.min(),
            data_points: stats.count,
        }
    }
}

impl Kpi {
    pub fn of_series(points: &[AggregatedPoint]) -> Kpi {
        Kpi::from(&Statistics::of_series(points))
    }
}
