//! Lagged Pearson correlation between two bucketed series.
//!
//! At lag `k`, value `a[i]` is paired with `b[i + k]`. A positive best lag
//! therefore means series B follows series A by `k` buckets (A leads), a
//! negative one that B runs ahead of A.

use crate::aggregation::AggregatedPoint;
use chrono::NaiveDate;
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;
use wb_core::Granularity;

/// Fewest overlapping pairs a coefficient is reported for.
pub const MIN_OVERLAP: usize = 3;

/// Two coefficients closer than this are treated as tied.
const TIE_TOLERANCE: f64 = 1e-12;

/// Coefficient at a single lag; `None` when the overlap is too short or flat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LagCoefficient {
    pub lag: isize,
    pub coefficient: Option<f64>,
    /// Number of pairs with both values present
    pub overlap: usize,
}

/// Which series moves first at the best lag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Leader {
    SeriesA,
    SeriesB,
    Simultaneous,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BestLag {
    pub lag: isize,
    pub coefficient: f64,
}

impl BestLag {
    pub fn leader(&self) -> Leader {
        match self.lag {
            lag if lag > 0 => Leader::SeriesA,
            lag if lag < 0 => Leader::SeriesB,
            _ => Leader::Simultaneous,
        }
    }

    /// Whether the two series move in the same direction at the best lag.
    pub fn is_positive(&self) -> bool {
        self.coefficient > 0.0
    }
}

/// Coefficients for every lag in `[-max_lag, max_lag]` and the strongest one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossCorrelation {
    pub max_lag: usize,
    pub lags: Vec<LagCoefficient>,
    /// `None` when no lag had enough overlap
    pub best: Option<BestLag>,
}

impl CrossCorrelation {
    pub fn is_empty(&self) -> bool {
        self.best.is_none()
    }

    pub fn coefficient_at(&self, lag: isize) -> Option<f64> {
        self.lags
            .iter()
            .find(|entry| entry.lag == lag)
            .and_then(|entry| entry.coefficient)
    }
}

/// Pearson correlation of paired values.
///
/// `None` for fewer than two pairs or when either side has zero variance.
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    Some((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

/// Cross-correlate two positional series with gaps.
///
/// Lags at or past the length of the longer series have no overlap and are
/// not listed; `max_lag` is still reported as requested.
pub fn cross_correlate(a: &[Option<f64>], b: &[Option<f64>], max_lag: usize) -> CrossCorrelation {
    let scanned = max_lag.min(a.len().max(b.len()));
    let limit = isize::try_from(scanned).unwrap_or(isize::MAX);
    let mut lags = Vec::with_capacity(2 * scanned + 1);
    let mut best: Option<BestLag> = None;

    for lag in -limit..=limit {
        let pairs: Vec<(f64, f64)> = a
            .iter()
            .enumerate()
            .filter_map(|(i, x)| {
                let j = usize::try_from(i as isize + lag).ok()?;
                Some(((*x)?, (*b.get(j)?)?))
            })
            .collect();
        let overlap = pairs.len();
        let coefficient = if overlap >= MIN_OVERLAP {
            pearson(&pairs)
        } else {
            None
        };
        if let Some(r) = coefficient {
            let better = match best {
                None => true,
                Some(current) => {
                    let gain = r.abs() - current.coefficient.abs();
                    gain > TIE_TOLERANCE
                        || (gain.abs() <= TIE_TOLERANCE && lag.abs() < current.lag.abs())
                }
            };
            if better {
                best = Some(BestLag {
                    lag,
                    coefficient: r,
                });
            }
        }
        lags.push(LagCoefficient {
            lag,
            coefficient,
            overlap,
        });
    }

    debug!(
        "Cross-correlation over {} lags, best {:?}",
        lags.len(),
        best
    );
    CrossCorrelation {
        max_lag,
        lags,
        best,
    }
}

/// Place two aggregated series on the shared calendar bucket grid.
///
/// The grid runs from the earliest to the latest bucket of either series;
/// buckets a series has no point for are `None`.
pub fn align_on_grid(
    a: &[AggregatedPoint],
    b: &[AggregatedPoint],
    granularity: Granularity,
) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let starts = a
        .iter()
        .chain(b.iter())
        .map(|point| granularity.bucket_start(point.date));
    let (first, last) = match starts.fold(None, |acc: Option<(NaiveDate, NaiveDate)>, date| {
        Some(match acc {
            None => (date, date),
            Some((lo, hi)) => (lo.min(date), hi.max(date)),
        })
    }) {
        Some(bounds) => bounds,
        None => return (Vec::new(), Vec::new()),
    };

    let mut slots: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    let mut cursor = first;
    while cursor <= last {
        slots.insert(cursor, slots.len());
        cursor = granularity.next_bucket_start(cursor);
    }

    let place = |points: &[AggregatedPoint]| {
        let mut grid = vec![None; slots.len()];
        for point in points {
            if let Some(&slot) = slots.get(&granularity.bucket_start(point.date)) {
                grid[slot] = Some(point.value);
            }
        }
        grid
    };
    (place(a), place(b))
}

/// Cross-correlate two aggregated series of the same granularity.
pub fn correlate_series(
    a: &[AggregatedPoint],
    b: &[AggregatedPoint],
    granularity: Granularity,
    max_lag: usize,
) -> CrossCorrelation {
    let (grid_a, grid_b) = align_on_grid(a, b, granularity);
    cross_correlate(&grid_a, &grid_b, max_lag)
}
