//! Calendar bucketing and reduction of measurements.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use wb_core::{Granularity, Measurement, Reading};

/// A calendar sub-range and the readings whose date falls inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub readings: Vec<Reading>,
}

impl Bucket {
    /// Mean of the present readings; `None` when every reading is missing.
    pub fn mean(&self) -> Option<f64> {
        let (sum, count) = self
            .readings
            .iter()
            .filter_map(|reading| reading.value())
            .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
        (count > 0).then(|| sum / count as f64)
    }
}

/// One bucket reduced to a value, dated by the bucket's first calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregatedPoint {
    pub date: NaiveDate,
    pub value: f64,
    /// Set on points of a previous-water-year comparison series
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_previous: bool,
}

impl AggregatedPoint {
    pub fn new(date: NaiveDate, value: f64) -> AggregatedPoint {
        AggregatedPoint {
            date,
            value,
            is_previous: false,
        }
    }

    pub fn as_previous(self) -> AggregatedPoint {
        AggregatedPoint {
            is_previous: true,
            ..self
        }
    }

    pub fn with_value(self, value: f64) -> AggregatedPoint {
        AggregatedPoint { value, ..self }
    }
}

/// Group measurements into calendar buckets, ascending by start date.
///
/// Every bucket holds at least one reading, though the readings may all be
/// missing.
pub fn bucketize<'a, I>(measurements: I, granularity: Granularity) -> Vec<Bucket>
where
    I: IntoIterator<Item = &'a Measurement>,
{
    let mut buckets: BTreeMap<NaiveDate, Vec<Reading>> = BTreeMap::new();
    for measurement in measurements {
        buckets
            .entry(granularity.bucket_start(measurement.date))
            .or_default()
            .push(measurement.reading());
    }
    buckets
        .into_iter()
        .map(|(start, readings)| Bucket {
            start,
            end: granularity.bucket_end(start),
            readings,
        })
        .collect()
}

/// Bucket measurements and reduce each bucket to its mean.
///
/// Buckets without a single numeric reading are dropped, not emitted as zero.
pub fn aggregate<'a, I>(measurements: I, granularity: Granularity) -> Vec<AggregatedPoint>
where
    I: IntoIterator<Item = &'a Measurement>,
{
    bucketize(measurements, granularity)
        .iter()
        .filter_map(|bucket| {
            bucket
                .mean()
                .map(|value| AggregatedPoint::new(bucket.start, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{aggregate, bucketize, AggregatedPoint};
    use chrono::NaiveDate;
    use wb_core::{Granularity, Measurement, Reading};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn m(date: NaiveDate, value: &str) -> Measurement {
        Measurement::new(date, "Андижанское вдхр.", "приток", value)
    }

    #[test]
    fn test_day_aggregation_is_identity_on_distinct_dates() {
        let rows: Vec<Measurement> = (1..=10)
            .map(|d| m(ymd(2024, 1, d), &format!("{}.5", d)))
            .collect();
        let points = aggregate(&rows, Granularity::Day);
        assert_eq!(points.len(), 10);
        for (point, row) in points.iter().zip(rows.iter()) {
            assert_eq!(point.date, row.date);
            assert_eq!(Reading::Present(point.value), row.reading());
            assert!(!point.is_previous);
        }
    }

    #[test]
    fn test_month_mean_ignores_silent_days() {
        let rows = vec![
            m(ymd(2024, 3, 2), "1"),
            m(ymd(2024, 3, 15), "2"),
            m(ymd(2024, 3, 30), "3"),
        ];
        let points = aggregate(&rows, Granularity::Month);
        assert_eq!(points, vec![AggregatedPoint::new(ymd(2024, 3, 1), 2.0)]);
    }

    #[test]
    fn test_missing_values_are_skipped_not_zeroed() {
        let rows = vec![
            m(ymd(2024, 3, 2), "4"),
            m(ymd(2024, 3, 3), ""),
            m(ymd(2024, 3, 4), "abc"),
            m(ymd(2024, 3, 5), "8"),
        ];
        let points = aggregate(&rows, Granularity::Month);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].value, 6.0);
    }

    #[test]
    fn test_all_missing_bucket_is_dropped() {
        let rows = vec![
            m(ymd(2024, 1, 5), "10"),
            m(ymd(2024, 1, 15), "-"),
            m(ymd(2024, 1, 16), ""),
            m(ymd(2024, 1, 25), "30"),
        ];
        let buckets = bucketize(&rows, Granularity::Dekada);
        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[1].mean(), None);

        let points = aggregate(&rows, Granularity::Dekada);
        let dates: Vec<NaiveDate> = points.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![ymd(2024, 1, 1), ymd(2024, 1, 21)]);
    }

    #[test]
    fn test_dekada_buckets() {
        let rows = vec![
            m(ymd(2023, 2, 10), "1"),
            m(ymd(2023, 2, 11), "2"),
            m(ymd(2023, 2, 20), "4"),
            m(ymd(2023, 2, 21), "5"),
            m(ymd(2023, 2, 28), "7"),
        ];
        let buckets = bucketize(&rows, Granularity::Dekada);
        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[2].start, ymd(2023, 2, 21));
        assert_eq!(buckets[2].end, ymd(2023, 2, 28));
        assert_eq!(buckets[2].readings.len(), 2);

        let values: Vec<f64> = aggregate(&rows, Granularity::Dekada)
            .iter()
            .map(|p| p.value)
            .collect();
        assert_eq!(values, vec![1.0, 3.0, 6.0]);
    }

    #[test]
    fn test_week_buckets_start_on_monday() {
        // 2024-01-07 is a Sunday, 2024-01-08 a Monday
        let rows = vec![
            m(ymd(2024, 1, 8), "10"),
            m(ymd(2024, 1, 7), "2"),
            m(ymd(2024, 1, 1), "4"),
        ];
        let points = aggregate(&rows, Granularity::Week);
        assert_eq!(
            points,
            vec![
                AggregatedPoint::new(ymd(2024, 1, 1), 3.0),
                AggregatedPoint::new(ymd(2024, 1, 8), 10.0),
            ]
        );
    }

    #[test]
    fn test_output_is_ascending_for_unsorted_input() {
        let rows = vec![
            m(ymd(2024, 5, 3), "1"),
            m(ymd(2023, 11, 3), "1"),
            m(ymd(2024, 1, 30), "1"),
            m(ymd(2023, 10, 1), "1"),
        ];
        for g in [
            Granularity::Day,
            Granularity::Dekada,
            Granularity::Week,
            Granularity::Month,
        ] {
            let points = aggregate(&rows, g);
            assert!(points.windows(2).all(|w| w[0].date < w[1].date), "{g}");
        }
    }

    #[test]
    fn test_aggregation_is_deterministic() {
        let rows: Vec<Measurement> = (0..200)
            .map(|i| {
                let date = ymd(2023, 10, 1) + chrono::Days::new(i % 120);
                m(date, &format!("{},{}", i * 7 % 13, i % 10))
            })
            .collect();
        let first = aggregate(&rows, Granularity::Dekada);
        let second = aggregate(&rows, Granularity::Dekada);
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.date, b.date);
            assert_eq!(a.value.to_bits(), b.value.to_bits());
        }
    }

    #[test]
    fn test_empty_input() {
        let rows: Vec<Measurement> = Vec::new();
        assert!(aggregate(&rows, Granularity::Month).is_empty());
    }

    #[test]
    fn test_serialize_point() {
        let point = AggregatedPoint::new(ymd(2024, 3, 1), 2.5);
        let json = serde_json::to_value(point).unwrap();
        assert_eq!(json["date"], "2024-03-01");
        assert!(json.get("is_previous").is_none());
        let json = serde_json::to_value(point.as_previous()).unwrap();
        assert_eq!(json["is_previous"], true);
    }
}
