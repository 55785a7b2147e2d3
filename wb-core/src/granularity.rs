use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar bucket size used for aggregation.
///
/// Buckets are calendar-aligned, never sliding windows:
/// - `Day`: each date on its own
/// - `Dekada`: days 1-10, 11-20 and 21 to the end of the month
/// - `Week`: ISO-8601 weeks starting on Monday
/// - `Month`: calendar months
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum Granularity {
    #[default]
    Day,
    #[serde(alias = "decade")]
    #[cfg_attr(feature = "cli", value(alias = "decade"))]
    Dekada,
    Week,
    Month,
}

impl Granularity {
    /// First calendar date of the bucket holding `date`.
    pub fn bucket_start(self, date: NaiveDate) -> NaiveDate {
        let days_back = match self {
            Granularity::Day => 0,
            Granularity::Dekada => match date.day() {
                1..=10 => date.day() - 1,
                11..=20 => date.day() - 11,
                _ => date.day() - 21,
            },
            Granularity::Week => date.weekday().num_days_from_monday(),
            Granularity::Month => date.day0(),
        };
        date - Days::new(u64::from(days_back))
    }

    /// First calendar date of the bucket following the one holding `date`.
    pub fn next_bucket_start(self, date: NaiveDate) -> NaiveDate {
        let start = self.bucket_start(date);
        match self {
            Granularity::Day => start + Days::new(1),
            Granularity::Week => start + Days::new(7),
            Granularity::Dekada if start.day() < 21 => start + Days::new(10),
            Granularity::Dekada => start - Days::new(20) + Months::new(1),
            Granularity::Month => start + Months::new(1),
        }
    }

    /// Last calendar date of the bucket holding `date`.
    pub fn bucket_end(self, date: NaiveDate) -> NaiveDate {
        self.next_bucket_start(date) - Days::new(1)
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Day => write!(f, "day"),
            Granularity::Dekada => write!(f, "dekada"),
            Granularity::Week => write!(f, "week"),
            Granularity::Month => write!(f, "month"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Granularity;
    use chrono::{Datelike, NaiveDate, Weekday};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_dekada_boundaries() {
        let g = Granularity::Dekada;
        assert_eq!(g.bucket_start(ymd(2024, 1, 10)), ymd(2024, 1, 1));
        assert_eq!(g.bucket_start(ymd(2024, 1, 11)), ymd(2024, 1, 11));
        assert_eq!(g.bucket_start(ymd(2024, 1, 20)), ymd(2024, 1, 11));
        assert_eq!(g.bucket_start(ymd(2024, 1, 31)), ymd(2024, 1, 21));
        assert_eq!(g.bucket_end(ymd(2024, 1, 21)), ymd(2024, 1, 31));
        assert_eq!(g.bucket_end(ymd(2023, 2, 25)), ymd(2023, 2, 28));
        assert_eq!(g.bucket_end(ymd(2024, 2, 25)), ymd(2024, 2, 29));
        assert_eq!(g.next_bucket_start(ymd(2023, 12, 30)), ymd(2024, 1, 1));
    }

    #[test]
    fn test_last_dekada_length_varies() {
        let g = Granularity::Dekada;
        let lengths: Vec<i64> = [(2023, 2), (2024, 2), (2024, 4), (2024, 1)]
            .iter()
            .map(|&(y, m)| {
                let start = ymd(y, m, 21);
                (g.bucket_end(start) - start).num_days() + 1
            })
            .collect();
        assert_eq!(lengths, vec![8, 9, 10, 11]);
    }

    #[test]
    fn test_week_is_iso_monday_aligned() {
        let g = Granularity::Week;
        // 2024-01-03 is a Wednesday
        let start = g.bucket_start(ymd(2024, 1, 3));
        assert_eq!(start, ymd(2024, 1, 1));
        assert_eq!(start.weekday(), Weekday::Mon);
        assert_eq!(g.bucket_start(ymd(2024, 1, 7)), ymd(2024, 1, 1));
        assert_eq!(g.bucket_start(ymd(2024, 1, 8)), ymd(2024, 1, 8));
        // weeks cross month and year boundaries
        assert_eq!(g.bucket_start(ymd(2023, 1, 1)), ymd(2022, 12, 26));
        assert_eq!(g.bucket_end(ymd(2023, 1, 1)), ymd(2023, 1, 1));
    }

    #[test]
    fn test_month_and_day() {
        assert_eq!(Granularity::Month.bucket_start(ymd(2024, 3, 17)), ymd(2024, 3, 1));
        assert_eq!(Granularity::Month.bucket_end(ymd(2024, 3, 17)), ymd(2024, 3, 31));
        assert_eq!(Granularity::Month.next_bucket_start(ymd(2023, 12, 5)), ymd(2024, 1, 1));
        assert_eq!(Granularity::Day.bucket_start(ymd(2024, 3, 17)), ymd(2024, 3, 17));
        assert_eq!(Granularity::Day.bucket_end(ymd(2024, 3, 17)), ymd(2024, 3, 17));
    }

    #[test]
    fn test_every_day_falls_in_exactly_one_bucket() {
        let last = ymd(2024, 9, 30);
        for g in [
            Granularity::Day,
            Granularity::Dekada,
            Granularity::Week,
            Granularity::Month,
        ] {
            for date in ymd(2023, 10, 1).iter_days().take_while(|d| *d <= last) {
                let start = g.bucket_start(date);
                assert!(start <= date && date <= g.bucket_end(date), "{g} {date}");
                assert_eq!(g.bucket_start(start), start);
            }
        }
    }

    #[test]
    fn test_serde_names() {
        let parsed: Granularity = serde_json::from_str("\"decade\"").unwrap();
        assert_eq!(parsed, Granularity::Dekada);
        assert_eq!(
            serde_json::to_string(&Granularity::Month).unwrap(),
            "\"month\""
        );
    }
}
