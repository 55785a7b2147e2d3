use crate::error::QueryError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use wb_utils::dates::water_year_for_date;

/// A hydrological water year, October 1 through September 30, labelled by
/// the two calendar years it straddles ("2023/2024").
///
/// October-December belong to the start year, January-September to the
/// end year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WaterYear {
    start: i32,
}

impl WaterYear {
    pub fn new(start_year: i32) -> WaterYear {
        WaterYear { start: start_year }
    }

    /// The water year holding `date`.
    pub fn containing(date: &NaiveDate) -> WaterYear {
        WaterYear::new(water_year_for_date(date))
    }

    pub fn start_year(&self) -> i32 {
        self.start
    }

    pub fn end_year(&self) -> i32 {
        self.start + 1
    }

    /// The water year `years` later (negative for earlier); `None` when it
    /// falls outside the calendar.
    pub fn offset(self, years: i32) -> Option<WaterYear> {
        let shifted = WaterYear::new(self.start.checked_add(years)?);
        (shifted.first_day().is_some() && shifted.last_day().is_some()).then_some(shifted)
    }

    /// October 1 of the start year.
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.start, 10, 1)
    }

    /// September 30 of the end year.
    pub fn last_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.end_year(), 9, 30)
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        match date.month() {
            10..=12 => date.year() == self.start,
            _ => date.year() == self.end_year(),
        }
    }

    /// Every water year from the one holding the earliest date to the one
    /// holding the latest, ascending. Empty input gives an empty list.
    pub fn spanning<'a, I>(dates: I) -> Vec<WaterYear>
    where
        I: IntoIterator<Item = &'a NaiveDate>,
    {
        let bounds = dates.into_iter().fold(None, |acc, date| match acc {
            None => Some((*date, *date)),
            Some((lo, hi)) => Some((lo.min(*date), hi.max(*date))),
        });
        match bounds {
            Some((lo, hi)) => {
                let first = WaterYear::containing(&lo).start;
                let last = WaterYear::containing(&hi).start;
                (first..=last).map(WaterYear::new).collect()
            }
            None => Vec::new(),
        }
    }
}

impl FromStr for WaterYear {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || QueryError::MalformedWaterYear(s.to_string());
        let (start, end) = s.trim().split_once('/').ok_or_else(malformed)?;
        let start: i32 = start.trim().parse().map_err(|_| malformed())?;
        let end: i32 = end.trim().parse().map_err(|_| malformed())?;
        if start.checked_add(1) != Some(end) {
            return Err(QueryError::NonConsecutiveWaterYear { start, end });
        }
        Ok(WaterYear::new(start))
    }
}

impl TryFrom<String> for WaterYear {
    type Error = QueryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WaterYear> for String {
    fn from(value: WaterYear) -> Self {
        value.to_string()
    }
}

impl fmt::Display for WaterYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.start, self.end_year())
    }
}

#[cfg(test)]
mod tests {
    use super::WaterYear;
    use crate::error::QueryError;
    use chrono::{Datelike, NaiveDate};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_label() {
        let wy: WaterYear = "2023/2024".parse().unwrap();
        assert_eq!(wy.start_year(), 2023);
        assert_eq!(wy.end_year(), 2024);
        assert_eq!(wy.to_string(), "2023/2024");
        assert_eq!(" 2023 / 2024 ".parse::<WaterYear>().unwrap(), wy);
    }

    #[test]
    fn test_parse_rejects_bad_labels() {
        assert_eq!(
            "2023/2025".parse::<WaterYear>(),
            Err(QueryError::NonConsecutiveWaterYear {
                start: 2023,
                end: 2025
            })
        );
        assert_eq!(
            "2024/2023".parse::<WaterYear>(),
            Err(QueryError::NonConsecutiveWaterYear {
                start: 2024,
                end: 2023
            })
        );
        for bad in ["2023", "2023-2024", "abcd/2024", "", "/"] {
            assert!(
                matches!(bad.parse::<WaterYear>(), Err(QueryError::MalformedWaterYear(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn test_membership_boundaries() {
        let wy = WaterYear::new(2023);
        assert!(wy.contains(&ymd(2023, 10, 1)));
        assert!(wy.contains(&ymd(2023, 12, 31)));
        assert!(wy.contains(&ymd(2024, 1, 1)));
        assert!(wy.contains(&ymd(2024, 9, 30)));
        // Sep of the start year and Oct of the end year are outside
        assert!(!wy.contains(&ymd(2023, 9, 30)));
        assert!(!wy.contains(&ymd(2024, 10, 1)));
    }

    #[test]
    fn test_membership_with_offset() {
        let previous = WaterYear::new(2023).offset(-1).unwrap();
        assert_eq!(previous.to_string(), "2022/2023");
        assert!(previous.contains(&ymd(2022, 11, 15)));
        assert!(previous.contains(&ymd(2023, 6, 1)));
        assert!(!previous.contains(&ymd(2023, 11, 15)));
        assert!(!previous.contains(&ymd(2022, 9, 1)));
    }

    #[test]
    fn test_offset_outside_calendar() {
        let wy = WaterYear::new(2023);
        assert_eq!(wy.offset(i32::MAX), None);
        assert_eq!(wy.offset(i32::MIN), None);
        assert_eq!(wy.offset(1_000_000), None);
        assert_eq!(wy.offset(2), Some(WaterYear::new(2025)));
    }

    #[test]
    fn test_membership_matches_calendar_span() {
        let wy = WaterYear::new(2023);
        let first = wy.first_day().unwrap();
        let last = wy.last_day().unwrap();
        let after = last.succ_opt().unwrap();
        let days = first.pred_opt().unwrap().iter_days().take_while(|d| *d <= after);
        for day in days {
            assert_eq!(wy.contains(&day), first <= day && day <= last, "{day}");
            assert_eq!(WaterYear::containing(&day) == wy, wy.contains(&day));
        }
        assert_eq!((last - first).num_days() + 1, 366);
        assert_eq!(last.month(), 9);
    }

    #[test]
    fn test_spanning() {
        let dates = [ymd(2022, 3, 1), ymd(2024, 11, 2), ymd(2023, 7, 7)];
        let years: Vec<String> = WaterYear::spanning(dates.iter())
            .iter()
            .map(|wy| wy.to_string())
            .collect();
        assert_eq!(years, vec!["2021/2022", "2022/2023", "2023/2024", "2024/2025"]);
        assert!(WaterYear::spanning(Vec::<NaiveDate>::new().iter()).is_empty());
    }

    #[test]
    fn test_serde_as_label() {
        let wy: WaterYear = serde_json::from_str("\"2020/2021\"").unwrap();
        assert_eq!(wy, WaterYear::new(2020));
        assert_eq!(serde_json::to_string(&wy).unwrap(), "\"2020/2021\"");
        assert!(serde_json::from_str::<WaterYear>("\"2020/2022\"").is_err());
    }
}
