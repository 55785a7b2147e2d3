//! Shared utility functions for the water balance crates.

/// Date utility functions
pub mod dates {
    use chrono::{Datelike, NaiveDate};

    /// Date formats accepted from upstream tables, tried in order.
    const ACCEPTED_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d.%m.%Y", "%Y%m%d"];

    /// Parse a date string in "YYYY-MM-DD", "DD.MM.YYYY" or "YYYYMMDD" format.
    ///
    /// A trailing time component ("2024-01-15T00:00:00", "2024-01-15 00:00")
    /// is ignored; measurements have day resolution.
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        let trimmed = s.trim();
        let day_part = trimmed
            .split(|c: char| c == 'T' || c.is_whitespace())
            .next()
            .unwrap_or(trimmed);
        for format in ACCEPTED_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(day_part, format) {
                return Ok(date);
            }
        }
        anyhow::bail!("unrecognised date {:?}", s)
    }

    /// Get the starting calendar year of the water year holding `date`.
    /// Water year runs Oct 1 to Sep 30.
    /// e.g., Oct 1 2022 -> 2022 (water year 2022/2023), Sep 30 2023 -> 2022
    pub fn water_year_for_date(date: &NaiveDate) -> i32 {
        let month = date.month();
        let year = date.year();
        if month >= 10 {
            year
        } else {
            year - 1
        }
    }

    /// Shift a date by whole calendar years. Feb 29 clamps to Feb 28.
    pub fn shift_years(date: &NaiveDate, years: i32) -> Option<NaiveDate> {
        let months = chrono::Months::new(years.unsigned_abs().checked_mul(12)?);
        if years >= 0 {
            date.checked_add_months(months)
        } else {
            date.checked_sub_months(months)
        }
    }

}
