/// The numeric content of a raw measurement value.
/// - `Present(f64)`: a finite number parsed from the raw string
/// - `Missing`: empty, "-", or anything that is not a number
///
/// Missing readings are skipped by every computation; they are never
/// treated as zero.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Reading {
    Present(f64),
    Missing,
}

impl Reading {
    /// Parse a raw, possibly locale-formatted value ("12,5", "1 234.5", " 7.3 ").
    pub fn parse(raw: &str) -> Reading {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "-" {
            return Reading::Missing;
        }
        // drop grouping spaces, including non-breaking ones
        let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
        match normalize_separators(&compact).parse::<f64>() {
            Ok(value) if value.is_finite() => Reading::Present(value),
            _ => Reading::Missing,
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Reading::Present(value) => Some(value),
            Reading::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Reading::Missing)
    }
}

impl From<&str> for Reading {
    fn from(raw: &str) -> Self {
        Reading::parse(raw)
    }
}

/// Rewrite the decimal separator to '.', the rightmost of '.'/',' being the decimal one.
fn normalize_separators(s: &str) -> String {
    match (s.rfind('.'), s.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => s.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => s.replace(',', ""),
        (None, Some(_)) => s.replace(',', "."),
        _ => s.to_string(),
    }
}
