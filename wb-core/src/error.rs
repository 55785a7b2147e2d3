/// Error types for query configuration
use chrono::NaiveDate;
use thiserror::Error;

/// A query configuration that cannot be resolved into a date predicate.
///
/// Data-quality problems (unparseable values, empty slices) are never
/// reported here; they degrade to missing readings and empty results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Water year label is not two years separated by a slash
    #[error("Malformed water year label {0:?}: expected \"YYYY/YYYY\"")]
    MalformedWaterYear(String),

    /// Water year label years are not consecutive
    #[error("Water year {start}/{end} does not span two consecutive years")]
    NonConsecutiveWaterYear { start: i32, end: i32 },

    /// Custom period selected without both bounds
    #[error("Custom period requires both a start and an end date")]
    MissingCustomBound,

    /// Custom period bounds in the wrong order
    #[error("Custom period starts on {start}, after it ends on {end}")]
    InvertedCustomRange { start: NaiveDate, end: NaiveDate },

    /// Year offset pushes the window outside the representable calendar
    #[error("Year offset {0} is out of range")]
    OffsetOutOfRange(i32),
}

/// Type alias for Results using QueryError
pub type Result<T> = std::result::Result<T, QueryError>;
