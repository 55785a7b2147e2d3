//! Core types for water balance analytics: measurements, value parsing,
//! water years, periods and query resolution.

pub mod date_range;
pub mod error;
pub mod granularity;
pub mod measurement;
pub mod period;
pub mod query;
pub mod reading;
pub mod resolver;
pub mod water_year;

pub use error::QueryError;
pub use granularity::Granularity;
pub use measurement::Measurement;
pub use period::Period;
pub use query::{QueryConfig, UnitMode};
pub use reading::Reading;
pub use resolver::{DateFilter, MeasurementFilter};
pub use water_year::WaterYear;
