use serde::{Deserialize, Serialize};

/// Part of the water year a query looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum Period {
    /// October through September
    #[default]
    FullYear,
    /// Growing season, April through September
    Vegetation,
    /// October through March
    InterVegetation,
    /// Explicit calendar dates, independent of the water year
    Custom,
}

impl Period {
    /// Whether a calendar month (1-12) is admitted. `Custom` is bounded by
    /// dates rather than months and admits every month.
    pub fn admits_month(self, month: u32) -> bool {
        let growing = (4..=9).contains(&month);
        match self {
            Period::FullYear | Period::Custom => true,
            Period::Vegetation => growing,
            Period::InterVegetation => !growing,
        }
    }
}
