use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative band a pollution index falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeverityBand {
    Good,
    Moderate,
    Unhealthy,
}

pub const MODERATE_THRESHOLD: f64 = 50.0;
pub const UNHEALTHY_THRESHOLD: f64 = 100.0;

/// Thresholds the index into a band. NaN fails both comparisons and
/// lands in `Unhealthy`.
pub fn classify(index: f64) -> SeverityBand {
    if index < MODERATE_THRESHOLD {
        SeverityBand::Good
    } else if index < UNHEALTHY_THRESHOLD {
        SeverityBand::Moderate
    } else {
        SeverityBand::Unhealthy
    }
}

impl SeverityBand {
    pub fn label(self) -> &'static str {
        match self {
            SeverityBand::Good => "Good",
            SeverityBand::Moderate => "Moderate",
            SeverityBand::Unhealthy => "Unhealthy",
        }
    }

    pub fn interpretation(self) -> &'static str {
        match self {
            SeverityBand::Good => "Good (AQI < 50) - Enjoy the fresh air!",
            SeverityBand::Moderate => {
                "Moderate (AQI 50-100) - Acceptable but may affect sensitive groups."
            }
            SeverityBand::Unhealthy => "Unhealthy (AQI > 100) - Limit outdoor activity.",
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for SeverityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
