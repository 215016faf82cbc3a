//! Unit-normalized linear pollution index.
//!
//! A reading is normalized to Celsius, combined with a [`Weights`] table
//! into a single index, and thresholded into a [`SeverityBand`].

pub mod calculator;
pub mod severity;
pub mod temperature;
pub mod weights;

pub use calculator::{compute, Assessment, IndexBreakdown, Measurement, PollutionCalculator};
pub use severity::{classify, SeverityBand};
pub use temperature::{normalize, TemperatureUnit};
pub use weights::Weights;
