use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Coefficients of the linear pollution index.
///
/// `temperature` applies to the reading in degrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub so2: f64,
    pub co2: f64,
    pub pm10: f64,
    pub pm25: f64,
    pub temperature: f64,
    pub bias: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Weights {
            so2: 0.5,
            co2: 0.3,
            pm10: 0.8,
            pm25: 1.0,
            temperature: 0.2,
            bias: 5.0,
        }
    }
}

impl Weights {
    /// Reads a weight table from a RON file. Fields left out keep their
    /// default coefficient.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading weights from {}", path.display()))?;
        let weights = ron::from_str(&text)
            .with_context(|| format!("parsing weights in {}", path.display()))?;
        Ok(weights)
    }
}
