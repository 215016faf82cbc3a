use serde::{Deserialize, Serialize};
use std::fmt;

use super::severity::{classify, SeverityBand};
use super::temperature::{normalize, TemperatureUnit};
use super::weights::Weights;

/// Five air-quality readings as entered by the user.
///
/// Pollutants are in µg/m³ (CO₂ in ppm); `temperature` is in `unit`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub so2: f64,
    pub co2: f64,
    pub pm10: f64,
    pub pm25: f64,
    pub temperature: f64,
    pub unit: TemperatureUnit,
}

impl Measurement {
    pub fn temperature_celsius(&self) -> f64 {
        normalize(self.temperature, self.unit)
    }
}

/// Weighted terms whose sum is the pollution index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexBreakdown {
    pub so2: f64,
    pub co2: f64,
    pub pm10: f64,
    pub pm25: f64,
    pub temperature: f64,
    pub bias: f64,
}

impl IndexBreakdown {
    pub fn total(&self) -> f64 {
        self.so2 + self.co2 + self.pm10 + self.pm25 + self.temperature + self.bias
    }
}

/// Outcome of running a measurement through the calculator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assessment {
    pub measurement: Measurement,
    pub weights: Weights,
    pub temperature_celsius: f64,
    pub breakdown: IndexBreakdown,
    pub index: f64,
    pub band: SeverityBand,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PollutionCalculator {
    weights: Weights,
}

impl PollutionCalculator {
    pub fn new(weights: Weights) -> Self {
        PollutionCalculator { weights }
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    pub fn breakdown(
        &self,
        so2: f64,
        co2: f64,
        pm10: f64,
        pm25: f64,
        temperature_celsius: f64,
    ) -> IndexBreakdown {
        let w = &self.weights;
        IndexBreakdown {
            so2: w.so2 * so2,
            co2: w.co2 * co2,
            pm10: w.pm10 * pm10,
            pm25: w.pm25 * pm25,
            temperature: w.temperature * temperature_celsius,
            bias: w.bias,
        }
    }

    /// Weighted linear sum of the readings plus the bias. Inputs are not
    /// validated.
    pub fn compute(
        &self,
        so2: f64,
        co2: f64,
        pm10: f64,
        pm25: f64,
        temperature_celsius: f64,
    ) -> f64 {
        self.breakdown(so2, co2, pm10, pm25, temperature_celsius).total()
    }

    /// normalize -> compute -> classify
    pub fn assess(&self, measurement: &Measurement) -> Assessment {
        let temperature_celsius = measurement.temperature_celsius();
        let breakdown = self.breakdown(
            measurement.so2,
            measurement.co2,
            measurement.pm10,
            measurement.pm25,
            temperature_celsius,
        );
        let index = breakdown.total();

        Assessment {
            measurement: *measurement,
            weights: self.weights,
            temperature_celsius,
            breakdown,
            index,
            band: classify(index),
        }
    }
}

/// [`PollutionCalculator::compute`] with the default weight table.
pub fn compute(so2: f64, co2: f64, pm10: f64, pm25: f64, temperature_celsius: f64) -> f64 {
    PollutionCalculator::default().compute(so2, co2, pm10, pm25, temperature_celsius)
}

impl fmt::Display for Assessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (m, w, t) = (&self.measurement, &self.weights, self.temperature_celsius);
        writeln!(
            f,
            "Input Temperature: {:.2} {} -> {:.2} °C",
            m.temperature,
            m.unit.symbol(),
            t
        )?;
        writeln!(f)?;
        writeln!(f, "Pollution Level = ({:?} × {:?}) +", w.so2, m.so2)?;
        writeln!(f, "                  ({:?} × {:?}) +", w.co2, m.co2)?;
        writeln!(f, "                  ({:?} × {:?}) +", w.pm10, m.pm10)?;
        writeln!(f, "                  ({:?} × {:?}) +", w.pm25, m.pm25)?;
        writeln!(f, "                  ({:?} × {:.2}) + {:?}", w.temperature, t, w.bias)?;
        write!(f, "                = {:.2}", self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn reading(v: f64, temperature: f64, unit: TemperatureUnit) -> Measurement {
        Measurement { so2: v, co2: v, pm10: v, pm25: v, temperature, unit }
    }

    #[test]
    fn zero_readings_leave_the_bias() {
        let a = PollutionCalculator::default().assess(&reading(0.0, 0.0, TemperatureUnit::Celsius));
        assert!((a.index - 5.0).abs() < EPS);
        assert_eq!(a.band, SeverityBand::Good);
    }

    #[test]
    fn fahrenheit_input_is_normalized_first() {
        let a = PollutionCalculator::default()
            .assess(&reading(10.0, 68.0, TemperatureUnit::Fahrenheit));
        assert!((a.temperature_celsius - 20.0).abs() < EPS);
        assert!((a.index - 35.0).abs() < EPS);
        assert_eq!(a.band, SeverityBand::Good);
    }

    #[test]
    fn heavy_pollution_is_unhealthy() {
        let a = PollutionCalculator::default().assess(&reading(50.0, 25.0, TemperatureUnit::Celsius));
        assert!((a.index - 140.0).abs() < EPS);
        assert_eq!(a.band, SeverityBand::Unhealthy);
    }

    #[test]
    fn each_input_contributes_its_weight() {
        let calc = PollutionCalculator::default();
        let w = *calc.weights();
        let base = [3.0, 7.0, 11.0, 13.0, -4.0];
        let at = |x: [f64; 5]| calc.compute(x[0], x[1], x[2], x[3], x[4]);
        let weights = [w.so2, w.co2, w.pm10, w.pm25, w.temperature];
        for (i, weight) in weights.iter().enumerate() {
            for delta in [-2.5, 1.0, 100.0] {
                let mut moved = base;
                moved[i] += delta;
                assert!((at(moved) - at(base) - weight * delta).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn negative_inputs_are_accepted() {
        let index = compute(-10.0, 0.0, 0.0, 0.0, -100.0);
        assert!((index - (-5.0 - 20.0 + 5.0)).abs() < EPS);
    }

    #[test]
    fn custom_weights_are_used() {
        let calc = PollutionCalculator::new(Weights {
            so2: 1.0,
            co2: 0.0,
            pm10: 0.0,
            pm25: 0.0,
            temperature: 0.0,
            bias: 0.0,
        });
        assert_eq!(calc.compute(42.0, 9.0, 9.0, 9.0, 9.0), 42.0);
    }

    #[test]
    fn breakdown_sums_to_index() {
        let a = PollutionCalculator::default().assess(&reading(12.0, 300.0, TemperatureUnit::Kelvin));
        assert!((a.breakdown.total() - a.index).abs() < EPS);
        assert_eq!(a.breakdown.bias, 5.0);
        assert!((a.breakdown.pm10 - 9.6).abs() < EPS);
    }

    #[test]
    fn report_shows_conversion_and_total() {
        let a = PollutionCalculator::default()
            .assess(&reading(10.0, 68.0, TemperatureUnit::Fahrenheit));
        let text = a.to_string();
        assert!(text.contains("68.00 °F -> 20.00 °C"));
        assert!(text.contains("(0.5 × 10.0)"));
        assert!(text.contains("(1.0 × 10.0)"));
        assert!(text.contains("(0.2 × 20.00) + 5.0"));
        assert!(text.ends_with("= 35.00"));
    }
}
