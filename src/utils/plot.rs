use anyhow::{anyhow, Result};
use plotters::prelude::*;
use std::path::Path;

use crate::index::Assessment;
use crate::training::history::TrainingHistory;

const BAR_COLORS: [RGBColor; 5] = [
    RGBColor(0x02, 0x88, 0xd1),
    RGBColor(0x38, 0x8e, 0x3c),
    RGBColor(0xfb, 0xc0, 0x2d),
    RGBColor(0xd3, 0x2f, 0x2f),
    RGBColor(0x7b, 0x1f, 0xa2),
];

pub const BAR_LABELS: [&str; 5] = ["SO₂", "CO₂", "PM10", "PM2.5", "Temp (°C)"];

/// Loss curves of a training run, both scaled to the largest loss seen.
pub fn create_plot(history: &TrainingHistory, path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_epoch = (*history.epochs.last().unwrap_or(&1)).max(1) as u32;
    let max_loss = history.max_loss();
    let loss_scale = if max_loss > 0.0 { 1.0 / max_loss } else { 1.0 };

    let mut chart = ChartBuilder::on(&root)
        .caption("Training Progress", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(0u32..max_epoch, 0f64..1f64)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc("Epoch")
        .y_desc("MSE (scaled)")
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            history
                .epochs
                .iter()
                .zip(history.train_losses.iter())
                .map(|(&x, &y)| (x as u32, y * loss_scale)),
            &BLUE,
        ))?
        .label("Train loss")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    chart
        .draw_series(LineSeries::new(
            history
                .epochs
                .iter()
                .zip(history.test_losses.iter())
                .filter(|(_, y)| y.is_finite())
                .map(|(&x, &y)| (x as u32, y * loss_scale)),
            &RED,
        ))?
        .label("Test loss")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Value range for the bar chart: always includes zero, padded by 10%.
pub fn bar_range(values: &[f64]) -> (f64, f64) {
    let lo = values.iter().copied().fold(0.0, f64::min);
    let hi = values.iter().copied().fold(0.0, f64::max);
    let pad = ((hi - lo) * 0.1).max(1.0);
    (if lo < 0.0 { lo - pad } else { 0.0 }, hi + pad)
}

/// Bar chart of the five readings, temperature in °C.
pub fn draw_pollutant_chart(assessment: &Assessment, path: &Path) -> Result<()> {
    let m = &assessment.measurement;
    let values = [m.so2, m.co2, m.pm10, m.pm25, assessment.temperature_celsius];
    if values.iter().any(|v| !v.is_finite()) {
        return Err(anyhow!("cannot chart non-finite readings"));
    }
    let (y_min, y_max) = bar_range(&values);

    let root = BitMapBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Air Pollutant Levels", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((0usize..values.len() - 1).into_segmented(), y_min..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc("Concentration")
        .x_label_formatter(&|seg| match seg {
            SegmentValue::CenterOf(i) => BAR_LABELS.get(*i).copied().unwrap_or("").to_string(),
            _ => String::new(),
        })
        .draw()?;

    chart.draw_series(values.iter().enumerate().map(|(i, &v)| {
        let (bottom, top) = if v < 0.0 { (v, 0.0) } else { (0.0, v) };
        let mut bar = Rectangle::new(
            [(SegmentValue::Exact(i), bottom), (SegmentValue::Exact(i + 1), top)],
            BAR_COLORS[i].filled(),
        );
        bar.set_margin(0, 0, 15, 15);
        bar
    }))?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{Measurement, PollutionCalculator, TemperatureUnit};

    fn chart_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("{}-{}.png", name, std::process::id()))
    }

    #[test]
    fn writes_pollutant_chart_with_negative_temperature() {
        let assessment = PollutionCalculator::default().assess(&Measurement {
            so2: 12.0,
            co2: 410.0,
            pm10: 30.0,
            pm25: 18.0,
            temperature: 14.0,
            unit: TemperatureUnit::Fahrenheit,
        });
        assert!(assessment.temperature_celsius < 0.0);

        let path = chart_path("pollutant-chart");
        draw_pollutant_chart(&assessment, &path).unwrap();
        let written = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        std::fs::remove_file(&path).ok();
        assert!(written > 0);
    }

    #[test]
    fn pollutant_chart_refuses_non_finite_readings() {
        let assessment = PollutionCalculator::default().assess(&Measurement {
            so2: f64::INFINITY,
            co2: 0.0,
            pm10: 0.0,
            pm25: 0.0,
            temperature: 0.0,
            unit: TemperatureUnit::Celsius,
        });
        let path = chart_path("non-finite-chart");
        assert!(draw_pollutant_chart(&assessment, &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn writes_training_plot() {
        let mut history = TrainingHistory::default();
        for epoch in (0..100).step_by(10) {
            history.record(epoch, 100.0 / (epoch + 1) as f64, 120.0 / (epoch + 1) as f64);
        }

        let path = chart_path("training-plot");
        create_plot(&history, &path).unwrap();
        let written = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        std::fs::remove_file(&path).ok();
        assert!(written > 0);
    }

    #[test]
    fn range_includes_zero_and_negatives() {
        let (lo, hi) = bar_range(&[10.0, 20.0, 0.0, 5.0, -30.0]);
        assert!(lo < -30.0);
        assert!(hi > 20.0);

        let (lo, hi) = bar_range(&[0.0; 5]);
        assert_eq!(lo, 0.0);
        assert_eq!(hi, 1.0);
    }
}
