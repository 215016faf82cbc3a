use anyhow::{bail, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::preprocessing::{load_dataset, train_test_split, DataStats, Dataset};
use crate::model::regression::{r2_score, root_mean_squared_error, LinearRegression};
use crate::training::history::TrainingHistory;

#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub csv_path: PathBuf,
    pub model_path: PathBuf,
    pub plot_path: Option<PathBuf>,
    pub epochs: usize,
    pub learning_rate: f64,
    pub test_size: f64,
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            csv_path: PathBuf::from("pollution1.csv"),
            model_path: PathBuf::from("pollution_predictor.bin"),
            plot_path: Some(PathBuf::from("training_plot.png")),
            epochs: 1000,
            learning_rate: 0.05,
            test_size: 0.2,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedModel {
    pub regression: LinearRegression,
    pub stats: DataStats,
    pub train_rows: usize,
    pub test_rows: usize,
    pub test_rmse: f64,
    pub test_r2: f64,
}

impl TrainedModel {
    /// Predicts the AQI for `[so2, co2, pm10, pm25, temperature_celsius]`.
    pub fn predict(&self, features: &[f64; 5]) -> f64 {
        let row = Array1::from(features.to_vec());
        let standardized = (&row - &self.stats.mean) / &self.stats.std;
        self.regression.predict_one(standardized.view())
    }
}

/// Loads the CSV named in `config` and fits a model on it.
pub fn train_model(config: &TrainConfig) -> Result<(TrainedModel, TrainingHistory)> {
    let dataset = load_dataset(&config.csv_path)?;
    let (model, history) = train_on(&dataset, config)?;

    if let Some(plot_path) = &config.plot_path {
        crate::utils::plot::create_plot(&history, plot_path)?;
        log::info!("Training plot written to {}", plot_path.display());
    }

    Ok((model, history))
}

pub fn train_on(dataset: &Dataset, config: &TrainConfig) -> Result<(TrainedModel, TrainingHistory)> {
    if config.epochs == 0 {
        bail!("epochs must be at least 1");
    }
    if !(config.learning_rate > 0.0 && config.learning_rate.is_finite()) {
        bail!("learning rate must be positive, got {}", config.learning_rate);
    }

    let (train, test) = train_test_split(dataset, config.test_size, config.seed)?;
    log::info!("Split {} rows: {} train / {} test", dataset.len(), train.len(), test.len());

    let stats = DataStats::fit(&train.features);
    let x_train = stats.standardize(&train.features);
    let x_test = stats.standardize(&test.features);

    let mut regression = LinearRegression::new(x_train.ncols());
    let mut history = TrainingHistory::default();

    log::info!("Starting training with {} epochs...", config.epochs);

    for epoch in 0..config.epochs {
        regression.train(&x_train, &train.targets, config.learning_rate);

        if epoch % 10 == 0 || epoch == config.epochs - 1 {
            let train_loss = regression.loss(&train.targets, &regression.forward(&x_train));
            let test_loss = regression.loss(&test.targets, &regression.forward(&x_test));
            history.record(epoch, train_loss, test_loss);

            if epoch % 100 == 0 || epoch == config.epochs - 1 {
                log::debug!(
                    "Epoch {}/{} - train mse: {:.4}, test mse: {:.4}",
                    epoch,
                    config.epochs,
                    train_loss,
                    test_loss
                );
            }
        }
    }

    let (test_rmse, test_r2) = if test.is_empty() {
        log::warn!("Test split is empty; no held-out metrics");
        (f64::NAN, f64::NAN)
    } else {
        let predicted = regression.forward(&x_test);
        (
            root_mean_squared_error(&test.targets, &predicted),
            r2_score(&test.targets, &predicted),
        )
    };
    log::info!("Test RMSE: {:.4}, R²: {:.4}", test_rmse, test_r2);

    Ok((
        TrainedModel {
            regression,
            stats,
            train_rows: train.len(),
            test_rows: test.len(),
            test_rmse,
            test_r2,
        },
        history,
    ))
}
