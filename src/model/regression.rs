use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

/// Linear least-squares model over standardized features.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegression {
    pub weights: Array1<f64>,
    pub bias: f64,
}

impl LinearRegression {
    pub fn new(input_size: usize) -> Self {
        LinearRegression {
            weights: Array1::zeros(input_size),
            bias: 0.0,
        }
    }

    pub fn forward(&self, x: &Array2<f64>) -> Array1<f64> {
        x.dot(&self.weights) + self.bias
    }

    pub fn predict_one(&self, x: ArrayView1<f64>) -> f64 {
        x.dot(&self.weights) + self.bias
    }

    /// One full-batch gradient step on mean squared error.
    pub fn train(&mut self, x: &Array2<f64>, y: &Array1<f64>, learning_rate: f64) {
        let n = x.nrows().max(1) as f64;
        let error = self.forward(x) - y;

        let grad_w = x.t().dot(&error) * (2.0 / n);
        let grad_b = error.sum() * 2.0 / n;

        self.weights -= &(learning_rate * grad_w);
        self.bias -= learning_rate * grad_b;
    }

    pub fn loss(&self, y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
        mean_squared_error(y_true, y_pred)
    }
}

pub fn mean_squared_error(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    (y_pred - y_true).mapv(|e| e * e).mean().unwrap_or(f64::NAN)
}

pub fn root_mean_squared_error(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    mean_squared_error(y_true, y_pred).sqrt()
}

/// Coefficient of determination. A constant target scores 1 when fit
/// exactly and 0 otherwise.
pub fn r2_score(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    let Some(mean) = y_true.mean() else {
        return f64::NAN;
    };
    let ss_res = (y_true - y_pred).mapv(|e| e * e).sum();
    let ss_tot = y_true.mapv(|v| (v - mean) * (v - mean)).sum();

    if ss_tot == 0.0 {
        if ss_res > 0.0 { 0.0 } else { 1.0 }
    } else {
        1.0 - ss_res / ss_tot
    }
}
