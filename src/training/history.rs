use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TrainingHistory {
    pub epochs: Vec<usize>,
    pub train_losses: Vec<f64>,
    pub test_losses: Vec<f64>,
}

impl TrainingHistory {
    pub fn record(&mut self, epoch: usize, train_loss: f64, test_loss: f64) {
        self.epochs.push(epoch);
        self.train_losses.push(train_loss);
        self.test_losses.push(test_loss);
    }

    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }

    /// Largest finite loss recorded, for scaling plots.
    pub fn max_loss(&self) -> f64 {
        self.train_losses
            .iter()
            .chain(self.test_losses.iter())
            .copied()
            .filter(|l| l.is_finite())
            .fold(0.0, f64::max)
    }
}
