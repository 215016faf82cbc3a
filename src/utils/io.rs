use anyhow::{Context, Result};
use std::path::Path;

use crate::training::trainer::TrainedModel;

pub fn save_model(path: impl AsRef<Path>, model: &TrainedModel) -> Result<()> {
    let path = path.as_ref();
    let model_data = bincode::serialize(model)?;
    std::fs::write(path, model_data)
        .with_context(|| format!("writing model to {}", path.display()))?;
    Ok(())
}

pub fn load_model(path: impl AsRef<Path>) -> Result<TrainedModel> {
    let path = path.as_ref();
    let model_data =
        std::fs::read(path).with_context(|| format!("reading model from {}", path.display()))?;
    let model = bincode::deserialize(&model_data)
        .with_context(|| format!("decoding model in {}", path.display()))?;
    Ok(model)
}
