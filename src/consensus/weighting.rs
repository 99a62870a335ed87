//! Model weighter

use crate::models::{ForecastModel, ModelWeight};

const EQUAL_WEIGHTING_REASON: &str = "Equal weighting.";

/// Give each of the N contributing models a weight of 1/N
#[must_use]
pub fn equal_weights(models: &[ForecastModel]) -> Vec<ModelWeight> {
    if models.is_empty() {
        return Vec::new();
    }
    let weight = 1.0 / models.len() as f64;
    models
        .iter()
        .map(|model| ModelWeight {
            model: model.clone(),
            weight,
            reason: EQUAL_WEIGHTING_REASON.to_string(),
        })
        .collect()
}
