//! Crop yield estimate (hg/ha)

use super::EstimatorKind;
use crate::error::{ensure_finite, Result};
use crate::random::RandomSource;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YieldInput {
    /// Annual rainfall (mm)
    pub rainfall: f64,
    /// Pesticide use (tonnes)
    pub pesticide: f64,
    /// Mean temperature (°C)
    pub temperature: f64,
}

/// `30000 × min(rain/1000, 1.5) × min(pesticide/200, 1.2) × max(0.5, 1 - |t - 25|/25)`
pub fn fallback_yield(input: &YieldInput) -> f64 {
    let base_yield = 30000.0;
    let rain_factor = (input.rainfall / 1000.0).min(1.5);
    let pesticide_factor = (input.pesticide / 200.0).min(1.2);
    let temp_factor = (1.0 - (input.temperature - 25.0).abs() / 25.0).max(0.5);
    (base_yield * rain_factor * pesticide_factor * temp_factor).round()
}

pub struct YieldKind;

impl EstimatorKind for YieldKind {
    type Input = YieldInput;
    type Prediction = f64;
    type Output = f64;

    const NAME: &'static str = "yield";

    fn validate(input: &YieldInput) -> Result<()> {
        ensure_finite("rainfall", input.rainfall)?;
        ensure_finite("pesticide", input.pesticide)?;
        ensure_finite("temperature", input.temperature)?;
        Ok(())
    }

    fn accept(prediction: f64) -> Option<f64> {
        prediction.is_finite().then_some(prediction)
    }

    fn fallback(input: &YieldInput, _rng: &mut dyn RandomSource) -> f64 {
        fallback_yield(input)
    }
}
