//! Annual rainfall outlook

use super::EstimatorKind;
use crate::error::Result;
use crate::random::RandomSource;
use serde::{Deserialize, Serialize};

pub const BASE_RAINFALL_MM: f64 = 800.0;
pub const BASE_YEAR: i32 = 2020;
/// Trend per year (mm)
pub const TREND_MM_PER_YEAR: f64 = 5.0;
/// Noise drawn from [-50, 49]
pub const NOISE_MM: (i64, i64) = (-50, 49);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherInput {
    pub year: i32,
}

pub fn rainfall_advice(rainfall_mm: f64) -> &'static str {
    if rainfall_mm < 400.0 {
        "Low rainfall expected. Consider drought-resistant crops and irrigation planning."
    } else if rainfall_mm > 1500.0 {
        "High rainfall expected. Ensure proper drainage and flood management."
    } else {
        "Normal rainfall expected. Good conditions for most crops."
    }
}

pub struct WeatherKind;

impl EstimatorKind for WeatherKind {
    type Input = WeatherInput;
    type Prediction = f64;
    type Output = f64;

    const NAME: &'static str = "weather";

    fn validate(_input: &WeatherInput) -> Result<()> {
        Ok(())
    }

    fn accept(prediction: f64) -> Option<f64> {
        prediction.is_finite().then_some(prediction)
    }

    /// `800 + (year - 2020) × 5 + noise`
    fn fallback(input: &WeatherInput, rng: &mut dyn RandomSource) -> f64 {
        let trend = (f64::from(input.year) - f64::from(BASE_YEAR)) * TREND_MM_PER_YEAR;
        let noise = rng.int_inclusive(NOISE_MM.0, NOISE_MM.1) as f64;
        (BASE_RAINFALL_MM + trend + noise).round()
    }
}
