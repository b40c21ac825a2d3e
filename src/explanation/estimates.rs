//! Derived yield and investment estimates for ranked crops
//!
//! Both carry bounded randomness and never feed back into the score.

use crate::data::{CropProfile, DEFAULT_INVESTMENT_PER_HA};
use crate::random::RandomSource;
use crate::utils::round_to;
use serde::Serialize;

pub const YIELD_VARIATION: (f64, f64) = (0.9, 1.1);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldEstimate {
    pub per_hectare: i64,
    pub total_farm: f64,
    pub unit: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestmentEstimate {
    pub per_hectare: i64,
    pub total: i64,
    pub currency: &'static str,
}

/// `round(base_yield × score/100 × U(0.9, 1.1))` per hectare, scaled by farm size
pub fn estimate_yield(
    crop: &CropProfile,
    score_percent: f64,
    farm_size: f64,
    rng: &mut dyn RandomSource,
) -> YieldEstimate {
    let variation = rng.uniform(YIELD_VARIATION.0, YIELD_VARIATION.1);
    let per_hectare = (crop.base_yield() * score_percent / 100.0 * variation).round() as i64;

    YieldEstimate {
        per_hectare,
        total_farm: round_to(per_hectare as f64 * farm_size, 1),
        unit: crop.yield_unit,
    }
}

/// Per-hectare cost drawn from the crop's inclusive range
pub fn estimate_investment(
    crop: &CropProfile,
    farm_size: f64,
    rng: &mut dyn RandomSource,
) -> InvestmentEstimate {
    let per_hectare = match crop.investment_per_ha {
        Some((low, high)) => rng.int_inclusive(low, high),
        None => DEFAULT_INVESTMENT_PER_HA,
    };

    InvestmentEstimate {
        per_hectare,
        total: (per_hectare as f64 * farm_size).round() as i64,
        currency: "INR",
    }
}
