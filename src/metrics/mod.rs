//! Suitability factors
//!
//! Each factor is implemented in its own module and produces one `SubScore`.
//! Maximum weights are fixed and total 100 across the eight factors:
//!
//! | Factor      | Weight | Partial credit |
//! |-------------|--------|----------------|
//! | rainfall    | 20     | proportional   |
//! | temperature | 20     | proportional   |
//! | soil        | 15     | 8              |
//! | pH          | 10     | distance       |
//! | season      | 10     | 5              |
//! | experience  | 10     | 6              |
//! | water       | 10     | 5              |
//! | market      | 5      | 3              |

pub mod category_factors;
pub mod range_factors;

pub use category_factors::{score_experience, score_market, score_season, score_soil, score_water};
pub use range_factors::{range_credit, score_ph, score_rainfall, score_temperature};

use serde::Serialize;

/// Sum of all factor weights
pub const TOTAL_WEIGHT: f64 = 100.0;

/// One independent scoring criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Rainfall,
    Temperature,
    Soil,
    Ph,
    Season,
    Experience,
    Water,
    Market,
}

impl Factor {
    /// Evaluation order; rationale lines follow it
    pub const ALL: [Factor; 8] = [
        Factor::Rainfall,
        Factor::Temperature,
        Factor::Soil,
        Factor::Ph,
        Factor::Season,
        Factor::Experience,
        Factor::Water,
        Factor::Market,
    ];

    pub fn weight(&self) -> f64 {
        match self {
            Factor::Rainfall => 20.0,
            Factor::Temperature => 20.0,
            Factor::Soil => 15.0,
            Factor::Ph => 10.0,
            Factor::Season => 10.0,
            Factor::Experience => 10.0,
            Factor::Water => 10.0,
            Factor::Market => 5.0,
        }
    }

    /// Fixed credit for a categorical mismatch. Range factors have none.
    pub fn partial_credit(&self) -> Option<f64> {
        match self {
            Factor::Soil => Some(8.0),
            Factor::Season => Some(5.0),
            Factor::Experience => Some(6.0),
            Factor::Water => Some(5.0),
            Factor::Market => Some(3.0),
            Factor::Rainfall | Factor::Temperature | Factor::Ph => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Factor::Rainfall => "Rainfall",
            Factor::Temperature => "Temperature",
            Factor::Soil => "Soil type",
            Factor::Ph => "pH",
            Factor::Season => "Season",
            Factor::Experience => "Experience",
            Factor::Water => "Water availability",
            Factor::Market => "Market preference",
        }
    }
}

/// Weighted contribution of one factor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubScore {
    pub factor: Factor,
    /// Points awarded, always within [0, weight]
    pub score: f64,
    pub weight: f64,
    /// Requirement fully met
    pub met: bool,
    pub rationale: String,
}

impl SubScore {
    pub fn new(factor: Factor, points: f64, met: bool, rationale: String) -> Self {
        let weight = factor.weight();
        let score = if points.is_finite() { points.clamp(0.0, weight) } else { 0.0 };
        Self { factor, score, weight, met, rationale }
    }

    pub fn full(factor: Factor, rationale: String) -> Self {
        Self::new(factor, factor.weight(), true, rationale)
    }

    pub fn partial(factor: Factor, rationale: String) -> Self {
        Self::new(factor, factor.partial_credit().unwrap_or(0.0), false, rationale)
    }
}
