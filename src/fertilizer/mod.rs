//! Fertilizer dosing
//!
//! Composes a crop's base NPK with rainfall, soil and growth-stage factors and
//! bounded random variation into per-hectare and whole-field nutrient doses,
//! then attaches an application schedule, fertilizer-source suggestions and a
//! cost estimate.
//!
//! Pipeline (per nutrient):
//! ```text
//! base × rainfall U(regime) × soil × stage × U(0.9, 1.1) → round → floor(10/5/5)
//! ```

pub mod calculator;
pub mod lookup_tables;
pub mod matching;

pub use calculator::{
    dose_fertilizer, CostBreakdown, CostEstimate, DosingRequest, DosingResult, SourceSuggestion,
};
pub use lookup_tables::{
    ApplicationSchedule, FertilizerSource, GrowthStage, Nutrient, RainfallRegime, SplitPercent,
};
pub use matching::{match_crop, match_crop_or_default, normalize_crop_name, FertilizerEntry};

use serde::{Deserialize, Serialize};

/// Nitrogen / phosphorus / potassium triple (kg/ha or dimensionless factors)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Npk {
    #[serde(rename = "N")]
    pub n: f64,
    #[serde(rename = "P")]
    pub p: f64,
    #[serde(rename = "K")]
    pub k: f64,
}

impl Npk {
    pub const ONE: Npk = Npk::new(1.0, 1.0, 1.0);

    pub const fn new(n: f64, p: f64, k: f64) -> Self {
        Self { n, p, k }
    }

    /// Component-wise product
    pub fn scale(&self, other: &Npk) -> Npk {
        Npk::new(self.n * other.n, self.p * other.p, self.k * other.k)
    }

    pub fn get(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Nitrogen => self.n,
            Nutrient::Phosphorus => self.p,
            Nutrient::Potassium => self.k,
        }
    }
}
