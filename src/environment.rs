//! Environment Input
//!
//! Caller-supplied conditions for one ranking request. `Default` carries the
//! values the HTTP facade and CLI use for omitted optional fields.

use crate::error::{ensure_finite, ensure_non_negative, Result};
use crate::utils::category_key;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentInput {
    /// Annual rainfall (mm)
    pub rainfall: f64,
    /// Mean temperature (°C)
    pub temperature: f64,
    /// Relative humidity (%)
    pub humidity: f64,
    pub ph: f64,
    /// Farm size (hectares)
    pub farm_size: f64,
    pub season: String,
    pub soil_type: String,
    pub water_availability: String,
    pub experience_level: String,
    pub market_preference: String,
}

impl Default for EnvironmentInput {
    fn default() -> Self {
        Self {
            rainfall: 1000.0,
            temperature: 25.0,
            humidity: 70.0,
            ph: 7.0,
            farm_size: 1.0,
            season: "kharif".to_string(),
            soil_type: "loamy".to_string(),
            water_availability: "moderate".to_string(),
            experience_level: "intermediate".to_string(),
            market_preference: "food_grain".to_string(),
        }
    }
}

impl EnvironmentInput {
    /// Reject non-finite numbers and a negative farm size
    pub fn validate(&self) -> Result<()> {
        ensure_finite("rainfall", self.rainfall)?;
        ensure_finite("temperature", self.temperature)?;
        ensure_finite("humidity", self.humidity)?;
        ensure_finite("ph_level", self.ph)?;
        ensure_non_negative("farm_size", self.farm_size)?;
        Ok(())
    }

    /// Copy with every categorical field in key form ("Black " -> "black")
    pub fn normalized(&self) -> Self {
        Self {
            season: category_key(&self.season),
            soil_type: category_key(&self.soil_type),
            water_availability: category_key(&self.water_availability),
            experience_level: category_key(&self.experience_level),
            market_preference: category_key(&self.market_preference),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EnvironmentInput {
        EnvironmentInput {
            rainfall: 1200.0,
            temperature: 27.0,
            humidity: 80.0,
            ph: 6.5,
            farm_size: 1.0,
            season: "Kharif".into(),
            soil_type: " Loamy".into(),
            water_availability: "High".into(),
            experience_level: "intermediate".into(),
            market_preference: "Food Grain".into(),
        }
    }

    #[test]
    fn test_normalized_categories() {
        let env = sample().normalized();
        assert_eq!(env.season, "kharif");
        assert_eq!(env.soil_type, "loamy");
        assert_eq!(env.water_availability, "high");
        assert_eq!(env.market_preference, "food_grain");
        assert_eq!(env.rainfall, 1200.0);
    }

    #[test]
    fn test_validate_rejects_bad_numbers() {
        assert!(sample().validate().is_ok());

        let mut env = sample();
        env.temperature = f64::NAN;
        assert!(env.validate().is_err());

        let mut env = sample();
        env.farm_size = -2.0;
        assert!(env.validate().is_err());
    }
}
