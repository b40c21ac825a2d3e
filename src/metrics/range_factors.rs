//! Range-based factors: rainfall, temperature, pH
//!
//! Rainfall and temperature lose credit in proportion to the relative
//! distance outside the tolerance range. pH loses one point per unit of
//! distance from the range midpoint.

use super::{Factor, SubScore};
use crate::data::CropProfile;
use crate::environment::EnvironmentInput;

/// Credit for a value against a tolerance range
///
/// Full weight inside [min, max]. Below min: `weight * max(0, 1 - (min - v) / min)`.
/// Above max: `weight * max(0, 1 - (v - max) / max)`. A non-positive bound on the
/// violated side yields 0.
pub fn range_credit(value: f64, min: f64, max: f64, weight: f64) -> f64 {
    if value >= min && value <= max {
        weight
    } else if value < min {
        if min <= 0.0 {
            return 0.0;
        }
        weight * (1.0 - (min - value) / min).max(0.0)
    } else {
        if max <= 0.0 {
            return 0.0;
        }
        weight * (1.0 - (value - max) / max).max(0.0)
    }
}

fn score_range(
    factor: Factor,
    value: f64,
    (min, max): (f64, f64),
    label: &str,
    unit: &str,
) -> SubScore {
    let points = range_credit(value, min, max, factor.weight());
    if value >= min && value <= max {
        SubScore::new(
            factor,
            points,
            true,
            format!("✓ {} requirement met ({:.0}-{:.0}{})", label, min, max, unit),
        )
    } else if value < min {
        SubScore::new(
            factor,
            points,
            false,
            format!("⚠ {} slightly low (needs {:.0}-{:.0}{})", label, min, max, unit),
        )
    } else {
        SubScore::new(
            factor,
            points,
            false,
            format!("⚠ {} slightly high (optimal: {:.0}-{:.0}{})", label, min, max, unit),
        )
    }
}

pub fn score_rainfall(env: &EnvironmentInput, crop: &CropProfile) -> SubScore {
    score_range(Factor::Rainfall, env.rainfall, crop.rainfall_mm, "Rainfall", "mm")
}

pub fn score_temperature(env: &EnvironmentInput, crop: &CropProfile) -> SubScore {
    score_range(Factor::Temperature, env.temperature, crop.temperature_c, "Temperature", "°C")
}

/// Full weight inside the range, else `max(0, weight - |pH - midpoint|)`
pub fn score_ph(env: &EnvironmentInput, crop: &CropProfile) -> SubScore {
    let (min, max) = crop.ph_range;
    let weight = Factor::Ph.weight();

    if env.ph >= min && env.ph <= max {
        SubScore::full(Factor::Ph, format!("✓ pH requirement met ({:.1}-{:.1})", min, max))
    } else {
        let midpoint = (min + max) / 2.0;
        SubScore::new(
            Factor::Ph,
            (weight - (env.ph - midpoint).abs()).max(0.0),
            false,
            format!("⚠ pH adjustment may be needed (optimal: {:.1}-{:.1})", min, max),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::knowledge_base;
    use approx::assert_relative_eq;

    fn env(rainfall: f64, temperature: f64, ph: f64) -> EnvironmentInput {
        EnvironmentInput {
            rainfall,
            temperature,
            humidity: 70.0,
            ph,
            farm_size: 1.0,
            season: "kharif".into(),
            soil_type: "loamy".into(),
            water_availability: "medium".into(),
            experience_level: "intermediate".into(),
            market_preference: "food_grain".into(),
        }
    }

    #[test]
    fn test_range_credit_inside_and_edges() {
        assert_eq!(range_credit(500.0, 500.0, 1200.0, 20.0), 20.0);
        assert_eq!(range_credit(1200.0, 500.0, 1200.0, 20.0), 20.0);
        assert_relative_eq!(range_credit(250.0, 500.0, 1200.0, 20.0), 10.0);
        assert_relative_eq!(range_credit(1800.0, 500.0, 1200.0, 20.0), 10.0);
    }

    #[test]
    fn test_range_credit_never_negative() {
        assert_eq!(range_credit(5000.0, 500.0, 1200.0, 20.0), 0.0);
        assert_eq!(range_credit(-100.0, 500.0, 1200.0, 20.0), 0.0);
        assert_eq!(range_credit(-5.0, 0.0, 10.0, 20.0), 0.0);
    }

    #[test]
    fn test_rainfall_rationale_uses_integer_bounds() {
        let rice = knowledge_base().get("Rice").unwrap();
        let met = score_rainfall(&env(1200.0, 27.0, 6.5), rice);
        assert!(met.met);
        assert_eq!(met.score, 20.0);
        assert_eq!(met.rationale, "✓ Rainfall requirement met (1000-2500mm)");

        let low = score_rainfall(&env(800.0, 27.0, 6.5), rice);
        assert_relative_eq!(low.score, 16.0);
        assert_eq!(low.rationale, "⚠ Rainfall slightly low (needs 1000-2500mm)");
    }

    #[test]
    fn test_temperature_above_range() {
        let wheat = knowledge_base().get("Wheat").unwrap();
        let hot = score_temperature(&env(600.0, 30.0, 6.5), wheat);
        assert_relative_eq!(hot.score, 16.0);
        assert_eq!(hot.rationale, "⚠ Temperature slightly high (optimal: 15-25°C)");
    }

    #[test]
    fn test_ph_distance_from_midpoint() {
        let rice = knowledge_base().get("Rice").unwrap();
        let inside = score_ph(&env(1200.0, 27.0, 6.0), rice);
        assert_eq!(inside.score, 10.0);
        assert_eq!(inside.rationale, "✓ pH requirement met (5.5-7.0)");

        // midpoint 6.25
        let alkaline = score_ph(&env(1200.0, 27.0, 8.25), rice);
        assert_relative_eq!(alkaline.score, 8.0);
        assert!(!alkaline.met);
    }
}
