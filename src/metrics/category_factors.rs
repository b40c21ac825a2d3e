//! Categorical factors: soil, season, experience, water, market
//!
//! All of these award either full weight or a fixed partial credit. Inputs
//! are expected in key form (see `EnvironmentInput::normalized`).

use super::{Factor, SubScore};
use crate::data::{CropProfile, WaterTier};
use crate::environment::EnvironmentInput;

/// Market preference that matches every category
pub const ANY_MARKET: &str = "mixed";

pub fn score_soil(env: &EnvironmentInput, crop: &CropProfile) -> SubScore {
    if crop.accepts_soil(&env.soil_type) {
        SubScore::full(Factor::Soil, format!("✓ Suitable for {} soil", env.soil_type))
    } else {
        SubScore::partial(Factor::Soil, format!("⚠ Moderately suitable for {} soil", env.soil_type))
    }
}

pub fn score_season(env: &EnvironmentInput, crop: &CropProfile) -> SubScore {
    if crop.accepts_season(&env.season) {
        SubScore::full(Factor::Season, format!("✓ Suitable for {} season", env.season))
    } else {
        SubScore::partial(
            Factor::Season,
            format!("⚠ Not ideal season (best: {})", crop.seasons.join(", ")),
        )
    }
}

pub fn score_experience(env: &EnvironmentInput, crop: &CropProfile) -> SubScore {
    if crop.accepts_experience(&env.experience_level) {
        SubScore::full(
            Factor::Experience,
            format!("✓ Suitable for {} farmers", env.experience_level),
        )
    } else {
        SubScore::partial(
            Factor::Experience,
            format!("⚠ May require {} level expertise", crop.top_experience()),
        )
    }
}

/// Unrecognized availability tiers supply nothing
pub fn score_water(env: &EnvironmentInput, crop: &CropProfile) -> SubScore {
    let compatible = WaterTier::parse(&env.water_availability)
        .map(|available| available.supplies().contains(&crop.water_need))
        .unwrap_or(false);

    if compatible {
        SubScore::full(Factor::Water, "✓ Water requirement compatible".to_string())
    } else {
        SubScore::partial(
            Factor::Water,
            format!("⚠ Water requirement: {}", crop.water_need.as_str()),
        )
    }
}

pub fn score_market(env: &EnvironmentInput, crop: &CropProfile) -> SubScore {
    if env.market_preference == crop.market_type || env.market_preference == ANY_MARKET {
        SubScore::full(Factor::Market, "✓ Matches market preference".to_string())
    } else {
        SubScore::partial(
            Factor::Market,
            format!("⚠ Different market category: {}", crop.market_type),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::knowledge_base;

    fn env() -> EnvironmentInput {
        EnvironmentInput {
            rainfall: 900.0,
            temperature: 24.0,
            humidity: 70.0,
            ph: 6.5,
            farm_size: 1.0,
            season: "kharif".into(),
            soil_type: "black".into(),
            water_availability: "low".into(),
            experience_level: "beginner".into(),
            market_preference: "vegetable".into(),
        }
    }

    #[test]
    fn test_soil_partial_credit() {
        let rice = knowledge_base().get("Rice").unwrap();
        let s = score_soil(&env(), rice);
        assert_eq!(s.score, 8.0);
        assert_eq!(s.rationale, "⚠ Moderately suitable for black soil");

        let cotton = knowledge_base().get("Cotton").unwrap();
        assert_eq!(score_soil(&env(), cotton).score, 15.0);
    }

    #[test]
    fn test_season_lists_best_seasons() {
        let wheat = knowledge_base().get("Wheat").unwrap();
        let s = score_season(&env(), wheat);
        assert_eq!(s.score, 5.0);
        assert_eq!(s.rationale, "⚠ Not ideal season (best: rabi)");

        let cane = knowledge_base().get("Sugarcane").unwrap();
        assert_eq!(score_season(&env(), cane).score, 10.0);
    }

    #[test]
    fn test_experience_names_top_tier() {
        let cotton = knowledge_base().get("Cotton").unwrap();
        let s = score_experience(&env(), cotton);
        assert_eq!(s.score, 6.0);
        assert_eq!(s.rationale, "⚠ May require advanced level expertise");
    }

    #[test]
    fn test_water_compatibility() {
        let rice = knowledge_base().get("Rice").unwrap();
        let s = score_water(&env(), rice);
        assert_eq!(s.score, 5.0);
        assert_eq!(s.rationale, "⚠ Water requirement: high");

        let mut medium = env();
        medium.water_availability = "medium".into();
        assert_eq!(score_water(&medium, rice).score, 10.0);

        let mut unknown = env();
        unknown.water_availability = "plenty".into();
        assert_eq!(score_water(&unknown, rice).score, 5.0);
    }

    #[test]
    fn test_default_moderate_availability_gets_partial_credit() {
        let env = EnvironmentInput::default().normalized();
        assert_eq!(env.water_availability, "moderate");
        for name in ["Wheat", "Rice", "Maize", "Sugarcane"] {
            let crop = knowledge_base().get(name).unwrap();
            assert_eq!(score_water(&env, crop).score, 5.0, "{}", name);
        }
    }

    #[test]
    fn test_market_wildcard() {
        let rice = knowledge_base().get("Rice").unwrap();
        assert_eq!(score_market(&env(), rice).score, 3.0);

        let mut mixed = env();
        mixed.market_preference = ANY_MARKET.into();
        assert_eq!(score_market(&mixed, rice).score, 5.0);
    }
}
