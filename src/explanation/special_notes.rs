use crate::environment::EnvironmentInput;

static CROP_TIPS: &[(&str, &[&str])] = &[
    ("Rice", &["Ensure proper water management", "Consider SRI method for better yields"]),
    ("Wheat", &["Apply nitrogen in split doses", "Monitor for rust diseases"]),
    ("Maize", &["Maintain proper plant spacing", "Good for intercropping"]),
    ("Cotton", &["Monitor for bollworm attacks", "Requires skilled labor"]),
    ("Sugarcane", &["Long-term crop commitment", "High water requirement"]),
    ("Soybeans", &["Natural nitrogen fixation", "Good rotation crop"]),
    ("Tomato", &["Requires staking and pruning", "High market demand"]),
    ("Potato", &["Cool storage needed", "Good processing potential"]),
    ("Onion", &["Long shelf life", "Export potential"]),
    ("Chili", &["High value spice crop", "Processing opportunities"]),
];

/// Cultivation tips for a crop, empty when the crop has none
pub fn crop_tips(crop: &str) -> &'static [&'static str] {
    CROP_TIPS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(crop.trim()))
        .map(|(_, tips)| *tips)
        .unwrap_or(&[])
}

/// Weather-stress notes in fixed order: drainage, irrigation, shade, cold
pub fn weather_notes(rainfall: f64, temperature: f64) -> Vec<&'static str> {
    let mut notes = Vec::new();
    if rainfall > 1500.0 {
        notes.push("High rainfall - ensure good drainage");
    }
    if rainfall < 400.0 {
        notes.push("Low rainfall - plan irrigation carefully");
    }
    if temperature > 35.0 {
        notes.push("High temperature - consider shade nets");
    }
    if temperature < 15.0 {
        notes.push("Low temperature - may need protection");
    }
    notes
}

/// Crop tips followed by weather-stress notes
pub fn generate_special_notes(crop: &str, env: &EnvironmentInput) -> Vec<String> {
    crop_tips(crop)
        .iter()
        .chain(weather_notes(env.rainfall, env.temperature).iter())
        .map(|note| note.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(rainfall: f64, temperature: f64) -> EnvironmentInput {
        EnvironmentInput {
            rainfall,
            temperature,
            humidity: 70.0,
            ph: 6.5,
            farm_size: 1.0,
            season: "kharif".into(),
            soil_type: "loamy".into(),
            water_availability: "medium".into(),
            experience_level: "intermediate".into(),
            market_preference: "mixed".into(),
        }
    }

    #[test]
    fn test_tips_then_weather_notes() {
        let notes = generate_special_notes("Rice", &env(1800.0, 38.0));
        assert_eq!(
            notes,
            vec![
                "Ensure proper water management",
                "Consider SRI method for better yields",
                "High rainfall - ensure good drainage",
                "High temperature - consider shade nets",
            ]
        );
    }

    #[test]
    fn test_crop_without_tips() {
        assert!(crop_tips("Groundnut").is_empty());
        let notes = generate_special_notes("Sunflower", &env(300.0, 10.0));
        assert_eq!(
            notes,
            vec![
                "Low rainfall - plan irrigation carefully",
                "Low temperature - may need protection",
            ]
        );
    }

    #[test]
    fn test_mild_weather_adds_nothing() {
        assert!(weather_notes(1500.0, 35.0).is_empty());
        assert!(weather_notes(400.0, 15.0).is_empty());
    }
}
