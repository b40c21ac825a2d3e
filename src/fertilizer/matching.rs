//! Crop name matching against the fertilizer baseline table
//!
//! Free text like "Rice, paddy" or "Maize (corn)" is normalized and matched by
//! case-insensitive containment in either direction. First hit in table order
//! wins.

use super::Npk;
use serde::Serialize;

/// Baseline NPK demand of one crop (kg/ha)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FertilizerEntry {
    pub name: &'static str,
    pub npk: Npk,
}

pub const DEFAULT_CROP: &str = "Maize";

static FERTILIZER_BASELINES: &[FertilizerEntry] = &[
    FertilizerEntry { name: "Maize", npk: Npk::new(120.0, 60.0, 40.0) },
    FertilizerEntry { name: "Rice", npk: Npk::new(100.0, 50.0, 50.0) },
    FertilizerEntry { name: "Potatoes", npk: Npk::new(150.0, 80.0, 120.0) },
    // legume: low N
    FertilizerEntry { name: "Soybeans", npk: Npk::new(20.0, 40.0, 60.0) },
    FertilizerEntry { name: "Wheat", npk: Npk::new(120.0, 40.0, 30.0) },
    FertilizerEntry { name: "Sorghum", npk: Npk::new(80.0, 40.0, 40.0) },
    FertilizerEntry { name: "Cotton", npk: Npk::new(120.0, 60.0, 60.0) },
    FertilizerEntry { name: "Sugarcane", npk: Npk::new(200.0, 80.0, 100.0) },
    FertilizerEntry { name: "Tomatoes", npk: Npk::new(150.0, 100.0, 150.0) },
];

pub fn baselines() -> &'static [FertilizerEntry] {
    FERTILIZER_BASELINES
}

/// Lower-case, drop commas and parentheses and "paddy" qualifiers, collapse spaces
pub fn normalize_crop_name(raw: &str) -> String {
    let cleaned: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ',' | '(' | ')'))
        .collect();

    cleaned
        .split_whitespace()
        .filter(|token| *token != "paddy")
        .collect::<Vec<_>>()
        .join(" ")
}

/// First baseline whose name contains, or is contained in, the normalized input
pub fn match_crop(raw: &str) -> Option<&'static FertilizerEntry> {
    let needle = normalize_crop_name(raw);
    if needle.is_empty() {
        return None;
    }

    FERTILIZER_BASELINES.iter().find(|entry| {
        let key = entry.name.to_lowercase();
        key.contains(&needle) || needle.contains(&key)
    })
}

/// `match_crop`, falling back to Maize
pub fn match_crop_or_default(raw: &str) -> &'static FertilizerEntry {
    match_crop(raw).unwrap_or(&FERTILIZER_BASELINES[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_qualifiers() {
        assert_eq!(normalize_crop_name("Rice, paddy"), "rice");
        assert_eq!(normalize_crop_name("Maize (corn)"), "maize corn");
        assert_eq!(normalize_crop_name("  Sugarcane  "), "sugarcane");
    }

    #[test]
    fn test_match_is_case_insensitive_both_directions() {
        assert_eq!(match_crop("Rice, paddy").map(|e| e.name), Some("Rice"));
        assert_eq!(match_crop("RICE").map(|e| e.name), Some("Rice"));
        // input contained in key
        assert_eq!(match_crop("potato").map(|e| e.name), Some("Potatoes"));
        // key contained in input
        assert_eq!(match_crop("Sweet Sorghum").map(|e| e.name), Some("Sorghum"));
    }

    #[test]
    fn test_unknown_crop_defaults_to_maize() {
        assert!(match_crop("Quinoa").is_none());
        assert_eq!(match_crop_or_default("Quinoa").name, DEFAULT_CROP);
        assert_eq!(match_crop_or_default("").name, DEFAULT_CROP);
    }
}
