//! Crop Knowledge Base
//!
//! Static reference data for the twelve candidate crops: tolerance ranges,
//! qualitative attributes, base yield and base investment. The table is
//! read-only for the lifetime of the process and shared across requests
//! without locking.

use crate::fertilizer::{match_crop, Npk};
use crate::utils::category_key;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::sync::OnceLock;

/// Season sentinel: a crop listing it fits every season
pub const ANY_SEASON: &str = "annual";

/// Base yield used when a crop carries no yield figure (kg/ha)
pub const DEFAULT_BASE_YIELD: f64 = 3000.0;

/// Investment used when a crop carries no investment range (INR/ha)
pub const DEFAULT_INVESTMENT_PER_HA: i64 = 20000;

// ============================================================================
// Qualitative tiers
// ============================================================================

/// Water need of a crop, or water availability of a farm
///
/// Ordered: low < medium < high < very_high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterTier {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl WaterTier {
    /// Parse a caller-supplied tier. Anything outside the four tiers is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match category_key(raw).as_str() {
            "low" => Some(WaterTier::Low),
            "medium" => Some(WaterTier::Medium),
            "high" => Some(WaterTier::High),
            "very_high" | "veryhigh" => Some(WaterTier::VeryHigh),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WaterTier::Low => "low",
            WaterTier::Medium => "medium",
            WaterTier::High => "high",
            WaterTier::VeryHigh => "very_high",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            WaterTier::Low => "Low",
            WaterTier::Medium => "Medium",
            WaterTier::High => "High",
            WaterTier::VeryHigh => "Very High",
        }
    }

    /// Crop water needs a farm with this availability can supply
    pub fn supplies(&self) -> &'static [WaterTier] {
        match self {
            WaterTier::Low => &[WaterTier::Low, WaterTier::Medium],
            WaterTier::Medium => &[WaterTier::Low, WaterTier::Medium, WaterTier::High],
            WaterTier::High => &[WaterTier::Medium, WaterTier::High, WaterTier::VeryHigh],
            WaterTier::VeryHigh => &[WaterTier::High, WaterTier::VeryHigh],
        }
    }
}

/// Qualitative grade for yield potential, investment and profit margin
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Low => "low",
            Grade::Medium => "medium",
            Grade::High => "high",
            Grade::VeryHigh => "very_high",
        }
    }
}

// ============================================================================
// Crop profiles
// ============================================================================

/// Immutable per-crop requirements
#[derive(Debug, Clone, PartialEq)]
pub struct CropProfile {
    pub name: &'static str,
    /// Rainfall tolerance [min, max] in mm
    pub rainfall_mm: (f64, f64),
    /// Temperature tolerance [min, max] in °C
    pub temperature_c: (f64, f64),
    /// Humidity tolerance [min, max] in %
    pub humidity_pct: (f64, f64),
    pub soil_types: &'static [&'static str],
    pub ph_range: (f64, f64),
    pub water_need: WaterTier,
    /// Compatible seasons, or `[ANY_SEASON]`
    pub seasons: &'static [&'static str],
    /// Experience tiers the crop suits, least demanding first
    pub experience: &'static [&'static str],
    pub market_type: &'static str,
    pub yield_potential: Grade,
    pub investment: Grade,
    pub profit_margin: Grade,
    pub duration: &'static str,
    pub base_yield_kg_ha: Option<f64>,
    /// Inclusive investment range per hectare (INR)
    pub investment_per_ha: Option<(i64, i64)>,
    pub yield_unit: &'static str,
}

impl CropProfile {
    pub fn accepts_soil(&self, soil: &str) -> bool {
        self.soil_types.iter().any(|s| *s == soil)
    }

    pub fn accepts_season(&self, season: &str) -> bool {
        self.seasons.iter().any(|s| *s == season || *s == ANY_SEASON)
    }

    pub fn accepts_experience(&self, level: &str) -> bool {
        self.experience.iter().any(|e| *e == level)
    }

    /// Most demanding experience tier listed for the crop
    pub fn top_experience(&self) -> &'static str {
        self.experience.last().copied().unwrap_or("advanced")
    }

    pub fn base_yield(&self) -> f64 {
        self.base_yield_kg_ha.unwrap_or(DEFAULT_BASE_YIELD)
    }

    /// Baseline NPK from the fertilizer table, when the crop is covered
    pub fn base_npk(&self) -> Option<Npk> {
        match_crop(self.name).map(|entry| entry.npk)
    }
}

const FULL_EXPERIENCE: &[&str] = &["beginner", "intermediate", "advanced"];
const SKILLED: &[&str] = &["intermediate", "advanced"];
const NOVICE: &[&str] = &["beginner", "intermediate"];

/// Candidate crops in ranking order (ties keep this order)
pub static CROP_PROFILES: &[CropProfile] = &[
    CropProfile {
        name: "Rice",
        rainfall_mm: (1000.0, 2500.0),
        temperature_c: (20.0, 35.0),
        humidity_pct: (70.0, 95.0),
        soil_types: &["clay", "loamy", "alluvial"],
        ph_range: (5.5, 7.0),
        water_need: WaterTier::High,
        seasons: &["kharif", "rabi"],
        experience: FULL_EXPERIENCE,
        market_type: "food_grain",
        yield_potential: Grade::High,
        investment: Grade::Medium,
        profit_margin: Grade::Medium,
        duration: "120-150 days",
        base_yield_kg_ha: Some(4000.0),
        investment_per_ha: Some((25000, 35000)),
        yield_unit: "kg",
    },
    CropProfile {
        name: "Wheat",
        rainfall_mm: (300.0, 1000.0),
        temperature_c: (15.0, 25.0),
        humidity_pct: (50.0, 70.0),
        soil_types: &["loamy", "clay", "black"],
        ph_range: (6.0, 7.5),
        water_need: WaterTier::Medium,
        seasons: &["rabi"],
        experience: FULL_EXPERIENCE,
        market_type: "food_grain",
        yield_potential: Grade::High,
        investment: Grade::Medium,
        profit_margin: Grade::Medium,
        duration: "120-140 days",
        base_yield_kg_ha: Some(3500.0),
        investment_per_ha: Some((20000, 30000)),
        yield_unit: "kg",
    },
    CropProfile {
        name: "Maize",
        rainfall_mm: (500.0, 1200.0),
        temperature_c: (18.0, 32.0),
        humidity_pct: (60.0, 80.0),
        soil_types: &["loamy", "sandy", "red"],
        ph_range: (5.5, 7.0),
        water_need: WaterTier::Medium,
        seasons: &["kharif", "rabi", "zaid"],
        experience: FULL_EXPERIENCE,
        market_type: "food_grain",
        yield_potential: Grade::High,
        investment: Grade::Medium,
        profit_margin: Grade::High,
        duration: "90-120 days",
        base_yield_kg_ha: Some(5000.0),
        investment_per_ha: Some((15000, 25000)),
        yield_unit: "kg",
    },
    CropProfile {
        name: "Cotton",
        rainfall_mm: (500.0, 1200.0),
        temperature_c: (21.0, 35.0),
        humidity_pct: (60.0, 85.0),
        soil_types: &["black", "alluvial", "red"],
        ph_range: (6.0, 8.0),
        water_need: WaterTier::Medium,
        seasons: &["kharif"],
        experience: SKILLED,
        market_type: "cash_crop",
        yield_potential: Grade::High,
        investment: Grade::High,
        profit_margin: Grade::VeryHigh,
        duration: "180-200 days",
        base_yield_kg_ha: Some(2000.0),
        investment_per_ha: Some((30000, 45000)),
        yield_unit: "kg",
    },
    CropProfile {
        name: "Sugarcane",
        rainfall_mm: (1000.0, 2000.0),
        temperature_c: (20.0, 35.0),
        humidity_pct: (70.0, 90.0),
        soil_types: &["loamy", "clay", "alluvial"],
        ph_range: (6.0, 7.5),
        water_need: WaterTier::VeryHigh,
        seasons: &[ANY_SEASON],
        experience: SKILLED,
        market_type: "cash_crop",
        yield_potential: Grade::VeryHigh,
        investment: Grade::VeryHigh,
        profit_margin: Grade::High,
        duration: "12-18 months",
        base_yield_kg_ha: Some(80000.0),
        investment_per_ha: Some((80000, 120000)),
        yield_unit: "tons",
    },
    CropProfile {
        name: "Soybeans",
        rainfall_mm: (400.0, 800.0),
        temperature_c: (20.0, 30.0),
        humidity_pct: (60.0, 80.0),
        soil_types: &["loamy", "black", "red"],
        ph_range: (6.0, 7.5),
        water_need: WaterTier::Medium,
        seasons: &["kharif"],
        experience: NOVICE,
        market_type: "oilseed",
        yield_potential: Grade::Medium,
        investment: Grade::Low,
        profit_margin: Grade::Medium,
        duration: "90-110 days",
        base_yield_kg_ha: Some(2500.0),
        investment_per_ha: Some((12000, 18000)),
        yield_unit: "kg",
    },
    CropProfile {
        name: "Groundnut",
        rainfall_mm: (500.0, 1000.0),
        temperature_c: (20.0, 30.0),
        humidity_pct: (65.0, 85.0),
        soil_types: &["sandy", "red", "black"],
        ph_range: (6.0, 7.0),
        water_need: WaterTier::Medium,
        seasons: &["kharif", "rabi"],
        experience: NOVICE,
        market_type: "oilseed",
        yield_potential: Grade::Medium,
        investment: Grade::Medium,
        profit_margin: Grade::Medium,
        duration: "100-120 days",
        base_yield_kg_ha: Some(2000.0),
        investment_per_ha: Some((18000, 25000)),
        yield_unit: "kg",
    },
    CropProfile {
        name: "Tomato",
        rainfall_mm: (400.0, 800.0),
        temperature_c: (18.0, 27.0),
        humidity_pct: (60.0, 80.0),
        soil_types: &["loamy", "sandy", "red"],
        ph_range: (6.0, 7.0),
        water_need: WaterTier::High,
        seasons: &["rabi", "zaid"],
        experience: SKILLED,
        market_type: "vegetable",
        yield_potential: Grade::High,
        investment: Grade::High,
        profit_margin: Grade::VeryHigh,
        duration: "90-120 days",
        base_yield_kg_ha: Some(40000.0),
        investment_per_ha: Some((40000, 60000)),
        yield_unit: "kg",
    },
    CropProfile {
        name: "Potato",
        rainfall_mm: (400.0, 700.0),
        temperature_c: (15.0, 25.0),
        humidity_pct: (60.0, 80.0),
        soil_types: &["loamy", "sandy", "red"],
        ph_range: (5.5, 6.5),
        water_need: WaterTier::Medium,
        seasons: &["rabi"],
        experience: SKILLED,
        market_type: "vegetable",
        yield_potential: Grade::High,
        investment: Grade::High,
        profit_margin: Grade::High,
        duration: "90-120 days",
        base_yield_kg_ha: Some(25000.0),
        investment_per_ha: Some((35000, 50000)),
        yield_unit: "kg",
    },
    CropProfile {
        name: "Onion",
        rainfall_mm: (300.0, 600.0),
        temperature_c: (15.0, 25.0),
        humidity_pct: (60.0, 70.0),
        soil_types: &["loamy", "sandy", "alluvial"],
        ph_range: (6.0, 7.5),
        water_need: WaterTier::Medium,
        seasons: &["rabi", "kharif"],
        experience: SKILLED,
        market_type: "vegetable",
        yield_potential: Grade::Medium,
        investment: Grade::Medium,
        profit_margin: Grade::High,
        duration: "120-150 days",
        base_yield_kg_ha: Some(30000.0),
        investment_per_ha: Some((25000, 35000)),
        yield_unit: "kg",
    },
    CropProfile {
        name: "Sunflower",
        rainfall_mm: (400.0, 800.0),
        temperature_c: (20.0, 30.0),
        humidity_pct: (60.0, 80.0),
        soil_types: &["loamy", "sandy", "red"],
        ph_range: (6.0, 7.5),
        water_need: WaterTier::Medium,
        seasons: &["kharif", "rabi"],
        experience: NOVICE,
        market_type: "oilseed",
        yield_potential: Grade::Medium,
        investment: Grade::Low,
        profit_margin: Grade::Medium,
        duration: "90-110 days",
        base_yield_kg_ha: Some(1800.0),
        investment_per_ha: Some((10000, 15000)),
        yield_unit: "kg",
    },
    CropProfile {
        name: "Chili",
        rainfall_mm: (600.0, 1200.0),
        temperature_c: (20.0, 30.0),
        humidity_pct: (70.0, 85.0),
        soil_types: &["loamy", "sandy", "red"],
        ph_range: (6.0, 7.0),
        water_need: WaterTier::Medium,
        seasons: &["kharif", "rabi"],
        experience: SKILLED,
        market_type: "spice",
        yield_potential: Grade::High,
        investment: Grade::Medium,
        profit_margin: Grade::VeryHigh,
        duration: "150-180 days",
        base_yield_kg_ha: Some(3000.0),
        investment_per_ha: Some((20000, 30000)),
        yield_unit: "kg",
    },
];

// ============================================================================
// Knowledge base
// ============================================================================

/// Read-only crop table with a case-insensitive name index
pub struct CropKnowledgeBase {
    profiles: &'static [CropProfile],
    index: FxHashMap<String, usize>,
}

impl CropKnowledgeBase {
    pub fn new(profiles: &'static [CropProfile]) -> Self {
        let index = profiles
            .iter()
            .enumerate()
            .map(|(idx, profile)| (profile.name.to_lowercase(), idx))
            .collect();
        Self { profiles, index }
    }

    /// Profiles in iteration order
    pub fn profiles(&self) -> &'static [CropProfile] {
        self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&'static CropProfile> {
        let profiles = self.profiles;
        self.index
            .get(&name.trim().to_lowercase())
            .and_then(|&idx| profiles.get(idx))
    }
}

/// Process-wide knowledge base over `CROP_PROFILES`
pub fn knowledge_base() -> &'static CropKnowledgeBase {
    static KB: OnceLock<CropKnowledgeBase> = OnceLock::new();
    KB.get_or_init(|| CropKnowledgeBase::new(CROP_PROFILES))
}
