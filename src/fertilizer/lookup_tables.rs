//! Static dosing tables: rainfall regimes, soil and growth-stage factors,
//! application schedules and fertilizer sources.

use super::Npk;
use crate::utils::category_key;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

// ============================================================================
// Rainfall regime
// ============================================================================

/// Mutually exclusive rainfall band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RainfallRegime {
    /// Below 400 mm
    Low,
    Normal,
    /// Above 1500 mm
    High,
}

impl RainfallRegime {
    pub const LOW_BELOW_MM: f64 = 400.0;
    pub const HIGH_ABOVE_MM: f64 = 1500.0;

    pub fn classify(rainfall: f64) -> Self {
        if rainfall < Self::LOW_BELOW_MM {
            RainfallRegime::Low
        } else if rainfall > Self::HIGH_ABOVE_MM {
            RainfallRegime::High
        } else {
            RainfallRegime::Normal
        }
    }

    /// Uniform draw ranges for the N, P and K multipliers
    pub fn factor_ranges(&self) -> [(f64, f64); 3] {
        match self {
            RainfallRegime::Low => [(1.15, 1.25), (1.10, 1.20), (1.05, 1.15)],
            RainfallRegime::Normal => [(0.95, 1.05), (0.95, 1.05), (0.95, 1.05)],
            RainfallRegime::High => [(0.75, 0.85), (0.80, 0.90), (1.10, 1.20)],
        }
    }

    pub fn note(&self) -> &'static str {
        match self {
            RainfallRegime::Low => "Low rainfall: Increased fertilizer needs",
            RainfallRegime::Normal => "Normal rainfall: Standard fertilizer application",
            RainfallRegime::High => "High rainfall: Reduced N&P, increased K for leaching prevention",
        }
    }
}

// ============================================================================
// Soil factors
// ============================================================================

static SOIL_FACTORS: &[(&str, Npk)] = &[
    ("clay", Npk::new(0.9, 1.1, 0.9)),
    ("sandy", Npk::new(1.1, 1.2, 1.1)),
    ("loamy", Npk::new(1.0, 1.0, 1.0)),
    ("silt", Npk::new(0.95, 1.05, 0.95)),
    ("red", Npk::new(1.05, 1.15, 1.0)),
    ("black", Npk::new(0.95, 0.9, 1.05)),
];

/// Per-soil multipliers; unknown soils are neutral
pub fn soil_factor(soil_type: &str) -> Npk {
    let key = category_key(soil_type);
    SOIL_FACTORS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, factor)| *factor)
        .unwrap_or(Npk::ONE)
}

// ============================================================================
// Growth stage
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GrowthStage {
    PreSowing,
    Sowing,
    Vegetative,
    Flowering,
    Maturity,
}

impl GrowthStage {
    pub fn parse(raw: &str) -> Option<Self> {
        match category_key(raw).replace('-', "_").as_str() {
            "pre_sowing" | "presowing" => Some(GrowthStage::PreSowing),
            "sowing" => Some(GrowthStage::Sowing),
            "vegetative" => Some(GrowthStage::Vegetative),
            "flowering" => Some(GrowthStage::Flowering),
            "maturity" => Some(GrowthStage::Maturity),
            _ => None,
        }
    }

    /// Unknown stages dose as vegetative
    pub fn resolve(raw: &str) -> Self {
        Self::parse(raw).unwrap_or(GrowthStage::Vegetative)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GrowthStage::PreSowing => "pre-sowing",
            GrowthStage::Sowing => "sowing",
            GrowthStage::Vegetative => "vegetative",
            GrowthStage::Flowering => "flowering",
            GrowthStage::Maturity => "maturity",
        }
    }

    pub fn factor(&self) -> Npk {
        match self {
            GrowthStage::PreSowing => Npk::new(0.3, 0.5, 0.3),
            GrowthStage::Sowing => Npk::new(0.4, 0.6, 0.4),
            GrowthStage::Vegetative => Npk::new(1.2, 0.8, 0.9),
            GrowthStage::Flowering => Npk::new(0.6, 1.2, 1.1),
            GrowthStage::Maturity => Npk::new(0.2, 0.3, 0.8),
        }
    }

    pub fn schedule(&self) -> &'static ApplicationSchedule {
        match self {
            GrowthStage::PreSowing => &PRE_SOWING_SCHEDULE,
            GrowthStage::Sowing => &SOWING_SCHEDULE,
            GrowthStage::Vegetative => &VEGETATIVE_SCHEDULE,
            GrowthStage::Flowering => &FLOWERING_SCHEDULE,
            GrowthStage::Maturity => &MATURITY_SCHEDULE,
        }
    }
}

// ============================================================================
// Application schedules
// ============================================================================

/// Share of each nutrient (percent) applied at one event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SplitPercent {
    #[serde(rename = "N")]
    pub n: u8,
    #[serde(rename = "P")]
    pub p: u8,
    #[serde(rename = "K")]
    pub k: u8,
}

const fn split(n: u8, p: u8, k: u8) -> SplitPercent {
    SplitPercent { n, p, k }
}

/// Named application events plus a one-line summary
///
/// Serializes flat: `{"basal": {"N":40,..}, "top_dress_1": {..}, "schedule": ".."}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationSchedule {
    pub events: &'static [(&'static str, SplitPercent)],
    pub summary: &'static str,
}

impl Serialize for ApplicationSchedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.events.len() + 1))?;
        for (event, percent) in self.events {
            map.serialize_entry(event, percent)?;
        }
        map.serialize_entry("schedule", self.summary)?;
        map.end()
    }
}

static PRE_SOWING_SCHEDULE: ApplicationSchedule = ApplicationSchedule {
    events: &[("basal", split(100, 100, 100))],
    summary: "Apply all fertilizers as basal dose before sowing",
};

static SOWING_SCHEDULE: ApplicationSchedule = ApplicationSchedule {
    events: &[("basal", split(50, 100, 50)), ("top_dress_1", split(50, 0, 50))],
    summary: "50% N&K as basal, 50% N&K after 3-4 weeks. All P as basal.",
};

static VEGETATIVE_SCHEDULE: ApplicationSchedule = ApplicationSchedule {
    events: &[
        ("basal", split(40, 100, 40)),
        ("top_dress_1", split(40, 0, 40)),
        ("top_dress_2", split(20, 0, 20)),
    ],
    summary: "40% N&K basal, 40% at 25 days, 20% at 45 days. All P basal.",
};

static FLOWERING_SCHEDULE: ApplicationSchedule = ApplicationSchedule {
    events: &[("current", split(30, 70, 60)), ("next", split(20, 30, 40))],
    summary: "Focus on P&K for flower/fruit development. Reduce N.",
};

static MATURITY_SCHEDULE: ApplicationSchedule = ApplicationSchedule {
    events: &[("current", split(10, 20, 50))],
    summary: "Minimal fertilizer. Focus on K for fruit filling.",
};

// ============================================================================
// Fertilizer sources
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Nutrient {
    Nitrogen,
    Phosphorus,
    Potassium,
}

impl Nutrient {
    pub const ALL: [Nutrient; 3] = [Nutrient::Nitrogen, Nutrient::Phosphorus, Nutrient::Potassium];

    pub fn display_name(&self) -> &'static str {
        match self {
            Nutrient::Nitrogen => "Nitrogen",
            Nutrient::Phosphorus => "Phosphorus",
            Nutrient::Potassium => "Potassium",
        }
    }

    /// Minimum per-hectare dose (kg)
    pub fn floor_kg_ha(&self) -> i64 {
        match self {
            Nutrient::Nitrogen => 10,
            Nutrient::Phosphorus | Nutrient::Potassium => 5,
        }
    }

    /// Cost per kg of nutrient (INR), drawn uniformly
    pub fn cost_range(&self) -> (f64, f64) {
        match self {
            Nutrient::Nitrogen => (25.0, 35.0),
            Nutrient::Phosphorus => (50.0, 70.0),
            Nutrient::Potassium => (30.0, 45.0),
        }
    }

    pub fn sources(&self) -> &'static [FertilizerSource] {
        match self {
            Nutrient::Nitrogen => NITROGEN_SOURCES,
            Nutrient::Phosphorus => PHOSPHORUS_SOURCES,
            Nutrient::Potassium => POTASSIUM_SOURCES,
        }
    }
}

/// Commercial product and the nutrient fraction it carries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FertilizerSource {
    pub label: &'static str,
    pub fraction: f64,
}

const fn source(label: &'static str, fraction: f64) -> FertilizerSource {
    FertilizerSource { label, fraction }
}

static NITROGEN_SOURCES: &[FertilizerSource] = &[
    source("Urea (46% N)", 0.46),
    source("Ammonium Sulphate (21% N)", 0.21),
    source("CAN (26% N)", 0.26),
    source("DAP (18% N)", 0.18),
];

static PHOSPHORUS_SOURCES: &[FertilizerSource] = &[
    source("DAP (46% P2O5)", 0.46),
    source("SSP (16% P2O5)", 0.16),
    source("TSP (46% P2O5)", 0.46),
    source("Bone Meal (22% P2O5)", 0.22),
];

static POTASSIUM_SOURCES: &[FertilizerSource] = &[
    source("MOP (60% K2O)", 0.60),
    source("SOP (50% K2O)", 0.50),
    source("Potash (50% K2O)", 0.50),
    source("Ash (5% K2O)", 0.05),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regime_boundaries() {
        assert_eq!(RainfallRegime::classify(399.9), RainfallRegime::Low);
        assert_eq!(RainfallRegime::classify(400.0), RainfallRegime::Normal);
        assert_eq!(RainfallRegime::classify(1500.0), RainfallRegime::Normal);
        assert_eq!(RainfallRegime::classify(1500.1), RainfallRegime::High);
    }

    #[test]
    fn test_soil_factor_lookup() {
        assert_eq!(soil_factor("Sandy"), Npk::new(1.1, 1.2, 1.1));
        assert_eq!(soil_factor("medium"), Npk::ONE);
    }

    #[test]
    fn test_unknown_stage_is_vegetative() {
        assert_eq!(GrowthStage::resolve("tillering"), GrowthStage::Vegetative);
        assert_eq!(GrowthStage::resolve("Pre-Sowing"), GrowthStage::PreSowing);
        assert_eq!(GrowthStage::resolve("pre_sowing"), GrowthStage::PreSowing);
    }

    #[test]
    fn test_schedule_serializes_flat() {
        let json = serde_json::to_value(GrowthStage::Sowing.schedule()).unwrap();
        assert_eq!(json["basal"]["N"], 50);
        assert_eq!(json["top_dress_1"]["P"], 0);
        assert_eq!(
            json["schedule"],
            "50% N&K as basal, 50% N&K after 3-4 weeks. All P as basal."
        );
    }

    #[test]
    fn test_sources_carry_their_fraction() {
        for nutrient in Nutrient::ALL {
            for s in nutrient.sources() {
                assert!(s.fraction > 0.0 && s.fraction < 1.0, "{}", s.label);
            }
        }
    }
}
