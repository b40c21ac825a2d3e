//! Disease risk estimate

use super::EstimatorKind;
use crate::error::{ensure_finite, Result};
use crate::random::RandomSource;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiseaseInput {
    pub rainfall: f64,
    pub temperature: f64,
    /// Relative humidity (%); only the fallback uses it
    pub humidity: f64,
    pub pesticide: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Parse a class label, case-insensitive
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "low" => Some(RiskLevel::Low),
            "medium" => Some(RiskLevel::Medium),
            "high" => Some(RiskLevel::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            RiskLevel::High => "Apply fungicide, improve drainage, reduce plant density",
            RiskLevel::Medium => "Monitor crops closely, ensure proper ventilation",
            RiskLevel::Low => "Continue regular monitoring, maintain good practices",
        }
    }

    fn from_score(score: u8) -> Self {
        if score >= 4 {
            RiskLevel::High
        } else if score >= 2 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Additive risk points: wet season, mild temperature, humid air, little pesticide
pub fn disease_risk_score(input: &DiseaseInput) -> u8 {
    let mut score = 0;

    if input.rainfall > 1000.0 {
        score += 2;
    } else if input.rainfall > 500.0 {
        score += 1;
    }

    if (15.0..=25.0).contains(&input.temperature) {
        score += 2;
    }

    if input.humidity > 80.0 {
        score += 1;
    }

    if input.pesticide < 100.0 {
        score += 1;
    }

    score
}

pub struct DiseaseKind;

impl EstimatorKind for DiseaseKind {
    type Input = DiseaseInput;
    type Prediction = RiskLevel;
    type Output = RiskLevel;

    const NAME: &'static str = "disease";

    fn validate(input: &DiseaseInput) -> Result<()> {
        ensure_finite("rainfall", input.rainfall)?;
        ensure_finite("temperature", input.temperature)?;
        ensure_finite("humidity", input.humidity)?;
        ensure_finite("pesticide", input.pesticide)?;
        Ok(())
    }

    fn accept(prediction: RiskLevel) -> Option<RiskLevel> {
        Some(prediction)
    }

    fn fallback(input: &DiseaseInput, _rng: &mut dyn RandomSource) -> RiskLevel {
        RiskLevel::from_score(disease_risk_score(input))
    }
}
