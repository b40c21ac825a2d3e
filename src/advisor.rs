//! Agri Advisor - single entry point over ranking, dosing and estimators
//!
//! Holds the crop scorer and one estimator per capability. Built once at
//! startup and shared read-only across requests; every call takes its own
//! random source.

use crate::environment::EnvironmentInput;
use crate::error::Result;
use crate::estimators::{
    DiseaseInput, DiseaseKind, Estimate, Estimator, FertilizerAdvice, FertilizerKind,
    ModelRegistry, RiskLevel, WeatherInput, WeatherKind, YieldInput, YieldKind,
};
use crate::fertilizer::DosingRequest;
use crate::random::RandomSource;
use crate::scorer::{CropScorer, ScoreBreakdown};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Which capabilities answer from a loaded artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    #[serde(rename = "yield")]
    pub yield_model: bool,
    pub disease: bool,
    pub weather: bool,
    pub fertilizer: bool,
}

pub struct AgriAdvisor {
    scorer: CropScorer,
    yield_estimator: Estimator<YieldKind>,
    disease_estimator: Estimator<DiseaseKind>,
    weather_estimator: Estimator<WeatherKind>,
    fertilizer_estimator: Estimator<FertilizerKind>,
}

impl Default for AgriAdvisor {
    fn default() -> Self {
        Self::fallback_only()
    }
}

impl AgriAdvisor {
    /// Advisor with no capabilities; every estimate uses its fallback
    pub fn fallback_only() -> Self {
        Self::from_registry(&ModelRegistry::default())
    }

    /// Load artifacts from `models_dir`. Never fails.
    pub fn load(models_dir: &Path) -> Self {
        let advisor = Self::from_registry(&ModelRegistry::load(models_dir));
        info!(capabilities = ?advisor.capabilities(), "Advisor ready");
        advisor
    }

    pub fn from_registry(registry: &ModelRegistry) -> Self {
        Self {
            scorer: CropScorer::new(),
            yield_estimator: registry.yield_estimator(),
            disease_estimator: registry.disease_estimator(),
            weather_estimator: registry.weather_estimator(),
            fertilizer_estimator: registry.fertilizer_estimator(),
        }
    }

    pub fn with_yield_estimator(mut self, estimator: Estimator<YieldKind>) -> Self {
        self.yield_estimator = estimator;
        self
    }

    pub fn with_fertilizer_estimator(mut self, estimator: Estimator<FertilizerKind>) -> Self {
        self.fertilizer_estimator = estimator;
        self
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            yield_model: self.yield_estimator.is_available(),
            disease: self.disease_estimator.is_available(),
            weather: self.weather_estimator.is_available(),
            fertilizer: self.fertilizer_estimator.is_available(),
        }
    }

    pub fn scorer(&self) -> &CropScorer {
        &self.scorer
    }

    /// Up to eight crops, best first
    pub fn score_crops(
        &self,
        env: &EnvironmentInput,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<ScoreBreakdown>> {
        self.scorer.score_crops(env, rng)
    }

    /// Recommender answer when it covers the crop, else the dosing calculator
    pub fn dose_fertilizer(
        &self,
        request: &DosingRequest,
        rng: &mut dyn RandomSource,
    ) -> Result<Estimate<FertilizerAdvice>> {
        self.fertilizer_estimator.estimate(request, rng)
    }

    pub fn estimate_yield(
        &self,
        input: &YieldInput,
        rng: &mut dyn RandomSource,
    ) -> Result<Estimate<f64>> {
        self.yield_estimator.estimate(input, rng)
    }

    pub fn estimate_disease_risk(
        &self,
        input: &DiseaseInput,
        rng: &mut dyn RandomSource,
    ) -> Result<Estimate<RiskLevel>> {
        self.disease_estimator.estimate(input, rng)
    }

    pub fn estimate_weather(
        &self,
        input: &WeatherInput,
        rng: &mut dyn RandomSource,
    ) -> Result<Estimate<f64>> {
        self.weather_estimator.estimate(input, rng)
    }
}
