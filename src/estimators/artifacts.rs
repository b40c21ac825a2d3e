//! Predictive artifacts
//!
//! Versioned JSON documents in the models directory, loaded once at startup:
//!
//! | File                          | Capability  | Shape                                  |
//! |-------------------------------|-------------|----------------------------------------|
//! | `yield_model.json`            | yield       | scaler + linear coefficients           |
//! | `disease_model.json`          | disease     | scaler + one linear score per class    |
//! | `weather_model.json`          | weather     | slope/intercept over year              |
//! | `fertilizer_recommender.json` | fertilizer  | per-crop NPK + rainfall bands          |
//!
//! A missing file leaves the capability unavailable. A malformed one is logged
//! and also leaves it unavailable; loading never fails the process.

use super::{
    CapabilityError, DiseaseInput, DiseaseKind, DynPredictor, Estimator, FertilizerKind,
    ModelRecommendation, Predictor, RiskLevel, WeatherInput, WeatherKind, YieldInput, YieldKind,
};
use crate::error::AdvisorError;
use crate::fertilizer::{normalize_crop_name, DosingRequest, Npk};
use crate::utils::round_to;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

type CapabilityResult<T> = std::result::Result<T, CapabilityError>;

/// Artifact file with a shape check run after parsing
pub trait Artifact: DeserializeOwned {
    const FILE_NAME: &'static str;

    fn format_version(&self) -> u32;

    /// Reason the artifact cannot be used, if any
    fn check_shape(&self) -> std::result::Result<(), String>;
}

// ============================================================================
// Standard scaler
// ============================================================================

/// `(x - mean) / scale` per feature; a zero scale leaves the centered value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub fn transform(&self, features: &[f64]) -> CapabilityResult<Vec<f64>> {
        if features.len() != self.n_features() {
            return Err(CapabilityError::FeatureMismatch {
                expected: self.n_features(),
                actual: features.len(),
            });
        }

        Ok(features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| {
                let centered = x - mean;
                if *scale == 0.0 {
                    centered
                } else {
                    centered / scale
                }
            })
            .collect())
    }

    fn check(&self) -> std::result::Result<(), String> {
        if self.mean.len() != self.scale.len() {
            return Err(format!(
                "scaler mean has {} entries, scale has {}",
                self.mean.len(),
                self.scale.len()
            ));
        }
        Ok(())
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

// ============================================================================
// Yield model
// ============================================================================

/// Linear regression over scaled [rainfall, pesticide, temperature]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearYieldModel {
    pub format_version: u32,
    pub scaler: StandardScaler,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl Artifact for LinearYieldModel {
    const FILE_NAME: &'static str = "yield_model.json";

    fn format_version(&self) -> u32 {
        self.format_version
    }

    fn check_shape(&self) -> std::result::Result<(), String> {
        self.scaler.check()?;
        if self.coefficients.len() != 3 || self.scaler.n_features() != 3 {
            return Err("yield model expects 3 features".to_string());
        }
        Ok(())
    }
}

impl Predictor<YieldInput, f64> for LinearYieldModel {
    fn predict(&self, input: &YieldInput) -> CapabilityResult<Option<f64>> {
        let scaled = self
            .scaler
            .transform(&[input.rainfall, input.pesticide, input.temperature])?;
        Ok(Some(round_to(self.intercept + dot(&self.coefficients, &scaled), 2)))
    }
}

// ============================================================================
// Disease model
// ============================================================================

/// One linear score per class over scaled [rainfall, temperature, pesticide];
/// the highest score names the risk level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearDiseaseModel {
    pub format_version: u32,
    pub scaler: StandardScaler,
    pub classes: Vec<String>,
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl Artifact for LinearDiseaseModel {
    const FILE_NAME: &'static str = "disease_model.json";

    fn format_version(&self) -> u32 {
        self.format_version
    }

    fn check_shape(&self) -> std::result::Result<(), String> {
        self.scaler.check()?;
        let n = self.classes.len();
        if n == 0 || self.coefficients.len() != n || self.intercepts.len() != n {
            return Err(format!(
                "{} classes, {} coefficient rows, {} intercepts",
                n,
                self.coefficients.len(),
                self.intercepts.len()
            ));
        }
        if self.coefficients.iter().any(|row| row.len() != self.scaler.n_features()) {
            return Err("coefficient row length differs from scaler".to_string());
        }
        if let Some(label) = self.classes.iter().find(|c| RiskLevel::parse(c).is_none()) {
            return Err(format!("unknown class label '{}'", label));
        }
        Ok(())
    }
}

impl Predictor<DiseaseInput, RiskLevel> for LinearDiseaseModel {
    fn predict(&self, input: &DiseaseInput) -> CapabilityResult<Option<RiskLevel>> {
        let scaled = self
            .scaler
            .transform(&[input.rainfall, input.temperature, input.pesticide])?;

        let best = self
            .coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(row, intercept)| intercept + dot(row, &scaled))
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (idx, score)| match best {
                Some((_, top)) if top >= score => best,
                _ => Some((idx, score)),
            });

        let (idx, _) = best.ok_or_else(|| CapabilityError::Malformed("no classes".to_string()))?;
        let label = self
            .classes
            .get(idx)
            .ok_or_else(|| CapabilityError::Malformed("class index out of range".to_string()))?;

        RiskLevel::parse(label)
            .map(Some)
            .ok_or_else(|| CapabilityError::UnknownLabel(label.clone()))
    }
}

// ============================================================================
// Weather model
// ============================================================================

/// Linear rainfall trend over calendar year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherTrendModel {
    pub format_version: u32,
    pub slope: f64,
    pub intercept: f64,
}

impl Artifact for WeatherTrendModel {
    const FILE_NAME: &'static str = "weather_model.json";

    fn format_version(&self) -> u32 {
        self.format_version
    }

    fn check_shape(&self) -> std::result::Result<(), String> {
        if !(self.slope.is_finite() && self.intercept.is_finite()) {
            return Err("non-finite slope or intercept".to_string());
        }
        Ok(())
    }
}

impl Predictor<WeatherInput, f64> for WeatherTrendModel {
    fn predict(&self, input: &WeatherInput) -> CapabilityResult<Option<f64>> {
        Ok(Some(round_to(self.intercept + self.slope * f64::from(input.year), 1)))
    }
}

// ============================================================================
// Fertilizer recommender
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommenderCrop {
    pub name: String,
    pub npk: Npk,
}

/// Uniform NPK multiplier for dry and wet years
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainfallBands {
    #[serde(default = "RainfallBands::default_low_below")]
    pub low_below: f64,
    #[serde(default = "RainfallBands::default_high_above")]
    pub high_above: f64,
    #[serde(default = "RainfallBands::default_low_factor")]
    pub low_factor: f64,
    #[serde(default = "RainfallBands::default_high_factor")]
    pub high_factor: f64,
}

impl RainfallBands {
    fn default_low_below() -> f64 {
        500.0
    }
    fn default_high_above() -> f64 {
        1200.0
    }
    fn default_low_factor() -> f64 {
        1.2
    }
    fn default_high_factor() -> f64 {
        0.9
    }

    pub fn factor(&self, rainfall: f64) -> f64 {
        if rainfall < self.low_below {
            self.low_factor
        } else if rainfall > self.high_above {
            self.high_factor
        } else {
            1.0
        }
    }
}

impl Default for RainfallBands {
    fn default() -> Self {
        Self {
            low_below: Self::default_low_below(),
            high_above: Self::default_high_above(),
            low_factor: Self::default_low_factor(),
            high_factor: Self::default_high_factor(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FertilizerRecommenderTable {
    pub format_version: u32,
    pub crops: Vec<RecommenderCrop>,
    #[serde(default)]
    pub rainfall_bands: RainfallBands,
}

impl FertilizerRecommenderTable {
    fn find(&self, crop: &str) -> Option<&RecommenderCrop> {
        let needle = normalize_crop_name(crop);
        if needle.is_empty() {
            return None;
        }
        self.crops.iter().find(|entry| {
            let key = entry.name.to_lowercase();
            key.contains(&needle) || needle.contains(&key)
        })
    }
}

impl Artifact for FertilizerRecommenderTable {
    const FILE_NAME: &'static str = "fertilizer_recommender.json";

    fn format_version(&self) -> u32 {
        self.format_version
    }

    fn check_shape(&self) -> std::result::Result<(), String> {
        if self.crops.is_empty() {
            return Err("no crops".to_string());
        }
        Ok(())
    }
}

impl Predictor<DosingRequest, ModelRecommendation> for FertilizerRecommenderTable {
    fn predict(&self, request: &DosingRequest) -> CapabilityResult<Option<ModelRecommendation>> {
        let Some(entry) = self.find(&request.crop) else {
            return Ok(None);
        };

        let factor = self.rainfall_bands.factor(request.rainfall);
        let (n, p, k) = (
            (entry.npk.n * factor).round(),
            (entry.npk.p * factor).round(),
            (entry.npk.k * factor).round(),
        );

        Ok(Some(ModelRecommendation {
            matched_crop: entry.name.clone(),
            nitrogen_kg_ha: n,
            phosphorus_kg_ha: p,
            potassium_kg_ha: k,
            recommendation: format!("Apply {}kg/ha N, {}kg/ha P, {}kg/ha K", n, p, k),
        }))
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Read, parse and check one artifact. `Ok(None)` when the file is absent.
pub fn load_artifact<T: Artifact>(dir: &Path) -> Result<Option<T>> {
    let path = dir.join(T::FILE_NAME);
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read model artifact: {:?}", path))?;
    let artifact: T = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse model artifact JSON: {:?}", path))?;

    let unusable = |reason: String| AdvisorError::Artifact {
        path: path.display().to_string(),
        reason,
    };
    if artifact.format_version() != ARTIFACT_FORMAT_VERSION {
        return Err(unusable(format!(
            "format_version {} (expected {})",
            artifact.format_version(),
            ARTIFACT_FORMAT_VERSION
        ))
        .into());
    }
    artifact.check_shape().map_err(unusable)?;

    Ok(Some(artifact))
}

fn load_slot<T: Artifact>(dir: &Path) -> Option<Arc<T>> {
    match load_artifact::<T>(dir) {
        Ok(Some(artifact)) => {
            info!(artifact = T::FILE_NAME, "Loaded model artifact");
            Some(Arc::new(artifact))
        }
        Ok(None) => {
            info!(artifact = T::FILE_NAME, "Model artifact not found, using fallback");
            None
        }
        Err(e) => {
            warn!(artifact = T::FILE_NAME, error = %format!("{:#}", e), "Ignoring model artifact");
            None
        }
    }
}

/// Capabilities loaded from the models directory
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    pub yield_model: Option<Arc<LinearYieldModel>>,
    pub disease_model: Option<Arc<LinearDiseaseModel>>,
    pub weather_model: Option<Arc<WeatherTrendModel>>,
    pub fertilizer_recommender: Option<Arc<FertilizerRecommenderTable>>,
}

impl ModelRegistry {
    /// Never fails; unusable artifacts leave their capability empty
    pub fn load(dir: &Path) -> Self {
        info!(models_dir = ?dir, "Loading model artifacts");
        Self {
            yield_model: load_slot(dir),
            disease_model: load_slot(dir),
            weather_model: load_slot(dir),
            fertilizer_recommender: load_slot(dir),
        }
    }

    pub fn yield_estimator(&self) -> Estimator<YieldKind> {
        Estimator::from_option(
            self.yield_model
                .clone()
                .map(|m| m as DynPredictor<YieldKind>),
        )
    }

    pub fn disease_estimator(&self) -> Estimator<DiseaseKind> {
        Estimator::from_option(
            self.disease_model
                .clone()
                .map(|m| m as DynPredictor<DiseaseKind>),
        )
    }

    pub fn weather_estimator(&self) -> Estimator<WeatherKind> {
        Estimator::from_option(
            self.weather_model
                .clone()
                .map(|m| m as DynPredictor<WeatherKind>),
        )
    }

    pub fn fertilizer_estimator(&self) -> Estimator<FertilizerKind> {
        Estimator::from_option(
            self.fertilizer_recommender
                .clone()
                .map(|m| m as DynPredictor<FertilizerKind>),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimators::{EstimateSource, FertilizerAdvice};
    use crate::random::FixedSource;
    use approx::assert_relative_eq;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn test_empty_dir_loads_nothing() {
        let dir = tempdir().unwrap();
        let registry = ModelRegistry::load(dir.path());
        assert!(registry.yield_model.is_none());
        assert!(registry.disease_model.is_none());
        assert!(registry.weather_model.is_none());
        assert!(registry.fertilizer_recommender.is_none());
        assert!(!registry.yield_estimator().is_available());
    }

    #[test]
    fn test_missing_dir_loads_nothing() {
        let registry = ModelRegistry::load(Path::new("/nonexistent/models"));
        assert!(registry.weather_model.is_none());
    }

    #[test]
    fn test_yield_model_predicts() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "yield_model.json",
            r#"{"format_version":1,
                "scaler":{"mean":[1000.0,200.0,25.0],"scale":[100.0,50.0,5.0]},
                "coefficients":[1000.0,500.0,-200.0],
                "intercept":30000.0}"#,
        );
        let registry = ModelRegistry::load(dir.path());
        let est = registry.yield_estimator();
        assert!(est.is_available());

        let input = YieldInput { rainfall: 1100.0, pesticide: 250.0, temperature: 30.0 };
        let out = est.estimate(&input, &mut FixedSource::low()).unwrap();
        // 30000 + 1000×1 + 500×1 - 200×1
        assert_relative_eq!(out.value, 31300.0);
        assert_eq!(out.source, EstimateSource::Model);
    }

    #[test]
    fn test_disease_model_argmax() {
        let model = LinearDiseaseModel {
            format_version: 1,
            scaler: StandardScaler { mean: vec![0.0; 3], scale: vec![1.0; 3] },
            classes: vec!["High".into(), "Low".into(), "Medium".into()],
            coefficients: vec![vec![1.0, 0.0, 0.0], vec![-1.0, 0.0, 0.0], vec![0.0, 0.0, 0.0]],
            intercepts: vec![0.0, 0.0, 0.5],
        };
        assert!(model.check_shape().is_ok());

        let wet = DiseaseInput { rainfall: 2.0, temperature: 0.0, humidity: 0.0, pesticide: 0.0 };
        assert_eq!(model.predict(&wet).unwrap(), Some(RiskLevel::High));
        let dry = DiseaseInput { rainfall: -2.0, ..wet };
        assert_eq!(model.predict(&dry).unwrap(), Some(RiskLevel::Low));
        let mild = DiseaseInput { rainfall: 0.0, ..wet };
        assert_eq!(model.predict(&mild).unwrap(), Some(RiskLevel::Medium));
    }

    #[test]
    fn test_weather_model_rounds() {
        let model = WeatherTrendModel { format_version: 1, slope: 4.44, intercept: -8000.0 };
        let out = model.predict(&WeatherInput { year: 2025 }).unwrap().unwrap();
        assert_relative_eq!(out, round_to(-8000.0 + 4.44 * 2025.0, 1));
    }

    #[test]
    fn test_malformed_and_wrong_version_are_ignored() {
        let dir = tempdir().unwrap();
        write(dir.path(), "weather_model.json", "{ not json");
        write(
            dir.path(),
            "yield_model.json",
            r#"{"format_version":7,"scaler":{"mean":[0,0,0],"scale":[1,1,1]},
                "coefficients":[0,0,0],"intercept":0}"#,
        );

        assert!(load_artifact::<WeatherTrendModel>(dir.path()).is_err());
        let err = load_artifact::<LinearYieldModel>(dir.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("format_version 7"));

        let registry = ModelRegistry::load(dir.path());
        assert!(registry.weather_model.is_none());
        assert!(registry.yield_model.is_none());
    }

    #[test]
    fn test_recommender_covers_listed_crops_only() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "fertilizer_recommender.json",
            r#"{"format_version":1,
                "crops":[{"name":"Rice","npk":{"N":100,"P":50,"K":50}}]}"#,
        );
        let est = ModelRegistry::load(dir.path()).fertilizer_estimator();
        let request = |crop: &str, rainfall: f64| DosingRequest {
            crop: crop.into(),
            rainfall,
            soil_type: "loamy".into(),
            growth_stage: "vegetative".into(),
            field_size: 1.0,
        };

        let rice = est.estimate(&request("Rice, paddy", 400.0), &mut FixedSource::low()).unwrap();
        match rice.value {
            FertilizerAdvice::Model(rec) => {
                assert_eq!(rec.matched_crop, "Rice");
                assert_eq!(rec.nitrogen_kg_ha, 120.0);
                assert_eq!(rec.recommendation, "Apply 120kg/ha N, 60kg/ha P, 60kg/ha K");
            }
            other => panic!("expected model advice, got {:?}", other),
        }

        let wheat = est.estimate(&request("Wheat", 800.0), &mut FixedSource::low()).unwrap();
        assert_eq!(wheat.source, EstimateSource::Fallback);
        assert_eq!(wheat.value.matched_crop(), "Wheat");
    }
}
