//! Fertilizer advice: recommender capability, falling back to the dosing calculator

use super::EstimatorKind;
use crate::error::Result;
use crate::fertilizer::calculator::compute_dose;
use crate::fertilizer::{DosingRequest, DosingResult};
use crate::random::RandomSource;
use serde::Serialize;

/// Answer of the fertilizer recommender capability
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelRecommendation {
    pub matched_crop: String,
    pub nitrogen_kg_ha: f64,
    pub phosphorus_kg_ha: f64,
    pub potassium_kg_ha: f64,
    pub recommendation: String,
}

impl ModelRecommendation {
    fn is_finite(&self) -> bool {
        [self.nitrogen_kg_ha, self.phosphorus_kg_ha, self.potassium_kg_ha]
            .iter()
            .all(|v| v.is_finite())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FertilizerAdvice {
    Model(ModelRecommendation),
    Calculated(Box<DosingResult>),
}

impl FertilizerAdvice {
    pub fn matched_crop(&self) -> &str {
        match self {
            FertilizerAdvice::Model(rec) => &rec.matched_crop,
            FertilizerAdvice::Calculated(result) => result.matched_crop,
        }
    }
}

pub struct FertilizerKind;

impl EstimatorKind for FertilizerKind {
    type Input = DosingRequest;
    type Prediction = ModelRecommendation;
    type Output = FertilizerAdvice;

    const NAME: &'static str = "fertilizer";

    fn validate(input: &DosingRequest) -> Result<()> {
        input.validate()
    }

    fn accept(prediction: ModelRecommendation) -> Option<FertilizerAdvice> {
        prediction.is_finite().then_some(FertilizerAdvice::Model(prediction))
    }

    fn fallback(input: &DosingRequest, rng: &mut dyn RandomSource) -> FertilizerAdvice {
        FertilizerAdvice::Calculated(Box::new(compute_dose(input, rng)))
    }
}
