//! Estimators
//!
//! Each estimator wraps an optional predictive capability (a loaded model
//! artifact) and a closed-form fallback behind one interface, so callers
//! never branch on availability.
//!
//! ## Resolution order
//!
//! 1. Validate the input (`InvalidInput` is the only surfaced error)
//! 2. Ask the capability, when present and available
//! 3. Accept its answer unless it is absent, an error, or non-finite
//! 4. Otherwise compute the fallback
//!
//! Capability errors are logged with `warn!` and never reach the caller.

pub mod artifacts;
pub mod disease;
pub mod fertilizer;
pub mod weather;
pub mod yield_estimator;

pub use artifacts::ModelRegistry;
pub use disease::{disease_risk_score, DiseaseInput, DiseaseKind, RiskLevel};
pub use fertilizer::{FertilizerAdvice, FertilizerKind, ModelRecommendation};
pub use weather::{rainfall_advice, WeatherInput, WeatherKind};
pub use yield_estimator::{fallback_yield, YieldInput, YieldKind};

use crate::error::Result;
use crate::random::RandomSource;
use serde::Serialize;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Failure raised by a capability at predict time
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("expected {expected} features, got {actual}")]
    FeatureMismatch { expected: usize, actual: usize },

    #[error("malformed model: {0}")]
    Malformed(String),

    #[error("unknown class label '{0}'")]
    UnknownLabel(String),
}

/// Pluggable predictive capability
pub trait Predictor<I, O>: Send + Sync {
    fn is_available(&self) -> bool {
        true
    }

    /// `Ok(None)` when the capability has no answer for this input
    fn predict(&self, input: &I) -> std::result::Result<Option<O>, CapabilityError>;
}

/// Per-capability behavior: input checks, prediction acceptance and fallback
pub trait EstimatorKind {
    type Input: Debug + 'static;
    type Prediction: 'static;
    type Output;

    const NAME: &'static str;

    fn validate(input: &Self::Input) -> Result<()>;

    /// Turn a capability answer into an output; `None` rejects it
    fn accept(prediction: Self::Prediction) -> Option<Self::Output>;

    fn fallback(input: &Self::Input, rng: &mut dyn RandomSource) -> Self::Output;
}

/// Which path produced an estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateSource {
    Model,
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Estimate<T> {
    pub value: T,
    pub source: EstimateSource,
}

impl<T> Estimate<T> {
    pub fn is_model(&self) -> bool {
        self.source == EstimateSource::Model
    }
}

pub type DynPredictor<K> =
    Arc<dyn Predictor<<K as EstimatorKind>::Input, <K as EstimatorKind>::Prediction>>;

/// Capability plus fallback for one estimator kind
pub struct Estimator<K: EstimatorKind> {
    predictor: Option<DynPredictor<K>>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: EstimatorKind> Clone for Estimator<K> {
    fn clone(&self) -> Self {
        Self {
            predictor: self.predictor.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K: EstimatorKind> Default for Estimator<K> {
    fn default() -> Self {
        Self::fallback_only()
    }
}

impl<K: EstimatorKind> Estimator<K> {
    pub fn fallback_only() -> Self {
        Self { predictor: None, _kind: PhantomData }
    }

    pub fn with_predictor(predictor: DynPredictor<K>) -> Self {
        Self { predictor: Some(predictor), _kind: PhantomData }
    }

    pub fn from_option(predictor: Option<DynPredictor<K>>) -> Self {
        Self { predictor, _kind: PhantomData }
    }

    pub fn is_available(&self) -> bool {
        self.predictor.as_ref().is_some_and(|p| p.is_available())
    }

    pub fn estimate(
        &self,
        input: &K::Input,
        rng: &mut dyn RandomSource,
    ) -> Result<Estimate<K::Output>> {
        K::validate(input)?;

        if let Some(predictor) = self.predictor.as_ref().filter(|p| p.is_available()) {
            match predictor.predict(input) {
                Ok(Some(prediction)) => match K::accept(prediction) {
                    Some(value) => {
                        return Ok(Estimate { value, source: EstimateSource::Model });
                    }
                    None => warn!(capability = K::NAME, ?input, "Rejected model prediction"),
                },
                Ok(None) => debug!(capability = K::NAME, ?input, "Model had no answer"),
                Err(e) => warn!(capability = K::NAME, error = %e, "Model prediction failed"),
            }
        }

        Ok(Estimate {
            value: K::fallback(input, rng),
            source: EstimateSource::Fallback,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::FixedSource;

    struct Fixed(Option<f64>);

    impl Predictor<YieldInput, f64> for Fixed {
        fn predict(&self, _: &YieldInput) -> std::result::Result<Option<f64>, CapabilityError> {
            Ok(self.0)
        }
    }

    struct Failing;

    impl Predictor<YieldInput, f64> for Failing {
        fn predict(&self, _: &YieldInput) -> std::result::Result<Option<f64>, CapabilityError> {
            Err(CapabilityError::FeatureMismatch { expected: 3, actual: 2 })
        }
    }

    struct Unavailable;

    impl Predictor<YieldInput, f64> for Unavailable {
        fn is_available(&self) -> bool {
            false
        }

        fn predict(&self, _: &YieldInput) -> std::result::Result<Option<f64>, CapabilityError> {
            Ok(Some(1.0))
        }
    }

    fn input() -> YieldInput {
        YieldInput { rainfall: 1000.0, pesticide: 200.0, temperature: 25.0 }
    }

    #[test]
    fn test_model_answer_wins() {
        let est = Estimator::<YieldKind>::with_predictor(Arc::new(Fixed(Some(41234.56))));
        assert!(est.is_available());
        let out = est.estimate(&input(), &mut FixedSource::low()).unwrap();
        assert_eq!(out.value, 41234.56);
        assert!(out.is_model());
    }

    #[test]
    fn test_absent_error_and_unavailable_all_fall_back() {
        let expected = fallback_yield(&input());
        let estimators = [
            Estimator::<YieldKind>::fallback_only(),
            Estimator::<YieldKind>::with_predictor(Arc::new(Fixed(None))),
            Estimator::<YieldKind>::with_predictor(Arc::new(Fixed(Some(f64::NAN)))),
            Estimator::<YieldKind>::with_predictor(Arc::new(Failing)),
            Estimator::<YieldKind>::with_predictor(Arc::new(Unavailable)),
        ];
        for est in &estimators {
            let out = est.estimate(&input(), &mut FixedSource::low()).unwrap();
            assert_eq!(out.source, EstimateSource::Fallback);
            assert_eq!(out.value, expected);
        }
        assert!(!estimators[4].is_available());
    }

    #[test]
    fn test_invalid_input_surfaces() {
        let est = Estimator::<YieldKind>::with_predictor(Arc::new(Fixed(Some(1.0))));
        let bad = YieldInput { rainfall: f64::NAN, pesticide: 1.0, temperature: 1.0 };
        assert!(est.estimate(&bad, &mut FixedSource::low()).is_err());
    }
}
