//! Crop Advisor Rust Implementation
//!
//! Crop suitability ranking, fertilizer dosing and yield/disease/weather
//! estimates for smallholder farms, with a JSON API over the lot.
//!
//! Layout:
//! - `data`: static crop knowledge base
//! - `metrics/`: the eight weighted suitability factors
//! - `scorer`: ranking coordinator (parallel scoring, top 8)
//! - `explanation/`: special notes and per-crop yield/investment estimates
//! - `fertilizer/`: NPK dosing calculator and its lookup tables
//! - `estimators/`: optional model artifacts with closed-form fallbacks
//! - `advisor`: single entry point over all of the above
//! - `community`: Farmer Connect forum and marketplace mock
//! - `api_server`: axum router (feature `api`)

pub mod advisor;
pub mod community;
pub mod config;
pub mod data;
pub mod environment;
pub mod error;
pub mod estimators;
pub mod explanation;
pub mod fertilizer;
pub mod metrics;
pub mod random;
pub mod scorer;
pub mod utils;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use advisor::{AgriAdvisor, Capabilities};
pub use config::ServerConfig;
pub use data::{knowledge_base, CropKnowledgeBase, CropProfile};
pub use environment::EnvironmentInput;
pub use error::{AdvisorError, Result};
pub use estimators::{Estimate, EstimateSource, ModelRegistry, RiskLevel};
pub use fertilizer::{dose_fertilizer, DosingRequest, DosingResult};
pub use random::{FixedSource, RandomSource, StdSource};
pub use scorer::{CropScorer, RecommendationTier, ScoreBreakdown, TOP_N};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppError, AppState};
