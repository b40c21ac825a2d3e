//! Crop Scorer - Main coordinator for suitability ranking
//!
//! Scores every crop in the knowledge base against one environment, sorts by
//! total score (stable, ties keep knowledge-base order), keeps the top N and
//! attaches derived yield/investment estimates and special notes.
//! Includes both sequential and parallel (Rayon) scoring.

use crate::data::{knowledge_base, CropKnowledgeBase, CropProfile, Grade};
use crate::environment::EnvironmentInput;
use crate::error::Result;
use crate::explanation::{
    estimate_investment, estimate_yield, generate_special_notes, InvestmentEstimate,
    YieldEstimate,
};
use crate::fertilizer::Npk;
use crate::metrics::*;
use crate::random::RandomSource;
use crate::utils::{round_to, title_case};
use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

/// Number of crops returned by a ranking
pub const TOP_N: usize = 8;

// ============================================================================
// Recommendation tier
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RecommendationTier {
    NotRecommended,
    ModeratelySuitable,
    Recommended,
    HighlyRecommended,
}

impl RecommendationTier {
    /// ≥80 highly, ≥65 recommended, ≥50 moderate, else not recommended
    pub fn classify(score_percent: f64) -> Self {
        if score_percent >= 80.0 {
            RecommendationTier::HighlyRecommended
        } else if score_percent >= 65.0 {
            RecommendationTier::Recommended
        } else if score_percent >= 50.0 {
            RecommendationTier::ModeratelySuitable
        } else {
            RecommendationTier::NotRecommended
        }
    }

    pub fn display_text(&self) -> &'static str {
        match self {
            RecommendationTier::HighlyRecommended => "Highly Recommended",
            RecommendationTier::Recommended => "Recommended",
            RecommendationTier::ModeratelySuitable => "Moderately Suitable",
            RecommendationTier::NotRecommended => "Not Recommended",
        }
    }

    /// Display class used by front ends
    pub fn level_class(&self) -> &'static str {
        match self {
            RecommendationTier::HighlyRecommended => "success",
            RecommendationTier::Recommended => "primary",
            RecommendationTier::ModeratelySuitable => "warning",
            RecommendationTier::NotRecommended => "danger",
        }
    }
}

// ============================================================================
// Pure per-crop scoring
// ============================================================================

/// Score of one crop against one environment, without derived estimates
#[derive(Debug, Clone, PartialEq)]
pub struct CropSuitability {
    pub crop: &'static CropProfile,
    /// Percentage of the maximum, one decimal
    pub total: f64,
    pub tier: RecommendationTier,
    pub sub_scores: Vec<SubScore>,
}

impl CropSuitability {
    pub fn rationale(&self) -> Vec<String> {
        self.sub_scores.iter().map(|s| s.rationale.clone()).collect()
    }
}

/// Score one crop. `env` must be normalized (see `EnvironmentInput::normalized`).
pub fn score_crop(env: &EnvironmentInput, crop: &'static CropProfile) -> CropSuitability {
    let sub_scores = vec![
        score_rainfall(env, crop),
        score_temperature(env, crop),
        score_soil(env, crop),
        score_ph(env, crop),
        score_season(env, crop),
        score_experience(env, crop),
        score_water(env, crop),
        score_market(env, crop),
    ];

    let points: f64 = sub_scores.iter().map(|s| s.score).sum();
    let total = round_to(points / TOTAL_WEIGHT * 100.0, 1);

    CropSuitability {
        crop,
        total,
        tier: RecommendationTier::classify(total),
        sub_scores,
    }
}

// ============================================================================
// Ranked output
// ============================================================================

/// One ranked crop with derived estimates and notes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub crop_name: &'static str,
    pub suitability_score: f64,
    #[serde(skip)]
    pub tier: RecommendationTier,
    pub recommendation_level: &'static str,
    pub level_class: &'static str,
    /// Rationale lines in factor order
    pub details: Vec<String>,
    pub sub_scores: Vec<SubScore>,
    pub estimated_yield: YieldEstimate,
    pub investment_needed: InvestmentEstimate,
    pub profit_potential: Grade,
    pub duration: &'static str,
    pub special_notes: Vec<String>,
    pub market_type: String,
    pub water_requirement: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fertilizer_baseline: Option<Npk>,
}

/// Main crop scorer
pub struct CropScorer {
    knowledge_base: &'static CropKnowledgeBase,
    top_n: usize,
}

impl Default for CropScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl CropScorer {
    pub fn new() -> Self {
        Self::with_knowledge_base(knowledge_base())
    }

    pub fn with_knowledge_base(knowledge_base: &'static CropKnowledgeBase) -> Self {
        Self { knowledge_base, top_n: TOP_N }
    }

    pub fn knowledge_base(&self) -> &'static CropKnowledgeBase {
        self.knowledge_base
    }

    /// Score every crop sequentially, knowledge-base order
    ///
    /// Categorical fields are matched case-insensitively after trimming, so
    /// "Loamy " scores the same as "loamy".
    pub fn score_all(&self, env: &EnvironmentInput) -> Vec<CropSuitability> {
        let env = env.normalized();
        self.knowledge_base
            .profiles()
            .iter()
            .map(|crop| score_crop(&env, crop))
            .collect()
    }

    /// Score every crop in parallel, knowledge-base order
    pub fn score_all_parallel(&self, env: &EnvironmentInput) -> Vec<CropSuitability> {
        let env = env.normalized();
        self.knowledge_base
            .profiles()
            .par_iter()
            .map(|crop| score_crop(&env, crop))
            .collect()
    }

    /// Rank crops: validate, score, stable sort descending, keep the top N,
    /// attach estimates (drawn in rank order) and notes
    pub fn score_crops(
        &self,
        env: &EnvironmentInput,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<ScoreBreakdown>> {
        env.validate()?;

        let mut scored = self.score_all_parallel(env);
        sort_descending(&mut scored);
        scored.truncate(self.top_n);

        debug!(
            ranked = scored.len(),
            best = scored.first().map(|s| s.crop.name).unwrap_or("-"),
            "Ranked crops"
        );

        Ok(scored
            .into_iter()
            .map(|suitability| self.attach_details(suitability, env, rng))
            .collect())
    }

    fn attach_details(
        &self,
        suitability: CropSuitability,
        env: &EnvironmentInput,
        rng: &mut dyn RandomSource,
    ) -> ScoreBreakdown {
        let crop = suitability.crop;
        let estimated_yield = estimate_yield(crop, suitability.total, env.farm_size, rng);
        let investment_needed = estimate_investment(crop, env.farm_size, rng);

        ScoreBreakdown {
            crop_name: crop.name,
            suitability_score: suitability.total,
            tier: suitability.tier,
            recommendation_level: suitability.tier.display_text(),
            level_class: suitability.tier.level_class(),
            details: suitability.rationale(),
            sub_scores: suitability.sub_scores,
            estimated_yield,
            investment_needed,
            profit_potential: crop.profit_margin,
            duration: crop.duration,
            special_notes: generate_special_notes(crop.name, env),
            market_type: title_case(crop.market_type),
            water_requirement: crop.water_need.display_name().to_string(),
            fertilizer_baseline: crop.base_npk(),
        }
    }
}

/// Stable: equal totals keep their incoming order
fn sort_descending(scored: &mut [CropSuitability]) {
    scored.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{FixedSource, StdSource};

    fn rice_paddy_env() -> EnvironmentInput {
        EnvironmentInput {
            rainfall: 1200.0,
            temperature: 27.0,
            humidity: 80.0,
            ph: 6.5,
            farm_size: 1.0,
            season: "kharif".into(),
            soil_type: "loamy".into(),
            water_availability: "high".into(),
            experience_level: "intermediate".into(),
            market_preference: "food_grain".into(),
        }
    }

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(RecommendationTier::classify(80.0), RecommendationTier::HighlyRecommended);
        assert_eq!(RecommendationTier::classify(79.9), RecommendationTier::Recommended);
        assert_eq!(RecommendationTier::classify(65.0), RecommendationTier::Recommended);
        assert_eq!(RecommendationTier::classify(64.9), RecommendationTier::ModeratelySuitable);
        assert_eq!(RecommendationTier::classify(50.0), RecommendationTier::ModeratelySuitable);
        assert_eq!(RecommendationTier::classify(49.9), RecommendationTier::NotRecommended);
        assert_eq!(RecommendationTier::NotRecommended.level_class(), "danger");
    }

    #[test]
    fn test_rice_scores_full_marks() {
        let env = rice_paddy_env();
        let rice = knowledge_base().get("Rice").unwrap();
        let result = score_crop(&env, rice);

        for sub in &result.sub_scores[..3] {
            assert_eq!(sub.score, sub.weight, "{:?}", sub.factor);
        }
        assert_eq!(result.total, 100.0);
        assert_eq!(result.tier, RecommendationTier::HighlyRecommended);
        assert_eq!(result.rationale().len(), 8);
    }

    #[test]
    fn test_in_range_inputs_award_full_weight() {
        let env = EnvironmentInput {
            rainfall: 700.0,
            temperature: 20.0,
            humidity: 65.0,
            ph: 6.5,
            farm_size: 1.0,
            season: "rabi".into(),
            soil_type: "loamy".into(),
            water_availability: "medium".into(),
            experience_level: "advanced".into(),
            market_preference: "vegetable".into(),
        };
        let tomato = knowledge_base().get("Tomato").unwrap();
        let result = score_crop(&env, tomato);
        assert!(result.sub_scores.iter().all(|s| s.score == s.weight && s.met));
        assert_eq!(result.total, 100.0);
    }

    #[test]
    fn test_categories_match_case_insensitively() {
        let scorer = CropScorer::new();
        let loose = EnvironmentInput {
            season: " Kharif".into(),
            soil_type: "Loamy ".into(),
            water_availability: "HIGH".into(),
            experience_level: "Intermediate".into(),
            market_preference: "Food Grain".into(),
            ..rice_paddy_env()
        };
        assert_eq!(scorer.score_all(&loose), scorer.score_all(&rice_paddy_env()));
        assert_eq!(scorer.score_all_parallel(&loose), scorer.score_all(&rice_paddy_env()));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let scorer = CropScorer::new();
        let env = rice_paddy_env();
        assert_eq!(scorer.score_all(&env), scorer.score_all_parallel(&env));
    }

    #[test]
    fn test_ranking_is_sorted_and_truncated() {
        let scorer = CropScorer::new();
        let ranked = scorer
            .score_crops(&rice_paddy_env(), &mut StdSource::seeded(1))
            .unwrap();

        assert_eq!(ranked.len(), TOP_N);
        assert_eq!(ranked[0].crop_name, "Rice");
        assert_eq!(ranked[0].recommendation_level, "Highly Recommended");
        for pair in ranked.windows(2) {
            assert!(pair[0].suitability_score >= pair[1].suitability_score);
        }
    }

    #[test]
    fn test_ties_keep_knowledge_base_order() {
        let scorer = CropScorer::new();
        let env = rice_paddy_env();
        let ranked = scorer.score_crops(&env, &mut FixedSource::low()).unwrap();

        let order: Vec<&str> = scorer
            .knowledge_base()
            .profiles()
            .iter()
            .map(|p| p.name)
            .collect();
        for pair in ranked.windows(2) {
            if pair[0].suitability_score == pair[1].suitability_score {
                let a = order.iter().position(|n| *n == pair[0].crop_name);
                let b = order.iter().position(|n| *n == pair[1].crop_name);
                assert!(a < b);
            }
        }
    }

    #[test]
    fn test_breakdown_display_fields() {
        let scorer = CropScorer::new();
        let mut env = rice_paddy_env();
        env.rainfall = 1600.0;
        let ranked = scorer.score_crops(&env, &mut FixedSource::low()).unwrap();
        let cane = ranked
            .iter()
            .find(|r| r.crop_name == "Sugarcane")
            .expect("sugarcane ranked");

        assert_eq!(cane.market_type, "Cash Crop");
        assert_eq!(cane.water_requirement, "Very High");
        assert_eq!(cane.estimated_yield.unit, "tons");
        assert_eq!(cane.investment_needed.per_hectare, 80000);
        assert_eq!(
            cane.special_notes,
            vec![
                "Long-term crop commitment",
                "High water requirement",
                "High rainfall - ensure good drainage",
            ]
        );
        assert!(cane.fertilizer_baseline.is_some());
    }

    #[test]
    fn test_rejects_non_finite_input() {
        let mut env = rice_paddy_env();
        env.rainfall = f64::INFINITY;
        assert!(CropScorer::new().score_crops(&env, &mut FixedSource::low()).is_err());
    }
}
