//! Dosing calculator
//!
//! Draw order from the random source is fixed: rainfall factors (N, P, K),
//! variation (N, P, K), source picks (N, P, K), cost rates (N, P, K).

use super::lookup_tables::soil_factor;
use super::matching::match_crop_or_default;
use super::{ApplicationSchedule, GrowthStage, Npk, Nutrient, RainfallRegime};
use crate::error::{ensure_finite, ensure_non_negative, Result};
use crate::random::{choose, RandomSource};
use crate::utils::{round_to, title_case};
use serde::Serialize;
use tracing::debug;

/// Per-nutrient random variation applied after all factors
pub const VARIATION_RANGE: (f64, f64) = (0.9, 1.1);

pub const CURRENCY: &str = "INR";

/// Inputs for one dosing calculation
#[derive(Debug, Clone, PartialEq)]
pub struct DosingRequest {
    /// Free-text crop name ("Rice, paddy")
    pub crop: String,
    /// Annual rainfall (mm)
    pub rainfall: f64,
    pub soil_type: String,
    pub growth_stage: String,
    /// Field size (hectares)
    pub field_size: f64,
}

impl DosingRequest {
    pub fn validate(&self) -> Result<()> {
        ensure_finite("rainfall", self.rainfall)?;
        ensure_non_negative("field_size", self.field_size)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceSuggestion {
    pub nutrient: &'static str,
    pub recommended_source: &'static str,
    /// Display form, "260.9 kg/ha"
    pub quantity_needed: String,
    pub quantity_kg_ha: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub nitrogen_cost: f64,
    pub phosphorus_cost: f64,
    pub potassium_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostEstimate {
    pub per_hectare: f64,
    pub total_field: f64,
    pub currency: &'static str,
    pub breakdown: CostBreakdown,
}

/// Full dosing outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DosingResult {
    pub matched_crop: &'static str,
    pub nitrogen_kg_ha: i64,
    pub phosphorus_kg_ha: i64,
    pub potassium_kg_ha: i64,
    pub total_nitrogen_kg: f64,
    pub total_phosphorus_kg: f64,
    pub total_potassium_kg: f64,
    pub recommendation: String,
    pub rainfall_regime: RainfallRegime,
    /// Advisory line for the rainfall regime
    pub rainfall_factor: &'static str,
    pub soil_type: String,
    pub growth_stage: String,
    /// Stage whose factors and schedule were applied
    pub stage_applied: GrowthStage,
    pub application_schedule: &'static ApplicationSchedule,
    pub fertilizer_types: Vec<SourceSuggestion>,
    pub cost_estimate: CostEstimate,
}

impl DosingResult {
    pub fn per_hectare(&self) -> [i64; 3] {
        [self.nitrogen_kg_ha, self.phosphorus_kg_ha, self.potassium_kg_ha]
    }
}

/// Validate, then compute a dosing result
pub fn dose_fertilizer(request: &DosingRequest, rng: &mut dyn RandomSource) -> Result<DosingResult> {
    request.validate()?;
    Ok(compute_dose(request, rng))
}

pub(crate) fn compute_dose(request: &DosingRequest, rng: &mut dyn RandomSource) -> DosingResult {
    let entry = match_crop_or_default(&request.crop);
    let regime = RainfallRegime::classify(request.rainfall);
    let stage = GrowthStage::resolve(&request.growth_stage);

    let [rn, rp, rk] = regime.factor_ranges();
    let rain = Npk::new(rng.uniform(rn.0, rn.1), rng.uniform(rp.0, rp.1), rng.uniform(rk.0, rk.1));
    let variation = Npk::new(
        rng.uniform(VARIATION_RANGE.0, VARIATION_RANGE.1),
        rng.uniform(VARIATION_RANGE.0, VARIATION_RANGE.1),
        rng.uniform(VARIATION_RANGE.0, VARIATION_RANGE.1),
    );

    let raw = entry
        .npk
        .scale(&rain)
        .scale(&soil_factor(&request.soil_type))
        .scale(&stage.factor())
        .scale(&variation);

    let dose = |nutrient: Nutrient| (raw.get(nutrient).round() as i64).max(nutrient.floor_kg_ha());
    let (n, p, k) = (
        dose(Nutrient::Nitrogen),
        dose(Nutrient::Phosphorus),
        dose(Nutrient::Potassium),
    );

    debug!(
        crop = %request.crop,
        matched = entry.name,
        ?regime,
        stage = stage.as_str(),
        n, p, k,
        "Computed fertilizer dose"
    );

    let fertilizer_types = suggest_sources([n, p, k], rng);
    let cost_estimate = estimate_cost([n, p, k], request.field_size, rng);

    DosingResult {
        matched_crop: entry.name,
        nitrogen_kg_ha: n,
        phosphorus_kg_ha: p,
        potassium_kg_ha: k,
        total_nitrogen_kg: round_to(n as f64 * request.field_size, 1),
        total_phosphorus_kg: round_to(p as f64 * request.field_size, 1),
        total_potassium_kg: round_to(k as f64 * request.field_size, 1),
        recommendation: format!(
            "Apply {}kg/ha N, {}kg/ha P, {}kg/ha K for {}",
            n, p, k, entry.name
        ),
        rainfall_regime: regime,
        rainfall_factor: regime.note(),
        soil_type: title_case(&request.soil_type),
        growth_stage: title_case(&request.growth_stage),
        stage_applied: stage,
        application_schedule: stage.schedule(),
        fertilizer_types,
        cost_estimate,
    }
}

/// One random source per nutrient; quantity divides by that source's own fraction
fn suggest_sources(doses: [i64; 3], rng: &mut dyn RandomSource) -> Vec<SourceSuggestion> {
    Nutrient::ALL
        .iter()
        .zip(doses)
        .filter_map(|(nutrient, dose)| {
            let source = choose(rng, nutrient.sources())?;
            let quantity = round_to(dose as f64 / source.fraction, 1);
            Some(SourceSuggestion {
                nutrient: nutrient.display_name(),
                recommended_source: source.label,
                quantity_needed: format!("{:.1} kg/ha", quantity),
                quantity_kg_ha: quantity,
            })
        })
        .collect()
}

fn estimate_cost(doses: [i64; 3], field_size: f64, rng: &mut dyn RandomSource) -> CostEstimate {
    let mut costs = [0.0; 3];
    for (slot, (nutrient, dose)) in costs.iter_mut().zip(Nutrient::ALL.iter().zip(doses)) {
        let (low, high) = nutrient.cost_range();
        *slot = dose as f64 * rng.uniform(low, high);
    }
    let per_hectare: f64 = costs.iter().sum();

    CostEstimate {
        per_hectare: round_to(per_hectare, 2),
        total_field: round_to(per_hectare * field_size, 2),
        currency: CURRENCY,
        breakdown: CostBreakdown {
            nitrogen_cost: round_to(costs[0] * field_size, 2),
            phosphorus_cost: round_to(costs[1] * field_size, 2),
            potassium_cost: round_to(costs[2] * field_size, 2),
        },
    }
}
