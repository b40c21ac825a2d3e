//! Ranking and Dosing Properties
//!
//! Sweeps the public API over a grid of field conditions and checks the
//! bounds every result must respect, plus artifact loading end to end.

use crop_advisor_rust::estimators::{FertilizerAdvice, YieldInput};
use crop_advisor_rust::fertilizer::matching::baselines;
use crop_advisor_rust::metrics::{Factor, TOTAL_WEIGHT};
use crop_advisor_rust::{
    dose_fertilizer, knowledge_base, AgriAdvisor, CropScorer, DosingRequest, EnvironmentInput,
    EstimateSource, FixedSource, RandomSource, StdSource, TOP_N,
};

const SOILS: &[&str] = &["clay", "sandy", "loamy", "silt", "red", "black", "medium", "peat"];
const SEASONS: &[&str] = &["kharif", "rabi", "zaid", "annual", "Winter"];
const WATER: &[&str] = &["low", "moderate", "medium", "high", "very_high", "none"];
const EXPERIENCE: &[&str] = &["beginner", "intermediate", "advanced", "expert"];
const MARKETS: &[&str] = &["food_grain", "cash_crop", "vegetable", "mixed", "spices"];
const STAGES: &[&str] = &["pre-sowing", "sowing", "vegetative", "flowering", "maturity", "harvest"];

fn environment_grid() -> Vec<EnvironmentInput> {
    let mut grid = Vec::new();
    let mut i = 0usize;
    for rainfall in [0.0, 300.0, 800.0, 1500.0, 3000.0] {
        for temperature in [-5.0, 10.0, 25.0, 40.0] {
            for ph in [3.0, 5.5, 6.5, 8.5] {
                grid.push(EnvironmentInput {
                    rainfall,
                    temperature,
                    humidity: 60.0,
                    ph,
                    farm_size: (i % 4) as f64 * 0.75,
                    season: SEASONS[i % SEASONS.len()].to_string(),
                    soil_type: SOILS[(i / 2) % SOILS.len()].to_string(),
                    water_availability: WATER[(i / 3) % WATER.len()].to_string(),
                    experience_level: EXPERIENCE[(i / 5) % EXPERIENCE.len()].to_string(),
                    market_preference: MARKETS[(i / 7) % MARKETS.len()].to_string(),
                });
                i += 1;
            }
        }
    }
    grid
}

#[test]
fn sub_scores_stay_within_their_weights() {
    let scorer = CropScorer::new();
    let weight_sum: f64 = Factor::ALL.iter().map(|f| f.weight()).sum();
    assert_eq!(weight_sum, TOTAL_WEIGHT);

    for env in environment_grid() {
        for result in scorer.score_all(&env) {
            assert_eq!(result.sub_scores.len(), Factor::ALL.len());
            for sub in &result.sub_scores {
                assert!(
                    (0.0..=sub.weight).contains(&sub.score),
                    "{} {:?} = {} for {:?}",
                    result.crop.name,
                    sub.factor,
                    sub.score,
                    env
                );
            }
            assert!((0.0..=TOTAL_WEIGHT).contains(&result.total));
        }
    }
}

#[test]
fn ranking_is_sorted_and_bounded() {
    let scorer = CropScorer::new();
    let expected_len = TOP_N.min(knowledge_base().len());

    for (seed, env) in environment_grid().iter().enumerate() {
        let ranked = scorer
            .score_crops(env, &mut StdSource::seeded(seed as u64))
            .unwrap();
        assert_eq!(ranked.len(), expected_len);
        for pair in ranked.windows(2) {
            assert!(pair[0].suitability_score >= pair[1].suitability_score);
        }
        for crop in &ranked {
            assert!(crop.estimated_yield.per_hectare >= 0);
            assert!(crop.investment_needed.per_hectare > 0);
        }
    }
}

#[test]
fn ranking_is_deterministic_for_a_seed() {
    let scorer = CropScorer::new();
    let env = &environment_grid()[42];
    let a = scorer.score_crops(env, &mut StdSource::seeded(9)).unwrap();
    let b = scorer.score_crops(env, &mut StdSource::seeded(9)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn dosing_respects_nutrient_floors() {
    let mut sources: Vec<Box<dyn RandomSource>> = vec![
        Box::new(FixedSource::low()),
        Box::new(FixedSource::high()),
        Box::new(StdSource::seeded(3)),
    ];

    for entry in baselines() {
        for rainfall in [0.0, 399.0, 400.0, 900.0, 1500.0, 1501.0, 3000.0] {
            for (i, soil) in SOILS.iter().enumerate() {
                let request = DosingRequest {
                    crop: entry.name.to_string(),
                    rainfall,
                    soil_type: soil.to_string(),
                    growth_stage: STAGES[i % STAGES.len()].to_string(),
                    field_size: 1.5,
                };
                for rng in sources.iter_mut() {
                    let result = dose_fertilizer(&request, rng.as_mut()).unwrap();
                    let [n, p, k] = result.per_hectare();
                    assert!(n >= 10 && p >= 5 && k >= 5, "{:?} -> {:?}", request, [n, p, k]);
                    assert_eq!(result.matched_crop, entry.name);
                }
            }
        }
    }
}

#[test]
fn crop_matching_tolerates_case_and_paddy() {
    let request = |crop: &str| DosingRequest {
        crop: crop.to_string(),
        rainfall: 900.0,
        soil_type: "loamy".to_string(),
        growth_stage: "sowing".to_string(),
        field_size: 1.0,
    };
    let mut rng = FixedSource::low();

    assert_eq!(dose_fertilizer(&request("Rice, paddy"), &mut rng).unwrap().matched_crop, "Rice");
    assert_eq!(dose_fertilizer(&request("MAIZE"), &mut rng).unwrap().matched_crop, "Maize");
    assert_eq!(dose_fertilizer(&request("dragonfruit"), &mut rng).unwrap().matched_crop, "Maize");
}

#[test]
fn advisor_loads_artifacts_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("yield_model.json"),
        r#"{"format_version":1,
            "scaler":{"mean":[1000.0,200.0,25.0],"scale":[100.0,50.0,5.0]},
            "coefficients":[0.0,0.0,0.0],
            "intercept":42000.0}"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("fertilizer_recommender.json"),
        r#"{"format_version":1,
            "crops":[{"name":"Wheat","npk":{"N":120,"P":60,"K":40}}]}"#,
    )
    .unwrap();
    std::fs::write(dir.path().join("weather_model.json"), "[]").unwrap();

    let advisor = AgriAdvisor::load(dir.path());
    let caps = advisor.capabilities();
    assert!(caps.yield_model && caps.fertilizer);
    assert!(!caps.weather && !caps.disease);

    let mut rng = FixedSource::low();
    let estimate = advisor
        .estimate_yield(
            &YieldInput { rainfall: 900.0, pesticide: 150.0, temperature: 30.0 },
            &mut rng,
        )
        .unwrap();
    assert_eq!(estimate.source, EstimateSource::Model);
    assert_eq!(estimate.value, 42000.0);

    let wheat = DosingRequest {
        crop: "wheat".to_string(),
        rainfall: 800.0,
        soil_type: "loamy".to_string(),
        growth_stage: "vegetative".to_string(),
        field_size: 1.0,
    };
    let advice = advisor.dose_fertilizer(&wheat, &mut rng).unwrap();
    assert!(advice.is_model());
    assert!(matches!(advice.value, FertilizerAdvice::Model(_)));
}
