//! Rank crops for one set of field conditions
//!
//! Prints the top crops with their factor breakdown.
//!
//! Run with: cargo run --bin rank_crops -- --rainfall 1200 --temperature 27 --humidity 80 \
//!     --soil-type loamy --ph 6.5 --season kharif --water-availability high --seed 7

use anyhow::Result;
use clap::Parser;
use crop_advisor_rust::{AgriAdvisor, EnvironmentInput, StdSource};
use std::time::Instant;

/// Rank crops for one set of field conditions
#[derive(Parser, Debug)]
#[command(name = "rank_crops", version, long_about = None)]
struct Args {
    /// Annual rainfall (mm)
    #[arg(long, default_value_t = 1000.0)]
    rainfall: f64,

    /// Mean temperature (°C)
    #[arg(long, default_value_t = 25.0)]
    temperature: f64,

    /// Relative humidity (%)
    #[arg(long, default_value_t = 70.0)]
    humidity: f64,

    /// Soil pH
    #[arg(long, alias = "ph-level", default_value_t = 7.0)]
    ph: f64,

    /// Farm size (ha)
    #[arg(long, default_value_t = 1.0)]
    farm_size: f64,

    #[arg(long, default_value = "kharif")]
    season: String,

    #[arg(long, default_value = "loamy")]
    soil_type: String,

    /// low, medium, high or very_high
    #[arg(long, default_value = "moderate")]
    water_availability: String,

    #[arg(long, default_value = "intermediate")]
    experience_level: String,

    #[arg(long, default_value = "food_grain")]
    market_preference: String,

    /// Seed for yield and investment draws (entropy when omitted)
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn environment(&self) -> EnvironmentInput {
        EnvironmentInput {
            rainfall: self.rainfall,
            temperature: self.temperature,
            humidity: self.humidity,
            ph: self.ph,
            farm_size: self.farm_size,
            season: self.season.clone(),
            soil_type: self.soil_type.clone(),
            water_availability: self.water_availability.clone(),
            experience_level: self.experience_level.clone(),
            market_preference: self.market_preference.clone(),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let env = args.environment();
    let advisor = AgriAdvisor::fallback_only();
    let mut rng = StdSource::from_seed_option(args.seed);

    println!("Crop Ranking");
    println!("============\n");
    println!(
        "rainfall={} mm  temperature={} °C  humidity={}%  pH={}  soil={}  season={}",
        env.rainfall, env.temperature, env.humidity, env.ph, env.soil_type, env.season
    );
    println!(
        "water={}  experience={}  market={}  farm={} ha\n",
        env.water_availability, env.experience_level, env.market_preference, env.farm_size
    );

    let start = Instant::now();
    let ranked = advisor.score_crops(&env, &mut rng)?;
    let elapsed = start.elapsed();

    for (rank, crop) in ranked.iter().enumerate() {
        println!(
            "{}. {:<12} {:>5.1}  {}",
            rank + 1,
            crop.crop_name,
            crop.suitability_score,
            crop.recommendation_level
        );
        for sub in &crop.sub_scores {
            println!(
                "     {:<20} {:>4.1}/{:<4.0} {}",
                sub.factor.display_name(),
                sub.score,
                sub.weight,
                sub.rationale
            );
        }
        println!(
            "     yield {} {}/ha, investment {} {}/ha, {}",
            crop.estimated_yield.per_hectare,
            crop.estimated_yield.unit,
            crop.investment_needed.per_hectare,
            crop.investment_needed.currency,
            crop.duration
        );
        for note in &crop.special_notes {
            println!("     - {}", note);
        }
        println!();
    }

    println!("Ranked {} crops in {:?}", ranked.len(), elapsed);
    Ok(())
}
