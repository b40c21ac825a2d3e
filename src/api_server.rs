// Axum API Server Module
//
// Purpose: JSON facade over the advisor (ranking, dosing, estimators) and the
// Farmer Connect mock. Every handler answers `{"success": true, ...}` or
// `{"success": false, "error": ...}`.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::advisor::AgriAdvisor;
use crate::community::{self, ListingSubmission, QuestionSubmission, ESTIMATED_RESPONSE_TIME};
use crate::config::ServerConfig;
use crate::environment::EnvironmentInput;
use crate::error::{ensure_finite, AdvisorError};
use crate::estimators::{rainfall_advice, DiseaseInput, WeatherInput, YieldInput};
use crate::fertilizer::DosingRequest;
use crate::random::StdSource;

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub advisor: Arc<AgriAdvisor>,
    /// Seed for every per-request random source; entropy when unset
    pub rng_seed: Option<u64>,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        tracing::info!("Loading model artifacts from {}", config.models_dir.display());
        Self::with_advisor(AgriAdvisor::load(&config.models_dir), config.rng_seed)
    }

    pub fn with_advisor(advisor: AgriAdvisor, rng_seed: Option<u64>) -> Self {
        Self {
            advisor: Arc::new(advisor),
            rng_seed,
        }
    }

    fn rng(&self) -> StdSource {
        StdSource::from_seed_option(self.rng_seed)
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))

        // Advisory endpoints
        .route("/api/predict-yield", post(predict_yield))
        .route("/api/predict-disease", post(predict_disease))
        .route("/api/recommend-fertilizer", post(recommend_fertilizer))
        .route("/api/predict-weather", post(predict_weather))
        .route("/api/recommend-crop", post(recommend_crop))

        // Farmer Connect
        .route("/api/post-question", post(post_question))
        .route("/api/get-forum-posts", get(get_forum_posts))
        .route("/api/connect-farmers", post(connect_farmers))
        .route("/api/submit-listing", post(submit_listing))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Request Payloads
// ============================================================================

type JsonBody = Result<Json<Value>, JsonRejection>;

/// Loosely typed request object: numbers may arrive as JSON numbers or
/// numeric strings, and `null` counts as absent.
struct Payload(Map<String, Value>);

impl Payload {
    fn from_body(body: JsonBody) -> Result<Self, AppError> {
        match body {
            Ok(Json(Value::Object(map))) => Ok(Self(map)),
            Ok(Json(_)) => Err(AppError::BadRequest(
                "request body must be a JSON object".to_string(),
            )),
            Err(rejection) => Err(AppError::BadRequest(rejection.body_text())),
        }
    }

    fn present(&self, field: &str) -> Option<&Value> {
        self.0.get(field).filter(|v| !v.is_null())
    }

    fn number(&self, field: &str) -> Result<f64, AdvisorError> {
        let value = self
            .present(field)
            .ok_or_else(|| AdvisorError::MissingField(field.to_string()))?;
        as_number(field, value)
    }

    fn number_or(&self, field: &str, default: f64) -> Result<f64, AdvisorError> {
        self.present(field)
            .map_or(Ok(default), |value| as_number(field, value))
    }

    /// Fractions truncate toward zero
    fn integer_or(&self, field: &str, default: i64) -> Result<i64, AdvisorError> {
        let Some(value) = self.present(field) else {
            return Ok(default);
        };
        let exact = value
            .as_i64()
            .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()));
        if let Some(n) = exact {
            return Ok(n);
        }

        let n = as_number(field, value)?;
        if n.abs() >= i64::MAX as f64 {
            return Err(AdvisorError::invalid(field, "out of range"));
        }
        Ok(n.trunc() as i64)
    }

    fn text(&self, field: &str) -> Result<String, AdvisorError> {
        let value = self
            .present(field)
            .ok_or_else(|| AdvisorError::MissingField(field.to_string()))?;
        as_text(field, value)
    }

    fn text_or(&self, field: &str, default: &str) -> Result<String, AdvisorError> {
        self.present(field)
            .map_or_else(|| Ok(default.to_string()), |value| as_text(field, value))
    }
}

fn as_number(field: &str, value: &Value) -> Result<f64, AdvisorError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    let n = parsed
        .ok_or_else(|| AdvisorError::invalid(field, format!("expected a number, got {}", value)))?;
    ensure_finite(field, n)
}

fn as_text(field: &str, value: &Value) -> Result<String, AdvisorError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(AdvisorError::invalid(field, format!("expected text, got {}", other))),
    }
}

/// Whole numbers serialize as JSON integers
fn json_number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        json!(value as i64)
    } else {
        json!(value)
    }
}

// ============================================================================
// Advisory Handlers
// ============================================================================

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "capabilities": state.advisor.capabilities(),
    }))
}

async fn predict_yield(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<Json<Value>, AppError> {
    let payload = Payload::from_body(body)?;
    let input = YieldInput {
        rainfall: payload.number("rainfall")?,
        pesticide: payload.number("pesticide")?,
        temperature: payload.number("temperature")?,
    };
    let crop = payload.text_or("crop", "Maize")?;

    let estimate = state.advisor.estimate_yield(&input, &mut state.rng())?;
    let verb = if estimate.is_model() { "Predicted" } else { "Estimated" };
    tracing::debug!(?input, crop = %crop, source = ?estimate.source, "Yield estimated");

    Ok(Json(json!({
        "success": true,
        "prediction": json_number(estimate.value),
        "crop": crop,
        "source": estimate.source,
        "message": format!("{} yield for {}: {} hg/ha", verb, crop, estimate.value),
    })))
}

async fn predict_disease(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<Json<Value>, AppError> {
    let payload = Payload::from_body(body)?;
    let input = DiseaseInput {
        rainfall: payload.number("rainfall")?,
        temperature: payload.number("temperature")?,
        humidity: payload.number_or("humidity", 70.0)?,
        pesticide: payload.number_or("pesticide", 100.0)?,
    };

    let estimate = state.advisor.estimate_disease_risk(&input, &mut state.rng())?;
    let risk = estimate.value;

    Ok(Json(json!({
        "success": true,
        "risk_level": risk.as_str(),
        "recommendation": risk.recommendation(),
        "source": estimate.source,
        "message": format!("Disease risk level: {}", risk.as_str()),
    })))
}

fn dosing_request(payload: &Payload) -> Result<DosingRequest, AdvisorError> {
    Ok(DosingRequest {
        crop: payload.text("crop")?,
        rainfall: payload.number("rainfall")?,
        soil_type: payload.text_or("soil_type", "medium")?,
        growth_stage: payload.text_or("growth_stage", "vegetative")?,
        field_size: payload.number_or("field_size", 1.0)?,
    })
}

async fn recommend_fertilizer(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<Json<Value>, AppError> {
    let payload = Payload::from_body(body)?;
    let estimate = dosing_request(&payload)
        .and_then(|request| {
            let estimate = state.advisor.dose_fertilizer(&request, &mut state.rng())?;
            Ok((request.field_size, estimate))
        })
        .map_err(|e| AppError::from(e).prefixed("Unable to generate recommendation"));
    let (field_size, estimate) = estimate?;

    tracing::debug!(crop = estimate.value.matched_crop(), source = ?estimate.source, "Fertilizer advice ready");

    let mut response = json!({
        "success": true,
        "fertilizer": estimate.value,
        "field_size": field_size,
        "source": estimate.source,
    });
    if estimate.is_model() {
        response["message"] = json!("Fertilizer recommendation generated successfully");
    } else {
        response["message"] =
            json!("Fertilizer recommendation generated successfully (estimated values)");
        response["note"] = json!("Recommendations based on general agricultural guidelines");
    }
    Ok(Json(response))
}

async fn predict_weather(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<Json<Value>, AppError> {
    let payload = Payload::from_body(body)?;
    let year = payload.integer_or("year", 2025)?;
    let year = i32::try_from(year).map_err(|_| AdvisorError::invalid("year", "out of range"))?;
    let location = payload.text_or("location", "General")?;

    let estimate = state.advisor.estimate_weather(&WeatherInput { year }, &mut state.rng())?;
    let rainfall = estimate.value;

    Ok(Json(json!({
        "success": true,
        "year": year,
        "location": location,
        "predicted_rainfall": json_number(rainfall),
        "advice": rainfall_advice(rainfall),
        "source": estimate.source,
        "message": format!("Weather prediction for {}: {}mm rainfall", year, rainfall),
    })))
}

fn environment_input(payload: &Payload) -> Result<EnvironmentInput, AdvisorError> {
    let defaults = EnvironmentInput::default();
    Ok(EnvironmentInput {
        rainfall: payload.number("rainfall")?,
        temperature: payload.number("temperature")?,
        humidity: payload.number("humidity")?,
        soil_type: payload.text("soil_type")?,
        ph: payload.number_or("ph_level", defaults.ph)?,
        season: payload.text_or("season", &defaults.season)?,
        farm_size: payload.number_or("farm_size", defaults.farm_size)?,
        water_availability: payload.text_or("water_availability", &defaults.water_availability)?,
        experience_level: payload.text_or("experience_level", &defaults.experience_level)?,
        market_preference: payload.text_or("market_preference", &defaults.market_preference)?,
    })
}

async fn recommend_crop(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<Json<Value>, AppError> {
    let payload = Payload::from_body(body)?;
    let env = environment_input(&payload)?;

    let parameters_used = json!({
        "rainfall": env.rainfall,
        "temperature": env.temperature,
        "humidity": env.humidity,
        "soil_type": env.soil_type,
        "season": env.season,
    });

    // CPU-bound: ranking fans out over rayon
    let advisor = state.advisor.clone();
    let mut rng = state.rng();
    let recommendations = tokio::task::spawn_blocking(move || advisor.score_crops(&env, &mut rng))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    tracing::info!("Ranked {} crops", recommendations.len());

    Ok(Json(json!({
        "success": true,
        "recommendations": recommendations,
        "message": "Crop recommendations generated successfully",
        "parameters_used": parameters_used,
    })))
}

// ============================================================================
// Farmer Connect Handlers
// ============================================================================

async fn post_question(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<Json<Value>, AppError> {
    let payload = Payload::from_body(body)?;
    let submission = QuestionSubmission {
        farmer_name: payload.text("farmer_name")?,
        location: payload.text("location")?,
        crop_type: payload.text_or("crop_type", "General")?,
        category: payload.text("category")?,
        question: payload.text("question")?,
    };

    let posted = community::post_question(
        submission,
        chrono::Local::now().naive_local(),
        &mut state.rng(),
    );
    tracing::info!(id = %posted.id, category = %posted.category, "Question posted");

    Ok(Json(json!({
        "success": true,
        "question_id": posted.id,
        "message": "Your question has been posted successfully!",
        "estimated_response_time": ESTIMATED_RESPONSE_TIME,
    })))
}

async fn get_forum_posts() -> Json<Value> {
    let posts = community::forum_posts(chrono::Local::now().naive_local());
    Json(json!({
        "success": true,
        "total_posts": posts.len(),
        "posts": posts,
    }))
}

async fn connect_farmers(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<Json<Value>, AppError> {
    let payload = Payload::from_body(body)?;
    let location = payload.text("location")?;
    let crop_interest = payload.text_or("crop_interest", community::ANY_CROP)?;

    let farmers = community::nearby_farmers(&location, &crop_interest, &mut state.rng());

    Ok(Json(json!({
        "success": true,
        "message": format!("Found {} farmers in your area", farmers.len()),
        "farmers": farmers,
    })))
}

async fn submit_listing(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<Json<Value>, AppError> {
    let payload = Payload::from_body(body)?;
    let submission = ListingSubmission {
        farmer_name: payload.text("farmer_name")?,
        contact: payload.text("contact")?,
        location: payload.text("location")?,
        listing_type: payload.text("listing_type")?,
        item_name: payload.text("item_name")?,
        quantity: payload.text("quantity")?,
        description: payload.text("description")?,
        price: payload.text_or("price", "Negotiable")?,
    };

    let listing = community::submit_listing(
        submission,
        chrono::Local::now().naive_local(),
        &mut state.rng(),
    );
    tracing::info!(id = %listing.id, item = %listing.item_name, "Listing posted");

    Ok(Json(json!({
        "success": true,
        "listing_id": listing.id,
        "message": "Your listing has been posted successfully!",
    })))
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Internal(String),
}

impl AppError {
    fn prefixed(self, prefix: &str) -> Self {
        match self {
            AppError::BadRequest(msg) => AppError::BadRequest(format!("{}: {}", prefix, msg)),
            AppError::Internal(msg) => AppError::Internal(format!("{}: {}", prefix, msg)),
        }
    }
}

impl From<AdvisorError> for AppError {
    fn from(err: AdvisorError) -> Self {
        match err {
            AdvisorError::MissingField(_) | AdvisorError::InvalidInput { .. } => {
                AppError::BadRequest(err.to_string())
            }
            AdvisorError::Artifact { .. } => AppError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(json!({
            "success": false,
            "error": message
        }));

        (status, body).into_response()
    }
}
