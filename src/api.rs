//! HTTP layer: request parsing, boundary validation and response
//! serialization. All real logic lives in `scoring` and `recommender`;
//! handlers here stay thin.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics::{counter, histogram};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::{config_path, ScoringConfig, ScoringHandle};
use crate::model::{RecommendationRequest, ValidationError, DEFAULT_TOP_N};
use crate::recommendation::RecommendationResult;
use crate::recommender;

#[derive(Clone)]
pub struct AppState {
    pub scoring: ScoringHandle,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api", get(api_info))
        .route("/api/health", get(health))
        .route("/api/recommendations", post(recommendations))
        .route("/api/weights", get(current_weights))
        .route("/admin/reload-config", get(admin_reload_config))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Client-facing error body. Everything here is a caller-input problem;
/// the core has no failure modes of its own.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: e.to_string(),
        }
    }
}

async fn recommendations(
    State(state): State<AppState>,
    Json(req): Json<RecommendationRequest>,
) -> Result<Json<RecommendationResult>, ApiError> {
    req.validate()?;

    counter!("recommendations_requests_total").increment(1);
    histogram!("recommendations_services_per_request").record(req.services.len() as f64);

    let cfg = state.scoring.current();
    let result = recommender::rank(&req.user, &req.services, req.top_n, &cfg);

    if result.recommendations.is_empty() {
        counter!("recommendations_empty_total").increment(1);
    }

    info!(
        user_id = req.user.id,
        services = req.services.len(),
        top_n = req.top_n,
        status = result.status,
        "recommendations computed"
    );

    Ok(Json(result))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn api_info() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Government service recommendation engine",
        "endpoints": {
            "recommendations": { "method": "POST", "path": "/api/recommendations" },
            "weights": { "method": "GET", "path": "/api/weights" },
            "health": { "method": "GET", "path": "/api/health" }
        },
        "default_top_n": DEFAULT_TOP_N
    }))
}

async fn current_weights(State(state): State<AppState>) -> Json<serde_json::Value> {
    let cfg = state.scoring.current();
    Json(json!({
        "weights": cfg.weights,
        "description": {
            "urgency": "Time sensitivity: how soon does it expire?",
            "seasonality": "Seasonal demand patterns",
            "category": "Service category criticality",
            "activity": "User engagement level"
        },
        "note": "Weights are tunable via config/scoring.toml"
    }))
}

async fn admin_reload_config(State(state): State<AppState>) -> String {
    match ScoringConfig::load_from_path(&config_path()) {
        Ok(cfg) => {
            state.scoring.replace(cfg);
            "reloaded".to_string()
        }
        Err(e) => format!("failed: {e}"),
    }
}
