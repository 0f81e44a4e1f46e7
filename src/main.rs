//! Recommendation Service — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared config, and middleware.

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gov_service_recommender::api::{self, AppState};
use gov_service_recommender::config::{
    config_path, start_hot_reload_thread, ScoringConfig, ScoringHandle,
};
use gov_service_recommender::metrics::Metrics;
use gov_service_recommender::model::DEFAULT_TOP_N;

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - RECOMMENDER_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("RECOMMENDER_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("gov_service_recommender=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    // This enables SCORING_CONFIG_PATH / SCORING_HOT_RELOAD from .env.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    enable_dev_tracing();

    // --- Load scoring config (defaults apply when the file is absent) ---
    let cfg = ScoringConfig::load().expect("Failed to load scoring config");
    let handle = ScoringHandle::new(cfg);

    // If hot reload is enabled, spawn the background watcher.
    start_hot_reload_thread(handle.clone(), config_path());

    let metrics = Metrics::init(DEFAULT_TOP_N);

    let router = api::create_router(AppState { scoring: handle }).merge(metrics.router());

    Ok(router.into())
}
