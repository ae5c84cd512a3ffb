use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{config::Config, main_lib::AppState};

mod rates;

pub async fn healthz() -> &'static str {
    "ok"
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    Router::new()
        .route("/api/v1/healthz", get(healthz))
        .merge(rates::router())
        .with_state(state)
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
