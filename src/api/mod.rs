//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/timer/start", post(timer_start_handler))
        .route("/timer/stop", post(timer_stop_handler))
        .route("/timer/reset", post(timer_reset_handler))
        .route("/timer/updates", get(timer_updates_handler))
        .route("/selection/project", put(project_handler))
        .route("/selection/tags", put(tags_handler))
        .route("/selection/goal", put(goal_handler))
        .route("/selection/soundscape", delete(soundscape_clear_handler))
        .route("/selection/soundscape/:id", post(soundscape_toggle_handler))
        .route("/demo", post(demo_handler))
        .route("/demo/script", get(demo_script_handler))
        .route("/onboarding", get(onboarding_handler))
        .route("/onboarding/complete", post(onboarding_complete_handler))
        .route("/feedback", post(feedback_handler))
        .route("/catalog", get(catalog_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
