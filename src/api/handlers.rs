//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::{stream, Stream};
use tracing::{debug, error, info, warn};

use super::responses::{
    ApiResponse, FeedbackRequest, GoalRequest, HealthResponse, OnboardingResponse,
    ProjectRequest, StatusResponse, TagsRequest, TimerView,
};
use crate::{
    catalog::{Catalog, SoundscapeId},
    error::{FeedbackError, SelectionError},
    services::{FeedbackOutcome, TOUR_STEPS},
    state::{AppState, Selection},
    tasks::DemoScript,
};

type ApiResult = Result<Json<ApiResponse>, (StatusCode, Json<ApiResponse>)>;

/// Map a selection result onto the standard response
fn selection_response(state: &AppState, result: Result<Selection, SelectionError>) -> ApiResult {
    match result {
        Ok(_) => Ok(Json(ApiResponse::ok(
            "Selection updated".to_string(),
            state.snapshot(),
        ))),
        Err(e) => {
            warn!("Rejected selection: {}", e);
            Err((
                StatusCode::NOT_FOUND,
                Json(ApiResponse::rejected(e.to_string(), state.snapshot())),
            ))
        }
    }
}

/// Handle POST /timer/start
pub async fn timer_start_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    match state.start_timer() {
        Ok(true) => Ok(Json(ApiResponse::ok(
            "Timer started".to_string(),
            state.snapshot(),
        ))),
        Ok(false) => Ok(Json(ApiResponse::unchanged(
            "Timer is already running or finished".to_string(),
            state.snapshot(),
        ))),
        Err(e) => {
            warn!("Refusing timer start: {}", e);
            Err((
                StatusCode::CONFLICT,
                Json(ApiResponse::rejected(e.to_string(), state.snapshot())),
            ))
        }
    }
}

/// Handle POST /timer/stop
pub async fn timer_stop_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    state.stop_timer();
    Json(ApiResponse::ok("Timer stopped".to_string(), state.snapshot()))
}

/// Handle POST /timer/reset
pub async fn timer_reset_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    state.reset_timer();
    Json(ApiResponse::ok("Timer reset".to_string(), state.snapshot()))
}

/// Handle GET /timer/updates - stream the countdown as server-sent events
///
/// The current state is sent first, then one `timer` event per change until
/// the engine goes away.
pub async fn timer_updates_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    debug!("Timer update subscriber connected");
    let updates = state.timer.subscribe();

    let events = stream::unfold((updates, true), |(mut updates, first)| async move {
        if !first && updates.changed().await.is_err() {
            return None;
        }
        let timer = *updates.borrow_and_update();
        let event = Event::default()
            .event("timer")
            .json_data(TimerView::from(timer));
        Some((event, (updates, false)))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle PUT /selection/project
pub async fn project_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ProjectRequest>,
) -> ApiResult {
    let result = state.select_project(request.project);
    selection_response(&state, result)
}

/// Handle PUT /selection/tags
pub async fn tags_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TagsRequest>,
) -> ApiResult {
    let result = state.select_tags(request.tags);
    selection_response(&state, result)
}

/// Handle PUT /selection/goal - also resets the countdown
pub async fn goal_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GoalRequest>,
) -> ApiResult {
    let result = state.select_goal(request.goal);
    selection_response(&state, result)
}

/// Handle POST /selection/soundscape/:id - toggles the soundscape
pub async fn soundscape_toggle_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SoundscapeId>,
) -> ApiResult {
    let result = state.toggle_soundscape(id);
    selection_response(&state, result)
}

/// Handle DELETE /selection/soundscape
pub async fn soundscape_clear_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    let result = state.clear_soundscape();
    selection_response(&state, result)
}

/// Handle POST /demo - start the scripted walkthrough
pub async fn demo_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    match state.start_demo() {
        Ok(()) => {
            info!("Demo endpoint called - walkthrough started");
            Ok(Json(ApiResponse::ok(
                "Demo started".to_string(),
                state.snapshot(),
            )))
        }
        Err(e) => Err((
            StatusCode::CONFLICT,
            Json(ApiResponse::rejected(e.to_string(), state.snapshot())),
        )),
    }
}

/// Handle GET /demo/script
pub async fn demo_script_handler(State(state): State<Arc<AppState>>) -> Json<DemoScript> {
    Json(state.demo_script().clone())
}

/// Handle GET /catalog
pub async fn catalog_handler(State(state): State<Arc<AppState>>) -> Json<Catalog> {
    Json(state.catalog.clone())
}

/// Handle GET /onboarding
pub async fn onboarding_handler(State(state): State<Arc<AppState>>) -> Json<OnboardingResponse> {
    Json(OnboardingResponse {
        show: state.show_onboarding(),
        steps: &TOUR_STEPS,
    })
}

/// Handle POST /onboarding/complete
pub async fn onboarding_complete_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    match state.complete_onboarding().await {
        Ok(()) => Ok(Json(ApiResponse::ok(
            "Onboarding completed".to_string(),
            state.snapshot(),
        ))),
        Err(e) => {
            error!("Failed to persist onboarding state: {:#}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(
                    "Failed to persist onboarding state".to_string(),
                    state.snapshot(),
                )),
            ))
        }
    }
}

/// Handle POST /feedback
pub async fn feedback_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FeedbackRequest>,
) -> Result<Json<FeedbackOutcome>, StatusCode> {
    match state.submit_feedback(&request.text).await {
        Ok(outcome) => Ok(Json(outcome)),
        Err(FeedbackError::EmptyFeedback) => Err(StatusCode::BAD_REQUEST),
        Err(e) => {
            error!("Unexpected feedback failure: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return current session status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let session = state.snapshot();
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timer: session.timer.into(),
        session,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
