use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    body::Body,
    extract::State,
    http::{header, Method, Request, StatusCode},
    routing::post,
    Json, Router,
};
use futures::StreamExt;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;

use focus_session::{
    api::create_router,
    catalog::Catalog,
    services::{FeedbackClassifier, OnboardingStore},
    state::AppState,
};

fn session() -> Arc<AppState> {
    Arc::new(
        AppState::new(Catalog::builtin(), 1)
            .unwrap()
            .with_address("127.0.0.1".to_string(), 20554),
    )
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_reports_ok() {
    let app = create_router(session());
    let (status, body) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn status_renders_full_pomodoro() {
    let app = create_router(session());
    let (status, body) = call(&app, Method::GET, "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["display"], "25:00");
    assert_eq!(body["timer"]["progress"], 0.0);
    assert_eq!(body["timer"]["duration_seconds"], 1500);
    assert_eq!(body["session"]["selection"]["goal"], 1);
    assert_eq!(body["session"]["demo"]["running"], false);
    assert_eq!(body["port"], 20554);
}

#[tokio::test]
async fn goal_change_reseeds_timer() {
    let app = create_router(session());
    let (status, _) = call(&app, Method::POST, "/timer/start", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(
        &app,
        Method::PUT,
        "/selection/goal",
        Some(json!({ "goal": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session"]["timer"]["remaining_seconds"], 300);
    assert_eq!(body["session"]["timer"]["running"], false);
}

#[tokio::test]
async fn unknown_goal_is_not_found() {
    let app = create_router(session());
    let (status, body) = call(
        &app,
        Method::PUT,
        "/selection/goal",
        Some(json!({ "goal": 42 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "rejected");
    assert_eq!(body["session"]["selection"]["goal"], 1);
}

#[tokio::test]
async fn selection_endpoints_update_session() {
    let app = create_router(session());

    let (_, body) = call(
        &app,
        Method::PUT,
        "/selection/project",
        Some(json!({ "project": null })),
    )
    .await;
    assert_eq!(body["session"]["selection"]["project"], Value::Null);

    let (_, body) = call(
        &app,
        Method::PUT,
        "/selection/tags",
        Some(json!({ "tags": [3, 4] })),
    )
    .await;
    assert_eq!(body["session"]["selection"]["tags"], json!([3, 4]));

    let (_, body) = call(&app, Method::POST, "/selection/soundscape/2", None).await;
    assert_eq!(body["session"]["selection"]["soundscape"], 2);

    let (_, body) = call(&app, Method::DELETE, "/selection/soundscape", None).await;
    assert_eq!(body["session"]["selection"]["soundscape"], Value::Null);
}

#[tokio::test]
async fn timer_updates_stream_current_state_then_changes() {
    let app = create_router(session());
    let request = Request::builder()
        .uri("/timer/updates")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/event-stream"
    );

    let mut frames = response.into_body().into_data_stream();
    let first = frames.next().await.unwrap().unwrap();
    let first = String::from_utf8_lossy(&first);
    assert!(first.starts_with("event: timer\n"));
    assert!(first.contains(r#""display":"25:00""#));
    assert!(first.contains(r#""running":false"#));

    call(&app, Method::POST, "/timer/start", None).await;
    let second = frames.next().await.unwrap().unwrap();
    assert!(String::from_utf8_lossy(&second).contains(r#""running":true"#));
}

#[tokio::test]
async fn second_start_is_unchanged() {
    let app = create_router(session());
    call(&app, Method::POST, "/timer/start", None).await;
    let (status, body) = call(&app, Method::POST, "/timer/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "unchanged");

    let (_, body) = call(&app, Method::POST, "/timer/reset", None).await;
    assert_eq!(body["session"]["timer"]["running"], false);
    assert_eq!(body["session"]["timer"]["remaining_seconds"], 1500);
}

#[tokio::test]
async fn demo_conflicts_with_running_timer() {
    let app = create_router(session());
    call(&app, Method::POST, "/timer/start", None).await;

    let (status, body) = call(&app, Method::POST, "/demo", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["session"]["demo"]["running"], false);
    assert_eq!(body["session"]["timer"]["running"], true);
}

#[tokio::test(start_paused = true)]
async fn demo_runs_to_completion_over_http() {
    let state = session();
    let app = create_router(Arc::clone(&state));

    let (status, body) = call(&app, Method::POST, "/demo", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session"]["demo"]["running"], true);

    let (status, _) = call(&app, Method::POST, "/demo", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = call(&app, Method::POST, "/timer/start", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    tokio::time::sleep(state.demo_script().total_duration() + Duration::from_secs(1)).await;

    let (_, body) = call(&app, Method::GET, "/status", None).await;
    assert_eq!(body["session"]["demo"]["running"], false);
    assert_eq!(body["session"]["demo"]["highlight"], Value::Null);
    assert_eq!(body["timer"]["display"], "50:00");
    assert_eq!(body["timer"]["running"], false);
}

#[tokio::test]
async fn demo_script_is_served_as_data() {
    let app = create_router(session());
    let (status, body) = call(&app, Method::GET, "/demo/script", None).await;
    assert_eq!(status, StatusCode::OK);

    let steps = body["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 18);
    assert_eq!(steps[13]["action"], json!({ "invoke": "start" }));
    assert_eq!(steps[13]["wait_ms"], 5000);
}

#[tokio::test]
async fn catalog_lists_goals() {
    let app = create_router(session());
    let (_, body) = call(&app, Method::GET, "/catalog", None).await;
    assert_eq!(body["goals"].as_array().unwrap().len(), 4);
    assert_eq!(body["goals"][2]["label"], "Deep Work (50 min)");
}

#[tokio::test]
async fn onboarding_flag_persists_through_api() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let store = OnboardingStore::open(&path).await.unwrap();
    let state = Arc::new(
        AppState::new(Catalog::builtin(), 1)
            .unwrap()
            .with_onboarding(store),
    );
    let app = create_router(state);

    let (_, body) = call(&app, Method::GET, "/onboarding", None).await;
    assert_eq!(body["show"], true);
    assert_eq!(body["steps"].as_array().unwrap().len(), 6);

    let (status, _) = call(&app, Method::POST, "/onboarding/complete", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(&app, Method::GET, "/onboarding", None).await;
    assert_eq!(body["show"], false);
    assert!(!OnboardingStore::open(&path).await.unwrap().show_onboarding());
}

#[tokio::test]
async fn blank_feedback_is_bad_request() {
    let app = create_router(session());
    let (status, _) = call(&app, Method::POST, "/feedback", Some(json!({ "text": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unreachable_classifier_still_receives_feedback() {
    // Nothing listens on port 9 of localhost
    let classifier =
        FeedbackClassifier::new("test-key", "gemini-2.5-flash", "http://127.0.0.1:9").unwrap();
    let state = Arc::new(
        AppState::new(Catalog::builtin(), 1)
            .unwrap()
            .with_feedback(classifier),
    );
    let app = create_router(state);

    let (status, body) = call(
        &app,
        Method::POST,
        "/feedback",
        Some(json!({ "text": "The timer skipped a second" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "received");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Sorry, we couldn't analyze"));
}

#[tokio::test]
async fn feedback_text_reaches_classifier_untrimmed() {
    let seen: Arc<Mutex<Option<Value>>> = Arc::default();
    let router = Router::new()
        .route(
            "/v1beta/models/:call",
            post(
                |State(seen): State<Arc<Mutex<Option<Value>>>>, Json(body): Json<Value>| async move {
                    *seen.lock().unwrap() = Some(body);
                    Json(json!({
                        "candidates": [{ "content": { "parts": [{
                            "text": r#"{"sentiment":"neutral","category":"Other","summary":"Spacing."}"#
                        }] } }]
                    }))
                },
            ),
        )
        .with_state(Arc::clone(&seen));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let classifier = FeedbackClassifier::new("test-key", "gemini-2.5-flash", endpoint).unwrap();
    let state = Arc::new(
        AppState::new(Catalog::builtin(), 1)
            .unwrap()
            .with_feedback(classifier),
    );
    let app = create_router(state);

    let (status, body) = call(
        &app,
        Method::POST,
        "/feedback",
        Some(json!({ "text": "  spaced out\n" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "analyzed");

    let request = seen.lock().unwrap().take().unwrap();
    let prompt = request["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("\"  spaced out\n\""));
}
