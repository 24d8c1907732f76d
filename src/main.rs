//! Focus Session - A state-managed HTTP server for focus sessions
//!
//! This is the main entry point for the focus-session application.

use std::sync::Arc;
use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use focus_session::{
    api::create_router,
    catalog::Catalog,
    config::Config,
    services::{FeedbackClassifier, OnboardingStore},
    state::AppState,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "focus_session={},tower_http=info",
            config.log_level()
        ))
        .init();

    info!("Starting focus-session server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}", config.host, config.port);

    let catalog = Catalog::builtin();
    catalog.validate().context("Invalid goal catalog")?;
    let goal = config
        .initial_goal(&catalog)
        .context("Catalog has no goal to start with")?;
    info!("Initial goal: {}", goal);

    let onboarding = match config.state_path() {
        Some(path) => {
            info!("Onboarding state file: {}", path.display());
            OnboardingStore::open(path).await?
        }
        None => {
            warn!("No config directory available, onboarding state will not persist");
            OnboardingStore::in_memory()
        }
    };

    let mut state = AppState::new(catalog, goal)?
        .with_onboarding(onboarding)
        .with_address(config.host.clone(), config.port);

    match &config.gemini_api_key {
        Some(key) => {
            let classifier =
                FeedbackClassifier::new(key, &config.gemini_model, &config.gemini_endpoint)?;
            info!("Feedback classification enabled ({})", classifier.model());
            state = state.with_feedback(classifier);
        }
        None => warn!("GEMINI_API_KEY not set, feedback will not be analyzed"),
    }

    let state = Arc::new(state);

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST   /timer/start|stop|reset    - Control the countdown");
    info!("  GET    /timer/updates             - Countdown as server-sent events");
    info!("  PUT    /selection/project|tags|goal - Change the selection");
    info!("  POST   /selection/soundscape/:id  - Toggle a soundscape");
    info!("  DELETE /selection/soundscape      - Silence");
    info!("  POST   /demo                      - Run the demo walkthrough");
    info!("  GET    /onboarding                - Tour steps and flag");
    info!("  POST   /feedback                  - Submit feedback");
    info!("  GET    /status                    - Current session");
    info!("  GET    /health                    - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    state.shutdown();
    info!("Server shutdown complete");
    Ok(())
}
