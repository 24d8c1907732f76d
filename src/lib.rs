//! Focus Session - A state-managed HTTP server for focus sessions
//!
//! This library owns a single focus session: the selected project, tags,
//! goal and soundscape, the countdown for the selected goal, a scripted demo
//! walkthrough, the persisted onboarding flag and feedback classification.

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use catalog::Catalog;
pub use config::Config;
pub use state::AppState;
pub use tasks::{DemoScript, TimerEngine};
pub use utils::signals::shutdown_signal;
