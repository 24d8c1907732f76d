//! State management module
//!
//! This module contains the session state structures and the application
//! state that owns them.

pub mod app_state;
pub mod session_state;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use session_state::{DemoStatus, Selection, SelectionChange, SessionSnapshot};
pub use timer_state::TimerState;
