//! Utility functions module
//!
//! Shutdown signalling and owned task handles.

pub mod signals;
pub mod task;

pub use signals::shutdown_signal;
pub use task::TaskHandle;
