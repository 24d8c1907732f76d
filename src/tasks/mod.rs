//! Background tasks module
//!
//! The countdown tick source and the demo walkthrough driver.

pub mod countdown;
pub mod demo;

// Re-export main types
pub use countdown::{TimerEngine, TICK_PERIOD};
pub use demo::{run_demo_script, DemoAction, DemoScript, DemoStep, TimerCommand};
