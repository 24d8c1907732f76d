//! Scripted demo walkthrough
//!
//! The walkthrough is plain data: an ordered list of steps, each applying one
//! action and then waiting a fixed time. A small driver task interprets the
//! list against the application state.

use std::{
    sync::{Arc, Weak},
    time::Duration,
};
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{debug, info};

use crate::state::{AppState, SelectionChange};

/// Element ids the presentation layer knows how to emphasize
pub mod targets {
    pub const PROJECT: &str = "onboarding-project";
    pub const TAGS: &str = "onboarding-tags";
    pub const GOAL: &str = "onboarding-goal";
    pub const SOUND: &str = "onboarding-sound";
    pub const START_BUTTON: &str = "timer-start-button";
    pub const RESET_BUTTON: &str = "timer-reset-button";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerCommand {
    Start,
    Stop,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemoAction {
    Select(SelectionChange),
    Highlight(Option<String>),
    Invoke(TimerCommand),
}

/// One action followed by a pause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoStep {
    pub action: DemoAction,
    pub wait_ms: u64,
}

impl DemoStep {
    fn new(action: DemoAction, wait_ms: u64) -> Self {
        Self { action, wait_ms }
    }

    fn select(change: SelectionChange, wait_ms: u64) -> Self {
        Self::new(DemoAction::Select(change), wait_ms)
    }

    fn highlight(target: &str, wait_ms: u64) -> Self {
        Self::new(DemoAction::Highlight(Some(target.to_string())), wait_ms)
    }

    fn invoke(command: TimerCommand, wait_ms: u64) -> Self {
        Self::new(DemoAction::Invoke(command), wait_ms)
    }

    pub fn wait(&self) -> Duration {
        Duration::from_millis(self.wait_ms)
    }
}

/// Immutable, ordered walkthrough
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoScript {
    steps: Vec<DemoStep>,
}

impl DemoScript {
    pub fn new(steps: Vec<DemoStep>) -> Self {
        Self { steps }
    }

    /// The walkthrough shown by the "Start Demo" button
    pub fn builtin() -> Self {
        use SelectionChange::{Goal, Project, Soundscape, Tags};

        Self::new(vec![
            DemoStep::select(Project(Some(1)), 0),
            DemoStep::select(Tags(vec![1]), 0),
            DemoStep::select(Goal(1), 0),
            DemoStep::select(Soundscape(None), 1000),
            DemoStep::highlight(targets::PROJECT, 1500),
            DemoStep::select(Project(Some(2)), 1500),
            DemoStep::highlight(targets::TAGS, 1500),
            DemoStep::select(Tags(vec![2, 5]), 1500),
            DemoStep::highlight(targets::GOAL, 1500),
            DemoStep::select(Goal(3), 1500),
            DemoStep::highlight(targets::SOUND, 1500),
            DemoStep::select(Soundscape(Some(3)), 1500),
            DemoStep::highlight(targets::START_BUTTON, 1000),
            DemoStep::invoke(TimerCommand::Start, 5000),
            DemoStep::highlight(targets::START_BUTTON, 1000),
            DemoStep::invoke(TimerCommand::Stop, 1000),
            DemoStep::highlight(targets::RESET_BUTTON, 1000),
            DemoStep::invoke(TimerCommand::Reset, 1000),
        ])
    }

    pub fn steps(&self) -> &[DemoStep] {
        &self.steps
    }

    /// Wall-clock length of a full run
    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(DemoStep::wait).sum()
    }
}

impl Default for DemoScript {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Interpret `script` step by step until it ends, is disposed, or the
/// session goes away
///
/// Only a weak reference is held across waits, so a torn-down session is
/// never mutated by a late step.
pub async fn run_demo_script(state: Weak<AppState>, run: u64, script: Arc<DemoScript>) {
    info!("Demo started ({} steps)", script.steps().len());

    for (index, step) in script.steps().iter().enumerate() {
        {
            let Some(state) = state.upgrade() else {
                debug!("Session gone, abandoning demo at step {}", index + 1);
                return;
            };
            debug!("Demo step {}: {:?}", index + 1, step.action);
            if !state.demo_step(run, &step.action) {
                debug!("Demo run {} was disposed at step {}", run, index + 1);
                return;
            }
        }

        if step.wait_ms > 0 {
            sleep(step.wait()).await;
        }
    }

    if let Some(state) = state.upgrade() {
        state.finish_demo(run);
    }
    info!("Demo finished");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_script_ends_with_reset() {
        let script = DemoScript::builtin();
        assert_eq!(script.steps().len(), 18);
        assert_eq!(
            script.steps().last().unwrap().action,
            DemoAction::Invoke(TimerCommand::Reset)
        );
        assert_eq!(script.total_duration(), Duration::from_millis(23_000));
    }

    #[test]
    fn builtin_script_only_references_catalog_ids() {
        let catalog = crate::catalog::Catalog::builtin();
        for step in DemoScript::builtin().steps() {
            if let DemoAction::Select(change) = &step.action {
                assert!(change.check(&catalog).is_ok(), "{:?}", change);
            }
        }
    }

    #[test]
    fn steps_serialize_as_tagged_actions() {
        let json = serde_json::to_value(DemoStep::invoke(TimerCommand::Start, 5000)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "action": { "invoke": "start" }, "wait_ms": 5000 })
        );
    }
}
