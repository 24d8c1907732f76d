//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use super::{DemoStatus, Selection, SelectionChange, SessionSnapshot};
use crate::{
    catalog::{Catalog, GoalId, ProjectId, SoundscapeId, TagId},
    error::{DemoError, FeedbackError, SelectionError},
    services::{FeedbackClassifier, FeedbackOutcome, OnboardingStore},
    tasks::{run_demo_script, DemoAction, DemoScript, TimerCommand, TimerEngine},
    utils::TaskHandle,
};

/// Demo bookkeeping guarded by one lock
#[derive(Debug, Default)]
struct DemoSlot {
    status: DemoStatus,
    /// Identifies the current run; steps from any other run are dropped
    run: u64,
    task: Option<TaskHandle>,
}

/// Single owner of the focus session: selection, countdown and demo
#[derive(Debug)]
pub struct AppState {
    /// Fixed choices, validated before the state is built
    pub catalog: Catalog,
    selection: Mutex<Selection>,
    /// Countdown for the selected goal
    pub timer: TimerEngine,
    demo: Mutex<DemoSlot>,
    demo_script: Arc<DemoScript>,
    /// Persisted onboarding flag
    pub onboarding: OnboardingStore,
    feedback: Option<FeedbackClassifier>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
}

impl AppState {
    /// Create the session with `goal` selected and the timer seeded from it
    pub fn new(catalog: Catalog, goal: GoalId) -> Result<Self, SelectionError> {
        let duration = catalog
            .goal(goal)
            .ok_or(SelectionError::UnknownGoal(goal))?
            .duration_seconds();
        let selection = Selection::initial(&catalog, goal);

        Ok(Self {
            catalog,
            selection: Mutex::new(selection),
            timer: TimerEngine::new(duration),
            demo: Mutex::new(DemoSlot::default()),
            demo_script: Arc::new(DemoScript::builtin()),
            onboarding: OnboardingStore::in_memory(),
            feedback: None,
            start_time: Instant::now(),
            port: 0,
            host: String::new(),
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        })
    }

    pub fn with_onboarding(mut self, store: OnboardingStore) -> Self {
        self.onboarding = store;
        self
    }

    pub fn with_feedback(mut self, classifier: FeedbackClassifier) -> Self {
        self.feedback = Some(classifier);
        self
    }

    pub fn with_demo_script(mut self, script: DemoScript) -> Self {
        self.demo_script = Arc::new(script);
        self
    }

    pub fn with_address(mut self, host: String, port: u16) -> Self {
        self.host = host;
        self.port = port;
        self
    }

    fn lock_selection(&self) -> MutexGuard<'_, Selection> {
        self.selection.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_demo(&self) -> MutexGuard<'_, DemoSlot> {
        self.demo.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Apply a selection change. Every goal selection retargets the timer,
    /// which stops a running countdown.
    pub fn apply(&self, change: SelectionChange, source: &str) -> Result<Selection, SelectionError> {
        change.check(&self.catalog)?;

        let mut selection = self.lock_selection();
        selection.apply(&change);
        if let SelectionChange::Goal(goal) = &change {
            if let Some(goal) = self.catalog.goal(*goal) {
                self.timer.retarget(goal.duration_seconds());
            }
        }
        let new_selection = selection.clone();
        drop(selection);

        info!("{} applied by {}", change.action(), source);
        self.record_action(change.action());
        Ok(new_selection)
    }

    pub fn select_project(&self, project: Option<ProjectId>) -> Result<Selection, SelectionError> {
        self.apply(SelectionChange::Project(project), "user")
    }

    pub fn select_tags(&self, tags: Vec<TagId>) -> Result<Selection, SelectionError> {
        self.apply(SelectionChange::Tags(tags), "user")
    }

    pub fn select_goal(&self, goal: GoalId) -> Result<Selection, SelectionError> {
        self.apply(SelectionChange::Goal(goal), "user")
    }

    /// Pick a soundscape, or turn it off when it is already playing
    pub fn toggle_soundscape(&self, id: SoundscapeId) -> Result<Selection, SelectionError> {
        let current = self.lock_selection().soundscape;
        let next = if current == Some(id) { None } else { Some(id) };
        self.apply(SelectionChange::Soundscape(next), "user")
    }

    pub fn clear_soundscape(&self) -> Result<Selection, SelectionError> {
        self.apply(SelectionChange::Soundscape(None), "user")
    }

    pub fn selection(&self) -> Selection {
        self.lock_selection().clone()
    }

    /// Start control for users; disabled while the demo drives the session
    pub fn start_timer(&self) -> Result<bool, DemoError> {
        // Held across the start so a demo cannot begin in between
        let demo = self.lock_demo();
        if demo.status.running {
            return Err(DemoError::AlreadyRunning);
        }
        let started = self.timer.start();
        drop(demo);

        self.record_action("start");
        Ok(started)
    }

    pub fn stop_timer(&self) {
        self.record_action("stop");
        self.timer.stop();
    }

    pub fn reset_timer(&self) {
        self.record_action("reset");
        self.timer.reset();
    }

    fn invoke(&self, command: TimerCommand) {
        match command {
            TimerCommand::Start => {
                self.timer.start();
            }
            TimerCommand::Stop => self.timer.stop(),
            TimerCommand::Reset => self.timer.reset(),
        }
    }

    pub fn demo_status(&self) -> DemoStatus {
        self.lock_demo().status.clone()
    }

    pub fn demo_script(&self) -> &DemoScript {
        &self.demo_script
    }

    /// Start the scripted walkthrough
    ///
    /// Refused while the countdown runs or another demo is in progress; the
    /// session is left untouched in that case.
    pub fn start_demo(self: &Arc<Self>) -> Result<(), DemoError> {
        let mut demo = self.lock_demo();
        if demo.status.running {
            warn!("Demo requested while one is already running");
            return Err(DemoError::AlreadyRunning);
        }
        if self.timer.is_running() {
            warn!("Demo requested while the timer is running");
            return Err(DemoError::TimerRunning);
        }

        demo.run += 1;
        let run = demo.run;
        demo.status = DemoStatus {
            running: true,
            highlight: None,
        };
        self.timer.reset();
        demo.task = Some(TaskHandle::spawn(run_demo_script(
            Arc::downgrade(self),
            run,
            Arc::clone(&self.demo_script),
        )));
        drop(demo);

        self.record_action("demo");
        Ok(())
    }

    /// Apply one scripted action if `run` is still the active demo
    pub(crate) fn demo_step(&self, run: u64, action: &DemoAction) -> bool {
        let mut demo = self.lock_demo();
        if demo.run != run || !demo.status.running {
            return false;
        }

        match action {
            DemoAction::Highlight(target) => demo.status.highlight = target.clone(),
            DemoAction::Select(change) => {
                if let Err(e) = self.apply(change.clone(), "demo") {
                    warn!("Demo step skipped: {}", e);
                }
            }
            DemoAction::Invoke(command) => self.invoke(*command),
        }
        true
    }

    pub(crate) fn finish_demo(&self, run: u64) {
        let mut demo = self.lock_demo();
        if demo.run == run {
            demo.status = DemoStatus::default();
            demo.task = None;
        }
    }

    /// Abandon a running demo; no further step fires after this returns
    pub fn dispose_demo(&self) {
        let mut demo = self.lock_demo();
        demo.task = None;
        if demo.status.running {
            info!("Demo disposed");
            demo.status = DemoStatus::default();
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            selection: self.selection(),
            timer: self.timer.state(),
            demo: self.demo_status(),
        }
    }

    /// Classify feedback, falling back to a plain acknowledgement on any failure
    pub async fn submit_feedback(&self, text: &str) -> Result<FeedbackOutcome, FeedbackError> {
        if text.trim().is_empty() {
            return Err(FeedbackError::EmptyFeedback);
        }
        self.record_action("feedback");

        let Some(classifier) = &self.feedback else {
            warn!("No classification service configured, feedback received unanalyzed");
            return Ok(FeedbackOutcome::received());
        };

        match classifier.classify(text).await {
            Ok(analysis) => {
                info!(
                    "Feedback classified: sentiment={}, category={}",
                    analysis.sentiment, analysis.category
                );
                Ok(FeedbackOutcome::Analyzed { analysis })
            }
            Err(e) => {
                error!("Failed to classify feedback: {}", e);
                Ok(FeedbackOutcome::received())
            }
        }
    }

    pub fn show_onboarding(&self) -> bool {
        self.onboarding.show_onboarding()
    }

    pub async fn complete_onboarding(&self) -> anyhow::Result<()> {
        self.onboarding.complete().await?;
        self.record_action("onboarding-complete");
        Ok(())
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Cancel every outstanding timer before the state is dropped
    pub fn shutdown(&self) {
        self.dispose_demo();
        self.timer.shutdown();
        info!("Session shut down");
    }
}
