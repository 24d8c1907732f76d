//! Countdown timer engine and its one-second tick task

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::Duration,
};
use tokio::{
    sync::watch,
    time::{interval_at, Instant},
};
use tracing::{debug, info};

use crate::{state::TimerState, utils::TaskHandle};

/// Interval between two decrements of a running countdown
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Owns the countdown for the active goal
///
/// At most one tick task exists per engine. It is cancelled by `stop`,
/// `reset`, `retarget`, `shutdown` and by dropping the engine.
#[derive(Debug)]
pub struct TimerEngine {
    inner: Arc<Mutex<EngineInner>>,
}

#[derive(Debug)]
struct EngineInner {
    state: TimerState,
    ticker: Option<TaskHandle>,
    /// Bumped on every start so a tick from an older source is ignored
    generation: u64,
    update_tx: watch::Sender<TimerState>,
}

impl EngineInner {
    /// Cancel the tick source (if any) and mark the countdown stopped
    fn halt(&mut self) -> bool {
        let was_running = self.state.running;
        self.ticker = None;
        self.state.running = false;
        was_running
    }

    fn publish(&self) {
        self.update_tx.send_replace(self.state);
    }
}

impl TimerEngine {
    /// Create a stopped engine with the full duration remaining
    pub fn new(duration_seconds: u64) -> Self {
        let state = TimerState::new(duration_seconds);
        let (update_tx, _) = watch::channel(state);

        Self {
            inner: Arc::new(Mutex::new(EngineInner {
                state,
                ticker: None,
                generation: 0,
                update_tx,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, EngineInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current countdown snapshot
    pub fn state(&self) -> TimerState {
        self.lock().state
    }

    pub fn is_running(&self) -> bool {
        self.lock().state.running
    }

    /// Watch every change of the countdown
    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.lock().update_tx.subscribe()
    }

    /// Start counting down. Returns false (and does nothing) when the timer
    /// is already running or has nothing left to count.
    pub fn start(&self) -> bool {
        let mut inner = self.lock();
        if inner.state.running || inner.state.remaining_seconds == 0 {
            debug!(
                "Ignoring start: running={}, remaining={}s",
                inner.state.running, inner.state.remaining_seconds
            );
            return false;
        }

        inner.generation += 1;
        let generation = inner.generation;
        inner.state.running = true;
        inner.ticker = Some(TaskHandle::spawn(run_ticker(
            Arc::downgrade(&self.inner),
            generation,
        )));
        info!(
            "Countdown started with {}s remaining",
            inner.state.remaining_seconds
        );
        inner.publish();
        true
    }

    /// Pause the countdown, keeping the remaining time
    pub fn stop(&self) {
        let mut inner = self.lock();
        if inner.halt() {
            info!(
                "Countdown stopped with {}s remaining",
                inner.state.remaining_seconds
            );
            inner.publish();
        }
    }

    /// Stop and restore the full duration
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.halt();
        inner.state.remaining_seconds = inner.state.duration_seconds;
        info!("Countdown reset to {}s", inner.state.duration_seconds);
        inner.publish();
    }

    /// Switch to a new duration. Always stops the countdown and reseeds the
    /// remaining time, even when the duration is unchanged.
    pub fn retarget(&self, duration_seconds: u64) {
        let mut inner = self.lock();
        if inner.halt() {
            info!("Goal changed while running, countdown stopped");
        }
        inner.state.duration_seconds = duration_seconds;
        inner.state.remaining_seconds = duration_seconds;
        debug!("Countdown retargeted to {}s", duration_seconds);
        inner.publish();
    }

    /// Cancel the tick source ahead of teardown
    pub fn shutdown(&self) {
        let mut inner = self.lock();
        if inner.halt() {
            inner.publish();
        }
    }
}

impl Drop for TimerEngine {
    fn drop(&mut self) {
        self.lock().halt();
    }
}

/// Tick source: fires once per second until cancelled or the engine is gone
async fn run_ticker(engine: Weak<Mutex<EngineInner>>, generation: u64) {
    let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);

    loop {
        interval.tick().await;

        let Some(engine) = engine.upgrade() else {
            break;
        };
        let mut inner = engine.lock().unwrap_or_else(PoisonError::into_inner);
        if !tick(&mut inner, generation) {
            break;
        }
    }
}

/// Apply one elapsed second. Returns false once this source should end.
fn tick(inner: &mut EngineInner, generation: u64) -> bool {
    // A stop that raced with this tick has already won
    if inner.generation != generation || !inner.state.running {
        return false;
    }

    if inner.state.remaining_seconds <= 1 {
        inner.state.remaining_seconds = 0;
        inner.halt();
        info!("Countdown finished");
        inner.publish();
        return false;
    }

    inner.state.remaining_seconds -= 1;
    inner.publish();
    true
}
