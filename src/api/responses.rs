//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    catalog::{GoalId, ProjectId, TagId},
    services::TourStep,
    state::{SessionSnapshot, TimerState},
};

/// API response structure for state change endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub session: SessionSnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: &str, message: String, session: SessionSnapshot) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            session,
        }
    }

    pub fn ok(message: String, session: SessionSnapshot) -> Self {
        Self::new("ok", message, session)
    }

    /// The request was valid but had no effect, e.g. starting a finished timer
    pub fn unchanged(message: String, session: SessionSnapshot) -> Self {
        Self::new("unchanged", message, session)
    }

    pub fn rejected(message: String, session: SessionSnapshot) -> Self {
        Self::new("rejected", message, session)
    }

    pub fn error(message: String, session: SessionSnapshot) -> Self {
        Self::new("error", message, session)
    }
}

/// What a client needs to draw the countdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerView {
    #[serde(flatten)]
    pub state: TimerState,
    /// Remaining time as `MM:SS`
    pub display: String,
    /// Elapsed fraction in `[0, 1]`
    pub progress: f64,
}

impl From<TimerState> for TimerView {
    fn from(state: TimerState) -> Self {
        Self {
            display: state.display(),
            progress: state.progress(),
            state,
        }
    }
}

/// Full status response with timer display information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub session: SessionSnapshot,
    pub timer: TimerView,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OnboardingResponse {
    pub show: bool,
    pub steps: &'static [TourStep],
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectRequest {
    pub project: Option<ProjectId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagsRequest {
    pub tags: Vec<TagId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoalRequest {
    pub goal: GoalId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackRequest {
    pub text: String,
}
