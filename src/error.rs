//! Error types

use thiserror::Error;

use crate::catalog::{GoalId, ProjectId, SoundscapeId, TagId};

/// Raised once at startup when the catalog cannot back a session
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog must contain at least one goal")]
    NoGoals,
    #[error("goal {0} has a non-positive duration")]
    NonPositiveGoal(GoalId),
    #[error("duplicate {kind} id {id} in catalog")]
    DuplicateId { kind: &'static str, id: u32 },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("unknown project {0}")]
    UnknownProject(ProjectId),
    #[error("unknown tag {0}")]
    UnknownTag(TagId),
    #[error("unknown goal {0}")]
    UnknownGoal(GoalId),
    #[error("unknown soundscape {0}")]
    UnknownSoundscape(SoundscapeId),
}

/// Reasons a demo run is refused
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DemoError {
    #[error("timer is running")]
    TimerRunning,
    #[error("a demo is already in progress")]
    AlreadyRunning,
}

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("feedback text is empty")]
    EmptyFeedback,
    #[error("request to classification service failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("classification service returned no text")]
    EmptyResponse,
    #[error("classification is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("classification is missing field `{0}`")]
    MissingField(&'static str),
}
