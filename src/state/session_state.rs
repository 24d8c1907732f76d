//! Selection and demo state for the focus session

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::TimerState;
use crate::{
    catalog::{Catalog, GoalId, ProjectId, SoundscapeId, TagId},
    error::SelectionError,
};

/// What the user (or the demo) has picked for the next session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub project: Option<ProjectId>,
    pub tags: Vec<TagId>,
    pub goal: GoalId,
    pub soundscape: Option<SoundscapeId>,
}

impl Selection {
    /// First project, first tag, the given goal and silence
    pub fn initial(catalog: &Catalog, goal: GoalId) -> Self {
        Self {
            project: catalog.projects.first().map(|p| p.id),
            tags: catalog.tags.first().map(|t| t.id).into_iter().collect(),
            goal,
            soundscape: None,
        }
    }

    /// Apply an already checked change; repeated tags keep their first position
    pub fn apply(&mut self, change: &SelectionChange) {
        match change {
            SelectionChange::Project(project) => self.project = *project,
            SelectionChange::Tags(tags) => {
                let mut seen = HashSet::new();
                self.tags = tags.iter().copied().filter(|id| seen.insert(*id)).collect();
            }
            SelectionChange::Goal(goal) => self.goal = *goal,
            SelectionChange::Soundscape(soundscape) => self.soundscape = *soundscape,
        }
    }
}

/// A single mutation of the selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum SelectionChange {
    Project(Option<ProjectId>),
    Tags(Vec<TagId>),
    Goal(GoalId),
    Soundscape(Option<SoundscapeId>),
}

impl SelectionChange {
    /// Reject ids the catalog does not know about
    pub fn check(&self, catalog: &Catalog) -> Result<(), SelectionError> {
        match self {
            Self::Project(Some(id)) if catalog.project(*id).is_none() => {
                Err(SelectionError::UnknownProject(*id))
            }
            Self::Tags(tags) => match tags.iter().find(|id| catalog.tag(**id).is_none()) {
                Some(id) => Err(SelectionError::UnknownTag(*id)),
                None => Ok(()),
            },
            Self::Goal(id) if catalog.goal(*id).is_none() => Err(SelectionError::UnknownGoal(*id)),
            Self::Soundscape(Some(id)) if catalog.soundscape(*id).is_none() => {
                Err(SelectionError::UnknownSoundscape(*id))
            }
            _ => Ok(()),
        }
    }

    /// Short action name used for last-action tracking
    pub fn action(&self) -> &'static str {
        match self {
            Self::Project(_) => "select-project",
            Self::Tags(_) => "select-tags",
            Self::Goal(_) => "select-goal",
            Self::Soundscape(Some(_)) => "select-soundscape",
            Self::Soundscape(None) => "clear-soundscape",
        }
    }
}

/// Demo progress as seen by the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoStatus {
    pub running: bool,
    /// Element id the client should emphasize, if any
    pub highlight: Option<String>,
}

/// Everything a client needs to render the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub selection: Selection,
    pub timer: TimerState,
    pub demo: DemoStatus,
}
