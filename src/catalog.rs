//! Fixed catalog of projects, tags, session goals and soundscapes

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

pub type ProjectId = u32;
pub type TagId = u32;
pub type GoalId = u32;
pub type SoundscapeId = u32;

/// A project a focus session can be booked against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

/// A named target duration, e.g. "Pomodoro (25 min)"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub label: String,
    pub minutes: u64,
}

impl Goal {
    /// Countdown duration for this goal
    pub fn duration_seconds(&self) -> u64 {
        self.minutes * 60
    }
}

/// An ambient sound loop the client plays while focusing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Soundscape {
    pub id: SoundscapeId,
    pub name: String,
    pub sound_url: String,
    pub icon: String,
}

/// Everything the user can pick from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub projects: Vec<Project>,
    pub tags: Vec<Tag>,
    pub goals: Vec<Goal>,
    pub soundscapes: Vec<Soundscape>,
}

impl Catalog {
    /// The built-in catalog shipped with the server
    pub fn builtin() -> Self {
        let project = |id, name: &str, color: &str| Project {
            id,
            name: name.to_string(),
            color: color.to_string(),
        };
        let tag = |id, name: &str| Tag {
            id,
            name: name.to_string(),
        };
        let goal = |id, label: &str, minutes| Goal {
            id,
            label: label.to_string(),
            minutes,
        };
        let sound = |id, name: &str, slug: &str| Soundscape {
            id,
            name: name.to_string(),
            sound_url: format!("/sounds/{}.mp3", slug),
            icon: slug.to_string(),
        };

        Self {
            projects: vec![
                project(1, "Toggl Focus Redesign", "bg-toggl-pink"),
                project(2, "Mobile App Sync", "bg-blue-500"),
                project(3, "API Integration", "bg-green-500"),
                project(4, "Marketing Campaign", "bg-yellow-500"),
            ],
            tags: vec![
                tag(1, "design"),
                tag(2, "development"),
                tag(3, "meeting"),
                tag(4, "research"),
                tag(5, "prototyping"),
            ],
            goals: vec![
                goal(1, "Pomodoro (25 min)", 25),
                goal(2, "Short Break (5 min)", 5),
                goal(3, "Deep Work (50 min)", 50),
                goal(4, "Long Break (15 min)", 15),
            ],
            soundscapes: vec![
                sound(1, "Rain", "rain"),
                sound(2, "Cafe", "cafe"),
                sound(3, "Forest", "forest"),
                sound(4, "Ocean", "ocean"),
            ],
        }
    }

    /// Check the catalog once at load time so per-operation code can trust it
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.goals.is_empty() {
            return Err(CatalogError::NoGoals);
        }
        if let Some(goal) = self.goals.iter().find(|g| g.minutes == 0) {
            return Err(CatalogError::NonPositiveGoal(goal.id));
        }

        check_unique("project", self.projects.iter().map(|p| p.id))?;
        check_unique("tag", self.tags.iter().map(|t| t.id))?;
        check_unique("goal", self.goals.iter().map(|g| g.id))?;
        check_unique("soundscape", self.soundscapes.iter().map(|s| s.id))?;
        Ok(())
    }

    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn tag(&self, id: TagId) -> Option<&Tag> {
        self.tags.iter().find(|t| t.id == id)
    }

    pub fn goal(&self, id: GoalId) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn soundscape(&self, id: SoundscapeId) -> Option<&Soundscape> {
        self.soundscapes.iter().find(|s| s.id == id)
    }

    /// Goal selected when the server starts without an explicit choice
    pub fn default_goal(&self) -> Option<&Goal> {
        self.goals.first()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn check_unique(kind: &'static str, ids: impl Iterator<Item = u32>) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId { kind, id });
        }
    }
    Ok(())
}
