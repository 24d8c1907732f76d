//! Persisted "show onboarding" flag and the onboarding tour steps

use std::{path::PathBuf, sync::Mutex};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

/// Key of the flag inside the state file
pub const SHOW_ONBOARDING_KEY: &str = "showOnboarding";

/// One stop of the onboarding tour
#[derive(Debug, Clone, Serialize)]
pub struct TourStep {
    pub title: &'static str,
    pub text: &'static str,
    /// Element the tooltip is anchored to; `None` centers it
    pub target: Option<&'static str>,
}

pub const TOUR_STEPS: [TourStep; 6] = [
    TourStep {
        title: "Welcome to Toggl Focus Enhanced!",
        text: "Let's quickly walk through the new features designed to boost your productivity.",
        target: None,
    },
    TourStep {
        title: "Assign Projects",
        text: "Easily assign your focus session to a project to keep your time organized.",
        target: Some("onboarding-project"),
    },
    TourStep {
        title: "Add Tags",
        text: "Add tags to categorize your work. Just start typing to find or add new ones.",
        target: Some("onboarding-tags"),
    },
    TourStep {
        title: "Set Session Goals",
        text: "Choose a predefined session length like a Pomodoro or a Deep Work session.",
        target: Some("onboarding-goal"),
    },
    TourStep {
        title: "Choose Your Soundscape",
        text: "Select an ambient sound to help you stay focused and block out distractions.",
        target: Some("onboarding-sound"),
    },
    TourStep {
        title: "You're All Set!",
        text: "You're ready to start your first focused session. Happy tracking!",
        target: None,
    },
];

/// Small JSON key-value file holding the onboarding flag
///
/// Without a path the values only live in memory.
#[derive(Debug)]
pub struct OnboardingStore {
    path: Option<PathBuf>,
    values: Mutex<Map<String, Value>>,
}

impl OnboardingStore {
    /// Open the store at `path`
    ///
    /// A missing or unreadable-as-JSON file starts empty; the next `complete`
    /// replaces it.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => match serde_json::from_str::<Map<String, Value>>(&contents) {
                Ok(values) => values,
                Err(e) => {
                    warn!("Ignoring invalid state file {}: {}", path.display(), e);
                    Map::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No state file at {}, using defaults", path.display());
                Map::new()
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        Ok(Self {
            path: Some(path),
            values: Mutex::new(values),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            values: Mutex::new(Map::new()),
        }
    }

    /// Whether the tour should be shown; true until it has been completed once
    pub fn show_onboarding(&self) -> bool {
        self.values
            .lock()
            .ok()
            .and_then(|values| values.get(SHOW_ONBOARDING_KEY).and_then(Value::as_bool))
            .unwrap_or(true)
    }

    /// Record that the tour was completed or skipped
    pub async fn complete(&self) -> Result<()> {
        let contents = {
            let mut values = self
                .values
                .lock()
                .map_err(|e| anyhow::anyhow!("Failed to lock onboarding state: {}", e))?;
            values.insert(SHOW_ONBOARDING_KEY.to_string(), Value::Bool(false));
            serde_json::to_string_pretty(&*values)?
        };

        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            // Stage beside the target, then rename over it
            let staging = path.with_extension("json.tmp");
            tokio::fs::write(&staging, contents)
                .await
                .with_context(|| format!("Failed to write {}", staging.display()))?;
            tokio::fs::rename(&staging, path)
                .await
                .with_context(|| format!("Failed to replace {}", path.display()))?;
        }

        info!("Onboarding completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_defaults_to_showing() {
        let dir = tempfile::tempdir().unwrap();
        let store = OnboardingStore::open(dir.path().join("state.json"))
            .await
            .unwrap();
        assert!(store.show_onboarding());
    }

    #[tokio::test]
    async fn completion_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let store = OnboardingStore::open(&path).await.unwrap();
        store.complete().await.unwrap();
        assert!(!store.show_onboarding());

        let reopened = OnboardingStore::open(&path).await.unwrap();
        assert!(!reopened.show_onboarding());
    }

    #[tokio::test]
    async fn other_keys_are_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        tokio::fs::write(&path, r#"{"theme":"dark"}"#).await.unwrap();

        let store = OnboardingStore::open(&path).await.unwrap();
        assert!(store.show_onboarding());
        store.complete().await.unwrap();

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        let values: Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(values["theme"], "dark");
        assert_eq!(values[SHOW_ONBOARDING_KEY], false);
    }

    #[tokio::test]
    async fn truncated_file_falls_back_to_showing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        tokio::fs::write(&path, "{\"showOnboarding\": fal").await.unwrap();

        let store = OnboardingStore::open(&path).await.unwrap();
        assert!(store.show_onboarding());

        store.complete().await.unwrap();
        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        let values: Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(values[SHOW_ONBOARDING_KEY], false);
    }

    #[tokio::test]
    async fn completion_leaves_no_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let store = OnboardingStore::open(&path).await.unwrap();
        store.complete().await.unwrap();
        store.complete().await.unwrap();

        let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names, vec!["state.json".to_string()]);
    }

    #[tokio::test]
    async fn in_memory_store_never_touches_disk() {
        let store = OnboardingStore::in_memory();
        store.complete().await.unwrap();
        assert!(!store.show_onboarding());
    }

    #[test]
    fn tour_starts_and_ends_unanchored() {
        assert!(TOUR_STEPS.first().unwrap().target.is_none());
        assert!(TOUR_STEPS.last().unwrap().target.is_none());
        assert_eq!(TOUR_STEPS[4].target, Some("onboarding-sound"));
    }
}
