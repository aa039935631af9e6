use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::models::resume::ResumeData;
use crate::models::settings::ResumeSettings;
use crate::resume::merge::{resume_from_value, settings_from_value};
use crate::storage::{KeyValueStore, StorageError};

pub const RESUME_DATA_KEY: &str = "quickcv_resumeData";
pub const RESUME_SETTINGS_KEY: &str = "quickcv_resumeSettings";
pub const LAST_SAVED_KEY: &str = "quickcv_lastSaved";

const KEYS: [&str; 3] = [RESUME_DATA_KEY, RESUME_SETTINGS_KEY, LAST_SAVED_KEY];

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to serialize resume: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoredPart {
    Resume,
    Settings,
    LastSaved,
}

/// Something that went wrong while restoring; the affected part fell back to defaults.
#[derive(Debug, Clone, Serialize)]
pub struct LoadWarning {
    pub part: StoredPart,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub resume: ResumeData,
    pub settings: ResumeSettings,
    pub last_saved: Option<DateTime<Utc>>,
    pub warnings: Vec<LoadWarning>,
}

impl LoadOutcome {
    /// Defaults for everything, used when storage could not be consulted at all.
    pub fn unavailable(message: String) -> Self {
        Self {
            resume: ResumeData::default(),
            settings: ResumeSettings::default(),
            last_saved: None,
            warnings: vec![LoadWarning {
                part: StoredPart::Resume,
                message,
            }],
        }
    }
}

/// Saves and restores the resume and its settings under three fixed keys.
#[derive(Clone)]
pub struct Persistence {
    store: Arc<dyn KeyValueStore>,
}

impl Persistence {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Writes document, settings and timestamp. On failure the previously stored values
    /// are put back, so a failed save never leaves a mix of old and new state.
    pub fn save(
        &self,
        resume: &ResumeData,
        settings: &ResumeSettings,
    ) -> Result<DateTime<Utc>, PersistError> {
        let saved_at = Utc::now();
        let values = [
            serde_json::to_string(resume)?,
            serde_json::to_string(settings)?,
            saved_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        ];

        // A previous value that cannot be read is not worth keeping; rollback removes it.
        let previous: Vec<Option<String>> = KEYS
            .iter()
            .map(|key| match self.store.get(key) {
                Ok(value) => value,
                Err(e) => {
                    warn!("Previous '{key}' is unreadable and will not be restored: {e}");
                    None
                }
            })
            .collect();

        for (i, (key, value)) in KEYS.iter().zip(values.iter()).enumerate() {
            if let Err(e) = self.store.set(key, value) {
                error!("Saving '{key}' failed: {e}; restoring previous state");
                self.restore(&KEYS[..i], &previous[..i]);
                return Err(e.into());
            }
        }

        info!("Resume saved at {}", values[2]);
        Ok(saved_at)
    }

    fn restore(&self, keys: &[&str], previous: &[Option<String>]) {
        for (key, value) in keys.iter().zip(previous) {
            let result = match value {
                Some(value) => self.store.set(key, value),
                None => self.store.remove(key),
            };
            if let Err(e) = result {
                error!("Could not restore '{key}' after failed save: {e}");
            }
        }
    }

    /// Reads both parts independently. Never fails: missing parts take their defaults and
    /// unreadable parts are reported in `warnings` and replaced by defaults.
    pub fn load(&self) -> LoadOutcome {
        let mut warnings = Vec::new();

        let resume = match self.read_part(RESUME_DATA_KEY, StoredPart::Resume, &mut warnings) {
            Some(value) => {
                let mut notes = Vec::new();
                let resume = resume_from_value(value, &mut notes);
                push_notes(&mut warnings, StoredPart::Resume, notes);
                resume
            }
            None => ResumeData::default(),
        };

        let settings = match self.read_part(RESUME_SETTINGS_KEY, StoredPart::Settings, &mut warnings) {
            Some(value) => {
                let mut notes = Vec::new();
                let settings = settings_from_value(value, &mut notes);
                push_notes(&mut warnings, StoredPart::Settings, notes);
                settings
            }
            None => ResumeSettings::default(),
        };

        let last_saved = match self.store.get(LAST_SAVED_KEY) {
            Ok(Some(raw)) => match DateTime::parse_from_rfc3339(raw.trim()) {
                Ok(at) => Some(at.with_timezone(&Utc)),
                Err(e) => {
                    warnings.push(LoadWarning {
                        part: StoredPart::LastSaved,
                        message: format!("unreadable timestamp '{raw}': {e}"),
                    });
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warnings.push(LoadWarning {
                    part: StoredPart::LastSaved,
                    message: e.to_string(),
                });
                None
            }
        };

        for warning in &warnings {
            warn!("Load {:?}: {}", warning.part, warning.message);
        }

        LoadOutcome {
            resume,
            settings,
            last_saved,
            warnings,
        }
    }

    fn read_part(
        &self,
        key: &str,
        part: StoredPart,
        warnings: &mut Vec<LoadWarning>,
    ) -> Option<serde_json::Value> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warnings.push(LoadWarning {
                    part,
                    message: format!("could not read saved data: {e}"),
                });
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warnings.push(LoadWarning {
                    part,
                    message: format!("saved data is corrupt, starting fresh: {e}"),
                });
                None
            }
        }
    }

    /// Removes everything this adapter has stored.
    pub fn purge(&self) -> Result<(), PersistError> {
        for key in KEYS {
            self.store.remove(key)?;
        }
        info!("Saved resume data purged");
        Ok(())
    }
}

fn push_notes(warnings: &mut Vec<LoadWarning>, part: StoredPart, notes: Vec<String>) {
    warnings.extend(notes.into_iter().map(|message| LoadWarning { part, message }));
}
