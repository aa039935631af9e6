use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{watch, RwLock};
use tracing::{debug, error, info, warn};

use crate::models::resume::ResumeData;
use crate::models::settings::ResumeSettings;
use crate::resume::mutations::{Mutation, MutationError};
use crate::storage::persistence::{LoadOutcome, LoadWarning, PersistError, Persistence};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeState {
    pub resume: ResumeData,
    pub settings: ResumeSettings,
    pub last_saved: Option<DateTime<Utc>>,
}

/// Problems the user has not been told about through a request of their own.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notices {
    /// Parts of the stored resume that were unreadable at the last load.
    pub load_warnings: Vec<LoadWarning>,
    /// Why the most recent autosave failed; cleared by the next successful save.
    pub autosave_error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Document or settings edited; schedules an autosave.
    Edit,
    /// Everything restored to defaults and storage purged.
    Reset,
    /// State replaced from storage.
    Loaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Change {
    pub revision: u64,
    pub kind: ChangeKind,
}

/// Owns the one live resume. Writers queue on the lock, so edits apply one at a time,
/// and each applied change is announced on a watch channel.
///
/// Storage access runs on the blocking pool while the write lock is held, so a save
/// always records exactly the state it wrote.
pub struct ResumeStore {
    state: RwLock<ResumeState>,
    persistence: Persistence,
    changes: watch::Sender<Change>,
    autosave: AtomicBool,
    /// Revision of the latest reset or reload.
    discarded_at: AtomicU64,
    notices: Mutex<Notices>,
}

impl ResumeStore {
    /// Restores the last saved resume, or starts from defaults.
    pub async fn open(persistence: Persistence, autosave: bool) -> (Self, LoadOutcome) {
        let outcome = load_blocking(&persistence).await;
        if let Some(at) = outcome.last_saved {
            info!("Restored resume saved at {at}");
        }
        let state = ResumeState {
            resume: outcome.resume.clone(),
            settings: outcome.settings.clone(),
            last_saved: outcome.last_saved,
        };
        let (changes, _) = watch::channel(Change {
            revision: 0,
            kind: ChangeKind::Loaded,
        });
        let store = Self {
            state: RwLock::new(state),
            persistence,
            changes,
            autosave: AtomicBool::new(autosave),
            discarded_at: AtomicU64::new(0),
            notices: Mutex::new(Notices {
                load_warnings: outcome.warnings.clone(),
                autosave_error: None,
            }),
        };
        (store, outcome)
    }

    pub async fn snapshot(&self) -> ResumeState {
        self.state.read().await.clone()
    }

    pub fn notices(&self) -> Notices {
        self.notices_mut().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Change> {
        self.changes.subscribe()
    }

    pub async fn apply(&self, mutation: Mutation) -> Result<ResumeData, MutationError> {
        let mut state = self.state.write().await;
        let next = state.resume.apply(mutation)?;
        state.resume = next.clone();
        self.publish(ChangeKind::Edit);
        Ok(next)
    }

    /// Replaces the settings with `f(current)`.
    pub async fn update_settings(
        &self,
        f: impl FnOnce(&ResumeSettings) -> ResumeSettings,
    ) -> ResumeSettings {
        let mut state = self.state.write().await;
        let next = f(&state.settings);
        state.settings = next.clone();
        self.publish(ChangeKind::Edit);
        next
    }

    /// Restores both structures to defaults and purges storage. The in-memory reset
    /// happens even if purging fails.
    pub async fn reset(&self) -> Result<(), PersistError> {
        let mut state = self.state.write().await;
        *state = ResumeState {
            resume: ResumeData::default(),
            settings: ResumeSettings::default(),
            last_saved: None,
        };
        self.publish(ChangeKind::Reset);
        *self.notices_mut() = Notices::default();
        info!("Resume reset to defaults");

        let persistence = self.persistence.clone();
        tokio::task::spawn_blocking(move || persistence.purge()).await?
    }

    pub async fn save(&self) -> Result<DateTime<Utc>, PersistError> {
        let mut state = self.state.write().await;
        self.write_snapshot(&mut state).await
    }

    /// Saves on behalf of the autosave task, which last saw revision `seen`. Skipped when
    /// a reset or reload happened since then, or when autosave is off.
    pub async fn autosave(&self, seen: u64) {
        let mut state = self.state.write().await;
        if self.discarded_at.load(Ordering::Acquire) > seen {
            debug!("Autosave for revision {seen} dropped by a later reset or reload");
            return;
        }
        if !self.autosave_enabled() {
            debug!("Autosave disabled, skipping");
            return;
        }
        if let Err(e) = self.write_snapshot(&mut state).await {
            warn!("Autosave failed: {e}");
            self.notices_mut().autosave_error = Some(e.to_string());
        }
    }

    /// Re-reads storage, replacing the live state.
    pub async fn reload(&self) -> LoadOutcome {
        let mut state = self.state.write().await;
        let outcome = load_blocking(&self.persistence).await;
        *state = ResumeState {
            resume: outcome.resume.clone(),
            settings: outcome.settings.clone(),
            last_saved: outcome.last_saved,
        };
        self.publish(ChangeKind::Loaded);
        self.notices_mut().load_warnings = outcome.warnings.clone();
        outcome
    }

    pub fn autosave_enabled(&self) -> bool {
        self.autosave.load(Ordering::Relaxed)
    }

    /// Turning autosave back on schedules a save of whatever was edited while it was off.
    pub fn set_autosave(&self, enabled: bool) {
        let was_enabled = self.autosave.swap(enabled, Ordering::Relaxed);
        info!("Autosave {}", if enabled { "enabled" } else { "disabled" });
        if enabled && !was_enabled {
            self.publish(ChangeKind::Edit);
        }
    }

    async fn write_snapshot(&self, state: &mut ResumeState) -> Result<DateTime<Utc>, PersistError> {
        let persistence = self.persistence.clone();
        let resume = state.resume.clone();
        let settings = state.settings.clone();
        let saved_at =
            tokio::task::spawn_blocking(move || persistence.save(&resume, &settings)).await??;
        state.last_saved = Some(saved_at);
        self.notices_mut().autosave_error = None;
        Ok(saved_at)
    }

    fn publish(&self, kind: ChangeKind) {
        self.changes.send_modify(|change| {
            change.revision += 1;
            change.kind = kind;
            if kind != ChangeKind::Edit {
                self.discarded_at.store(change.revision, Ordering::Release);
            }
        });
    }

    fn notices_mut(&self) -> MutexGuard<'_, Notices> {
        self.notices.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn load_blocking(persistence: &Persistence) -> LoadOutcome {
    let persistence = persistence.clone();
    match tokio::task::spawn_blocking(move || persistence.load()).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("spawn_blocking failed loading resume: {e}");
            LoadOutcome::unavailable(format!("could not read saved data: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::resume::{EducationDraft, PersonalInfo, DEFAULT_SKILL_CATEGORIES};
    use crate::storage::persistence::{RESUME_DATA_KEY, RESUME_SETTINGS_KEY};
    use crate::storage::{FileStore, KeyValueStore, MemoryStore};

    async fn open_store() -> (Arc<MemoryStore>, ResumeStore) {
        let memory = Arc::new(MemoryStore::new());
        let (store, _) = ResumeStore::open(Persistence::new(memory.clone()), true).await;
        (memory, store)
    }

    async fn set_objective(store: &ResumeStore, text: &str) -> u64 {
        store
            .apply(Mutation::UpdateObjective {
                objective: text.to_string(),
            })
            .await
            .unwrap();
        store.subscribe().borrow().revision
    }

    #[tokio::test]
    async fn test_apply_publishes_edit() {
        let (_, store) = open_store().await;
        let mut changes = store.subscribe();

        store
            .apply(Mutation::UpdateObjective {
                objective: "Hello".to_string(),
            })
            .await
            .unwrap();

        assert!(changes.has_changed().unwrap());
        let change = *changes.borrow_and_update();
        assert_eq!(change.kind, ChangeKind::Edit);
        assert_eq!(change.revision, 1);
        assert_eq!(store.snapshot().await.resume.objective, "Hello");
    }

    #[tokio::test]
    async fn test_failed_mutation_changes_nothing() {
        let (_, store) = open_store().await;
        let changes = store.subscribe();
        let before = store.snapshot().await;

        let result = store
            .apply(Mutation::RemoveSkillCategory { index: 42 })
            .await;
        assert!(result.is_err());
        assert_eq!(store.snapshot().await, before);
        assert!(!changes.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_save_then_reopen() {
        let (memory, store) = open_store().await;
        store
            .apply(Mutation::AddEducation {
                education: EducationDraft {
                    degree: "B.Sc".to_string(),
                    ..Default::default()
                },
            })
            .await
            .unwrap();
        store.update_settings(|s| s.with_smaller_text()).await;
        let saved_at = store.save().await.unwrap();
        assert_eq!(store.snapshot().await.last_saved, Some(saved_at));

        let (reopened, outcome) = ResumeStore::open(Persistence::new(memory), true).await;
        assert!(outcome.warnings.is_empty());
        let state = reopened.snapshot().await;
        assert_eq!(state.resume.education[0].degree, "B.Sc");
        assert_eq!(state.settings.text_scale, 0.9);
    }

    #[tokio::test]
    async fn test_reset_restores_defaults_and_purges() {
        let (memory, store) = open_store().await;
        store
            .apply(Mutation::UpdateObjective {
                objective: "Old".to_string(),
            })
            .await
            .unwrap();
        store.save().await.unwrap();

        store.reset().await.unwrap();
        assert!(memory.is_empty());
        let state = store.snapshot().await;
        assert_eq!(state.resume.objective, "");
        assert_eq!(state.settings, ResumeSettings::default());
        assert!(state.last_saved.is_none());

        let outcome = store.reload().await;
        assert_eq!(outcome.resume.objective, "");
        assert_eq!(outcome.resume.personal, PersonalInfo::default());
        assert!(outcome.resume.education.is_empty());
        assert!(outcome.resume.experience.is_empty());
        assert!(outcome.resume.projects.is_empty());
        assert!(outcome.resume.certifications.is_empty());
        assert!(outcome.resume.achievements.is_empty());
        let labels: Vec<&str> = outcome
            .resume
            .skills
            .iter()
            .map(|c| c.category.as_str())
            .collect();
        assert_eq!(labels, DEFAULT_SKILL_CATEGORIES);
        assert!(outcome
            .resume
            .skills
            .iter()
            .all(|c| c.protected && c.skills.is_empty()));
        assert_eq!(outcome.settings, ResumeSettings::default());
        assert!(outcome.last_saved.is_none());
    }

    #[tokio::test]
    async fn test_autosave_scheduled_before_reset_is_dropped() {
        let (memory, store) = open_store().await;
        let seen = set_objective(&store, "before reset").await;
        store.reset().await.unwrap();

        store.autosave(seen).await;
        assert!(memory.is_empty());

        let seen = set_objective(&store, "after reset").await;
        store.autosave(seen).await;
        assert_eq!(memory.writes(RESUME_DATA_KEY), 1);
    }

    #[tokio::test]
    async fn test_failed_autosave_is_kept_until_next_save() {
        let (memory, store) = open_store().await;
        memory.reject_writes_to(RESUME_DATA_KEY);
        let seen = set_objective(&store, "will not fit").await;

        store.autosave(seen).await;
        assert!(store.notices().autosave_error.is_some());

        memory.reject_writes_to("some_other_key");
        store.save().await.unwrap();
        assert!(store.notices().autosave_error.is_none());
    }

    #[tokio::test]
    async fn test_load_warnings_are_kept() {
        let memory = Arc::new(MemoryStore::new());
        memory.set(RESUME_SETTINGS_KEY, "{broken").unwrap();
        let (store, outcome) = ResumeStore::open(Persistence::new(memory), true).await;
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(store.notices().load_warnings.len(), 1);

        store.reset().await.unwrap();
        assert!(store.notices().load_warnings.is_empty());
    }

    #[tokio::test]
    async fn test_file_backed_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = Persistence::new(Arc::new(FileStore::new(dir.path())));
        let (store, _) = ResumeStore::open(persistence, true).await;
        set_objective(&store, "on disk").await;
        store.save().await.unwrap();

        set_objective(&store, "not saved").await;
        let outcome = store.reload().await;
        assert_eq!(outcome.resume.objective, "on disk");
        assert_eq!(store.snapshot().await.resume.objective, "on disk");

        store.reset().await.unwrap();
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn test_autosave_toggle() {
        let (_, store) = open_store().await;
        assert!(store.autosave_enabled());
        store.set_autosave(false);
        assert!(!store.autosave_enabled());
    }
}
