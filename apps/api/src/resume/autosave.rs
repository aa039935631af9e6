//! Trailing-debounce autosave.
//!
//! A burst of edits produces one save, issued once `delay` has passed without a further
//! edit. Resets and reloads cancel a pending save.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::resume::store::{Change, ChangeKind, ResumeStore};

pub fn spawn_autosave(store: Arc<ResumeStore>, delay: Duration) -> JoinHandle<()> {
    let changes = store.subscribe();
    tokio::spawn(run(store, changes, delay))
}

async fn run(store: Arc<ResumeStore>, mut changes: watch::Receiver<Change>, delay: Duration) {
    loop {
        // Idle until an edit arrives.
        let mut seen = match next_change(&mut changes).await {
            Some(change) if change.kind == ChangeKind::Edit => change.revision,
            Some(_) => continue,
            None => return,
        };

        // Quiet period; every new edit restarts it.
        let fire = loop {
            tokio::select! {
                _ = tokio::time::sleep(delay) => break true,
                change = next_change(&mut changes) => match change {
                    Some(change) if change.kind == ChangeKind::Edit => seen = change.revision,
                    Some(_) => break false,
                    None => return,
                },
            }
        };

        if fire {
            store.autosave(seen).await;
        } else {
            debug!("Pending autosave cancelled");
        }
    }
}

async fn next_change(changes: &mut watch::Receiver<Change>) -> Option<Change> {
    changes.changed().await.ok()?;
    let change = *changes.borrow_and_update();
    Some(change)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::ResumeData;
    use crate::resume::mutations::Mutation;
    use crate::storage::persistence::{Persistence, RESUME_DATA_KEY};
    use crate::storage::{KeyValueStore, MemoryStore};

    const DELAY: Duration = Duration::from_secs(2);

    async fn start() -> (Arc<MemoryStore>, Arc<ResumeStore>) {
        let memory = Arc::new(MemoryStore::new());
        let (store, _) = ResumeStore::open(Persistence::new(memory.clone()), true).await;
        let store = Arc::new(store);
        spawn_autosave(store.clone(), DELAY);
        (memory, store)
    }

    async fn set_objective(store: &ResumeStore, text: &str) {
        store
            .apply(Mutation::UpdateObjective {
                objective: text.to_string(),
            })
            .await
            .unwrap();
    }

    fn stored_objective(memory: &MemoryStore) -> String {
        let raw = memory.get(RESUME_DATA_KEY).unwrap().unwrap();
        let resume: ResumeData = serde_json::from_str(&raw).unwrap();
        resume.objective
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_edits_saves_once() {
        let (memory, store) = start().await;

        for i in 1..=5 {
            set_objective(&store, &format!("draft {i}")).await;
            tokio::time::sleep(Duration::from_millis(300)).await;
        }
        assert_eq!(memory.writes(RESUME_DATA_KEY), 0);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(memory.writes(RESUME_DATA_KEY), 1);
        assert_eq!(stored_objective(&memory), "draft 5");
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_save_separately() {
        let (memory, store) = start().await;

        set_objective(&store, "first").await;
        tokio::time::sleep(Duration::from_secs(3)).await;
        set_objective(&store, "second").await;
        tokio::time::sleep(Duration::from_secs(3)).await;

        assert_eq!(memory.writes(RESUME_DATA_KEY), 2);
        assert_eq!(stored_objective(&memory), "second");
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_save_before_quiet_period() {
        let (memory, store) = start().await;

        set_objective(&store, "typing").await;
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(memory.writes(RESUME_DATA_KEY), 0);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(memory.writes(RESUME_DATA_KEY), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_cancels_pending_save() {
        let (memory, store) = start().await;

        set_objective(&store, "about to vanish").await;
        tokio::time::sleep(Duration::from_millis(500)).await;
        store.reset().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(memory.writes(RESUME_DATA_KEY), 0);
        assert!(memory.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_autosave_does_not_write() {
        let (memory, store) = start().await;
        store.set_autosave(false);

        set_objective(&store, "manual only").await;
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(memory.writes(RESUME_DATA_KEY), 0);

        store.save().await.unwrap();
        assert_eq!(memory.writes(RESUME_DATA_KEY), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reenabling_autosave_saves_offline_edits() {
        let (memory, store) = start().await;
        store.set_autosave(false);

        set_objective(&store, "offline edit").await;
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(memory.writes(RESUME_DATA_KEY), 0);

        store.set_autosave(true);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(memory.writes(RESUME_DATA_KEY), 0);
        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(memory.writes(RESUME_DATA_KEY), 1);
        assert_eq!(stored_objective(&memory), "offline edit");
    }

    #[tokio::test(start_paused = true)]
    async fn test_enabling_twice_schedules_once() {
        let (memory, store) = start().await;
        set_objective(&store, "saved").await;
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(memory.writes(RESUME_DATA_KEY), 1);

        store.set_autosave(true);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(memory.writes(RESUME_DATA_KEY), 1);
    }
}
