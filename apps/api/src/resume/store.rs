//! The session-scoped resume store.
//!
//! One `ResumeStore` owns the single in-memory `Resume` aggregate for one
//! editing session. It is explicitly constructed by the host when the
//! session opens (no process-wide singleton) and dropped when the session
//! closes. Mutations are synchronous and in-memory only; storage is touched
//! solely by the one-time `load()` and the explicit `save()`.
//!
//! Load and save share a single `SessionState` machine instead of the two
//! independent booleans the UI pattern suggests, so a save can never race an
//! in-flight load that is about to overwrite the aggregate.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{Education, Experience, PersonalInfoPatch, Resume};
use crate::storage::ResumeStorage;

/// Where the session currently is in its storage lifecycle. At most one
/// storage operation is in flight per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SessionState {
    Idle = 0,
    Loading = 1,
    Saving = 2,
}

pub struct ResumeStore {
    storage: Arc<dyn ResumeStorage>,
    /// Identity resolved by the host when the session opened. `None` means
    /// an anonymous session: loads are skipped and saves are rejected.
    user_id: Option<Uuid>,
    resume: Mutex<Resume>,
    state: AtomicU8,
}

impl ResumeStore {
    pub fn new(storage: Arc<dyn ResumeStorage>, user_id: Option<Uuid>) -> Self {
        Self {
            storage,
            user_id,
            resume: Mutex::new(Resume::default()),
            state: AtomicU8::new(SessionState::Idle as u8),
        }
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.user_id
    }

    /// A clone of the current aggregate.
    pub fn snapshot(&self) -> Resume {
        self.aggregate().clone()
    }

    pub fn state(&self) -> SessionState {
        match self.state.load(Ordering::SeqCst) {
            1 => SessionState::Loading,
            2 => SessionState::Saving,
            _ => SessionState::Idle,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state() == SessionState::Loading
    }

    pub fn is_saving(&self) -> bool {
        self.state() == SessionState::Saving
    }

    /// Loads the most-recently-updated persisted resume for this session's
    /// identity, replacing the in-memory aggregate. Best-effort: anonymous
    /// sessions and storage failures both leave the empty draft in place,
    /// and failures are only logged.
    pub async fn load(&self) {
        let Some(user_id) = self.user_id else {
            return; // anonymous sessions simply start empty
        };
        if !self.enter(SessionState::Loading) {
            return; // yield to whatever operation is already in flight
        }
        // the state is held until the result is applied, so a save entering
        // right after cannot snapshot the pre-load aggregate
        match self.storage.latest_resume_for_user(user_id).await {
            Ok(Some(row)) => {
                debug!(resume_id = %row.id, "loaded persisted resume");
                *self.aggregate() = row.into_resume();
            }
            Ok(None) => {} // nothing saved yet, keep the empty draft
            Err(e) => {
                // treated as "no resume yet"; the draft stays editable
                error!("Error loading resume: {e}");
            }
        }
        self.leave();
    }

    /// Persists the full aggregate. First successful save creates the row
    /// and adopts its server-assigned id; later saves update that row in
    /// place. Storage failures surface as `SaveFailed` and leave the
    /// in-memory aggregate (including a still-absent id) untouched.
    pub async fn save(&self) -> Result<(), AppError> {
        let Some(user_id) = self.user_id else {
            return Err(AppError::NotAuthenticated);
        };
        if !self.enter(SessionState::Saving) {
            return Err(AppError::Busy);
        }
        let snapshot = self.aggregate().clone();
        let result = match snapshot.id {
            Some(id) => self
                .storage
                .update_resume(id, user_id, &snapshot)
                .await
                .map(|()| None),
            None => self
                .storage
                .insert_resume(user_id, &snapshot)
                .await
                .map(|row| Some(row.id)),
        };
        // adopt the id before releasing the state, otherwise a concurrent
        // save could enter, snapshot `id: None`, and insert a second row
        let outcome = match result {
            Ok(Some(assigned)) => {
                info!(resume_id = %assigned, "resume created");
                self.aggregate().id = Some(assigned);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => {
                error!("Error saving resume: {e}");
                Err(AppError::SaveFailed)
            }
        };
        self.leave();
        outcome
    }

    pub fn update_title(&self, title: String) {
        self.aggregate().title = title;
    }

    pub fn update_personal_info(&self, patch: PersonalInfoPatch) {
        self.aggregate().personal_info.apply(patch);
    }

    pub fn update_experiences(&self, experiences: Vec<Experience>) {
        self.aggregate().experiences = experiences;
    }

    /// Appends a blank experience entry with a fresh item id.
    pub fn add_experience(&self) -> Experience {
        let entry = Experience::new();
        self.aggregate().experiences.push(entry.clone());
        entry
    }

    pub fn update_education(&self, education: Vec<Education>) {
        self.aggregate().education = education;
    }

    /// Appends a blank education entry with a fresh item id.
    pub fn add_education(&self) -> Education {
        let entry = Education::new();
        self.aggregate().education.push(entry.clone());
        entry
    }

    /// Replaces the skills list. Uniqueness is enforced here rather than at
    /// the call site: entries are trimmed, whitespace-only entries dropped,
    /// and duplicates after the first (case-sensitive) dropped, preserving
    /// first-insertion order.
    pub fn update_skills(&self, skills: Vec<String>) {
        self.aggregate().skills = normalize_skills(skills);
    }

    /// Adds one trimmed skill. Returns false (a no-op) for blank input or a
    /// skill already on the list.
    pub fn add_skill(&self, skill: &str) -> bool {
        let trimmed = skill.trim();
        if trimmed.is_empty() {
            return false;
        }
        let mut resume = self.aggregate();
        if resume.skills.iter().any(|s| s == trimmed) {
            return false;
        }
        resume.skills.push(trimmed.to_string());
        true
    }

    pub fn update_template(&self, template_id: Option<Uuid>) {
        self.aggregate().template_id = template_id;
    }

    pub fn update_published(&self, is_published: bool) {
        self.aggregate().is_published = is_published;
    }

    fn aggregate(&self) -> MutexGuard<'_, Resume> {
        // mutations are sync and never hold the lock across an await
        self.resume.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claims the state machine for one storage operation. False when
    /// another operation is already in flight.
    fn enter(&self, target: SessionState) -> bool {
        self.state
            .compare_exchange(
                SessionState::Idle as u8,
                target as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok()
    }

    fn leave(&self) {
        self.state
            .store(SessionState::Idle as u8, Ordering::SeqCst);
    }
}

fn normalize_skills(skills: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(skills.len());
    for skill in skills {
        let trimmed = skill.trim();
        if trimmed.is_empty() {
            continue;
        }
        if out.iter().any(|s| s == trimmed) {
            continue;
        }
        out.push(trimmed.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{ResumeRow, DEFAULT_RESUME_TITLE};
    use crate::storage::mock::MockStorage;
    use chrono::{Duration, Utc};
    use serde_json::json;
    use std::sync::atomic::Ordering as AtomicOrdering;
    use tokio::sync::Notify;

    fn store_with(storage: Arc<MockStorage>, user_id: Option<Uuid>) -> ResumeStore {
        ResumeStore::new(storage, user_id)
    }

    fn row_for(user_id: Uuid, title: &str, age: Duration) -> ResumeRow {
        let at = Utc::now() - age;
        ResumeRow {
            id: Uuid::new_v4(),
            user_id,
            title: title.to_string(),
            personal_info: json!({}),
            experiences: json!([]),
            education: json!([]),
            skills: json!([]),
            template_id: None,
            is_published: false,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_update_skills_dedups_preserving_first_insertion_order() {
        let store = store_with(Arc::new(MockStorage::new()), None);
        store.update_skills(vec![
            "Go".to_string(),
            "Rust".to_string(),
            "Go".to_string(),
            "  ".to_string(),
            "SQL".to_string(),
            "Rust".to_string(),
        ]);
        assert_eq!(store.snapshot().skills, vec!["Go", "Rust", "SQL"]);
    }

    #[test]
    fn test_update_skills_is_case_sensitive() {
        let store = store_with(Arc::new(MockStorage::new()), None);
        store.update_skills(vec!["go".to_string(), "Go".to_string()]);
        assert_eq!(store.snapshot().skills, vec!["go", "Go"]);
    }

    #[test]
    fn test_add_skill_trims_and_rejects_blank_and_duplicate() {
        let store = store_with(Arc::new(MockStorage::new()), None);
        assert!(store.add_skill("  Rust  "));
        assert!(!store.add_skill("Rust"));
        assert!(!store.add_skill("   "));
        assert!(store.add_skill("Go"));
        assert_eq!(store.snapshot().skills, vec!["Rust", "Go"]);
    }

    #[test]
    fn test_added_entries_get_distinct_ids() {
        let store = store_with(Arc::new(MockStorage::new()), None);
        let a = store.add_experience();
        let b = store.add_experience();
        let c = store.add_education();
        assert_ne!(a.id, b.id);
        assert_ne!(b.id, c.id);
        assert_eq!(store.snapshot().experiences.len(), 2);
        assert_eq!(store.snapshot().education.len(), 1);
    }

    #[test]
    fn test_personal_info_patch_merges() {
        let store = store_with(Arc::new(MockStorage::new()), None);
        store.update_personal_info(PersonalInfoPatch {
            full_name: Some("Jane Doe".to_string()),
            ..Default::default()
        });
        store.update_personal_info(PersonalInfoPatch {
            email: Some("jane@example.com".to_string()),
            ..Default::default()
        });
        let info = store.snapshot().personal_info;
        assert_eq!(info.full_name, "Jane Doe");
        assert_eq!(info.email, "jane@example.com");
    }

    #[tokio::test]
    async fn test_anonymous_save_is_rejected_without_storage_call() {
        let storage = Arc::new(MockStorage::new());
        let store = store_with(storage.clone(), None);
        store.update_title("Draft".to_string());

        let err = store.save().await.unwrap_err();
        assert!(matches!(err, AppError::NotAuthenticated));
        assert_eq!(storage.insert_calls.load(AtomicOrdering::SeqCst), 0);
        assert_eq!(storage.update_calls.load(AtomicOrdering::SeqCst), 0);
        assert_eq!(store.snapshot().title, "Draft");
    }

    #[tokio::test]
    async fn test_anonymous_load_is_a_no_op() {
        let storage = Arc::new(MockStorage::new());
        let store = store_with(storage.clone(), None);
        store.load().await;
        assert_eq!(storage.read_calls.load(AtomicOrdering::SeqCst), 0);
        assert_eq!(store.snapshot(), Resume::default());
    }

    #[tokio::test]
    async fn test_first_save_creates_then_second_save_updates_same_id() {
        let storage = Arc::new(MockStorage::new());
        let user = Uuid::new_v4();
        let store = store_with(storage.clone(), Some(user));

        assert!(store.snapshot().id.is_none());
        store.save().await.unwrap();
        let adopted = store.snapshot().id.expect("id adopted after create");

        store.update_title("Updated".to_string());
        store.save().await.unwrap();
        assert_eq!(store.snapshot().id, Some(adopted));

        assert_eq!(storage.insert_calls.load(AtomicOrdering::SeqCst), 1);
        assert_eq!(storage.update_calls.load(AtomicOrdering::SeqCst), 1);
        assert_eq!(storage.rows.lock().unwrap().len(), 1);
        assert_eq!(storage.rows.lock().unwrap()[0].title, "Updated");
    }

    #[tokio::test]
    async fn test_failed_create_does_not_adopt_an_id() {
        let storage = Arc::new(MockStorage {
            fail_writes: true,
            ..MockStorage::new()
        });
        let store = store_with(storage, Some(Uuid::new_v4()));
        store.update_title("Kept".to_string());

        let err = store.save().await.unwrap_err();
        assert!(matches!(err, AppError::SaveFailed));
        // in-memory data is never lost and no id is adopted
        let resume = store.snapshot();
        assert!(resume.id.is_none());
        assert_eq!(resume.title, "Kept");
    }

    #[tokio::test]
    async fn test_load_picks_most_recently_updated_row() {
        let storage = Arc::new(MockStorage::new());
        let user = Uuid::new_v4();
        storage
            .rows
            .lock()
            .unwrap()
            .push(row_for(user, "Older", Duration::hours(2)));
        storage
            .rows
            .lock()
            .unwrap()
            .push(row_for(user, "Newer", Duration::hours(1)));

        let store = store_with(storage, Some(user));
        store.load().await;
        assert_eq!(store.snapshot().title, "Newer");
    }

    #[tokio::test]
    async fn test_load_ignores_other_users_rows() {
        let storage = Arc::new(MockStorage::new());
        let user = Uuid::new_v4();
        storage
            .rows
            .lock()
            .unwrap()
            .push(row_for(Uuid::new_v4(), "Someone else's", Duration::zero()));

        let store = store_with(storage, Some(user));
        store.load().await;
        assert_eq!(store.snapshot().title, DEFAULT_RESUME_TITLE);
    }

    #[tokio::test]
    async fn test_load_failure_leaves_the_draft_unchanged() {
        let storage = Arc::new(MockStorage {
            fail_reads: true,
            ..MockStorage::new()
        });
        let store = store_with(storage, Some(Uuid::new_v4()));
        store.load().await;
        assert_eq!(store.snapshot(), Resume::default());
        assert_eq!(store.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips_the_aggregate() {
        let storage = Arc::new(MockStorage::new());
        let user = Uuid::new_v4();

        let store = store_with(storage.clone(), Some(user));
        store.update_personal_info(PersonalInfoPatch {
            full_name: Some("Jane Doe".to_string()),
            summary: Some("Systems engineer.".to_string()),
            ..Default::default()
        });
        store.update_experiences(vec![Experience {
            id: "1700000000000".to_string(),
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            duration: "2020 - 2024".to_string(),
            description: "Built things.".to_string(),
        }]);
        store.update_skills(vec!["Rust".to_string(), "SQL".to_string()]);
        store.save().await.unwrap();

        let reopened = store_with(storage, Some(user));
        reopened.load().await;
        assert_eq!(reopened.snapshot(), store.snapshot());
    }

    #[tokio::test]
    async fn test_save_is_refused_while_another_save_is_in_flight() {
        let storage = Arc::new(MockStorage {
            write_gate: Some(Notify::new()),
            ..MockStorage::new()
        });
        let store = Arc::new(store_with(storage.clone(), Some(Uuid::new_v4())));

        let background = store.clone();
        let first = tokio::spawn(async move { background.save().await });
        while !store.is_saving() {
            tokio::task::yield_now().await;
        }

        let err = store.save().await.unwrap_err();
        assert!(matches!(err, AppError::Busy));

        // edits stay independent of the in-flight save
        assert!(store.add_skill("Rust"));

        if let Some(gate) = &storage.write_gate {
            gate.notify_one();
        }
        first.await.unwrap().unwrap();
        assert_eq!(store.state(), SessionState::Idle);
        assert!(store.snapshot().id.is_some());
    }

    #[tokio::test]
    async fn test_save_is_refused_while_a_load_is_in_flight() {
        let storage = Arc::new(MockStorage {
            read_gate: Some(Notify::new()),
            ..MockStorage::new()
        });
        let store = Arc::new(store_with(storage.clone(), Some(Uuid::new_v4())));

        let background = store.clone();
        let load = tokio::spawn(async move { background.load().await });
        while !store.is_loading() {
            tokio::task::yield_now().await;
        }

        let err = store.save().await.unwrap_err();
        assert!(matches!(err, AppError::Busy));
        assert_eq!(storage.insert_calls.load(AtomicOrdering::SeqCst), 0);

        if let Some(gate) = &storage.read_gate {
            gate.notify_one();
        }
        load.await.unwrap();
        assert_eq!(store.state(), SessionState::Idle);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_saves_never_duplicate_the_row() {
        let storage = Arc::new(MockStorage::new());
        let store = Arc::new(store_with(storage.clone(), Some(Uuid::new_v4())));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let racing = store.clone();
            handles.push(tokio::spawn(async move { racing.save().await }));
        }
        for handle in handles {
            // losers of the state machine are rejected as Busy; that's fine
            let _ = handle.await.unwrap();
        }
        store.save().await.unwrap();

        // whoever won the create adopted the id before releasing the state,
        // so every later save was an update of the same row
        assert_eq!(storage.insert_calls.load(AtomicOrdering::SeqCst), 1);
        assert_eq!(storage.rows.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_load_yields_while_a_save_is_in_flight() {
        let storage = Arc::new(MockStorage {
            write_gate: Some(Notify::new()),
            ..MockStorage::new()
        });
        let store = Arc::new(store_with(storage.clone(), Some(Uuid::new_v4())));
        store.update_title("Local edits".to_string());

        let background = store.clone();
        let save = tokio::spawn(async move { background.save().await });
        while !store.is_saving() {
            tokio::task::yield_now().await;
        }

        // the yielded load must not touch the aggregate
        store.load().await;
        assert_eq!(store.snapshot().title, "Local edits");
        assert_eq!(storage.read_calls.load(AtomicOrdering::SeqCst), 0);

        if let Some(gate) = &storage.write_gate {
            gate.notify_one();
        }
        save.await.unwrap().unwrap();
    }
}
