//! Registry of live editing sessions.
//!
//! One explicitly constructed `ResumeStore` per session, keyed by a session
//! id the host hands back to the client. Closing a session drops the store
//! and its aggregate; there is no other destroy path.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::resume::store::ResumeStore;

#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<Uuid, Arc<ResumeStore>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a freshly constructed store and returns its session id.
    pub async fn open(&self, store: Arc<ResumeStore>) -> Uuid {
        let session_id = Uuid::new_v4();
        self.sessions.lock().await.insert(session_id, store);
        session_id
    }

    pub async fn get(&self, session_id: Uuid) -> Option<Arc<ResumeStore>> {
        self.sessions.lock().await.get(&session_id).cloned()
    }

    /// Removes the session, discarding its aggregate. Returns whether the
    /// session existed. An in-flight save keeps running unobserved.
    pub async fn close(&self, session_id: Uuid) -> bool {
        self.sessions.lock().await.remove(&session_id).is_some()
    }
}
