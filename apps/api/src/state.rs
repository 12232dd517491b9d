use std::sync::Arc;

use crate::resume::sessions::SessionRegistry;
use crate::storage::ResumeStorage;
use crate::templates::TemplateCatalog;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Storage collaborator behind a trait so tests run against an
    /// in-memory backend.
    pub storage: Arc<dyn ResumeStorage>,
    /// Template catalog loaded once at startup, best-effort.
    pub templates: Arc<TemplateCatalog>,
    /// Live editing sessions, one store per session.
    pub sessions: Arc<SessionRegistry>,
}
