use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::format_document;
use crate::errors::AppError;
use crate::models::resume::{Education, Experience, PersonalInfoPatch, Resume};
use crate::resume::store::ResumeStore;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenSessionRequest {
    /// Identity of the current user, or absent for an anonymous session.
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session_id: Uuid,
    pub user_id: Option<Uuid>,
    pub resume: Resume,
    pub loading: bool,
    pub saving: bool,
}

impl SessionView {
    fn of(session_id: Uuid, store: &ResumeStore) -> Self {
        Self {
            session_id,
            user_id: store.user_id(),
            resume: store.snapshot(),
            loading: store.is_loading(),
            saving: store.is_saving(),
        }
    }
}

async fn session(state: &AppState, session_id: Uuid) -> Result<Arc<ResumeStore>, AppError> {
    state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))
}

/// POST /api/v1/sessions
///
/// Opens an editing session: constructs a store bound to the (optional)
/// identity and performs the one-time best-effort load.
pub async fn handle_open_session(
    State(state): State<AppState>,
    Json(req): Json<OpenSessionRequest>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let store = Arc::new(ResumeStore::new(state.storage.clone(), req.user_id));
    store.load().await;
    let session_id = state.sessions.open(store.clone()).await;
    Ok((StatusCode::CREATED, Json(SessionView::of(session_id, &store))))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let store = session(&state, session_id).await?;
    Ok(Json(SessionView::of(session_id, &store)))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_close_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.close(session_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {session_id} not found")))
    }
}

/// PUT /api/v1/sessions/:id/personal-info
pub async fn handle_update_personal_info(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(patch): Json<PersonalInfoPatch>,
) -> Result<Json<Resume>, AppError> {
    let store = session(&state, session_id).await?;
    store.update_personal_info(patch);
    Ok(Json(store.snapshot()))
}

/// PUT /api/v1/sessions/:id/experiences
pub async fn handle_update_experiences(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(experiences): Json<Vec<Experience>>,
) -> Result<Json<Resume>, AppError> {
    let store = session(&state, session_id).await?;
    store.update_experiences(experiences);
    Ok(Json(store.snapshot()))
}

/// POST /api/v1/sessions/:id/experiences
///
/// Appends a blank entry with a server-assigned item id, the "add
/// experience" button flow.
pub async fn handle_add_experience(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Resume>, AppError> {
    let store = session(&state, session_id).await?;
    store.add_experience();
    Ok(Json(store.snapshot()))
}

/// PUT /api/v1/sessions/:id/education
pub async fn handle_update_education(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(education): Json<Vec<Education>>,
) -> Result<Json<Resume>, AppError> {
    let store = session(&state, session_id).await?;
    store.update_education(education);
    Ok(Json(store.snapshot()))
}

/// POST /api/v1/sessions/:id/education
pub async fn handle_add_education(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Resume>, AppError> {
    let store = session(&state, session_id).await?;
    store.add_education();
    Ok(Json(store.snapshot()))
}

/// PUT /api/v1/sessions/:id/skills
pub async fn handle_update_skills(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(skills): Json<Vec<String>>,
) -> Result<Json<Resume>, AppError> {
    let store = session(&state, session_id).await?;
    store.update_skills(skills);
    Ok(Json(store.snapshot()))
}

#[derive(Debug, Deserialize)]
pub struct AddSkillRequest {
    pub skill: String,
}

/// POST /api/v1/sessions/:id/skills
///
/// Single-skill add, mirroring the "type one skill and press enter" flow.
/// A duplicate is a silent no-op; blank input is a validation error.
pub async fn handle_add_skill(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<AddSkillRequest>,
) -> Result<Json<Resume>, AppError> {
    if req.skill.trim().is_empty() {
        return Err(AppError::Validation("skill must not be blank".to_string()));
    }
    let store = session(&state, session_id).await?;
    store.add_skill(&req.skill);
    Ok(Json(store.snapshot()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSelection {
    pub template_id: Option<Uuid>,
}

/// PUT /api/v1/sessions/:id/template
pub async fn handle_update_template(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(selection): Json<TemplateSelection>,
) -> Result<Json<Resume>, AppError> {
    let store = session(&state, session_id).await?;
    store.update_template(selection.template_id);
    Ok(Json(store.snapshot()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishUpdate {
    pub is_published: bool,
}

/// PUT /api/v1/sessions/:id/published
pub async fn handle_update_published(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(update): Json<PublishUpdate>,
) -> Result<Json<Resume>, AppError> {
    let store = session(&state, session_id).await?;
    store.update_published(update.is_published);
    Ok(Json(store.snapshot()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleUpdate {
    pub title: String,
}

/// PUT /api/v1/sessions/:id/title
pub async fn handle_update_title(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(update): Json<TitleUpdate>,
) -> Result<Json<Resume>, AppError> {
    let store = session(&state, session_id).await?;
    store.update_title(update.title);
    Ok(Json(store.snapshot()))
}

/// POST /api/v1/sessions/:id/save
pub async fn handle_save_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let store = session(&state, session_id).await?;
    store.save().await?;
    Ok(Json(SessionView::of(session_id, &store)))
}

/// GET /api/v1/sessions/:id/document
///
/// The printable export: a self-contained HTML document the client hands to
/// the browser's print dialog.
pub async fn handle_export_document(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let store = session(&state, session_id).await?;
    Ok(Html(format_document(&store.snapshot())))
}
