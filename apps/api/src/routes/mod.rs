pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::resume::handlers;
use crate::state::AppState;
use crate::templates;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Editing sessions
        .route("/api/v1/sessions", post(handlers::handle_open_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_close_session),
        )
        .route(
            "/api/v1/sessions/:id/title",
            put(handlers::handle_update_title),
        )
        .route(
            "/api/v1/sessions/:id/personal-info",
            put(handlers::handle_update_personal_info),
        )
        .route(
            "/api/v1/sessions/:id/experiences",
            put(handlers::handle_update_experiences).post(handlers::handle_add_experience),
        )
        .route(
            "/api/v1/sessions/:id/education",
            put(handlers::handle_update_education).post(handlers::handle_add_education),
        )
        .route(
            "/api/v1/sessions/:id/skills",
            put(handlers::handle_update_skills).post(handlers::handle_add_skill),
        )
        .route(
            "/api/v1/sessions/:id/template",
            put(handlers::handle_update_template),
        )
        .route(
            "/api/v1/sessions/:id/published",
            put(handlers::handle_update_published),
        )
        .route(
            "/api/v1/sessions/:id/save",
            post(handlers::handle_save_session),
        )
        .route(
            "/api/v1/sessions/:id/document",
            get(handlers::handle_export_document),
        )
        // Template catalog
        .route("/api/v1/templates", get(templates::handle_list_templates))
        .with_state(state)
}
