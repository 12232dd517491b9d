use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One resume template descriptor. `template_data` is an opaque blob owned
/// by the presentation layer; this service only stores and serves it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TemplateRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub preview_description: Option<String>,
    pub template_data: Value,
    pub is_active: bool,
}
