//! Read-only template catalog.
//!
//! Loaded once at startup from the storage collaborator. Best-effort: a
//! failed read logs a warning and leaves the catalog empty rather than
//! blocking the rest of the application. There is no retry and no refresh.

use axum::{extract::State, Json};

use crate::models::template::TemplateRow;
use crate::state::AppState;
use crate::storage::ResumeStorage;

pub struct TemplateCatalog {
    templates: Vec<TemplateRow>,
}

impl TemplateCatalog {
    /// One read of the active templates, ordered by name ascending.
    pub async fn load(storage: &dyn ResumeStorage) -> Self {
        match storage.list_active_templates().await {
            Ok(templates) => {
                tracing::info!("Template catalog loaded ({} templates)", templates.len());
                Self { templates }
            }
            Err(e) => {
                tracing::warn!("Error loading templates: {e}");
                Self {
                    templates: Vec::new(),
                }
            }
        }
    }

    pub fn templates(&self) -> &[TemplateRow] {
        &self.templates
    }
}

/// GET /api/v1/templates
pub async fn handle_list_templates(State(state): State<AppState>) -> Json<Vec<TemplateRow>> {
    Json(state.templates.templates().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::mock::MockStorage;
    use serde_json::json;
    use uuid::Uuid;

    fn template(name: &str, is_active: bool) -> TemplateRow {
        TemplateRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            preview_description: None,
            template_data: json!({}),
            is_active,
        }
    }

    #[tokio::test]
    async fn test_catalog_filters_inactive_and_orders_by_name() {
        let storage = MockStorage::new();
        {
            let mut templates = storage.templates.lock().unwrap();
            templates.push(template("Modern", true));
            templates.push(template("Classic", true));
            templates.push(template("Abandoned", false));
        }

        let catalog = TemplateCatalog::load(&storage).await;
        let names: Vec<&str> = catalog.templates().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Classic", "Modern"]);
    }

    #[tokio::test]
    async fn test_catalog_degrades_to_empty_on_storage_failure() {
        let storage = MockStorage {
            fail_reads: true,
            ..MockStorage::new()
        };
        let catalog = TemplateCatalog::load(&storage).await;
        assert!(catalog.templates().is_empty());
    }
}
