use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::resume::item_id::next_item_id;

/// Placeholder title for a freshly opened draft.
pub const DEFAULT_RESUME_TITLE: &str = "My Resume";

/// Contact details and summary for the resume header. All fields are
/// plain text and default to empty; blanks are omitted at render time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub summary: String,
}

/// Field-wise patch for `PersonalInfo`. Absent fields leave the current
/// value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfoPatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub summary: Option<String>,
}

impl PersonalInfo {
    pub fn apply(&mut self, patch: PersonalInfoPatch) {
        if let Some(full_name) = patch.full_name {
            self.full_name = full_name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(linkedin) = patch.linkedin {
            self.linkedin = linkedin;
        }
        if let Some(summary) = patch.summary {
            self.summary = summary;
        }
    }
}

/// One entry in the resume's ordered experience list. `id` is unique
/// within the list for the lifetime of the session and never reused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    pub id: String,
    pub title: String,
    pub company: String,
    pub duration: String,
    pub description: String,
}

impl Experience {
    /// Produces a blank entry with a fresh item id.
    pub fn new() -> Self {
        Self {
            id: next_item_id(),
            ..Default::default()
        }
    }
}

/// One entry in the resume's ordered education list. Same identity and
/// ordering rules as `Experience`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub id: String,
    pub degree: String,
    pub school: String,
    pub duration: String,
    pub description: String,
}

impl Education {
    /// Produces a blank entry with a fresh item id.
    pub fn new() -> Self {
        Self {
            id: next_item_id(),
            ..Default::default()
        }
    }
}

/// The aggregate root: one resume and its owned collections, treated as a
/// single unit of persistence. `id` is absent until the first successful
/// save and stable for the rest of the session thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Resume {
    pub id: Option<Uuid>,
    pub title: String,
    pub personal_info: PersonalInfo,
    pub experiences: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Vec<String>,
    pub template_id: Option<Uuid>,
    pub is_published: bool,
}

impl Default for Resume {
    fn default() -> Self {
        Self {
            id: None,
            title: DEFAULT_RESUME_TITLE.to_string(),
            personal_info: PersonalInfo::default(),
            experiences: Vec::new(),
            education: Vec::new(),
            skills: Vec::new(),
            template_id: None,
            is_published: false,
        }
    }
}

/// Persisted form of a resume. The nested collections live in JSONB blob
/// columns; `updated_at` is server-assigned and drives "most recent wins"
/// on load.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub personal_info: Value,
    pub experiences: Value,
    pub education: Value,
    pub skills: Value,
    pub template_id: Option<Uuid>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResumeRow {
    /// Decodes the row into the in-memory aggregate. Blob columns that fail
    /// to decode fall back to their empty defaults rather than failing the
    /// whole load.
    pub fn into_resume(self) -> Resume {
        Resume {
            id: Some(self.id),
            title: self.title,
            personal_info: serde_json::from_value(self.personal_info).unwrap_or_default(),
            experiences: serde_json::from_value(self.experiences).unwrap_or_default(),
            education: serde_json::from_value(self.education).unwrap_or_default(),
            skills: serde_json::from_value(self.skills).unwrap_or_default(),
            template_id: self.template_id,
            is_published: self.is_published,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row_with(personal_info: Value, experiences: Value) -> ResumeRow {
        ResumeRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Engineer".to_string(),
            personal_info,
            experiences,
            education: json!([]),
            skills: json!(["Rust"]),
            template_id: None,
            is_published: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_decodes_well_formed_blobs() {
        let row = row_with(
            json!({"fullName": "Jane Doe", "email": "jane@example.com"}),
            json!([{"id": "1", "title": "Engineer", "company": "Acme", "duration": "", "description": ""}]),
        );
        let resume = row.into_resume();
        assert_eq!(resume.personal_info.full_name, "Jane Doe");
        assert_eq!(resume.experiences.len(), 1);
        assert_eq!(resume.experiences[0].company, "Acme");
        assert_eq!(resume.skills, vec!["Rust".to_string()]);
        assert!(resume.id.is_some());
    }

    #[test]
    fn test_row_with_malformed_blob_falls_back_to_default() {
        let row = row_with(json!("not an object"), json!(42));
        let resume = row.into_resume();
        assert_eq!(resume.personal_info, PersonalInfo::default());
        assert!(resume.experiences.is_empty());
        // well-formed columns still decode
        assert_eq!(resume.title, "Engineer");
    }

    #[test]
    fn test_default_resume_has_placeholder_title_and_no_id() {
        let resume = Resume::default();
        assert_eq!(resume.title, DEFAULT_RESUME_TITLE);
        assert!(resume.id.is_none());
        assert!(!resume.is_published);
        assert!(resume.skills.is_empty());
    }

    #[test]
    fn test_patch_merges_only_present_fields() {
        let mut info = PersonalInfo {
            full_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            ..Default::default()
        };
        info.apply(PersonalInfoPatch {
            phone: Some("555-0100".to_string()),
            ..Default::default()
        });
        assert_eq!(info.full_name, "Jane Doe");
        assert_eq!(info.email, "jane@example.com");
        assert_eq!(info.phone, "555-0100");
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        let resume = Resume::default();
        let value = serde_json::to_value(&resume).unwrap();
        assert!(value.get("personalInfo").is_some());
        assert!(value.get("isPublished").is_some());
        assert!(value.get("templateId").is_some());
    }
}
