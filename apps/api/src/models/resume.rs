use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Flat résumé field-set as edited by the client. Every field defaults to "".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeData {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub education: String,
    pub experience: String,
    #[serde(rename = "campusExperience")]
    pub campus_experience: String,
    pub skills: String,
    /// Only honoured on create; updates keep the original value.
    #[serde(rename = "sourceFilename", skip_serializing_if = "Option::is_none")]
    pub source_filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ResumeRow {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub education: String,
    pub experience: String,
    pub campus_experience: String,
    pub skills: String,
    pub source_filename: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// List view of a saved résumé.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ResumeSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub source_filename: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_data_defaults_missing_fields() {
        let data: ResumeData = serde_json::from_str(r#"{"name": "张三"}"#).unwrap();
        assert_eq!(data.name, "张三");
        assert_eq!(data.campus_experience, "");
        assert!(data.source_filename.is_none());
    }

    #[test]
    fn test_resume_data_uses_camel_case_keys() {
        let data: ResumeData = serde_json::from_str(
            r#"{"campusExperience": "学生会主席", "sourceFilename": "cv.pdf"}"#,
        )
        .unwrap();
        assert_eq!(data.campus_experience, "学生会主席");
        assert_eq!(data.source_filename.as_deref(), Some("cv.pdf"));
    }
}
