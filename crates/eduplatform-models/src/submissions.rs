//! Submission domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::NameRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "submission_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    Submitted,
    Graded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: Uuid,
    pub assignment_id: Uuid,
    pub student_id: Uuid,
    /// Storage key of the uploaded file, e.g. `submissions/1718000000000_essay.pdf`
    pub file_path: String,
    pub status: SubmissionStatus,
    pub marks: Option<i32>,
    pub feedback: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub graded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StudentContact {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct SubmissionStudentRow {
    #[sqlx(flatten)]
    pub submission: Submission,
    pub student_name: String,
    pub student_email: String,
}

/// A submission as seen by the assignment's instructor.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmissionWithStudent {
    #[serde(flatten)]
    pub submission: Submission,
    pub student: StudentContact,
}

impl From<SubmissionStudentRow> for SubmissionWithStudent {
    fn from(row: SubmissionStudentRow) -> Self {
        Self {
            submission: row.submission,
            student: StudentContact {
                name: row.student_name,
                email: row.student_email,
            },
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct SubmissionAdminRow {
    #[sqlx(flatten)]
    pub submission: Submission,
    pub student_name: String,
    pub assignment_title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TitleRef {
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmissionAdminView {
    #[serde(flatten)]
    pub submission: Submission,
    pub student: NameRef,
    pub assignment: TitleRef,
}

impl From<SubmissionAdminRow> for SubmissionAdminView {
    fn from(row: SubmissionAdminRow) -> Self {
        Self {
            submission: row.submission,
            student: NameRef {
                name: row.student_name,
            },
            assignment: TitleRef {
                title: row.assignment_title,
            },
        }
    }
}

/// Marks may arrive as a number or a numeric string; fractions are truncated.
fn deserialize_marks<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    let value = match Raw::deserialize(deserializer)? {
        Raw::Int(n) => Some(n),
        Raw::Float(f) if f.is_finite() => Some(f.trunc() as i64),
        Raw::Float(_) => None,
        Raw::Text(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            })
        }
    };

    value
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| serde::de::Error::custom("marks must be a number"))
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct GradeSubmissionDto {
    #[serde(deserialize_with = "deserialize_marks")]
    #[validate(range(min = 0, message = "marks must not be negative"))]
    #[schema(value_type = i32)]
    pub marks: i32,
    #[serde(default)]
    pub feedback: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_form() {
        assert_eq!(
            serde_json::to_string(&SubmissionStatus::Graded).unwrap(),
            r#""GRADED""#
        );
    }

    #[test]
    fn test_marks_accepts_number_or_string() {
        let dto: GradeSubmissionDto = serde_json::from_str(r#"{"marks":85}"#).unwrap();
        assert_eq!(dto.marks, 85);
        assert_eq!(dto.feedback, None);

        let dto: GradeSubmissionDto =
            serde_json::from_str(r#"{"marks":"92","feedback":"Well done"}"#).unwrap();
        assert_eq!(dto.marks, 92);
        assert_eq!(dto.feedback.as_deref(), Some("Well done"));

        let dto: GradeSubmissionDto = serde_json::from_str(r#"{"marks":77.9}"#).unwrap();
        assert_eq!(dto.marks, 77);
    }

    #[test]
    fn test_marks_rejects_non_numeric() {
        assert!(serde_json::from_str::<GradeSubmissionDto>(r#"{"marks":"A+"}"#).is_err());
        assert!(serde_json::from_str::<GradeSubmissionDto>(r#"{"feedback":"x"}"#).is_err());
    }

    #[test]
    fn test_negative_marks_fail_validation() {
        let dto: GradeSubmissionDto = serde_json::from_str(r#"{"marks":-1}"#).unwrap();
        assert!(dto.validate().is_err());
    }
}
