//! Assignment domain models and DTOs.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::NameRef;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub instructor_id: Uuid,
    /// Public URL of the optional attachment, e.g. `/uploads/assignments/..`
    pub attachment_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Assignment joined with its instructor's name.
#[derive(Debug, Clone, FromRow)]
pub struct AssignmentInstructorRow {
    #[sqlx(flatten)]
    pub assignment: Assignment,
    pub instructor_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignmentWithInstructor {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub instructor: NameRef,
}

impl From<AssignmentInstructorRow> for AssignmentWithInstructor {
    fn from(row: AssignmentInstructorRow) -> Self {
        Self {
            assignment: row.assignment,
            instructor: NameRef {
                name: row.instructor_name,
            },
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct AssignmentAdminRow {
    #[sqlx(flatten)]
    pub assignment: Assignment,
    pub instructor_name: String,
    pub submission_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmissionCount {
    pub submissions: i64,
}

/// Admin listing entry: instructor name plus number of submissions.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignmentAdminView {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub instructor: NameRef,
    #[serde(rename = "_count")]
    pub count: SubmissionCount,
}

impl From<AssignmentAdminRow> for AssignmentAdminView {
    fn from(row: AssignmentAdminRow) -> Self {
        Self {
            assignment: row.assignment,
            instructor: NameRef {
                name: row.instructor_name,
            },
            count: SubmissionCount {
                submissions: row.submission_count,
            },
        }
    }
}

/// Text fields of the multipart create-assignment form.
#[derive(Debug, Clone, Default, Validate, ToSchema)]
pub struct CreateAssignmentForm {
    #[validate(length(min = 1, max = 255, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "dueDate is required"))]
    pub due_date: String,
}

/// Parses a due date given as RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` (UTC) or
/// `YYYY-MM-DD` (midnight UTC).
pub fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
