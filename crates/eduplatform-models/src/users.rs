//! User domain models and DTOs.

use chrono::{DateTime, Utc};
use eduplatform_auth::Role;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A user row. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: Role,
    /// Instructor a student is mapped to.
    pub instructor_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Row returned by the admin user listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct InstructorSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminResetPasswordDto {
    #[validate(length(
        min = 6,
        message = "newPassword is required and must be at least 6 characters"
    ))]
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PasswordResetResponse {
    pub message: String,
    pub id: Uuid,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordDto {
    #[validate(length(min = 1, message = "currentPassword and newPassword are required"))]
    pub current_password: String,
    #[validate(length(min = 1, message = "currentPassword and newPassword are required"))]
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_not_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "$2b$10$hash".to_string(),
            role: Role::Student,
            instructor_id: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["role"], "STUDENT");
        assert!(json.get("instructorId").is_some());
    }

    #[test]
    fn test_reset_password_length() {
        let dto = AdminResetPasswordDto {
            new_password: "12345".to_string(),
        };
        assert!(dto.validate().is_err());

        let dto = AdminResetPasswordDto {
            new_password: "123456".to_string(),
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_change_password_camel_case() {
        let dto: ChangePasswordDto =
            serde_json::from_str(r#"{"currentPassword":"old","newPassword":"newpass"}"#).unwrap();
        assert_eq!(dto.current_password, "old");
        assert_eq!(dto.new_password, "newpass");
    }
}
