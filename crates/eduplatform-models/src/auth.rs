//! Authentication DTOs.

use eduplatform_auth::Role;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Self-registration request. Only `STUDENT` and `INSTRUCTOR` accounts can
/// be created this way; any other requested role registers a student.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDto {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
    /// Required when registering a student.
    #[serde(default)]
    pub instructor_id: Option<Uuid>,
}

impl RegisterDto {
    pub fn requested_role(&self) -> Role {
        match self.role.as_deref() {
            Some("INSTRUCTOR") => Role::Instructor,
            _ => Role::Student,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginDto {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Returned by register and login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    /// Same as `id`; kept for older clients.
    #[serde(rename = "_id")]
    pub legacy_id: Uuid,
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub token: String,
}

/// Profile of the authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CurrentUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}
