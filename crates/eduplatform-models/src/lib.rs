//! # EduPlatform Models
//!
//! Domain rows and request/response DTOs for the EduPlatform API.
//!
//! All JSON is camelCase. Row types derive [`sqlx::FromRow`]; joined views
//! flatten the base row and nest the related entity the way clients expect
//! (`instructor: { name }`, `student: { name, email }`).
//!
//! - [`users`]: users and password management DTOs
//! - [`auth`]: register/login requests and the token response
//! - [`assignments`]: assignments and their list views
//! - [`submissions`]: submissions, grading and list views
//! - [`settings`]: the branding singleton
//! - [`login_screens`]: login-screen images

pub mod assignments;
pub mod auth;
pub mod login_screens;
pub mod settings;
pub mod submissions;
pub mod users;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic `{ "message": ... }` body for successful actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A related entity reduced to its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NameRef {
    pub name: String,
}
