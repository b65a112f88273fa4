//! Login-screen background images.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// At most one image is active at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginScreenImage {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Text fields of the multipart upload form.
#[derive(Debug, Clone, Default)]
pub struct NewLoginScreenImage {
    pub name: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_camel_case() {
        let image = LoginScreenImage {
            id: Uuid::nil(),
            name: "Campus".to_string(),
            description: String::new(),
            image_url: "/uploads/login-screens/1.png".to_string(),
            is_active: true,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&image).unwrap();
        assert_eq!(json["imageUrl"], "/uploads/login-screens/1.png");
        assert_eq!(json["isActive"], true);
    }
}
