//! Branding settings (a single row).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_APP_NAME: &str = "EDU_Platform";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppSetting {
    pub id: Uuid,
    pub name: String,
    pub logo_url: Option<String>,
    pub theme_primary_color: Option<String>,
    pub footer_text: Option<String>,
    pub footer_color: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsDto {
    #[validate(length(max = 255, message = "name must be at most 255 characters"))]
    pub name: Option<String>,
    pub theme_primary_color: Option<String>,
    pub footer_text: Option<String>,
    pub footer_color: Option<String>,
}

/// Validated, normalized column values to write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub name: Option<String>,
    pub theme_primary_color: Option<String>,
    pub footer_text: Option<String>,
    pub footer_color: Option<String>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.theme_primary_color.is_none()
            && self.footer_text.is_none()
            && self.footer_color.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_dto_camel_case() {
        let dto: UpdateSettingsDto =
            serde_json::from_str(r##"{"themePrimaryColor":"#fff","footerText":"hi"}"##).unwrap();
        assert_eq!(dto.theme_primary_color.as_deref(), Some("#fff"));
        assert_eq!(dto.footer_text.as_deref(), Some("hi"));
        assert!(dto.name.is_none());
    }

    #[test]
    fn test_empty_patch() {
        assert!(SettingsPatch::default().is_empty());
        let patch = SettingsPatch {
            footer_text: Some(String::new()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
