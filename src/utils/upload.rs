//! Multipart upload handling.

use std::collections::HashMap;

use axum::extract::Multipart;
use chrono::Utc;
use rand::Rng;

use eduplatform_core::file_storage::{base_name, extension, sanitize_filename};
use eduplatform_core::{AppError, FileStorage, StorageError, UploadPolicy};

use crate::metrics::track_file_uploaded;

/// A file part that passed its [`UploadPolicy`].
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Writes the file under `key` and returns the stored key.
    pub async fn store(
        &self,
        storage: &dyn FileStorage,
        key: &str,
        kind: &'static str,
    ) -> Result<String, AppError> {
        let key = storage.save(key, &self.bytes).await?;
        track_file_uploaded(kind, self.bytes.len());
        Ok(key)
    }
}

/// Text fields plus at most one file from a multipart body.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl UploadForm {
    /// Reads the whole form. The part named `file_field` is checked against
    /// `policy` while streaming, so oversized files are rejected without
    /// being buffered in full. Other file parts are discarded.
    pub async fn read(
        mut multipart: Multipart,
        file_field: &str,
        policy: UploadPolicy,
    ) -> Result<Self, AppError> {
        let mut form = UploadForm::default();

        while let Some(mut field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            match field.file_name().map(str::to_string) {
                Some(file_name) if name == file_field => {
                    let content_type = field.content_type().map(str::to_string);

                    let mut bytes = Vec::new();
                    while let Some(chunk) = field.chunk().await? {
                        if bytes.len() + chunk.len() > policy.max_bytes {
                            return Err(StorageError::InvalidFileSize {
                                max_bytes: policy.max_bytes,
                            }
                            .into());
                        }
                        bytes.extend_from_slice(&chunk);
                    }

                    policy.check(&file_name, content_type.as_deref(), bytes.len())?;

                    form.file = Some(UploadedFile {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
                Some(_) => {}
                None => {
                    let value = field.text().await?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Trimmed value of a required text field, or 400 with `message`.
    pub fn require_text(&self, name: &str, message: &str) -> Result<String, AppError> {
        self.text(name)
            .map(str::to_string)
            .ok_or_else(|| AppError::bad_request(anyhow::Error::msg(message.to_string())))
    }
}

/// `{dir}/{millis}_{sanitized original name}`, used for documents so the
/// original name survives in downloads.
pub fn timestamped_key(dir: &str, original_name: &str) -> String {
    let name = base_name(original_name)
        .map(sanitize_filename)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "file".to_string());
    format!("{dir}/{}_{name}", Utc::now().timestamp_millis())
}

/// `{dir}/{millis}-{random}{ext}`, used for images.
pub fn random_key(dir: &str, original_name: &str) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    let ext = extension(original_name)
        .map(|e| sanitize_filename(&e.to_ascii_lowercase()))
        .unwrap_or_default();
    format!("{dir}/{}-{suffix}{ext}", Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamped_key_sanitizes() {
        let key = timestamped_key("submissions", "../My Essay (v2).pdf");
        let (dir, rest) = key.split_once('/').unwrap();
        assert_eq!(dir, "submissions");
        let (millis, name) = rest.split_once('_').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(name, "My_Essay__v2_.pdf");
    }

    #[tokio::test]
    async fn test_timestamped_key_with_double_dots_is_storable() {
        let dir = tempfile::tempdir().unwrap();
        let storage = eduplatform_core::LocalFileStorage::new(dir.path().to_path_buf(), "/uploads");

        let key = timestamped_key("submissions", "essay..v2.pdf");
        assert!(key.ends_with("_essay..v2.pdf"));
        assert_eq!(storage.save(&key, b"%PDF").await.unwrap(), key);
    }

    #[test]
    fn test_timestamped_key_fallback_name() {
        assert!(timestamped_key("assignments", "dir/").ends_with("_file"));
    }

    #[test]
    fn test_random_key_keeps_lowercase_extension() {
        let key = random_key("logos", "Brand.PNG");
        assert!(key.starts_with("logos/"));
        assert!(key.ends_with(".png"));
        assert!(!key.contains("Brand"));
    }

    #[test]
    fn test_form_text_trims_and_skips_blank() {
        let mut form = UploadForm::default();
        form.fields.insert("title".into(), "  Essay  ".into());
        form.fields.insert("blank".into(), "   ".into());
        assert_eq!(form.text("title"), Some("Essay"));
        assert_eq!(form.text("blank"), None);
        assert!(form.require_text("blank", "blank is required").is_err());
    }
}
