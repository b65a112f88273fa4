//! File storage abstraction layer.
//!
//! Uploaded files (assignment attachments, submissions, logos, login-screen
//! images) are stored under a storage key such as
//! `submissions/1718000000000_report.pdf`. The key is what gets persisted;
//! [`FileStorage::public_path`] turns it into the URL path served by the
//! static file route.
//!
//! # Example
//!
//! ```ignore
//! use eduplatform_core::file_storage::{FileStorage, LocalFileStorage};
//! use std::path::PathBuf;
//!
//! let storage = LocalFileStorage::new(PathBuf::from("./uploads"), "/uploads");
//!
//! let key = storage.save("logos/logo.png", &bytes).await?;
//! let url = storage.public_path(&key)?; // "/uploads/logos/logo.png"
//! storage.delete(&key).await?;
//! ```

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use thiserror::Error;
use tokio::fs;

type StorageFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StorageError>> + Send + 'a>>;

/// Abstract trait for file storage backends.
pub trait FileStorage: Send + Sync + std::fmt::Debug {
    /// Save file content under `key` and return the key.
    fn save<'a>(&'a self, key: &'a str, content: &'a [u8]) -> StorageFuture<'a, String>;

    /// Read a file back. Missing files yield [`StorageError::NotFound`].
    fn read<'a>(&'a self, key: &'a str) -> StorageFuture<'a, Vec<u8>>;

    /// Delete a file by key. Deleting a missing file is not an error.
    fn delete<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()>;

    /// URL path under which the static file route serves `key`.
    fn public_path(&self, key: &str) -> Result<String, StorageError>;

    /// Inverse of [`FileStorage::public_path`]; `None` for foreign URLs.
    fn key_from_public_path<'a>(&self, path: &'a str) -> Option<&'a str>;
}

/// Error type for file storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File exceeds maximum size of {max_bytes} bytes")]
    InvalidFileSize { max_bytes: usize },

    #[error("{0}")]
    UnsupportedType(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found")]
    NotFound,

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// Size and type constraints for one kind of upload.
#[derive(Debug, Clone, Copy)]
pub struct UploadPolicy {
    pub max_bytes: usize,
    /// Tokens matched against the lowercased extension and the MIME type.
    pub allowed: &'static [&'static str],
    /// When true both extension and MIME type must match; otherwise either.
    pub require_both: bool,
    pub rejection: &'static str,
}

impl UploadPolicy {
    /// Assignment attachments and student submissions.
    pub const DOCUMENTS: UploadPolicy = UploadPolicy {
        max_bytes: 20 * 1024 * 1024,
        allowed: &["pdf", "doc", "docx", "txt", "zip", "jpeg", "jpg", "png", "gif"],
        require_both: false,
        rejection: "Unsupported file type",
    };

    /// Logos and login-screen images.
    pub const IMAGES: UploadPolicy = UploadPolicy {
        max_bytes: 5 * 1024 * 1024,
        allowed: &["jpeg", "jpg", "png", "gif", "svg"],
        require_both: true,
        rejection: "Only image files are allowed",
    };

    pub fn check(
        &self,
        file_name: &str,
        content_type: Option<&str>,
        size_bytes: usize,
    ) -> Result<(), StorageError> {
        if size_bytes > self.max_bytes {
            return Err(StorageError::InvalidFileSize {
                max_bytes: self.max_bytes,
            });
        }

        let ext = extension(file_name).unwrap_or_default().to_ascii_lowercase();
        let ext_ok = self.matches(&ext);
        let type_ok = content_type.is_some_and(|ct| self.matches(&ct.to_ascii_lowercase()));

        let accepted = if self.require_both {
            ext_ok && type_ok
        } else {
            ext_ok || type_ok
        };

        if accepted {
            Ok(())
        } else {
            Err(StorageError::UnsupportedType(self.rejection.to_string()))
        }
    }

    fn matches(&self, candidate: &str) -> bool {
        !candidate.is_empty() && self.allowed.iter().any(|token| candidate.contains(token))
    }
}

/// Replaces every character outside `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_filename(original: &str) -> String {
    original
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Final path component of a client-supplied name, dropping any directories.
pub fn base_name(raw: &str) -> Option<&str> {
    raw.rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
}

/// Extension including the leading dot, e.g. `.png`.
pub fn extension(file_name: &str) -> Option<&str> {
    let name = base_name(file_name)?;
    let dot = name.rfind('.')?;
    (dot > 0).then(|| &name[dot..])
}

/// Local filesystem-based file storage implementation.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    /// Base directory where files are stored
    base_dir: PathBuf,

    /// URL path prefix the static file route is mounted on (e.g. "/uploads")
    public_prefix: String,
}

impl LocalFileStorage {
    pub fn new(base_dir: PathBuf, public_prefix: impl Into<String>) -> Self {
        Self {
            base_dir,
            public_prefix: public_prefix.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Validate storage key format to prevent path traversal.
    ///
    /// Dots are fine inside a file name (`essay..v2.pdf`); only a whole
    /// segment of `.` or `..` is rejected.
    fn validate_key(key: &str) -> Result<(), StorageError> {
        if key.is_empty() || key.starts_with('/') || key.contains('\\') {
            return Err(StorageError::InvalidKey(
                "Key must not be empty, contain '\\', or start with '/'".to_string(),
            ));
        }

        if key
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
        {
            return Err(StorageError::InvalidKey(
                "Key must not contain empty, '.' or '..' segments".to_string(),
            ));
        }

        if !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '/' | '.'))
        {
            return Err(StorageError::InvalidKey(
                "Key contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        Self::validate_key(key)?;
        Ok(self.base_dir.join(key))
    }
}

impl FileStorage for LocalFileStorage {
    fn save<'a>(&'a self, key: &'a str, content: &'a [u8]) -> StorageFuture<'a, String> {
        Box::pin(async move {
            let file_path = self.path_for(key)?;

            if let Some(parent) = file_path.parent() {
                fs::create_dir_all(parent).await?;
            }

            fs::write(&file_path, content).await?;
            Ok(key.to_string())
        })
    }

    fn read<'a>(&'a self, key: &'a str) -> StorageFuture<'a, Vec<u8>> {
        Box::pin(async move {
            let file_path = self.path_for(key)?;

            match fs::read(&file_path).await {
                Ok(bytes) => Ok(bytes),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            let file_path = self.path_for(key)?;

            match fs::remove_file(&file_path).await {
                Ok(_) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn public_path(&self, key: &str) -> Result<String, StorageError> {
        Self::validate_key(key)?;
        Ok(format!("{}/{}", self.public_prefix.trim_end_matches('/'), key))
    }

    fn key_from_public_path<'a>(&self, path: &'a str) -> Option<&'a str> {
        path.strip_prefix(self.public_prefix.trim_end_matches('/'))?
            .strip_prefix('/')
            .filter(|key| Self::validate_key(key).is_ok())
    }
}
