use std::path::PathBuf;

use crate::{env_lookup, non_empty};

pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

#[derive(Clone, Debug)]
pub struct StorageConfig {
    /// Directory uploaded files are written to and served from.
    pub upload_dir: PathBuf,
    /// URL prefix of the static file route.
    pub public_prefix: String,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            upload_dir: PathBuf::from(
                non_empty(&lookup, "UPLOAD_DIR").unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_string()),
            ),
            public_prefix: "/uploads".to_string(),
        }
    }
}
