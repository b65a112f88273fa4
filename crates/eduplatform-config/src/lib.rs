//! # EduPlatform Config
//!
//! Configuration types for the EduPlatform API.
//!
//! This crate provides configuration structures loaded from environment variables:
//!
//! - [`jwt`]: token signing secret and lifetime
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`storage`]: upload directory
//! - [`server`]: listen port and database URL
//!
//! Every config offers `from_env()` plus `from_lookup(..)`, which takes the
//! variable source as a closure so tests never touch the process environment.
//!
//! # Example
//!
//! ```ignore
//! use eduplatform_config::{CorsConfig, JwtConfig, ServerConfig, StorageConfig};
//!
//! let jwt_config = JwtConfig::from_env()?; // fails when JWT_SECRET is unset
//! let cors_config = CorsConfig::from_env();
//! let storage_config = StorageConfig::from_env();
//! let server_config = ServerConfig::from_env()?;
//! ```

pub mod cors;
pub mod error;
pub mod jwt;
pub mod server;
pub mod storage;

// Re-export commonly used types at crate root
pub use cors::{AllowedOrigins, CorsConfig};
pub use error::ConfigError;
pub use jwt::JwtConfig;
pub use server::ServerConfig;
pub use storage::StorageConfig;

/// Reads a variable, treating empty or whitespace-only values as unset.
pub(crate) fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[cfg(test)]
pub(crate) fn map_lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let owned: Vec<(String, String)> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| {
        owned
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }
}
