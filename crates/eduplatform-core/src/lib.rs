//! # EduPlatform Core
//!
//! Core types, errors, and utilities for the EduPlatform API.
//!
//! This crate provides foundational types used throughout the application:
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: Page-based pagination parameters and envelopes
//! - [`password`]: bcrypt password hashing and verification
//! - [`color`]: CSS color normalization for branding settings
//! - [`file_storage`]: Upload storage abstraction and filename sanitization
//!
//! # Example
//!
//! ```ignore
//! use eduplatform_core::{AppError, PageParams, hash_password};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Assignment not found"));
//! let hash = hash_password("secret1")?;
//! let params = PageParams::default();
//! assert_eq!(params.page_size(), 10);
//! ```

pub mod color;
pub mod errors;
pub mod file_storage;
pub mod pagination;
pub mod password;

// Re-export commonly used types at crate root
pub use color::normalize_color;
pub use errors::AppError;
pub use file_storage::{FileStorage, LocalFileStorage, StorageError, UploadPolicy};
pub use pagination::{PageParams, Paginated};
pub use password::{hash_password, verify_password};
