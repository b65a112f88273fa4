//! Shared HTTP helpers for the feature modules.
//!
//! - [`upload`]: multipart form reading and storage key naming
//! - [`url`]: absolute URLs for stored files

pub mod upload;
pub mod url;
