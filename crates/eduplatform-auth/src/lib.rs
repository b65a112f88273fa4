//! # EduPlatform Auth
//!
//! The access control gateway: token authentication and role authorization.
//!
//! - [`role`]: the closed set of roles a principal can hold
//! - [`claims`]: the authenticated [`Principal`] and the token payload shapes
//! - [`jwt`]: HS256 token issuance and verification
//! - [`authorize`]: static per-operation access rules
//! - [`error`]: the gateway error taxonomy and its HTTP mapping
//!
//! Both verification and authorization are pure functions of their inputs;
//! the `_at` variants take the clock value explicitly.
//!
//! # Example
//!
//! ```ignore
//! use eduplatform_auth::{AccessRule, Principal, Role, authorize, issue_token, verify_token};
//! use eduplatform_config::JwtConfig;
//!
//! let config = JwtConfig::from_env()?;
//!
//! let token = issue_token(&Principal::new("u1", Role::Instructor), &config)?;
//! let principal = verify_token(&token, &config)?;
//! authorize(&principal, AccessRule::INSTRUCTOR_OR_ADMIN)?;
//! ```

pub mod authorize;
pub mod claims;
pub mod error;
pub mod jwt;
pub mod role;

// Re-export commonly used types at crate root
pub use authorize::{AccessRule, authorize};
pub use claims::{Claims, Principal, StoredClaims};
pub use error::AuthError;
pub use jwt::{issue_token, issue_token_at, verify_token, verify_token_at};
pub use role::Role;
