//! Token payloads.
//!
//! Tokens are issued in the flat shape `{ id, role, iat, exp }`. Tokens
//! issued by older clients carry the principal nested under `user`:
//! `{ user: { id, role }, iat, exp }`. Both decode to the same
//! [`Principal`].

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::role::Role;

/// An authenticated caller. Only ever built from a verified token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Principal {
    #[serde(rename = "id")]
    pub subject_id: String,
    pub role: Role,
}

impl Principal {
    pub fn new(subject_id: impl Into<String>, role: Role) -> Self {
        Self {
            subject_id: subject_id.into(),
            role,
        }
    }
}

/// Canonical flat payload written by [`crate::issue_token`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    pub role: Role,
    /// Issued-at (Unix seconds)
    #[serde(default)]
    pub iat: i64,
    /// Expiry (Unix seconds)
    pub exp: i64,
}

/// Any payload shape accepted on verification.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StoredClaims {
    Nested {
        user: Principal,
        #[serde(default)]
        iat: i64,
        exp: i64,
    },
    Flat(Claims),
}

impl StoredClaims {
    pub fn expires_at(&self) -> i64 {
        match self {
            StoredClaims::Nested { exp, .. } => *exp,
            StoredClaims::Flat(claims) => claims.exp,
        }
    }

    pub fn into_principal(self) -> Principal {
        match self {
            StoredClaims::Nested { user, .. } => user,
            StoredClaims::Flat(claims) => Principal::new(claims.id, claims.role),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_wire_shape() {
        let json = serde_json::to_value(Principal::new("u1", Role::Student)).unwrap();
        assert_eq!(json, serde_json::json!({ "id": "u1", "role": "STUDENT" }));
    }

    #[test]
    fn test_flat_shape_decodes() {
        let json = r#"{"id":"u7","role":"ADMIN","iat":100,"exp":200}"#;
        let stored: StoredClaims = serde_json::from_str(json).unwrap();
        assert_eq!(stored.expires_at(), 200);
        assert_eq!(stored.into_principal(), Principal::new("u7", Role::Admin));
    }

    #[test]
    fn test_nested_shape_decodes() {
        let json = r#"{"user":{"id":"u8","role":"INSTRUCTOR"},"iat":100,"exp":300}"#;
        let stored: StoredClaims = serde_json::from_str(json).unwrap();
        assert!(matches!(stored, StoredClaims::Nested { .. }));
        assert_eq!(stored.expires_at(), 300);
        assert_eq!(stored.into_principal(), Principal::new("u8", Role::Instructor));
    }

    #[test]
    fn test_missing_iat_is_tolerated() {
        let json = r#"{"id":"u9","role":"STUDENT","exp":10}"#;
        let stored: StoredClaims = serde_json::from_str(json).unwrap();
        assert_eq!(stored.expires_at(), 10);
    }

    #[test]
    fn test_unknown_role_rejected() {
        let json = r#"{"id":"u1","role":"JANITOR","exp":10}"#;
        assert!(serde_json::from_str::<StoredClaims>(json).is_err());
    }
}
