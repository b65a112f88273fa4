//! HS256 token issuance and verification.
//!
//! Verification checks the signature first and expiry second, against an
//! explicit clock value in the `_at` variants. A bad signature or an
//! unreadable payload is [`AuthError::InvalidCredential`]; a well-signed
//! token past its `exp` is [`AuthError::Unauthenticated`].
//!
//! # Example
//!
//! ```ignore
//! use eduplatform_auth::{Principal, Role, issue_token, verify_token};
//! use eduplatform_config::JwtConfig;
//!
//! let config = JwtConfig::from_env()?;
//! let token = issue_token(&Principal::new(user_id.to_string(), Role::Student), &config)?;
//! let principal = verify_token(&token, &config)?;
//! ```

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use eduplatform_config::JwtConfig;

use crate::claims::{Claims, Principal, StoredClaims};
use crate::error::AuthError;

/// Issues a token for `principal` valid for `config.token_expiry` seconds.
pub fn issue_token(principal: &Principal, config: &JwtConfig) -> Result<String, AuthError> {
    issue_token_at(principal, config, Utc::now().timestamp())
}

pub fn issue_token_at(
    principal: &Principal,
    config: &JwtConfig,
    now: i64,
) -> Result<String, AuthError> {
    if config.secret.is_empty() {
        return Err(eduplatform_config::ConfigError::MissingSecret.into());
    }

    let exp = now
        .checked_add(config.token_expiry)
        .ok_or_else(|| AuthError::Internal("Token expiry overflows the clock".to_string()))?;

    let claims = Claims {
        id: principal.subject_id.clone(),
        role: principal.role,
        iat: now,
        exp,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| AuthError::Internal(format!("Failed to create token: {e}")))
}

/// Verifies `token` against the current time.
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<Principal, AuthError> {
    verify_token_at(token, config, Utc::now().timestamp())
}

pub fn verify_token_at(token: &str, config: &JwtConfig, now: i64) -> Result<Principal, AuthError> {
    if config.secret.is_empty() {
        return Err(eduplatform_config::ConfigError::MissingSecret.into());
    }

    // Expiry is checked below against `now` without leeway.
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;

    let stored = decode::<StoredClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map_err(|_| AuthError::InvalidCredential)?
    .claims;

    if stored.expires_at() <= now {
        return Err(AuthError::expired());
    }

    Ok(stored.into_principal())
}
