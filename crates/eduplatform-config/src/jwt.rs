use crate::{ConfigError, env_lookup, non_empty};

/// Tokens live for 30 days unless `JWT_EXPIRY_SECS` says otherwise.
pub const DEFAULT_TOKEN_EXPIRY_SECS: i64 = 30 * 24 * 60 * 60;

/// Upper bound accepted for `JWT_EXPIRY_SECS` (ten years).
pub const MAX_TOKEN_EXPIRY_SECS: i64 = 10 * 365 * 24 * 60 * 60;

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime in seconds.
    pub token_expiry: i64,
}

// The secret must never end up in logs.
impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("token_expiry", &self.token_expiry)
            .finish()
    }
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, token_expiry: i64) -> Self {
        Self {
            secret: secret.into(),
            token_expiry,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = non_empty(&lookup, "JWT_SECRET").ok_or(ConfigError::MissingSecret)?;

        let token_expiry = match non_empty(&lookup, "JWT_EXPIRY_SECS") {
            None => DEFAULT_TOKEN_EXPIRY_SECS,
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|secs| (1..=MAX_TOKEN_EXPIRY_SECS).contains(secs))
                .ok_or(ConfigError::Invalid {
                    key: "JWT_EXPIRY_SECS",
                    value: raw,
                })?,
        };

        Ok(Self {
            secret,
            token_expiry,
        })
    }
}
