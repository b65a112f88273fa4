use eduplatform_config::ConfigError;
use eduplatform_core::AppError;
use thiserror::Error;

pub const NO_TOKEN: &str = "No token, authorization denied";
pub const TOKEN_NOT_VALID: &str = "Token is not valid";
pub const TOKEN_EXPIRED: &str = "Token has expired";
pub const INSUFFICIENT_PERMISSIONS: &str = "Forbidden: insufficient permissions";

/// Gateway failures.
///
/// `Unauthenticated` and `InvalidCredential` become 401, `Forbidden` 403,
/// the rest 500.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Unauthenticated(String),

    #[error("Token is not valid")]
    InvalidCredential,

    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error("{0}")]
    Internal(String),
}

impl AuthError {
    pub fn missing_credential() -> Self {
        AuthError::Unauthenticated(NO_TOKEN.to_string())
    }

    pub fn expired() -> Self {
        AuthError::Unauthenticated(TOKEN_EXPIRED.to_string())
    }

    pub fn insufficient_permissions() -> Self {
        AuthError::Forbidden(INSUFFICIENT_PERMISSIONS.to_string())
    }

    /// Short label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::Unauthenticated(_) => "unauthenticated",
            AuthError::InvalidCredential => "invalid_credential",
            AuthError::Forbidden(_) => "forbidden",
            AuthError::Configuration(_) => "configuration",
            AuthError::Internal(_) => "internal",
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthenticated(message) => AppError::unauthorized(message),
            AuthError::InvalidCredential => AppError::unauthorized(TOKEN_NOT_VALID),
            AuthError::Forbidden(message) => AppError::forbidden(message),
            AuthError::Configuration(e) => AppError::internal(e),
            AuthError::Internal(message) => AppError::internal_error(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(err: AuthError) -> u16 {
        AppError::from(err).status.as_u16()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status(AuthError::missing_credential()), 401);
        assert_eq!(status(AuthError::expired()), 401);
        assert_eq!(status(AuthError::InvalidCredential), 401);
        assert_eq!(status(AuthError::insufficient_permissions()), 403);
        assert_eq!(status(AuthError::Configuration(ConfigError::MissingSecret)), 500);
        assert_eq!(status(AuthError::Internal("signing failed".into())), 500);
    }

    #[test]
    fn test_client_messages() {
        let err = AppError::from(AuthError::missing_credential());
        assert_eq!(err.public_message(), NO_TOKEN);

        let err = AppError::from(AuthError::InvalidCredential);
        assert_eq!(err.public_message(), TOKEN_NOT_VALID);

        let err = AppError::from(AuthError::insufficient_permissions());
        assert_eq!(err.public_message(), INSUFFICIENT_PERMISSIONS);
    }
}
