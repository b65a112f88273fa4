use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use tracing::debug;
use uuid::Uuid;

use eduplatform_auth::{AuthError, Principal, Role, verify_token};
use eduplatform_core::AppError;

use crate::metrics::track_auth_rejection;
use crate::state::AppState;

pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Pulls the raw token from the request headers.
///
/// `x-auth-token` wins over `Authorization: Bearer`. An `Authorization`
/// header without the `Bearer ` prefix counts as no credential.
pub fn extract_credential(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header_value = move |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    if let Some(token) = header_value(header::HeaderName::from_static(AUTH_TOKEN_HEADER)) {
        return Ok(token);
    }

    header_value(header::AUTHORIZATION)
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(AuthError::missing_credential)
}

/// Extractor that verifies the caller's token and provides the [`Principal`].
///
/// Once verified the principal is cached in the request extensions, so
/// running `require_roles` and then this extractor verifies only once.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

impl AuthUser {
    pub fn principal(&self) -> &Principal {
        &self.0
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    /// The subject as a user id. Tokens whose subject is not a UUID cannot
    /// belong to any stored user.
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.0.subject_id).map_err(|_| AppError::from(AuthError::InvalidCredential))
    }

    pub fn authenticate(headers: &HeaderMap, state: &AppState) -> Result<Self, AuthError> {
        let token = extract_credential(headers)?;
        verify_token(token, &state.jwt_config).map(AuthUser)
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(cached) = parts.extensions.get::<AuthUser>() {
            return Ok(cached.clone());
        }

        let auth_user = AuthUser::authenticate(&parts.headers, state).map_err(|err| {
            debug!(reason = err.kind(), path = %parts.uri.path(), "Authentication rejected");
            track_auth_rejection(err.kind());
            AppError::from(err)
        })?;

        parts.extensions.insert(auth_user.clone());
        Ok(auth_user)
    }
}
