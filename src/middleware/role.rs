//! Role-based authorization for Axum.
//!
//! Two ways to attach an [`AccessRule`] to a route:
//!
//! 1. Layer-based: [`require_roles`] (or a wrapper such as [`require_admin`])
//!    via `axum::middleware::from_fn_with_state`
//! 2. Extractor-based: the types generated by the `require_roles!` macro,
//!    e.g. [`RequireInstructor`]
//!
//! Both authenticate first (401 on failure) and then authorize (403).

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use eduplatform_auth::{AccessRule, authorize};
use eduplatform_core::AppError;

use crate::metrics::track_authorization;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Applies `rule` to an authenticated user, recording the decision.
pub fn check_access(auth_user: &AuthUser, rule: AccessRule) -> Result<(), AppError> {
    match authorize(auth_user.principal(), rule) {
        Ok(()) => {
            debug!(role = %auth_user.role(), rule = %rule, "Access permitted");
            track_authorization(auth_user.role().as_str(), true);
            Ok(())
        }
        Err(err) => {
            warn!(
                subject = %auth_user.principal().subject_id,
                role = %auth_user.role(),
                rule = %rule,
                "Access denied"
            );
            track_authorization(auth_user.role().as_str(), false);
            Err(err.into())
        }
    }
}

/// Middleware that authenticates the caller and checks `rule`.
///
/// # Usage with axum::middleware::from_fn_with_state
///
/// ```rust,ignore
/// use axum::{Router, middleware, routing::put};
/// use eduplatform_auth::AccessRule;
/// use crate::middleware::role::require_roles;
///
/// let routes = Router::new()
///     .route("/", put(update_settings))
///     .route_layer(middleware::from_fn_with_state(
///         state.clone(),
///         |state, req, next| require_roles(state, req, next, AccessRule::ADMIN_ONLY),
///     ));
/// ```
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    rule: AccessRule,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    // Caches the principal in the extensions for the handler's extractors.
    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;
    check_access(&auth_user, rule)?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Admin-only routes.
///
/// ```rust,ignore
/// let admin_routes = Router::new()
///     .route("/logo", post(upload_logo))
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));
/// ```
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    require_roles(State(state), req, next, AccessRule::ADMIN_ONLY)
        .await
        .unwrap_or_else(IntoResponse::into_response)
}

/// Generates an extractor that yields the [`AuthUser`] only when its role
/// satisfies the given [`AccessRule`].
#[macro_export]
macro_rules! require_roles {
    ($(#[$meta:meta])* $name:ident, $rule:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = eduplatform_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user = <$crate::middleware::auth::AuthUser as axum::extract::FromRequestParts<
                    $crate::state::AppState,
                >>::from_request_parts(parts, state)
                .await?;
                $crate::middleware::role::check_access(&auth_user, $rule)?;
                Ok($name(auth_user))
            }
        }
    };
}

require_roles!(
    /// ADMIN only.
    RequireAdmin,
    AccessRule::ADMIN_ONLY
);
require_roles!(
    /// INSTRUCTOR only.
    RequireInstructor,
    AccessRule::INSTRUCTOR_ONLY
);
require_roles!(
    /// STUDENT only.
    RequireStudent,
    AccessRule::STUDENT_ONLY
);
require_roles!(RequireInstructorOrAdmin, AccessRule::INSTRUCTOR_OR_ADMIN);
require_roles!(
    /// Any of the three roles.
    RequireAnyRole,
    AccessRule::ALL_ROLES
);
