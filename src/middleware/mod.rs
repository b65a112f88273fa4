//! Request gatekeeping: authentication and role authorization.
//!
//! - [`auth`]: the [`auth::AuthUser`] extractor (token authenticator)
//! - [`role`]: `require_roles` middleware and the role extractors
//!
//! # Authentication Flow
//!
//! 1. Client sends `x-auth-token: <token>` or `Authorization: Bearer <token>`
//! 2. `AuthUser` verifies the token and yields the `Principal`
//! 3. The route's access rule is checked against the principal's role
//! 4. The handler runs; otherwise the request ends with 401 or 403
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::AuthUser;
//! use crate::middleware::role::RequireInstructor;
//!
//! // Any authenticated caller
//! async fn me(auth_user: AuthUser) -> impl IntoResponse { /* ... */ }
//!
//! // Instructors only
//! async fn grade(RequireInstructor(auth_user): RequireInstructor) -> impl IntoResponse { /* ... */ }
//! ```

pub mod auth;
pub mod role;
