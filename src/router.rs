use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::routing::get;
use axum::{Router, middleware};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use eduplatform_config::{AllowedOrigins, CorsConfig};

use crate::docs::ApiDoc;
use crate::logging::{REQUEST_ID_HEADER, logging_middleware};
use crate::metrics::metrics_middleware;
use crate::middleware::auth::AUTH_TOKEN_HEADER;
use crate::modules::assignments::router::init_assignments_router;
use crate::modules::auth::router::init_auth_router;
use crate::modules::login_screens::router::init_login_screens_router;
use crate::modules::settings::router::init_settings_router;
use crate::modules::submissions::router::init_submissions_router;
use crate::modules::system::controller::banner;
use crate::modules::system::router::init_system_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;

/// Multipart bodies carry files up to 20 MB plus form overhead.
pub const MAX_REQUEST_BYTES: usize = 25 * 1024 * 1024;

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    match &config.allowed_origins {
        AllowedOrigins::Any => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        AllowedOrigins::List(origins) => {
            let allowed: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!(%origin, "Ignoring unparsable CORS origin");
                        None
                    }
                })
                .collect();

            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    header::AUTHORIZATION,
                    header::CONTENT_TYPE,
                    header::ACCEPT,
                    HeaderName::from_static(AUTH_TOKEN_HEADER),
                    HeaderName::from_static(REQUEST_ID_HEADER),
                ])
                .allow_credentials(true)
        }
    }
}

pub fn init_router(state: AppState) -> Router {
    let api = init_system_router()
        .nest("/auth", init_auth_router())
        .nest("/users", init_users_router())
        .nest("/assignments", init_assignments_router())
        .nest("/submissions", init_submissions_router())
        .nest("/settings", init_settings_router(state.clone()))
        .nest(
            "/login-screen-images",
            init_login_screens_router(state.clone()),
        );

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .route("/", get(banner))
        .nest("/api", api)
        .nest_service(
            &state.storage_config.public_prefix,
            ServeDir::new(&state.storage_config.upload_dir),
        )
        .with_state(state.clone())
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(metrics_middleware))
        .layer(cors_layer(&state.cors_config))
        .layer(middleware::from_fn(logging_middleware))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_builds_for_both_modes() {
        let _ = cors_layer(&CorsConfig {
            allowed_origins: AllowedOrigins::Any,
        });
        let _ = cors_layer(&CorsConfig {
            allowed_origins: AllowedOrigins::List(vec![
                "http://localhost:5173".to_string(),
                "not a header\n".to_string(),
            ]),
        });
    }
}
