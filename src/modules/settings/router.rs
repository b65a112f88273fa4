use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post, put},
};

use crate::middleware::role::require_admin;
use crate::modules::settings::controller::{get_settings, update_settings, upload_logo};
use crate::state::AppState;

/// Reading is public; every write sits behind [`require_admin`].
pub fn init_settings_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(get_settings).merge(
                put(update_settings).route_layer(from_fn_with_state(state.clone(), require_admin)),
            ),
        )
        .route(
            "/logo",
            post(upload_logo).route_layer(from_fn_with_state(state, require_admin)),
        )
}
