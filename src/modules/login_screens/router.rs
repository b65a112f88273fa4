use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post},
};

use crate::middleware::role::require_admin;
use crate::modules::login_screens::controller::{
    activate_image, active_image, delete_image, list_images, upload_image,
};
use crate::state::AppState;

pub fn init_login_screens_router(state: AppState) -> Router<AppState> {
    let admin_routes = Router::new()
        .route("/", post(upload_image))
        .route("/{id}/activate", patch(activate_image))
        .route("/{id}", delete(delete_image))
        .route_layer(from_fn_with_state(state, require_admin));

    Router::new()
        .route("/", get(list_images))
        .route("/active", get(active_image))
        .merge(admin_routes)
}
