use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::users::controller::{
    change_password, list_instructors, list_my_students, list_users, reset_password,
};
use crate::state::AppState;

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/instructors", get(list_instructors))
        .route("/students", get(list_my_students))
        .route("/change-password", post(change_password))
        .route("/{id}/reset-password", post(reset_password))
}
