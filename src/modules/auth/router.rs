use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::auth::controller::{login, login_usage, me, register};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login).get(login_usage))
        .route("/me", get(me))
}
