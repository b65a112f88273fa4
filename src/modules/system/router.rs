use axum::{Router, routing::get};

use crate::modules::system::controller::{api_index, download_submission, health};
use crate::state::AppState;

/// Routes mounted directly under `/api`.
pub fn init_system_router() -> Router<AppState> {
    Router::new()
        .route("/", get(api_index))
        .route("/health", get(health))
        .route("/download/submissions/{filename}", get(download_submission))
}
