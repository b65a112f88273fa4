use axum::{
    Router,
    routing::{get, post, put},
};

use crate::modules::submissions::controller::{
    all_submissions, create_submission, grade_submission, my_submissions,
};
use crate::state::AppState;

pub fn init_submissions_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_submission))
        .route("/me", get(my_submissions))
        .route("/all", get(all_submissions))
        .route("/{id}/grade", put(grade_submission))
}
