use axum::{Router, routing::get};

use crate::modules::assignments::controller::{
    all_assignments, assignment_submissions, create_assignment, list_assignments, my_assignments,
};
use crate::state::AppState;

pub fn init_assignments_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_assignments).post(create_assignment))
        .route("/my-assignments", get(my_assignments))
        .route("/all", get(all_assignments))
        .route("/{id}/submissions", get(assignment_submissions))
}
