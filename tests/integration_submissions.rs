mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use eduplatform::router::init_router;
use eduplatform_auth::Role;
use common::{
    create_assignment, create_user, get, json_request, multipart_request, send, state_with,
    token_for,
};

struct Fixture {
    instructor: Uuid,
    student: Uuid,
    assignment: Uuid,
}

async fn fixture(pool: &PgPool) -> Fixture {
    let (instructor, _) = create_user(pool, "Rivera", Role::Instructor, None, "secret1").await;
    let (student, _) = create_user(pool, "Student", Role::Student, Some(instructor), "secret1").await;
    let assignment = create_assignment(pool, instructor, "Essay").await;
    Fixture {
        instructor,
        student,
        assignment,
    }
}

fn submit(f: &Fixture, file_name: &str) -> axum::http::Request<axum::body::Body> {
    let assignment_id = f.assignment.to_string();
    multipart_request(
        "POST",
        "/api/submissions",
        &token_for(f.student.to_string(), Role::Student),
        &[("assignmentId", assignment_id.as_str())],
        Some(("file", file_name, "text/plain", b"my answer")),
    )
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_resubmission_replaces_until_graded(pool: PgPool) {
    let uploads = tempfile::tempdir().unwrap();
    let f = fixture(&pool).await;
    let app = || init_router(state_with(pool.clone(), uploads.path()));

    let (status, first) = send(app(), submit(&f, "v1.txt")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["status"], "SUBMITTED");

    let (status, second) = send(app(), submit(&f, "v2.txt")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(second["id"], first["id"]);
    assert!(second["filePath"].as_str().unwrap().ends_with("_v2.txt"));

    let grade_uri = format!("/api/submissions/{}/grade", second["id"].as_str().unwrap());
    let (status, graded) = send(
        app(),
        json_request(
            "PUT",
            &grade_uri,
            Some(&token_for(f.instructor.to_string(), Role::Instructor)),
            json!({ "marks": "85", "feedback": "Good" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(graded["status"], "GRADED");
    assert_eq!(graded["marks"], 85);
    assert!(graded["gradedAt"].is_string());

    let (status, body) = send(app(), submit(&f, "v3.txt")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "This assignment has already been graded. Resubmission is not allowed."
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_only_owning_instructor_grades(pool: PgPool) {
    let uploads = tempfile::tempdir().unwrap();
    let f = fixture(&pool).await;
    let (stranger, _) = create_user(&pool, "Stranger", Role::Instructor, None, "secret1").await;
    let app = || init_router(state_with(pool.clone(), uploads.path()));

    let (_, submission) = send(app(), submit(&f, "essay.txt")).await;
    let grade_uri = format!("/api/submissions/{}/grade", submission["id"].as_str().unwrap());

    let (status, body) = send(
        app(),
        json_request(
            "PUT",
            &grade_uri,
            Some(&token_for(stranger.to_string(), Role::Instructor)),
            json!({ "marks": 10 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "You are not authorized to grade this submission");

    let (status, body) = send(
        app(),
        json_request(
            "PUT",
            &format!("/api/submissions/{}/grade", Uuid::new_v4()),
            Some(&token_for(f.instructor.to_string(), Role::Instructor)),
            json!({ "marks": 10 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Submission not found");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_student_lists_and_downloads_own_submission(pool: PgPool) {
    let uploads = tempfile::tempdir().unwrap();
    let f = fixture(&pool).await;
    let app = || init_router(state_with(pool.clone(), uploads.path()));

    let (_, submission) = send(app(), submit(&f, "answer.txt")).await;

    let (status, page) = send(
        app(),
        get(
            "/api/submissions/me",
            Some(&token_for(f.student.to_string(), Role::Student)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["id"], submission["id"]);

    let file_name = submission["filePath"]
        .as_str()
        .unwrap()
        .rsplit('/')
        .next()
        .unwrap()
        .to_string();
    let response = tower::ServiceExt::oneshot(
        app(),
        get(&format!("/api/download/submissions/{file_name}"), None),
    )
    .await
    .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(disposition.starts_with("attachment"));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_submit_to_missing_assignment_is_404(pool: PgPool) {
    let uploads = tempfile::tempdir().unwrap();
    let mut f = fixture(&pool).await;
    f.assignment = Uuid::new_v4();

    let (status, body) = send(
        init_router(state_with(pool, uploads.path())),
        submit(&f, "x.txt"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Assignment not found");
}
