mod common;

use axum::http::StatusCode;
use sqlx::PgPool;

use eduplatform::router::init_router;
use eduplatform_auth::Role;
use common::{create_assignment, create_user, get, multipart_request, send, state_with, token_for};

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_instructor_creates_assignment_with_attachment(pool: PgPool) {
    let uploads = tempfile::tempdir().unwrap();
    let (instructor_id, _) = create_user(&pool, "Rivera", Role::Instructor, None, "secret1").await;
    let token = token_for(instructor_id.to_string(), Role::Instructor);

    let request = multipart_request(
        "POST",
        "/api/assignments",
        &token,
        &[
            ("title", "Essay"),
            ("description", "Write 500 words"),
            ("dueDate", "2030-01-15"),
        ],
        Some(("attachment", "brief.pdf", "application/pdf", b"%PDF-1.4")),
    );
    let (status, body) = send(init_router(state_with(pool.clone(), uploads.path())), request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Essay");
    assert_eq!(body["instructorId"], instructor_id.to_string());

    let url = body["attachmentUrl"].as_str().unwrap();
    let key = url.strip_prefix("/uploads/").unwrap();
    assert!(uploads.path().join(key).exists());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_bad_due_date_is_400(pool: PgPool) {
    let uploads = tempfile::tempdir().unwrap();
    let (instructor_id, _) = create_user(&pool, "Rivera", Role::Instructor, None, "secret1").await;
    let token = token_for(instructor_id.to_string(), Role::Instructor);

    let request = multipart_request(
        "POST",
        "/api/assignments",
        &token,
        &[("title", "Essay"), ("description", "d"), ("dueDate", "someday")],
        None,
    );
    let (status, body) = send(init_router(state_with(pool, uploads.path())), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "dueDate must be a valid date");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_listing_is_paginated_by_due_date(pool: PgPool) {
    let uploads = tempfile::tempdir().unwrap();
    let (instructor_id, _) = create_user(&pool, "Rivera", Role::Instructor, None, "secret1").await;
    for title in ["A", "B", "C"] {
        create_assignment(&pool, instructor_id, title).await;
    }
    let (student_id, _) =
        create_user(&pool, "Student", Role::Student, Some(instructor_id), "secret1").await;
    let token = token_for(student_id.to_string(), Role::Student);

    let (status, body) = send(
        init_router(state_with(pool, uploads.path())),
        get("/api/assignments?page=2&pageSize=2", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["items"][0]["instructor"]["name"], "Rivera");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_only_owner_or_admin_sees_submissions(pool: PgPool) {
    let uploads = tempfile::tempdir().unwrap();
    let (owner, _) = create_user(&pool, "Owner", Role::Instructor, None, "secret1").await;
    let (other, _) = create_user(&pool, "Other", Role::Instructor, None, "secret1").await;
    let (admin, _) = create_user(&pool, "Admin", Role::Admin, None, "secret1").await;
    let assignment = create_assignment(&pool, owner, "Lab").await;
    let uri = format!("/api/assignments/{assignment}/submissions");
    let app = || init_router(state_with(pool.clone(), uploads.path()));

    let (status, body) = send(
        app(),
        get(&uri, Some(&token_for(other.to_string(), Role::Instructor))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "User not authorized to view these submissions");

    let (status, _) = send(
        app(),
        get(&uri, Some(&token_for(owner.to_string(), Role::Instructor))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        app(),
        get("/api/assignments/all", Some(&token_for(admin.to_string(), Role::Admin))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["_count"]["submissions"], 0);

    let missing = format!("/api/assignments/{}/submissions", uuid::Uuid::new_v4());
    let (status, body) = send(
        app(),
        get(&missing, Some(&token_for(admin.to_string(), Role::Admin))),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Assignment not found");
}
