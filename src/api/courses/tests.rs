use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::db::types::UserRole;
use crate::test_support::{self, TestContext};

async fn call(
    ctx: &TestContext,
    method: Method,
    uri: &str,
    token: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(method, uri, Some(token), body))
        .await
        .expect("response");
    let status = response.status();
    (status, test_support::read_json(response).await)
}

async fn course_count(ctx: &TestContext) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM courses")
        .fetch_one(ctx.state.db())
        .await
        .expect("count courses")
}

#[tokio::test]
async fn teacher_creates_independent_course() {
    let ctx = test_support::setup_test_context().await;
    let teacher = test_support::insert_teacher(ctx.state.db(), "t@x.com", None).await;
    let token = test_support::bearer_token(&teacher, ctx.state.settings());

    let (status, body) = call(
        &ctx,
        Method::POST,
        "/api/v1/courses",
        &token,
        Some(json!({
            "title": "  Algebra  ",
            "description": "Linear equations",
            "price": 120.0,
            "schedule": { "days": ["mon", "wed"], "start_time": "16:00" }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["title"], "Algebra");
    assert_eq!(body["teacher_id"], teacher.id.as_str());
    assert!(body["school_id"].is_null());
    assert_eq!(body["schedule"]["days"], json!(["mon", "wed"]));
}

#[tokio::test]
async fn school_admin_without_teacher_id_creates_nothing() {
    let ctx = test_support::setup_test_context().await;
    let admin = test_support::insert_user(ctx.state.db(), "sa@x.com", "SA", UserRole::SchoolAdmin)
        .await;
    test_support::insert_school(ctx.state.db(), &admin, "North School").await;
    let token = test_support::bearer_token(&admin, ctx.state.settings());

    let (status, body) = call(
        &ctx,
        Method::POST,
        "/api/v1/courses",
        &token,
        Some(json!({ "title": "Physics", "price": 10.0 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "teacher_id is required for school courses");
    assert_eq!(course_count(&ctx).await, 0);
}

#[tokio::test]
async fn school_admin_creates_course_for_teacher() {
    let ctx = test_support::setup_test_context().await;
    let admin = test_support::insert_user(ctx.state.db(), "sa@x.com", "SA", UserRole::SchoolAdmin)
        .await;
    let school = test_support::insert_school(ctx.state.db(), &admin, "North School").await;
    let teacher = test_support::insert_teacher(ctx.state.db(), "t@x.com", Some(&school.id)).await;
    let token = test_support::bearer_token(&admin, ctx.state.settings());

    let (status, body) = call(
        &ctx,
        Method::POST,
        "/api/v1/courses",
        &token,
        Some(json!({ "title": "Physics", "price": 10.0, "teacherId": teacher.id })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["school_id"], school.id.as_str());
    assert_eq!(body["teacher_id"], teacher.id.as_str());
}

#[tokio::test]
async fn school_admin_with_unknown_teacher_is_bad_request() {
    let ctx = test_support::setup_test_context().await;
    let admin = test_support::insert_user(ctx.state.db(), "sa@x.com", "SA", UserRole::SchoolAdmin)
        .await;
    test_support::insert_school(ctx.state.db(), &admin, "North School").await;
    let token = test_support::bearer_token(&admin, ctx.state.settings());

    let (status, _) = call(
        &ctx,
        Method::POST,
        "/api/v1/courses",
        &token,
        Some(json!({ "title": "Physics", "price": 10.0, "teacher_id": "missing" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(course_count(&ctx).await, 0);
}

#[tokio::test]
async fn students_and_admins_cannot_create_courses() {
    let ctx = test_support::setup_test_context().await;
    let student =
        test_support::insert_user(ctx.state.db(), "s@x.com", "S", UserRole::Student).await;
    let admin = test_support::insert_user(ctx.state.db(), "a@x.com", "A", UserRole::Admin).await;

    for user in [student, admin] {
        let token = test_support::bearer_token(&user, ctx.state.settings());
        let (status, _) = call(
            &ctx,
            Method::POST,
            "/api/v1/courses",
            &token,
            Some(json!({ "title": "Nope", "price": 0.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
    assert_eq!(course_count(&ctx).await, 0);
}

#[tokio::test]
async fn course_listing_is_scoped_by_role() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();
    let admin = test_support::insert_user(db, "sa@x.com", "SA", UserRole::SchoolAdmin).await;
    let school = test_support::insert_school(db, &admin, "North School").await;
    let school_teacher = test_support::insert_teacher(db, "t1@x.com", Some(&school.id)).await;
    let solo_teacher = test_support::insert_teacher(db, "t2@x.com", None).await;
    let student = test_support::insert_user(db, "s@x.com", "S", UserRole::Student).await;

    test_support::insert_course(db, "School course", Some(&school_teacher.id), Some(&school.id))
        .await;
    test_support::insert_course(db, "Solo course", Some(&solo_teacher.id), None).await;

    let titles = |body: &Value| -> Vec<String> {
        let mut titles: Vec<String> = body
            .as_array()
            .expect("array")
            .iter()
            .map(|course| course["title"].as_str().expect("title").to_string())
            .collect();
        titles.sort();
        titles
    };

    let token = test_support::bearer_token(&solo_teacher, ctx.state.settings());
    let (_, body) = call(&ctx, Method::GET, "/api/v1/courses", &token, None).await;
    assert_eq!(titles(&body), vec!["Solo course"]);

    let token = test_support::bearer_token(&admin, ctx.state.settings());
    let (_, body) = call(&ctx, Method::GET, "/api/v1/courses", &token, None).await;
    assert_eq!(titles(&body), vec!["School course"]);
    assert_eq!(body[0]["school_name"], "North School");

    let token = test_support::bearer_token(&student, ctx.state.settings());
    let (_, body) = call(&ctx, Method::GET, "/api/v1/courses", &token, None).await;
    assert_eq!(titles(&body), vec!["School course", "Solo course"]);
}

#[tokio::test]
async fn invite_by_foreign_teacher_is_forbidden_even_for_unknown_student() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();
    let owner = test_support::insert_teacher(db, "owner@x.com", None).await;
    let stranger = test_support::insert_teacher(db, "stranger@x.com", None).await;
    test_support::insert_user(db, "s@x.com", "S", UserRole::Student).await;
    let course = test_support::insert_course(db, "Solo course", Some(&owner.id), None).await;
    let token = test_support::bearer_token(&stranger, ctx.state.settings());
    let uri = format!("/api/v1/courses/{}/invite", course.id);

    for email in ["s@x.com", "nobody@x.com"] {
        let (status, _) =
            call(&ctx, Method::POST, &uri, &token, Some(json!({ "email": email }))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM enrollments")
        .fetch_one(db)
        .await
        .expect("count");
    assert_eq!(count, 0);
}

#[tokio::test]
async fn invite_rejects_unknown_course_missing_user_and_non_students() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();
    let teacher = test_support::insert_teacher(db, "t@x.com", None).await;
    test_support::insert_teacher(db, "other@x.com", None).await;
    let course = test_support::insert_course(db, "Solo course", Some(&teacher.id), None).await;
    let token = test_support::bearer_token(&teacher, ctx.state.settings());
    let uri = format!("/api/v1/courses/{}/invite", course.id);

    let (status, _) = call(
        &ctx,
        Method::POST,
        "/api/v1/courses/missing/invite",
        &token,
        Some(json!({ "email": "s@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) =
        call(&ctx, Method::POST, &uri, &token, Some(json!({ "email": "nobody@x.com" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Student not found");

    let (status, body) =
        call(&ctx, Method::POST, &uri, &token, Some(json!({ "email": "other@x.com" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "User is not a student");
}

#[tokio::test]
async fn course_enrollments_require_ownership() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();
    let owner = test_support::insert_teacher(db, "owner@x.com", None).await;
    let stranger = test_support::insert_teacher(db, "stranger@x.com", None).await;
    let student = test_support::insert_user(db, "s@x.com", "Sam", UserRole::Student).await;
    let course = test_support::insert_course(db, "Solo course", Some(&owner.id), None).await;
    let uri = format!("/api/v1/courses/{}/enrollments", course.id);

    let student_token = test_support::bearer_token(&student, ctx.state.settings());
    let (status, _) = call(
        &ctx,
        Method::POST,
        &format!("/api/v1/courses/{}/request-access", course.id),
        &student_token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let token = test_support::bearer_token(&stranger, ctx.state.settings());
    let (status, _) = call(&ctx, Method::GET, &uri, &token, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let token = test_support::bearer_token(&owner, ctx.state.settings());
    let (status, body) = call(&ctx, Method::GET, &uri, &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["status"], "pending");
    assert_eq!(body[0]["student_email"], "s@x.com");
    assert_eq!(body[0]["student_name"], "Sam");
}
