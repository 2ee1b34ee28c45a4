use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::repositories;
use crate::services::accounts::DEFAULT_SCHOOL_NAME;
use crate::test_support::{self, TestContext};

async fn post(ctx: &TestContext, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::POST, uri, None, Some(body)))
        .await
        .expect("response");
    let status = response.status();
    (status, test_support::read_json(response).await)
}

async fn get_me(ctx: &TestContext, token: &str) -> (StatusCode, Value) {
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/v1/auth/me", Some(token), None))
        .await
        .expect("response");
    let status = response.status();
    (status, test_support::read_json(response).await)
}

#[tokio::test]
async fn register_student_issues_token_and_profile() {
    let ctx = test_support::setup_test_context().await;

    let (status, body) = post(
        &ctx,
        "/api/v1/auth/register",
        json!({ "email": "Student@X.com", "password": "password123", "name": " Sam " }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["token_type"], "bearer");
    assert_eq!(body["user"]["email"], "student@x.com");
    assert_eq!(body["user"]["name"], "Sam");
    assert_eq!(body["user"]["role"], "student");

    let token = body["access_token"].as_str().expect("token");
    let (status, me) = get_me(&ctx, token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "student@x.com");
    assert!(me["student_profile"].is_object());
    assert!(me["student_profile"]["school_id"].is_null());
}

#[tokio::test]
async fn register_school_admin_provisions_school() {
    let ctx = test_support::setup_test_context().await;

    let (status, body) = post(
        &ctx,
        "/api/v1/auth/register",
        json!({ "email": "sa@x.com", "password": "password123", "role": "school_admin" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let admin_id = body["user"]["id"].as_str().expect("id");
    let school = repositories::schools::find_by_admin(ctx.state.db(), admin_id)
        .await
        .expect("load school")
        .expect("school provisioned");
    assert_eq!(school.name, DEFAULT_SCHOOL_NAME);

    let token = body["access_token"].as_str().expect("token");
    let (_, me) = get_me(&ctx, token).await;
    assert!(me.get("student_profile").is_none());
}

#[tokio::test]
async fn register_rejects_admin_role_and_duplicate_email() {
    let ctx = test_support::setup_test_context().await;

    let (status, _) = post(
        &ctx,
        "/api/v1/auth/register",
        json!({ "email": "root@x.com", "password": "password123", "role": "admin" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(
        &ctx,
        "/api/v1/auth/register",
        json!({ "email": "t@x.com", "password": "password123", "role": "teacher" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post(
        &ctx,
        "/api/v1/auth/register",
        json!({ "email": "T@x.com", "password": "password123" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["detail"], "Email already registered");
}

#[tokio::test]
async fn register_validates_payload() {
    let ctx = test_support::setup_test_context().await;

    let (status, _) = post(
        &ctx,
        "/api/v1/auth/register",
        json!({ "email": "not-an-email", "password": "password123" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) =
        post(&ctx, "/api/v1/auth/register", json!({ "email": "a@x.com", "password": "short" }))
            .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_checks_password() {
    let ctx = test_support::setup_test_context().await;
    test_support::insert_teacher(ctx.state.db(), "t@x.com", None).await;

    let (status, body) = post(
        &ctx,
        "/api/v1/auth/login",
        json!({ "email": " T@X.com ", "password": test_support::TEST_PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["user"]["role"], "teacher");

    let (status, _) = post(
        &ctx,
        "/api/v1/auth/login",
        json!({ "email": "t@x.com", "password": "wrong-password" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = post(
        &ctx,
        "/api/v1/auth/login",
        json!({ "email": "nobody@x.com", "password": "wrong-password" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn deactivated_user_token_is_rejected() {
    let ctx = test_support::setup_test_context().await;
    let user = test_support::insert_teacher(ctx.state.db(), "t@x.com", None).await;
    let token = test_support::bearer_token(&user, ctx.state.settings());

    sqlx::query("UPDATE users SET is_active = FALSE WHERE id = $1")
        .bind(&user.id)
        .execute(ctx.state.db())
        .await
        .expect("deactivate");

    let (status, _) = get_me(&ctx, &token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
