mod common;

use axum::http::StatusCode;
use common::{TEST_PASSWORD, create_test_user, generate_unique_email, send, setup_test_app};
use learnhub::learnhub_auth::Role;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_register_creates_plain_user(pool: PgPool) {
    let (app, _) = setup_test_app(pool);
    let email = generate_unique_email();

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": email.to_uppercase(),
            "password": "a-long-password"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "USER");
    assert_eq!(body["email"], email);
    assert!(body.get("password").is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_duplicate_email_conflicts(pool: PgPool) {
    let user = create_test_user(&pool, Role::User).await;
    let (app, _) = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "first_name": "Dup",
            "last_name": "User",
            "email": user.email,
            "password": "a-long-password"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "User already exists");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_validation_errors(pool: PgPool) {
    let (app, _) = setup_test_app(pool);

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "first_name": "Short",
            "last_name": "Password",
            "email": generate_unique_email(),
            "password": "short"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "first_name": "No", "last_name": "Email", "password": "a-long-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "email is required");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_returns_token_pair_and_user(pool: PgPool) {
    let user = create_test_user(&pool, Role::Ceo).await;
    let (app, state) = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": user.email, "password": TEST_PASSWORD })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 900);
    assert_eq!(body["user"]["id"], user.id);
    assert_eq!(body["user"]["role"], "CEO");

    let claims = state
        .tokens
        .verify_access(body["access_token"].as_str().unwrap())
        .unwrap();
    assert_eq!(claims.id, user.id);
    assert_eq!(claims.role, Role::Ceo);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_failures_share_one_message(pool: PgPool) {
    let user = create_test_user(&pool, Role::User).await;
    let (app, _) = setup_test_app(pool);

    let (wrong_password, body_a) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": user.email, "password": "not-the-password" })),
    )
    .await;
    let (unknown_email, body_b) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "nobody@example.com", "password": TEST_PASSWORD })),
    )
    .await;

    assert_eq!(wrong_password, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email, StatusCode::UNAUTHORIZED);
    assert_eq!(body_a, body_b);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_picks_up_role_change(pool: PgPool) {
    let user = create_test_user(&pool, Role::User).await;
    let (app, state) = setup_test_app(pool.clone());
    let refresh = state.tokens.issue_refresh_token(user.id, Role::User).unwrap();

    sqlx::query("UPDATE users SET role = 'CEO' WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/refresh",
        None,
        Some(json!({ "refresh_token": refresh })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "CEO");
    let claims = state
        .tokens
        .verify_access(body["access_token"].as_str().unwrap())
        .unwrap();
    assert_eq!(claims.role, Role::Ceo);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_rejects_access_token_and_deleted_user(pool: PgPool) {
    let user = create_test_user(&pool, Role::User).await;
    let (app, state) = setup_test_app(pool.clone());

    let access = state.tokens.issue_access_token(user.id, user.role).unwrap();
    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/refresh",
        None,
        Some(json!({ "refresh_token": access })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let refresh = state.tokens.issue_refresh_token(user.id, user.role).unwrap();
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();
    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/refresh",
        None,
        Some(json!({ "refresh_token": refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "User no longer exists");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_me_returns_current_user(pool: PgPool) {
    let user = create_test_user(&pool, Role::Admin).await;
    let (app, state) = setup_test_app(pool);
    let token = common::access_token(&state, &user);

    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], user.email);
    assert_eq!(body["role"], "ADMIN");
}
