mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{
    access_token, create_test_center, create_test_region, create_test_user, send, setup_test_app,
};
use learnhub::learnhub_auth::Role;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_comments_drive_center_rating(pool: PgPool) {
    let owner = create_test_user(&pool, Role::Ceo).await;
    let alice = create_test_user(&pool, Role::User).await;
    let bob = create_test_user(&pool, Role::User).await;
    let region_id = create_test_region(&pool).await;
    let center_id = create_test_center(&pool, owner.id, region_id).await;
    let (app, state) = setup_test_app(pool);

    for (user, star) in [(&alice, 5), (&bob, 2)] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/comments",
            Some(&access_token(&state, user)),
            Some(json!({ "text": "Visited", "star": star, "center_id": center_id })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, center) = send(&app, "GET", &format!("/api/centers/{}", center_id), None, None).await;
    assert_eq!(center["comment_count"], 2);
    assert_eq!(center["average_rating"], 3.5);

    let (status, comments) = send(
        &app,
        "GET",
        &format!("/api/comments?center_id={}", center_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(comments["meta"]["total"], 2);
    assert_eq!(comments["data"][0]["author_first_name"], "Test");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_comment_rules(pool: PgPool) {
    let owner = create_test_user(&pool, Role::Ceo).await;
    let author = create_test_user(&pool, Role::User).await;
    let other = create_test_user(&pool, Role::User).await;
    let admin = create_test_user(&pool, Role::Admin).await;
    let region_id = create_test_region(&pool).await;
    let center_id = create_test_center(&pool, owner.id, region_id).await;
    let (app, state) = setup_test_app(pool);

    let (status, _) = send(
        &app,
        "POST",
        "/api/comments",
        Some(&access_token(&state, &author)),
        Some(json!({ "text": "Too good", "star": 6, "center_id": center_id })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, comment) = send(
        &app,
        "POST",
        "/api/comments",
        Some(&access_token(&state, &author)),
        Some(json!({ "text": "Fine", "star": 4, "center_id": center_id })),
    )
    .await;
    let uri = format!("/api/comments/{}", comment["id"]);

    let (status, _) = send(
        &app,
        "PATCH",
        &uri,
        Some(&access_token(&state, &other)),
        Some(json!({ "star": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "DELETE", &uri, Some(&access_token(&state, &other)), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "DELETE", &uri, Some(&access_token(&state, &admin)), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_like_once_then_unlike(pool: PgPool) {
    let owner = create_test_user(&pool, Role::Ceo).await;
    let fan = create_test_user(&pool, Role::User).await;
    let region_id = create_test_region(&pool).await;
    let center_id = create_test_center(&pool, owner.id, region_id).await;
    let (app, state) = setup_test_app(pool);
    let token = access_token(&state, &fan);

    let (status, _) = send(&app, "POST", "/api/likes", Some(&token), Some(json!({ "center_id": center_id }))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, "POST", "/api/likes", Some(&token), Some(json!({ "center_id": center_id }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, mine) = send(&app, "GET", "/api/likes/me", Some(&token), None).await;
    assert_eq!(mine[0]["center_id"], center_id);

    let (_, center) = send(&app, "GET", &format!("/api/centers/{}", center_id), None, None).await;
    assert_eq!(center["like_count"], 1);

    let uri = format!("/api/likes/{}", center_id);
    let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_registration_lifecycle(pool: PgPool) {
    let owner = create_test_user(&pool, Role::Ceo).await;
    let rival = create_test_user(&pool, Role::Ceo).await;
    let student = create_test_user(&pool, Role::User).await;
    let region_id = create_test_region(&pool).await;
    let center_id = create_test_center(&pool, owner.id, region_id).await;
    let rival_center = create_test_center(&pool, rival.id, region_id).await;
    let (app, state) = setup_test_app(pool);
    let student_token = access_token(&state, &student);
    let visit_date = Utc::now() + Duration::days(3);

    let (status, _) = send(
        &app,
        "POST",
        "/api/registrations",
        Some(&student_token),
        Some(json!({ "center_id": center_id, "visit_date": Utc::now() - Duration::days(1) })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, registration) = send(
        &app,
        "POST",
        "/api/registrations",
        Some(&student_token),
        Some(json!({ "center_id": center_id, "visit_date": visit_date })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(registration["status"], "PENDING");

    let (status, _) = send(
        &app,
        "POST",
        "/api/registrations",
        Some(&student_token),
        Some(json!({ "center_id": rival_center, "visit_date": visit_date })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Owners only see registrations for their own centers.
    let (status, listed) = send(&app, "GET", "/api/registrations", Some(&access_token(&state, &owner)), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["meta"]["total"], 1);

    let (status, _) = send(&app, "GET", "/api/registrations", Some(&student_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let status_uri = format!("/api/registrations/{}/status", registration["id"]);
    let (status, _) = send(
        &app,
        "PATCH",
        &status_uri,
        Some(&access_token(&state, &rival)),
        Some(json!({ "status": "ACCEPTED" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, updated) = send(
        &app,
        "PATCH",
        &status_uri,
        Some(&access_token(&state, &owner)),
        Some(json!({ "status": "ACCEPTED" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "ACCEPTED");

    let (_, mine) = send(&app, "GET", "/api/registrations/me", Some(&student_token), None).await;
    assert_eq!(mine.as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_registration_branch_must_match_center(pool: PgPool) {
    let owner = create_test_user(&pool, Role::Ceo).await;
    let student = create_test_user(&pool, Role::User).await;
    let region_id = create_test_region(&pool).await;
    let center_id = create_test_center(&pool, owner.id, region_id).await;
    let other_center = create_test_center(&pool, owner.id, region_id).await;
    let foreign_branch = sqlx::query_scalar::<_, i64>(
        "INSERT INTO branches (name, phone, address, center_id, region_id)
         VALUES ('Elsewhere', '+998900000000', 'Street 9', $1, $2) RETURNING id",
    )
    .bind(other_center)
    .bind(region_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    let (app, state) = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/registrations",
        Some(&access_token(&state, &student)),
        Some(json!({
            "center_id": center_id,
            "branch_id": foreign_branch,
            "visit_date": Utc::now() + Duration::days(1)
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Branch does not belong to this learning center");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_resources_owned_by_publisher(pool: PgPool) {
    let admin = create_test_user(&pool, Role::Admin).await;
    let publisher = create_test_user(&pool, Role::User).await;
    let stranger = create_test_user(&pool, Role::User).await;
    let (app, state) = setup_test_app(pool);

    let (status, category) = send(
        &app,
        "POST",
        "/api/resource-categories",
        Some(&access_token(&state, &admin)),
        Some(json!({ "name": "Books" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, resource) = send(
        &app,
        "POST",
        "/api/resources",
        Some(&access_token(&state, &publisher)),
        Some(json!({
            "name": "Calculus Made Easy",
            "media": "https://example.com/calculus.pdf",
            "category_id": category["id"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(resource["user_id"], publisher.id);

    let uri = format!("/api/resources/{}", resource["id"]);
    let (status, _) = send(
        &app,
        "PATCH",
        &uri,
        Some(&access_token(&state, &stranger)),
        Some(json!({ "name": "Mine now" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, listed) = send(
        &app,
        "GET",
        &format!("/api/resources?category_id={}&name=calculus", category["id"]),
        None,
        None,
    )
    .await;
    assert_eq!(listed["meta"]["total"], 1);

    let (status, _) = send(&app, "DELETE", &uri, Some(&access_token(&state, &publisher)), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
