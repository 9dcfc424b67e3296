mod common;

use axum::http::StatusCode;
use common::{
    access_token, create_test_center, create_test_region, create_test_user, send, setup_test_app,
};
use learnhub::learnhub_auth::Role;
use serde_json::json;
use sqlx::PgPool;

async fn create_subject(pool: &PgPool, name: &str) -> i64 {
    sqlx::query_scalar::<_, i64>("INSERT INTO subjects (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_ceo_creates_center_with_subjects(pool: PgPool) {
    let ceo = create_test_user(&pool, Role::Ceo).await;
    let region_id = create_test_region(&pool).await;
    let math = create_subject(&pool, "Mathematics").await;
    let physics = create_subject(&pool, "Physics").await;
    let (app, state) = setup_test_app(pool);
    let token = access_token(&state, &ceo);

    let (status, body) = send(
        &app,
        "POST",
        "/api/centers",
        Some(&token),
        Some(json!({
            "name": "Bright Minds",
            "phone": "+998901234567",
            "address": "Amir Temur 12",
            "region_id": region_id,
            "subject_ids": [physics, math, math]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["owner_id"], ceo.id);
    assert_eq!(body["like_count"], 0);
    assert_eq!(body["comment_count"], 0);
    assert!(body["average_rating"].is_null());
    let subjects = body["subjects"].as_array().unwrap();
    assert_eq!(subjects.len(), 2);
    assert_eq!(subjects[0]["name"], "Mathematics");
    assert!(body["branches"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unknown_subject_ids_are_rejected(pool: PgPool) {
    let ceo = create_test_user(&pool, Role::Ceo).await;
    let region_id = create_test_region(&pool).await;
    let (app, state) = setup_test_app(pool.clone());
    let token = access_token(&state, &ceo);

    let (status, body) = send(
        &app,
        "POST",
        "/api/centers",
        Some(&token),
        Some(json!({
            "name": "Ghost Center",
            "phone": "+998901234567",
            "address": "Nowhere 1",
            "region_id": region_id,
            "subject_ids": [999999]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unknown subject ids: [999999]");

    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM learning_centers")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_center_filters(pool: PgPool) {
    let ceo = create_test_user(&pool, Role::Ceo).await;
    let north = create_test_region(&pool).await;
    let south = create_test_region(&pool).await;
    let math = create_subject(&pool, "Mathematics").await;
    let tagged = create_test_center(&pool, ceo.id, north).await;
    create_test_center(&pool, ceo.id, north).await;
    create_test_center(&pool, ceo.id, south).await;
    sqlx::query("INSERT INTO center_subjects (center_id, subject_id) VALUES ($1, $2)")
        .bind(tagged)
        .bind(math)
        .execute(&pool)
        .await
        .unwrap();
    let (app, _) = setup_test_app(pool);

    let (status, body) = send(&app, "GET", &format!("/api/centers?region_id={}", north), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 2);

    let (_, body) = send(&app, "GET", &format!("/api/centers?subject_id={}", math), None, None).await;
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["id"], tagged);

    let (_, body) = send(&app, "GET", "/api/centers?region_id=", None, None).await;
    assert_eq!(body["meta"]["total"], 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_only_owner_or_staff_manage_center(pool: PgPool) {
    let owner = create_test_user(&pool, Role::Ceo).await;
    let rival = create_test_user(&pool, Role::Ceo).await;
    let admin = create_test_user(&pool, Role::Admin).await;
    let region_id = create_test_region(&pool).await;
    let center_id = create_test_center(&pool, owner.id, region_id).await;
    let (app, state) = setup_test_app(pool);
    let uri = format!("/api/centers/{}", center_id);

    let (status, body) = send(
        &app,
        "PATCH",
        &uri,
        Some(&access_token(&state, &rival)),
        Some(json!({ "name": "Hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "You do not manage this learning center");

    let (status, body) = send(
        &app,
        "PATCH",
        &uri,
        Some(&access_token(&state, &owner)),
        Some(json!({ "description": "Evening classes" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["description"], "Evening classes");

    let (status, _) = send(&app, "DELETE", &uri, Some(&access_token(&state, &admin)), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_branch_belongs_to_managed_center(pool: PgPool) {
    let owner = create_test_user(&pool, Role::Ceo).await;
    let rival = create_test_user(&pool, Role::Ceo).await;
    let region_id = create_test_region(&pool).await;
    let center_id = create_test_center(&pool, owner.id, region_id).await;
    let (app, state) = setup_test_app(pool);
    let branch = json!({
        "name": "Chilonzor branch",
        "phone": "+998907654321",
        "address": "Chilonzor 5",
        "center_id": center_id,
        "region_id": region_id
    });

    let (status, _) = send(
        &app,
        "POST",
        "/api/branches",
        Some(&access_token(&state, &rival)),
        Some(branch.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, created) = send(
        &app,
        "POST",
        "/api/branches",
        Some(&access_token(&state, &owner)),
        Some(branch),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["center_id"], center_id);

    let (_, details) = send(&app, "GET", &format!("/api/centers/{}", center_id), None, None).await;
    assert_eq!(details["branches"][0]["id"], created["id"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_region_in_use_cannot_be_deleted(pool: PgPool) {
    let admin = create_test_user(&pool, Role::Admin).await;
    let region_id = create_test_region(&pool).await;
    create_test_center(&pool, admin.id, region_id).await;
    let (app, state) = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/regions/{}", region_id),
        Some(&access_token(&state, &admin)),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Region is still used by learning centers");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_name_filter_treats_wildcards_literally(pool: PgPool) {
    create_subject(&pool, "Math").await;
    create_subject(&pool, "100% English").await;
    create_subject(&pool, "Web_Design").await;
    let (app, _) = setup_test_app(pool);

    let (status, body) = send(&app, "GET", "/api/subjects?name=%25", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["name"], "100% English");

    let (_, body) = send(&app, "GET", "/api/subjects?name=_", None, None).await;
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["name"], "Web_Design");

    let (_, body) = send(&app, "GET", "/api/subjects?name=math", None, None).await;
    assert_eq!(body["meta"]["total"], 1);
}
