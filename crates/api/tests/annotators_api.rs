//! HTTP-level tests for annotator account management.

mod common;

use annotate_core::activity::actions;
use annotate_db::repositories::{ActivityLogRepo, UserRepo};
use axum::http::StatusCode;
use common::{
    admin_token, body_json, delete_auth, get_auth, post_json, post_json_auth, put_json_auth,
};
use sqlx::PgPool;

fn new_annotator(username: &str) -> serde_json::Value {
    serde_json::json!({
        "username": username,
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": format!("{username}@example.com"),
    })
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn created_password_can_log_in(pool: PgPool) {
    let (_admin, token) = admin_token(&pool).await;
    let app = common::build_test_app(pool.clone()).await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/admin/annotators",
        new_annotator("ada"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["annotator"]["role"], "annotator");
    let password = json["data"]["password"].as_str().unwrap().to_string();

    let body = serde_json::json!({ "username": "ada", "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let logs = ActivityLogRepo::list_by_action(&pool, actions::USER_CREATED)
        .await
        .unwrap();
    assert_eq!(logs.len(), 1);
    assert!(!logs[0].description.contains(&password));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_username_is_a_conflict(pool: PgPool) {
    let (_admin, token) = admin_token(&pool).await;
    let app = common::build_test_app(pool.clone()).await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/admin/annotators",
        new_annotator("ada"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let mut body = new_annotator("ada");
    body["email"] = serde_json::json!("other@example.com");
    let response = post_json_auth(app, "/api/v1/admin/annotators", body, &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let errors = ActivityLogRepo::list_by_action(&pool, actions::USER_CREATION_ERROR)
        .await
        .unwrap();
    assert_eq!(errors.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_email_is_rejected(pool: PgPool) {
    let (_admin, token) = admin_token(&pool).await;
    let app = common::build_test_app(pool).await;

    let mut body = new_annotator("ada");
    body["email"] = serde_json::json!("not-an-email");
    let response = post_json_auth(app, "/api/v1/admin/annotators", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_can_regenerate_the_password(pool: PgPool) {
    let (_admin, token) = admin_token(&pool).await;
    let app = common::build_test_app(pool.clone()).await;

    let json = body_json(
        post_json_auth(app.clone(), "/api/v1/admin/annotators", new_annotator("ada"), &token).await,
    )
    .await;
    let id = json["data"]["annotator"]["id"].as_i64().unwrap();
    let old_password = json["data"]["password"].as_str().unwrap().to_string();

    let uri = format!("/api/v1/admin/annotators/{id}");
    let body = serde_json::json!({ "first_name": "Augusta", "regenerate_password": true });
    let response = put_json_auth(app.clone(), &uri, body, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["annotator"]["first_name"], "Augusta");
    let new_password = json["data"]["password"].as_str().unwrap().to_string();
    assert_ne!(new_password, old_password);

    let body = serde_json::json!({ "username": "ada", "password": old_password });
    let response = post_json(app.clone(), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = serde_json::json!({ "username": "ada", "password": new_password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_without_regeneration_returns_no_password(pool: PgPool) {
    let (_admin, token) = admin_token(&pool).await;
    let app = common::build_test_app(pool.clone()).await;

    let json = body_json(
        post_json_auth(app.clone(), "/api/v1/admin/annotators", new_annotator("ada"), &token).await,
    )
    .await;
    let id = json["data"]["annotator"]["id"].as_i64().unwrap();

    let uri = format!("/api/v1/admin/annotators/{id}");
    let body = serde_json::json!({ "last_name": "Byron" });
    let json = body_json(put_json_auth(app, &uri, body, &token).await).await;
    assert_eq!(json["data"]["annotator"]["last_name"], "Byron");
    assert!(json["data"]["password"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_deactivates_the_account(pool: PgPool) {
    let (_admin, token) = admin_token(&pool).await;
    let app = common::build_test_app(pool.clone()).await;

    let json = body_json(
        post_json_auth(app.clone(), "/api/v1/admin/annotators", new_annotator("ada"), &token).await,
    )
    .await;
    let id = json["data"]["annotator"]["id"].as_i64().unwrap();

    let uri = format!("/api/v1/admin/annotators/{id}");
    let response = delete_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let user = UserRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert!(!user.is_active);

    let json = body_json(get_auth(app, &uri, &token).await).await;
    assert_eq!(json["data"]["is_active"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_annotator_is_not_found(pool: PgPool) {
    let (admin, token) = admin_token(&pool).await;
    let app = common::build_test_app(pool.clone()).await;

    let response = get_auth(app.clone(), "/api/v1/admin/annotators/999999", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Admins are not annotators.
    let uri = format!("/api/v1/admin/annotators/{}", admin.id);
    let response = get_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
