#![allow(dead_code)]

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use annotate_api::auth::jwt::{generate_access_token, JwtConfig};
use annotate_api::auth::password::hash_password;
use annotate_api::config::ServerConfig;
use annotate_api::router::build_app_router;
use annotate_api::state::AppState;
use annotate_core::ingest::ParsedPair;
use annotate_db::models::class::DatasetClass;
use annotate_db::models::dataset::{CreateDataset, Dataset};
use annotate_db::models::role::UserRole;
use annotate_db::models::user::{CreateUser, User};
use annotate_db::repositories::{ClassRepo, DatasetRepo, TextPairRepo, UserRepo};

pub const TEST_PASSWORD: &str = "test_password_123!";

pub fn test_jwt() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret-long-enough-for-hmac".to_string(),
        access_token_expiry_mins: 600,
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:4200".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        max_upload_bytes: 2 * 1024 * 1024,
        denylist_sweep_interval: std::time::Duration::from_secs(3600),
        jwt: test_jwt(),
    }
}

/// Build the full application router (same middleware stack as `main.rs`).
pub async fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState::new(pool, config.clone());
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should complete")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::post(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::post(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::post(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::put(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::delete(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

const BOUNDARY: &str = "annotate-test-boundary";

/// POST a `multipart/form-data` body made of text fields plus one file.
pub async fn post_multipart_auth(
    app: Router,
    uri: &str,
    fields: &[(&str, &str)],
    file: Option<(&str, &[u8])>,
    token: &str,
) -> Response<Body> {
    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, content)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
                 filename=\"{file_name}\"\r\nContent-Type: text/csv\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::post(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a user with [`TEST_PASSWORD`] directly in the database.
pub async fn create_user(pool: &PgPool, username: &str, role: UserRole) -> User {
    let input = CreateUser {
        first_name: format!("{username}-first"),
        last_name: format!("{username}-last"),
        username: username.to_string(),
        email: format!("{username}@test.com"),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role_id: role.id(),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Bearer token for `user`, signed with the test secret.
pub fn token_for(user: &User) -> String {
    let role = UserRole::from_id(user.role_id).expect("known role");
    generate_access_token(user.id, role.name(), &test_jwt()).expect("token should encode")
}

pub async fn admin_token(pool: &PgPool) -> (User, String) {
    let admin = create_user(pool, "admin", UserRole::Admin).await;
    let token = token_for(&admin);
    (admin, token)
}

/// Insert a dataset with `pairs` generated text pairs and the given classes.
pub async fn seed_dataset(
    pool: &PgPool,
    name: &str,
    pairs: usize,
    classes: &[&str],
) -> (Dataset, Vec<DatasetClass>) {
    let mut tx = pool.begin().await.unwrap();
    let dataset = DatasetRepo::create(
        &mut tx,
        &CreateDataset {
            name: name.to_string(),
            description: None,
        },
    )
    .await
    .unwrap();
    let rows: Vec<ParsedPair> = (0..pairs)
        .map(|i| ParsedPair {
            text1: format!("left {i}"),
            text2: format!("right {i}"),
        })
        .collect();
    TextPairRepo::create_batch(&mut tx, dataset.id, &rows)
        .await
        .unwrap();
    let names: Vec<String> = classes.iter().map(|c| c.to_string()).collect();
    let classes = ClassRepo::create_batch(&mut tx, dataset.id, &names)
        .await
        .unwrap();
    tx.commit().await.unwrap();
    (dataset, classes)
}
