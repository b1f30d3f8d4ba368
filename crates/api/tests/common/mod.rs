#![allow(dead_code)]

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use mediar_api::auth::jwt::JwtConfig;
use mediar_api::config::ServerConfig;
use mediar_api::router::build_app_router;
use mediar_api::state::AppState;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-integration-tests";
pub const TEST_ADMIN_TOKEN: &str = "test-admin-token";
pub const TEST_PASSWORD: &str = "contraseña-segura";

/// Build a test `ServerConfig` with safe defaults.
///
/// Storage directories live in a fresh temp dir per call. No SMTP, Stripe
/// or AI integration is configured.
pub fn test_config() -> ServerConfig {
    let root = tempfile::Builder::new()
        .prefix("mediar-test-")
        .tempdir()
        .unwrap()
        .keep();
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            expiry_mins: 60,
        },
        admin_token: TEST_ADMIN_TOKEN.to_string(),
        upload_dir: root.join("uploads"),
        actas_dir: root.join("actas"),
        acta_template_path: None,
        max_upload_bytes: 1024 * 1024,
        news_feeds: Vec::new(),
        stripe_webhook_secret: None,
    }
}

/// Build the full application router (same middleware stack as `main.rs`).
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_config(pool, test_config())
}

pub fn build_test_app_with_config(pool: PgPool, config: ServerConfig) -> Router {
    let state = AppState::new(pool, config.clone());
    build_app_router(state, &config)
}

/// Serve `router` on an ephemeral local port and return its base URL
/// (`http://127.0.0.1:<port>`). Stands in for third-party HTTP APIs.
pub async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    format!("http://{addr}")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Send a request carrying the `X-Admin-Token` header.
pub async fn send_admin(
    app: Router,
    method: Method,
    uri: &str,
    admin_token: &str,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-admin-token", admin_token);
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get_admin(app: Router, uri: &str) -> Response {
    send_admin(app, Method::GET, uri, TEST_ADMIN_TOKEN, None).await
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Account helpers
// ---------------------------------------------------------------------------

/// Register a mediator through the API and return its session token.
pub async fn register_mediador(app: Router, email: &str) -> String {
    let body = json!({
        "email": email,
        "password": TEST_PASSWORD,
        "nombre": "Ana",
        "apellido": "García",
        "matricula": "MP-1234",
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["token"].as_str().unwrap().to_string()
}

/// Register an institution through the API and return its session token.
pub async fn register_institucion(app: Router, email: &str) -> String {
    let body = json!({
        "email": email,
        "password": TEST_PASSWORD,
        "nombre": "Centro de Mediación Norte",
    });
    let response = post_json(app, "/api/v1/instituciones/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["token"].as_str().unwrap().to_string()
}
