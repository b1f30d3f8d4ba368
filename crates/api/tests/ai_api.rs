//! HTTP-level tests for the legal assistant against a local stand-in for the
//! completion API: document resolution, truncation, image dispatch and
//! upstream failures.

mod common;

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use common::{body_json, post_json_auth, register_mediador};
use mediar_api::config::ServerConfig;
use mediar_api::router::build_app_router;
use mediar_api::state::AppState;
use mediar_assist::{AssistConfig, Assistant, StorageRoots};
use serde_json::{json, Value};
use sqlx::PgPool;

const CHAT_URI: &str = "/api/v1/ai/legal/chat";
const MAX_DOCUMENT_CHARS: usize = 50;

#[derive(Clone)]
struct Completions {
    requests: Arc<Mutex<Vec<Value>>>,
    reply: Value,
}

async fn complete(State(stub): State<Completions>, Json(body): Json<Value>) -> Json<Value> {
    stub.requests.lock().unwrap().push(body);
    Json(stub.reply.clone())
}

fn answer_with(content: &str) -> Value {
    json!({
        "model": "modelo-de-prueba",
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    })
}

/// Start the completion stand-in; returns its API base and the requests it
/// will record.
async fn spawn_completions(reply: Value) -> (String, Arc<Mutex<Vec<Value>>>) {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let router = Router::new()
        .route("/v1/chat/completions", post(complete))
        .with_state(Completions {
            requests: requests.clone(),
            reply,
        });
    (format!("{}/v1", common::spawn_stub(router).await), requests)
}

/// App with the assistant pointed at `base_url`, plus its config so tests can
/// drop files into the upload root.
fn app_with_assistant(pool: PgPool, base_url: String) -> (Router, ServerConfig) {
    let config = common::test_config();
    std::fs::create_dir_all(&config.upload_dir).unwrap();

    let assistant = Assistant::new(
        AssistConfig {
            api_key: "sk-local".to_string(),
            model: "modelo-configurado".to_string(),
            base_url,
            max_document_chars: MAX_DOCUMENT_CHARS,
        },
        StorageRoots {
            uploads: config.upload_dir.clone(),
            actas: config.actas_dir.clone(),
        },
    )
    .unwrap();

    let mut state = AppState::new(pool, config.clone());
    state.assistant = Some(Arc::new(assistant));
    (build_app_router(state, &config), config)
}

fn user_content(request: &Value) -> &Value {
    &request["messages"][1]["content"]
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn long_text_documents_are_truncated(pool: PgPool) {
    let (base, requests) = spawn_completions(answer_with("Según el documento...")).await;
    let (app, config) = app_with_assistant(pool, base);
    let token = register_mediador(app.clone(), "ana@example.com").await;

    let text = format!("{}{}", "á".repeat(MAX_DOCUMENT_CHARS), "COLA-DESCARTADA");
    std::fs::write(config.upload_dir.join("convenio.txt"), text).unwrap();

    let body = json!({ "prompt": "¿Qué dice?", "document_url": "/files/uploads/convenio.txt" });
    let response = post_json_auth(app, CHAT_URI, body, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["answer"], "Según el documento...");
    assert_eq!(json["truncated"], true);
    assert_eq!(json["model"], "modelo-de-prueba");

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["model"], "modelo-configurado");
    assert_eq!(requests[0]["messages"][0]["role"], "system");
    let sent = user_content(&requests[0]).as_str().unwrap();
    assert!(sent.contains(&"á".repeat(MAX_DOCUMENT_CHARS)));
    assert!(!sent.contains("COLA-DESCARTADA"));
    assert!(sent.contains("¿Qué dice?"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn short_documents_are_sent_whole(pool: PgPool) {
    let (base, requests) = spawn_completions(answer_with("Breve.")).await;
    let (app, config) = app_with_assistant(pool, base);
    let token = register_mediador(app.clone(), "ana@example.com").await;
    std::fs::write(config.upload_dir.join("nota.md"), "Acuerdo parcial.").unwrap();

    // A bare file name resolves inside the upload root.
    let body = json!({ "prompt": "Resumí", "document_url": "nota.md" });
    let json = body_json(post_json_auth(app, CHAT_URI, body, &token).await).await;
    assert_eq!(json["truncated"], false);

    let requests = requests.lock().unwrap();
    assert!(user_content(&requests[0]).as_str().unwrap().contains("Acuerdo parcial."));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn images_are_sent_as_data_urls(pool: PgPool) {
    let (base, requests) = spawn_completions(answer_with("Es un acta firmada.")).await;
    let (app, config) = app_with_assistant(pool, base);
    let token = register_mediador(app.clone(), "ana@example.com").await;
    std::fs::write(config.upload_dir.join("foto.png"), b"\x89PNG\r\n\x1a\nfake").unwrap();

    let body = json!({ "prompt": "¿Qué ves?", "document_url": "/files/uploads/foto.png" });
    let response = post_json_auth(app, CHAT_URI, body, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["truncated"], false);

    let requests = requests.lock().unwrap();
    let parts = user_content(&requests[0]).as_array().unwrap();
    assert_eq!(parts[0]["type"], "text");
    assert_eq!(parts[0]["text"], "¿Qué ves?");
    assert_eq!(parts[1]["type"], "image_url");
    let url = parts[1]["image_url"]["url"].as_str().unwrap();
    assert!(url.starts_with("data:image/png;base64,"), "{url}");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unsupported_and_unsafe_references_are_rejected_before_calling_out(pool: PgPool) {
    let (base, requests) = spawn_completions(answer_with("no debería llegar")).await;
    let (app, config) = app_with_assistant(pool, base);
    let token = register_mediador(app.clone(), "ana@example.com").await;
    std::fs::write(config.upload_dir.join("programa.exe"), b"MZ").unwrap();

    for reference in ["/files/uploads/programa.exe", "../secretos.txt", "/files/uploads/a/b.txt"] {
        let body = json!({ "prompt": "Hola", "document_url": reference });
        let response = post_json_auth(app.clone(), CHAT_URI, body, &token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{reference}");
    }

    let body = json!({ "prompt": "Hola", "document_url": "/files/uploads/no-existe.txt" });
    let response = post_json_auth(app, CHAT_URI, body, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert!(requests.lock().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn completion_without_choices_is_a_bad_gateway(pool: PgPool) {
    let (base, _requests) =
        spawn_completions(json!({ "model": "modelo-de-prueba", "choices": [] })).await;
    let (app, _config) = app_with_assistant(pool, base);
    let token = register_mediador(app.clone(), "ana@example.com").await;

    let response = post_json_auth(app, CHAT_URI, json!({ "prompt": "Hola" }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "UPSTREAM_ERROR");
}
