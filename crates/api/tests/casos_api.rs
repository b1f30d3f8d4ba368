//! HTTP-level tests for cases, agenda events, and institution notes.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get_auth, post_json_auth, put_json_auth, register_institucion,
    register_mediador,
};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Casos
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_list_and_get_own_case(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_mediador(app.clone(), "ana@example.com").await;

    let body = json!({ "titulo": "Pérez c/ Gómez", "partes": "Pérez, Gómez", "materia": "Alquiler" });
    let response = post_json_auth(app.clone(), "/api/v1/casos", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let caso = body_json(response).await;
    assert_eq!(caso["estado"], "abierto");
    assert_eq!(caso["owner_kind"], "mediador");
    assert_eq!(caso["owner_email"], "ana@example.com");
    assert!(caso["fecha_cierre"].is_null());
    let id = caso["id"].as_i64().unwrap();

    let response = get_auth(app.clone(), "/api/v1/casos", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let list = body_json(response).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);

    let response = get_auth(app, &format!("/api/v1/casos/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["titulo"], "Pérez c/ Gómez");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn another_owner_gets_403_and_missing_case_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let ana = register_mediador(app.clone(), "ana@example.com").await;
    let luis = register_mediador(app.clone(), "luis@example.com").await;

    let response =
        post_json_auth(app.clone(), "/api/v1/casos", json!({ "titulo": "Privado" }), &ana).await;
    let id = body_json(response).await["id"].as_i64().unwrap();

    let response = get_auth(app.clone(), &format!("/api/v1/casos/{id}"), &luis).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(app.clone(), &format!("/api/v1/casos/{id}"), &luis).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(app.clone(), "/api/v1/casos", &luis).await;
    assert!(body_json(response).await["data"].as_array().unwrap().is_empty());

    let response = get_auth(app, "/api/v1/casos/999999", &ana).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn institution_cases_are_separate_from_mediator_cases(pool: PgPool) {
    let app = common::build_test_app(pool);
    let mediador = register_mediador(app.clone(), "ana@example.com").await;
    let institucion = register_institucion(app.clone(), "centro@example.com").await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/instituciones/casos",
        json!({ "titulo": "Derivación 12" }),
        &institucion,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let caso = body_json(response).await;
    assert_eq!(caso["owner_kind"], "institucion");
    let id = caso["id"].as_i64().unwrap();

    // Mediator tokens are not accepted on the institution mount.
    let response = get_auth(app.clone(), "/api/v1/instituciones/casos", &mediador).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(app, &format!("/api/v1/casos/{id}"), &mediador).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn closing_a_case_stamps_fecha_cierre_and_reopening_clears_it(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_mediador(app.clone(), "ana@example.com").await;

    let response =
        post_json_auth(app.clone(), "/api/v1/casos", json!({ "titulo": "Vecinos" }), &token).await;
    let id = body_json(response).await["id"].as_i64().unwrap();
    let uri = format!("/api/v1/casos/{id}");

    let response = put_json_auth(app.clone(), &uri, json!({ "estado": "cerrado" }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let closed = body_json(response).await;
    assert_eq!(closed["estado"], "cerrado");
    assert!(closed["fecha_cierre"].is_string());

    let response = put_json_auth(app.clone(), &uri, json!({ "estado": "en_curso" }), &token).await;
    let reopened = body_json(response).await;
    assert_eq!(reopened["estado"], "en_curso");
    assert!(reopened["fecha_cierre"].is_null());

    let response = put_json_auth(app.clone(), &uri, json!({ "estado": "archivado" }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get_auth(app.clone(), "/api/v1/casos?estado=en_curso", &token).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);

    let response = get_auth(app.clone(), "/api/v1/casos?estado=cerrado", &token).await;
    assert!(body_json(response).await["data"].as_array().unwrap().is_empty());

    let response = delete_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = get_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Agenda
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn agenda_rejects_inverted_window_and_foreign_case(pool: PgPool) {
    let app = common::build_test_app(pool);
    let ana = register_mediador(app.clone(), "ana@example.com").await;
    let luis = register_mediador(app.clone(), "luis@example.com").await;

    let response =
        post_json_auth(app.clone(), "/api/v1/casos", json!({ "titulo": "De Luis" }), &luis).await;
    let foreign_caso = body_json(response).await["id"].as_i64().unwrap();

    let inverted = json!({
        "titulo": "Audiencia",
        "inicio": "2026-03-10T15:00:00Z",
        "fin": "2026-03-10T14:00:00Z",
    });
    let response = post_json_auth(app.clone(), "/api/v1/agenda", inverted, &ana).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let foreign = json!({
        "titulo": "Audiencia",
        "inicio": "2026-03-10T14:00:00Z",
        "caso_id": foreign_caso,
    });
    let response = post_json_auth(app, "/api/v1/agenda", foreign, &ana).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn agenda_lists_by_inicio_within_range(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_mediador(app.clone(), "ana@example.com").await;

    let response =
        post_json_auth(app.clone(), "/api/v1/casos", json!({ "titulo": "Herencia" }), &token).await;
    let caso_id = body_json(response).await["id"].as_i64().unwrap();

    for (titulo, inicio) in [
        ("Segunda", "2026-03-12T10:00:00Z"),
        ("Primera", "2026-03-10T10:00:00Z"),
        ("Fuera", "2026-04-20T10:00:00Z"),
    ] {
        let body = json!({ "titulo": titulo, "inicio": inicio, "caso_id": caso_id });
        let response = post_json_auth(app.clone(), "/api/v1/agenda", body, &token).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = get_auth(
        app.clone(),
        "/api/v1/agenda?desde=2026-03-01T00:00:00Z&hasta=2026-03-31T00:00:00Z",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    let titulos: Vec<_> = data
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["titulo"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titulos, ["Primera", "Segunda"]);

    let response = get_auth(
        app,
        "/api/v1/agenda?desde=2026-03-31T00:00:00Z&hasta=2026-03-01T00:00:00Z",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn agenda_update_checks_the_effective_window(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_mediador(app.clone(), "ana@example.com").await;

    let body = json!({
        "titulo": "Audiencia",
        "inicio": "2026-03-10T14:00:00Z",
        "fin": "2026-03-10T15:00:00Z",
    });
    let response = post_json_auth(app.clone(), "/api/v1/agenda", body, &token).await;
    let id = body_json(response).await["id"].as_i64().unwrap();

    // Moving only `inicio` past the stored `fin` is rejected.
    let response = put_json_auth(
        app,
        &format!("/api/v1/agenda/{id}"),
        json!({ "inicio": "2026-03-10T16:00:00Z" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Notas
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn institution_notes_crud_and_isolation(pool: PgPool) {
    let app = common::build_test_app(pool);
    let centro = register_institucion(app.clone(), "centro@example.com").await;
    let otro = register_institucion(app.clone(), "otro@example.com").await;
    let mediador = register_mediador(app.clone(), "ana@example.com").await;

    let body = json!({ "titulo": "Seguimiento", "contenido": "Llamar el lunes" });
    let response = post_json_auth(app.clone(), "/api/v1/instituciones/notas", body, &centro).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["id"].as_i64().unwrap();
    let uri = format!("/api/v1/instituciones/notas/{id}");

    let response =
        put_json_auth(app.clone(), &uri, json!({ "contenido": "Llamar el martes" }), &centro).await;
    assert_eq!(response.status(), StatusCode::OK);
    let nota = body_json(response).await;
    assert_eq!(nota["contenido"], "Llamar el martes");
    assert_eq!(nota["titulo"], "Seguimiento");

    let response = get_auth(app.clone(), &uri, &otro).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(app.clone(), "/api/v1/instituciones/notas", &mediador).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(app.clone(), &uri, &centro).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, "/api/v1/instituciones/notas", &centro).await;
    assert!(body_json(response).await["data"].as_array().unwrap().is_empty());
}
