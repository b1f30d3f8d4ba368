//! Route definitions for institution accounts and their notes.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{instituciones, notas};
use crate::state::AppState;

/// Routes mounted at `/instituciones/auth`.
///
/// ```text
/// POST /register         -> register
/// POST /login            -> login
/// POST /change-password  -> change_password (institucion token)
/// GET  /me               -> me (institucion token)
/// ```
pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(instituciones::register))
        .route("/login", post(instituciones::login))
        .route("/change-password", post(instituciones::change_password))
        .route("/me", get(instituciones::me))
}

/// Routes mounted at `/instituciones/notas` (institucion token).
///
/// ```text
/// GET    /       -> list
/// POST   /       -> create
/// GET    /{id}   -> get
/// PUT    /{id}   -> update
/// DELETE /{id}   -> delete
/// ```
pub fn notas_router() -> Router<AppState> {
    Router::new()
        .route("/", get(notas::list).post(notas::create))
        .route(
            "/{id}",
            get(notas::get).put(notas::update).delete(notas::delete),
        )
}
