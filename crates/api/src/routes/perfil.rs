//! Route definitions for mediator profiles and the public directory.

use axum::routing::get;
use axum::Router;

use crate::handlers::perfil;
use crate::state::AppState;

/// Routes mounted at `/perfil`.
///
/// ```text
/// GET /                  -> get_own (mediador token)
/// PUT /                  -> upsert_own (mediador token)
/// GET /directorio        -> directorio (public)
/// GET /{mediador_id}     -> public_profile (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(perfil::get_own).put(perfil::upsert_own))
        .route("/directorio", get(perfil::directorio))
        .route("/{mediador_id}", get(perfil::public_profile))
}
