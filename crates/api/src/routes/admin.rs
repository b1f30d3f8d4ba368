//! Route definitions for the `/admin` resource.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// Everything except `/login` requires the `X-Admin-Token` header or an
/// admin bearer token (enforced by the handler extractor).
///
/// ```text
/// POST   /login                          -> login
/// GET    /mediadores                     -> list_mediadores (?approval_status=)
/// PUT    /mediadores/{id}/approval       -> set_approval
/// PUT    /mediadores/{id}/subscription   -> set_subscription
/// DELETE /mediadores/{id}                -> delete_mediador
/// GET    /instituciones                  -> list_instituciones
/// DELETE /instituciones/{id}             -> delete_institucion
/// GET    /contactos                      -> list_contactos (?categoria=)
/// GET    /stats                          -> stats
/// DELETE /voces/{slug}                   -> delete_voz
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(admin::login))
        .route("/mediadores", get(admin::list_mediadores))
        .route("/mediadores/{id}", delete(admin::delete_mediador))
        .route("/mediadores/{id}/approval", put(admin::set_approval))
        .route("/mediadores/{id}/subscription", put(admin::set_subscription))
        .route("/instituciones", get(admin::list_instituciones))
        .route("/instituciones/{id}", delete(admin::delete_institucion))
        .route("/contactos", get(admin::list_contactos))
        .route("/stats", get(admin::stats))
        .route("/voces/{slug}", delete(admin::delete_voz))
}
