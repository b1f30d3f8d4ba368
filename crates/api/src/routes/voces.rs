//! Route definitions for published posts.

use axum::routing::get;
use axum::Router;

use crate::handlers::voces;
use crate::state::AppState;

/// Routes mounted at `/voces`.
///
/// ```text
/// GET    /          -> list (?limit=&offset=)
/// POST   /          -> create (mediador token)
/// GET    /{slug}    -> get
/// PUT    /{slug}    -> update (author only)
/// DELETE /{slug}    -> delete (author only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(voces::list).post(voces::create))
        .route(
            "/{slug}",
            get(voces::get).put(voces::update).delete(voces::delete),
        )
}
