//! Route definitions for cases, shared by every actor class that owns them.

use axum::routing::get;
use axum::Router;

use crate::handlers::casos;
use crate::middleware::guard::ActorGuard;
use crate::state::AppState;

/// Case routes for the actor admitted by `G`.
///
/// ```text
/// GET    /       -> list (?estado=)
/// POST   /       -> create
/// GET    /{id}   -> get
/// PUT    /{id}   -> update
/// DELETE /{id}   -> delete
/// ```
pub fn router<G: ActorGuard>() -> Router<AppState> {
    Router::new()
        .route("/", get(casos::list::<G>).post(casos::create::<G>))
        .route(
            "/{id}",
            get(casos::get::<G>)
                .put(casos::update::<G>)
                .delete(casos::delete::<G>),
        )
}
