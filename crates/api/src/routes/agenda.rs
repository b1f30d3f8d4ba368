//! Route definitions for agenda events.

use axum::routing::get;
use axum::Router;

use crate::handlers::agenda;
use crate::middleware::guard::ActorGuard;
use crate::state::AppState;

/// Agenda routes for the actor admitted by `G`.
///
/// ```text
/// GET    /       -> list (?desde=&hasta=)
/// POST   /       -> create
/// GET    /{id}   -> get
/// PUT    /{id}   -> update
/// DELETE /{id}   -> delete
/// ```
pub fn router<G: ActorGuard>() -> Router<AppState> {
    Router::new()
        .route("/", get(agenda::list::<G>).post(agenda::create::<G>))
        .route(
            "/{id}",
            get(agenda::get::<G>)
                .put(agenda::update::<G>)
                .delete(agenda::delete::<G>),
        )
}
