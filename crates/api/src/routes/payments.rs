//! Route definitions for Stripe subscriptions.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::payments;
use crate::state::AppState;

/// Routes mounted at `/payments/stripe`.
///
/// ```text
/// POST /checkout   -> checkout (mediador or institucion token)
/// POST /webhook    -> webhook (signed by Stripe)
/// GET  /confirm    -> confirm (?session_id=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/checkout", post(payments::checkout))
        .route("/webhook", post(payments::webhook))
        .route("/confirm", get(payments::confirm))
}
