pub mod admin;
pub mod agenda;
pub mod auth;
pub mod casos;
pub mod health;
pub mod instituciones;
pub mod payments;
pub mod perfil;
pub mod voces;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::middleware::guard::{RequireInstitucion, RequireMediador};
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register, /auth/login                     mediator accounts (public)
/// /auth/change-password, /auth/me                 mediador token
///
/// /instituciones/auth/*                           institution accounts
/// /instituciones/casos[/{id}]                     institucion token
/// /instituciones/agenda[/{id}]                    institucion token
/// /instituciones/notas[/{id}]                     institucion token
///
/// /casos[/{id}]                                   mediador token
/// /agenda[/{id}]                                  mediador token
///
/// /perfil                                         own profile (mediador token)
/// /perfil/directorio                              public directory
/// /perfil/{mediador_id}                           public profile
///
/// /admin/*                                        admin header or token
///
/// /payments/stripe/checkout                       account token
/// /payments/stripe/webhook                        Stripe signature
/// /payments/stripe/confirm                        public
///
/// /actas                                          generate (account token)
/// /actas/placeholders                             template tokens
///
/// /contacto                                       public form
/// /news                                           aggregated feeds (public)
/// /ai/legal/chat                                  any token
/// /upload                                         any token
/// /voces[/{slug}]                                 posts
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Mediator accounts.
        .nest("/auth", auth::router())
        // Institution accounts and notes.
        .nest("/instituciones/auth", instituciones::auth_router())
        .nest("/instituciones/notas", instituciones::notas_router())
        // Cases and agenda, one mount per owning actor class.
        .nest("/casos", casos::router::<RequireMediador>())
        .nest("/agenda", agenda::router::<RequireMediador>())
        .nest("/instituciones/casos", casos::router::<RequireInstitucion>())
        .nest("/instituciones/agenda", agenda::router::<RequireInstitucion>())
        // Profiles and directory.
        .nest("/perfil", perfil::router())
        // Administration.
        .nest("/admin", admin::router())
        // Subscriptions.
        .nest("/payments/stripe", payments::router())
        // Posts.
        .nest("/voces", voces::router())
        // Single-endpoint resources.
        .route("/actas", post(handlers::actas::generate))
        .route("/actas/placeholders", get(handlers::actas::placeholders))
        .route("/contacto", post(handlers::contacto::submit))
        .route("/news", get(handlers::news::search))
        .route("/ai/legal/chat", post(handlers::ai::chat))
        .route("/upload", post(handlers::upload::upload))
}
