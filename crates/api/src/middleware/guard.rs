//! Actor-class extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects sessions of the wrong
//! actor class with 403. Handlers shared between mediators and institutions
//! are generic over [`ActorGuard`] and are mounted once per class:
//!
//! ```ignore
//! .route("/", get(casos::list::<RequireMediador>))
//! ```

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use mediar_core::actor::{ActorKind, Owner};
use mediar_core::error::CoreError;

use super::auth::AuthUser;
use crate::auth::admin::admin_token_matches;
use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the admin shared secret.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// An extractor proving the caller is a specific case-owning actor class.
pub trait ActorGuard: FromRequestParts<AppState, Rejection = AppError> + Send + 'static {
    const KIND: ActorKind;

    fn user(&self) -> &AuthUser;

    fn owner(&self) -> Owner {
        Owner::new(Self::KIND, &self.user().email)
    }
}

async fn require_kind(
    parts: &mut Parts,
    state: &AppState,
    kind: ActorKind,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if user.actor != kind {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "This endpoint requires a {kind} account"
        ))));
    }
    Ok(user)
}

/// Requires a mediator session.
pub struct RequireMediador(pub AuthUser);

impl FromRequestParts<AppState> for RequireMediador {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_kind(parts, state, ActorKind::Mediador)
            .await
            .map(RequireMediador)
    }
}

impl ActorGuard for RequireMediador {
    const KIND: ActorKind = ActorKind::Mediador;

    fn user(&self) -> &AuthUser {
        &self.0
    }
}

/// Requires an institution session.
pub struct RequireInstitucion(pub AuthUser);

impl FromRequestParts<AppState> for RequireInstitucion {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_kind(parts, state, ActorKind::Institucion)
            .await
            .map(RequireInstitucion)
    }
}

impl ActorGuard for RequireInstitucion {
    const KIND: ActorKind = ActorKind::Institucion;

    fn user(&self) -> &AuthUser {
        &self.0
    }
}

/// Requires a mediator or institution session (an account that can own
/// cases, pay, and store files). Admin sessions are rejected.
pub struct RequireAccount(pub AuthUser);

impl FromRequestParts<AppState> for RequireAccount {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.actor.owns_cases() {
            return Err(AppError::Core(CoreError::Forbidden(
                "This endpoint requires a mediador or institucion account".into(),
            )));
        }
        Ok(RequireAccount(user))
    }
}

/// Requires admin rights: either the `X-Admin-Token` header matching the
/// configured secret, or a Bearer token issued by the admin login.
pub struct RequireAdmin;

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(presented) = parts.headers.get(ADMIN_TOKEN_HEADER) {
            let presented = presented.to_str().unwrap_or_default();
            if admin_token_matches(presented, &state.config.admin_token) {
                return Ok(RequireAdmin);
            }
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid admin token".into(),
            )));
        }

        require_kind(parts, state, ActorKind::Admin).await?;
        Ok(RequireAdmin)
    }
}
