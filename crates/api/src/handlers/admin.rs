//! Admin endpoints: moderation, manual overrides, and platform stats.
//!
//! Every handler takes [`RequireAdmin`], which accepts the `X-Admin-Token`
//! header or an admin session token.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mediar_core::actor::ActorKind;
use mediar_core::contact::ContactCategory;
use mediar_core::error::CoreError;
use mediar_core::paging::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use mediar_core::status::{ApprovalStatus, SubscriptionStatus};
use mediar_core::types::DbId;
use mediar_db::models::institucion::InstitucionResponse;
use mediar_db::models::mediador::MediadorResponse;
use mediar_db::models::stats::PlatformStats;
use mediar_db::repositories::{
    ContactoRepo, InstitucionRepo, MediadorRepo, StatsRepo, VozRepo,
};
use mediar_notify::templates;
use serde::{Deserialize, Serialize};

use super::auth::issue_token;
use crate::auth::admin::admin_token_matches;
use crate::error::{AppError, AppResult};
use crate::middleware::guard::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Subject of admin session tokens.
const ADMIN_SUBJECT: &str = "admin";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct AdminLoginResponse {
    pub token: String,
    pub expires_in: i64,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct MediadorListParams {
    pub approval_status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContactoListParams {
    pub categoria: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ApprovalResponse {
    pub mediador: MediadorResponse,
    pub email_sent: bool,
}

fn not_found(entity: &'static str, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity, id })
}

fn validation(message: String) -> AppError {
    AppError::Core(CoreError::Validation(message))
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/login -- trade the shared secret for a session token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<AdminLoginRequest>,
) -> AppResult<Json<AdminLoginResponse>> {
    if !admin_token_matches(&input.token, &state.config.admin_token) {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid admin token".into(),
        )));
    }
    let token = issue_token(&state, ADMIN_SUBJECT, ActorKind::Admin)?;
    tracing::info!("Admin logged in");
    Ok(Json(AdminLoginResponse {
        token,
        expires_in: state.config.jwt.expires_in_secs(),
    }))
}

// ---------------------------------------------------------------------------
// Mediadores
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/mediadores?approval_status=
pub async fn list_mediadores(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<MediadorListParams>,
) -> AppResult<impl IntoResponse> {
    let status = params
        .approval_status
        .as_deref()
        .map(str::parse::<ApprovalStatus>)
        .transpose()
        .map_err(validation)?;

    let mediadores: Vec<MediadorResponse> =
        MediadorRepo::list(&state.pool, status.map(ApprovalStatus::as_str))
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
    Ok(Json(DataResponse { data: mediadores }))
}

/// PUT /api/v1/admin/mediadores/{id}/approval
pub async fn set_approval(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<StatusRequest>,
) -> AppResult<Json<ApprovalResponse>> {
    let status: ApprovalStatus = input.status.parse().map_err(validation)?;

    let mediador = MediadorRepo::set_approval_status(&state.pool, id, status.as_str())
        .await?
        .ok_or_else(|| not_found("Mediador", id))?;
    tracing::info!(mediador_id = id, status = %status, "Approval status changed");

    let email_sent = state
        .send_email(
            &mediador.email,
            templates::approval_changed(&mediador.nombre, status),
        )
        .await;

    Ok(Json(ApprovalResponse {
        mediador: mediador.into(),
        email_sent,
    }))
}

/// PUT /api/v1/admin/mediadores/{id}/subscription -- manual override.
pub async fn set_subscription(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<StatusRequest>,
) -> AppResult<Json<MediadorResponse>> {
    let status: SubscriptionStatus = input.status.parse().map_err(validation)?;

    let mediador = MediadorRepo::set_subscription_status(&state.pool, id, status.as_str())
        .await?
        .ok_or_else(|| not_found("Mediador", id))?;
    tracing::info!(mediador_id = id, status = %status, "Subscription status overridden");

    Ok(Json(mediador.into()))
}

/// DELETE /api/v1/admin/mediadores/{id} -- also removes owned cases and agenda.
pub async fn delete_mediador(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !MediadorRepo::delete(&state.pool, id).await? {
        return Err(not_found("Mediador", id));
    }
    tracing::info!(mediador_id = id, "Mediador deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Instituciones
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/instituciones
pub async fn list_instituciones(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let instituciones: Vec<InstitucionResponse> = InstitucionRepo::list(&state.pool)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(DataResponse {
        data: instituciones,
    }))
}

/// DELETE /api/v1/admin/instituciones/{id}
pub async fn delete_institucion(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !InstitucionRepo::delete(&state.pool, id).await? {
        return Err(not_found("Institucion", id));
    }
    tracing::info!(institucion_id = id, "Institucion deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Contactos, stats, voces
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/contactos?categoria=&limit=&offset=
pub async fn list_contactos(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<ContactoListParams>,
) -> AppResult<impl IntoResponse> {
    let categoria = params
        .categoria
        .as_deref()
        .map(str::parse::<ContactCategory>)
        .transpose()
        .map_err(validation)?;

    let contactos = ContactoRepo::list(
        &state.pool,
        categoria.map(ContactCategory::as_str),
        clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
        clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(DataResponse { data: contactos }))
}

/// GET /api/v1/admin/stats
pub async fn stats(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<PlatformStats>> {
    Ok(Json(StatsRepo::platform(&state.pool).await?))
}

/// DELETE /api/v1/admin/voces/{slug}
pub async fn delete_voz(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    if !VozRepo::delete(&state.pool, &slug).await? {
        return Err(AppError::Core(CoreError::NotFoundByKey {
            entity: "Voz",
            key: slug,
        }));
    }
    tracing::info!(slug = %slug, "Voz removed by admin");
    Ok(StatusCode::NO_CONTENT)
}
