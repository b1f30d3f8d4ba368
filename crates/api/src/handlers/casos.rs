//! Case CRUD, shared by mediators (`/casos`) and institutions
//! (`/instituciones/casos`).
//!
//! Every handler is generic over the [`ActorGuard`] of the mounting router;
//! the owner always comes from the verified session.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mediar_core::actor::Owner;
use mediar_core::error::CoreError;
use mediar_core::status::CasoEstado;
use mediar_core::types::DbId;
use mediar_db::models::caso::{Caso, CasoFilter, CreateCaso, UpdateCaso};
use mediar_db::repositories::CasoRepo;

use super::{ensure_owned, require_text};
use crate::error::{AppError, AppResult};
use crate::middleware::guard::ActorGuard;
use crate::response::DataResponse;
use crate::state::AppState;

/// Parse an optional status, rejecting values outside the known set.
fn validate_estado(estado: Option<&str>) -> AppResult<Option<CasoEstado>> {
    estado
        .map(|s| s.parse::<CasoEstado>())
        .transpose()
        .map_err(|m| AppError::Core(CoreError::Validation(m)))
}

/// Load a case and check it belongs to `owner` (404, then 403).
pub(crate) async fn load_owned(state: &AppState, owner: &Owner, id: DbId) -> AppResult<Caso> {
    let caso = CasoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Caso", id }))?;
    ensure_owned(owner, "Caso", id, &caso.owner_kind, &caso.owner_email)?;
    Ok(caso)
}

/// GET / -- the caller's cases, newest first, optionally `?estado=`.
pub async fn list<G: ActorGuard>(
    guard: G,
    State(state): State<AppState>,
    Query(filter): Query<CasoFilter>,
) -> AppResult<impl IntoResponse> {
    let estado = validate_estado(filter.estado.as_deref())?;
    let casos =
        CasoRepo::list_by_owner(&state.pool, &guard.owner(), estado.map(CasoEstado::as_str))
            .await?;
    Ok(Json(DataResponse { data: casos }))
}

/// GET /{id}
pub async fn get<G: ActorGuard>(
    guard: G,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Caso>> {
    Ok(Json(load_owned(&state, &guard.owner(), id).await?))
}

/// POST /
pub async fn create<G: ActorGuard>(
    guard: G,
    State(state): State<AppState>,
    Json(mut input): Json<CreateCaso>,
) -> AppResult<(StatusCode, Json<Caso>)> {
    require_text("titulo", &input.titulo)?;
    input.estado = validate_estado(input.estado.as_deref())?.map(|e| e.as_str().to_string());

    let owner = guard.owner();
    let caso = CasoRepo::create(&state.pool, &owner, &input).await?;
    tracing::info!(caso_id = caso.id, owner = %owner.email, "Caso created");

    Ok((StatusCode::CREATED, Json(caso)))
}

/// PUT /{id} -- partial update; status changes maintain `fecha_cierre`.
pub async fn update<G: ActorGuard>(
    guard: G,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateCaso>,
) -> AppResult<Json<Caso>> {
    if let Some(titulo) = &input.titulo {
        require_text("titulo", titulo)?;
    }
    input.estado = validate_estado(input.estado.as_deref())?.map(|e| e.as_str().to_string());

    let owner = guard.owner();
    load_owned(&state, &owner, id).await?;

    let caso = CasoRepo::update(&state.pool, id, &owner, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Caso", id }))?;
    tracing::info!(caso_id = id, estado = %caso.estado, "Caso updated");

    Ok(Json(caso))
}

/// DELETE /{id}
pub async fn delete<G: ActorGuard>(
    guard: G,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let owner = guard.owner();
    load_owned(&state, &owner, id).await?;

    if !CasoRepo::delete(&state.pool, id, &owner).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Caso", id }));
    }
    tracing::info!(caso_id = id, "Caso deleted");

    Ok(StatusCode::NO_CONTENT)
}
