//! Agenda CRUD, shared by mediators (`/agenda`) and institutions
//! (`/instituciones/agenda`).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mediar_core::actor::Owner;
use mediar_core::error::CoreError;
use mediar_core::types::{DbId, Timestamp};
use mediar_db::models::agenda::{AgendaEvento, AgendaRange, CreateAgendaEvento, UpdateAgendaEvento};
use mediar_db::repositories::{AgendaRepo, CasoRepo};

use super::{ensure_owned, require_text};
use crate::error::{AppError, AppResult};
use crate::middleware::guard::ActorGuard;
use crate::response::DataResponse;
use crate::state::AppState;

fn validate_window(inicio: Timestamp, fin: Option<Timestamp>) -> AppResult<()> {
    if fin.is_some_and(|fin| fin < inicio) {
        return Err(AppError::Core(CoreError::Validation(
            "'fin' must not precede 'inicio'".into(),
        )));
    }
    Ok(())
}

/// A referenced case must exist and belong to the same owner.
async fn validate_caso_ref(state: &AppState, owner: &Owner, caso_id: Option<DbId>) -> AppResult<()> {
    let Some(caso_id) = caso_id else {
        return Ok(());
    };
    let owned = CasoRepo::find_by_id(&state.pool, caso_id)
        .await?
        .is_some_and(|c| owner.owns(&c.owner_kind, &c.owner_email));
    if !owned {
        return Err(AppError::BadRequest(format!(
            "caso_id {caso_id} does not reference one of your cases"
        )));
    }
    Ok(())
}

async fn load_owned(state: &AppState, owner: &Owner, id: DbId) -> AppResult<AgendaEvento> {
    let evento = AgendaRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "AgendaEvento",
            id,
        }))?;
    ensure_owned(owner, "AgendaEvento", id, &evento.owner_kind, &evento.owner_email)?;
    Ok(evento)
}

/// GET / -- ordered by `inicio`, optionally within `?desde=&hasta=`.
pub async fn list<G: ActorGuard>(
    guard: G,
    State(state): State<AppState>,
    Query(range): Query<AgendaRange>,
) -> AppResult<impl IntoResponse> {
    if let (Some(desde), Some(hasta)) = (range.desde, range.hasta) {
        if hasta < desde {
            return Err(AppError::Core(CoreError::Validation(
                "'hasta' must not precede 'desde'".into(),
            )));
        }
    }
    let eventos = AgendaRepo::list_by_owner(&state.pool, &guard.owner(), &range).await?;
    Ok(Json(DataResponse { data: eventos }))
}

/// GET /{id}
pub async fn get<G: ActorGuard>(
    guard: G,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<AgendaEvento>> {
    Ok(Json(load_owned(&state, &guard.owner(), id).await?))
}

/// POST /
pub async fn create<G: ActorGuard>(
    guard: G,
    State(state): State<AppState>,
    Json(input): Json<CreateAgendaEvento>,
) -> AppResult<(StatusCode, Json<AgendaEvento>)> {
    require_text("titulo", &input.titulo)?;
    validate_window(input.inicio, input.fin)?;

    let owner = guard.owner();
    validate_caso_ref(&state, &owner, input.caso_id).await?;

    let evento = AgendaRepo::create(&state.pool, &owner, &input).await?;
    tracing::info!(evento_id = evento.id, owner = %owner.email, "Agenda event created");

    Ok((StatusCode::CREATED, Json(evento)))
}

/// PUT /{id}
pub async fn update<G: ActorGuard>(
    guard: G,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAgendaEvento>,
) -> AppResult<Json<AgendaEvento>> {
    if let Some(titulo) = &input.titulo {
        require_text("titulo", titulo)?;
    }

    let owner = guard.owner();
    let current = load_owned(&state, &owner, id).await?;
    validate_window(
        input.inicio.unwrap_or(current.inicio),
        input.fin.or(current.fin),
    )?;
    validate_caso_ref(&state, &owner, input.caso_id).await?;

    let evento = AgendaRepo::update(&state.pool, id, &owner, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "AgendaEvento",
            id,
        }))?;
    tracing::info!(evento_id = id, "Agenda event updated");

    Ok(Json(evento))
}

/// DELETE /{id}
pub async fn delete<G: ActorGuard>(
    guard: G,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let owner = guard.owner();
    load_owned(&state, &owner, id).await?;

    if !AgendaRepo::delete(&state.pool, id, &owner).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "AgendaEvento",
            id,
        }));
    }
    tracing::info!(evento_id = id, "Agenda event deleted");

    Ok(StatusCode::NO_CONTENT)
}
