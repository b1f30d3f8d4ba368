//! Repository for the `agenda_eventos` table.

use mediar_core::actor::Owner;
use mediar_core::types::DbId;
use sqlx::PgPool;

use crate::models::agenda::{AgendaEvento, AgendaRange, CreateAgendaEvento, UpdateAgendaEvento};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_kind, owner_email, titulo, descripcion, inicio, fin, \
                       ubicacion, caso_id, created_at, updated_at";

const OWNER_CLAUSE: &str = "owner_kind = $2 AND LOWER(owner_email) = LOWER($3)";

pub struct AgendaRepo;

impl AgendaRepo {
    pub async fn create(
        pool: &PgPool,
        owner: &Owner,
        input: &CreateAgendaEvento,
    ) -> Result<AgendaEvento, sqlx::Error> {
        let query = format!(
            "INSERT INTO agenda_eventos
                (owner_kind, owner_email, titulo, descripcion, inicio, fin, ubicacion, caso_id)
             VALUES ($1, LOWER($2), $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AgendaEvento>(&query)
            .bind(owner.kind.as_str())
            .bind(&owner.email)
            .bind(&input.titulo)
            .bind(&input.descripcion)
            .bind(input.inicio)
            .bind(input.fin)
            .bind(&input.ubicacion)
            .bind(input.caso_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AgendaEvento>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM agenda_eventos WHERE id = $1");
        sqlx::query_as::<_, AgendaEvento>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the owner's events in chronological order, optionally within a
    /// `[desde, hasta]` window on `inicio`.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner: &Owner,
        range: &AgendaRange,
    ) -> Result<Vec<AgendaEvento>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM agenda_eventos
             WHERE owner_kind = $1 AND LOWER(owner_email) = LOWER($2)
               AND ($3::TIMESTAMPTZ IS NULL OR inicio >= $3)
               AND ($4::TIMESTAMPTZ IS NULL OR inicio <= $4)
             ORDER BY inicio ASC"
        );
        sqlx::query_as::<_, AgendaEvento>(&query)
            .bind(owner.kind.as_str())
            .bind(&owner.email)
            .bind(range.desde)
            .bind(range.hasta)
            .fetch_all(pool)
            .await
    }

    /// Update an event owned by `owner`. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        owner: &Owner,
        input: &UpdateAgendaEvento,
    ) -> Result<Option<AgendaEvento>, sqlx::Error> {
        let query = format!(
            "UPDATE agenda_eventos SET
                titulo = COALESCE($4, titulo),
                descripcion = COALESCE($5, descripcion),
                inicio = COALESCE($6, inicio),
                fin = COALESCE($7, fin),
                ubicacion = COALESCE($8, ubicacion),
                caso_id = COALESCE($9, caso_id),
                updated_at = NOW()
             WHERE id = $1 AND {OWNER_CLAUSE}
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AgendaEvento>(&query)
            .bind(id)
            .bind(owner.kind.as_str())
            .bind(&owner.email)
            .bind(&input.titulo)
            .bind(&input.descripcion)
            .bind(input.inicio)
            .bind(input.fin)
            .bind(&input.ubicacion)
            .bind(input.caso_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId, owner: &Owner) -> Result<bool, sqlx::Error> {
        let query = format!("DELETE FROM agenda_eventos WHERE id = $1 AND {OWNER_CLAUSE}");
        let result = sqlx::query(&query)
            .bind(id)
            .bind(owner.kind.as_str())
            .bind(&owner.email)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
