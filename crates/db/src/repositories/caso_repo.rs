//! Repository for the `casos` table.
//!
//! Every mutating query is scoped by owner kind and (case-insensitive) owner
//! email in addition to the id.

use mediar_core::actor::Owner;
use mediar_core::status::CasoEstado;
use mediar_core::types::DbId;
use sqlx::PgPool;

use crate::models::caso::{Caso, CreateCaso, UpdateCaso};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_kind, owner_email, titulo, descripcion, partes, materia, \
                       estado, fecha_cierre, created_at, updated_at";

/// Ownership predicate; `$2` is the owner kind and `$3` the owner email.
const OWNER_CLAUSE: &str = "owner_kind = $2 AND LOWER(owner_email) = LOWER($3)";

pub struct CasoRepo;

impl CasoRepo {
    /// Insert a new case for `owner`. Creating a case directly as
    /// `cerrado` stamps `fecha_cierre`.
    pub async fn create(pool: &PgPool, owner: &Owner, input: &CreateCaso) -> Result<Caso, sqlx::Error> {
        let query = format!(
            "INSERT INTO casos (owner_kind, owner_email, titulo, descripcion, partes, materia, estado, fecha_cierre)
             VALUES ($1, LOWER($2), $3, $4, $5, $6, COALESCE($7::TEXT, $8),
                     CASE WHEN $7::TEXT = $9 THEN NOW() END)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Caso>(&query)
            .bind(owner.kind.as_str())
            .bind(&owner.email)
            .bind(&input.titulo)
            .bind(&input.descripcion)
            .bind(&input.partes)
            .bind(&input.materia)
            .bind(&input.estado)
            .bind(CasoEstado::Abierto.as_str())
            .bind(CasoEstado::Cerrado.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a case by id regardless of owner (the caller checks ownership).
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Caso>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM casos WHERE id = $1");
        sqlx::query_as::<_, Caso>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the owner's cases, newest first, optionally filtered by status.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner: &Owner,
        estado: Option<&str>,
    ) -> Result<Vec<Caso>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM casos
             WHERE owner_kind = $1 AND LOWER(owner_email) = LOWER($2)
               AND ($3::TEXT IS NULL OR estado = $3)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Caso>(&query)
            .bind(owner.kind.as_str())
            .bind(&owner.email)
            .bind(estado)
            .fetch_all(pool)
            .await
    }

    /// Update a case owned by `owner`. Only non-`None` fields are applied.
    ///
    /// Moving to `cerrado` sets `fecha_cierre` only if it is not already set;
    /// moving to any other status clears it. Returns `None` if no row with
    /// this id belongs to `owner`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        owner: &Owner,
        input: &UpdateCaso,
    ) -> Result<Option<Caso>, sqlx::Error> {
        let query = format!(
            "UPDATE casos SET
                titulo = COALESCE($4, titulo),
                descripcion = COALESCE($5, descripcion),
                partes = COALESCE($6, partes),
                materia = COALESCE($7, materia),
                estado = COALESCE($8::TEXT, estado),
                fecha_cierre = CASE
                    WHEN $8::TEXT IS NULL THEN fecha_cierre
                    WHEN $8::TEXT = $9 THEN COALESCE(fecha_cierre, NOW())
                    ELSE NULL
                END,
                updated_at = NOW()
             WHERE id = $1 AND {OWNER_CLAUSE}
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Caso>(&query)
            .bind(id)
            .bind(owner.kind.as_str())
            .bind(&owner.email)
            .bind(&input.titulo)
            .bind(&input.descripcion)
            .bind(&input.partes)
            .bind(&input.materia)
            .bind(&input.estado)
            .bind(CasoEstado::Cerrado.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Delete a case owned by `owner`. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId, owner: &Owner) -> Result<bool, sqlx::Error> {
        let query = format!("DELETE FROM casos WHERE id = $1 AND {OWNER_CLAUSE}");
        let result = sqlx::query(&query)
            .bind(id)
            .bind(owner.kind.as_str())
            .bind(&owner.email)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
