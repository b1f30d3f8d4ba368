//! Repository for the `notas` table (institution notes).

use mediar_core::types::DbId;
use sqlx::PgPool;

use crate::models::nota::{CreateNota, Nota, UpdateNota};

const COLUMNS: &str = "id, owner_email, titulo, contenido, caso_id, created_at, updated_at";

pub struct NotaRepo;

impl NotaRepo {
    pub async fn create(
        pool: &PgPool,
        owner_email: &str,
        input: &CreateNota,
    ) -> Result<Nota, sqlx::Error> {
        let query = format!(
            "INSERT INTO notas (owner_email, titulo, contenido, caso_id)
             VALUES (LOWER($1), $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Nota>(&query)
            .bind(owner_email)
            .bind(&input.titulo)
            .bind(&input.contenido)
            .bind(input.caso_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Nota>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notas WHERE id = $1");
        sqlx::query_as::<_, Nota>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the owner's notes, most recently edited first.
    pub async fn list_by_owner(pool: &PgPool, owner_email: &str) -> Result<Vec<Nota>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notas WHERE LOWER(owner_email) = LOWER($1)
             ORDER BY updated_at DESC"
        );
        sqlx::query_as::<_, Nota>(&query)
            .bind(owner_email)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        owner_email: &str,
        input: &UpdateNota,
    ) -> Result<Option<Nota>, sqlx::Error> {
        let query = format!(
            "UPDATE notas SET
                titulo = COALESCE($3, titulo),
                contenido = COALESCE($4, contenido),
                caso_id = COALESCE($5, caso_id),
                updated_at = NOW()
             WHERE id = $1 AND LOWER(owner_email) = LOWER($2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Nota>(&query)
            .bind(id)
            .bind(owner_email)
            .bind(&input.titulo)
            .bind(&input.contenido)
            .bind(input.caso_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId, owner_email: &str) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM notas WHERE id = $1 AND LOWER(owner_email) = LOWER($2)")
                .bind(id)
                .bind(owner_email)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
