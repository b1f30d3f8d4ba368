//! Repository for the `contactos` table.

use mediar_core::types::DbId;
use sqlx::PgPool;

use crate::models::contacto::{Contacto, CreateContacto};

const COLUMNS: &str =
    "id, nombre, email, mensaje, categoria, confianza, auto_reply_sent, created_at";

pub struct ContactoRepo;

impl ContactoRepo {
    pub async fn create(pool: &PgPool, input: &CreateContacto) -> Result<Contacto, sqlx::Error> {
        let query = format!(
            "INSERT INTO contactos (nombre, email, mensaje, categoria, confianza)
             VALUES ($1, LOWER($2), $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contacto>(&query)
            .bind(&input.nombre)
            .bind(&input.email)
            .bind(&input.mensaje)
            .bind(&input.categoria)
            .bind(input.confianza)
            .fetch_one(pool)
            .await
    }

    pub async fn mark_auto_reply_sent(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE contactos SET auto_reply_sent = TRUE WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Newest submissions first, optionally filtered by category.
    pub async fn list(
        pool: &PgPool,
        categoria: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Contacto>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contactos
             WHERE ($1::TEXT IS NULL OR categoria = $1)
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Contacto>(&query)
            .bind(categoria)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
