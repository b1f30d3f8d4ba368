//! Repository for the `instituciones` table.

use mediar_core::actor::ACTOR_INSTITUCION;
use mediar_core::types::DbId;
use sqlx::PgPool;

use crate::models::institucion::{CreateInstitucion, Institucion};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, nombre, cuit, telefono, direccion, password_hash, \
                       subscription_status, stripe_customer_id, stripe_subscription_id, \
                       created_at, updated_at";

/// Provides identity and admin operations for institutions.
pub struct InstitucionRepo;

impl InstitucionRepo {
    /// Insert a new institution, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateInstitucion,
    ) -> Result<Institucion, sqlx::Error> {
        let query = format!(
            "INSERT INTO instituciones (email, nombre, cuit, telefono, direccion, password_hash)
             VALUES (LOWER($1), $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Institucion>(&query)
            .bind(&input.email)
            .bind(&input.nombre)
            .bind(&input.cuit)
            .bind(&input.telefono)
            .bind(&input.direccion)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Find an institution by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Institucion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM instituciones WHERE id = $1");
        sqlx::query_as::<_, Institucion>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an institution by email (case-insensitive).
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<Institucion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM instituciones WHERE LOWER(email) = LOWER($1)");
        sqlx::query_as::<_, Institucion>(&query)
            .bind(email.trim())
            .fetch_optional(pool)
            .await
    }

    /// List all institutions, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Institucion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM instituciones ORDER BY created_at DESC");
        sqlx::query_as::<_, Institucion>(&query).fetch_all(pool).await
    }

    /// Replace the stored password hash. Returns `true` if a row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE instituciones SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete an institution with its cases, agenda, and notes.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let email: Option<String> =
            sqlx::query_scalar("SELECT email FROM instituciones WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(email) = email else {
            return Ok(false);
        };

        sqlx::query("DELETE FROM notas WHERE LOWER(owner_email) = LOWER($1)")
            .bind(&email)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "DELETE FROM agenda_eventos WHERE owner_kind = $1 AND LOWER(owner_email) = LOWER($2)",
        )
        .bind(ACTOR_INSTITUCION)
        .bind(&email)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM casos WHERE owner_kind = $1 AND LOWER(owner_email) = LOWER($2)")
            .bind(ACTOR_INSTITUCION)
            .bind(&email)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM instituciones WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(institucion_id = id, "Deleted institution and owned rows");
        Ok(true)
    }
}
