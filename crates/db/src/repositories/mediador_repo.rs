//! Repository for the `mediadores` table.

use mediar_core::actor::ACTOR_MEDIADOR;
use mediar_core::types::DbId;
use sqlx::PgPool;

use crate::models::mediador::{CreateMediador, Mediador};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, nombre, apellido, password_hash, matricula, telefono, \
                       approval_status, subscription_status, stripe_customer_id, \
                       stripe_subscription_id, created_at, updated_at";

/// Provides identity and admin operations for mediators.
pub struct MediadorRepo;

impl MediadorRepo {
    /// Insert a new mediator together with an empty profile row.
    ///
    /// Both inserts run in one transaction; a duplicate email fails with a
    /// unique violation on `uq_mediadores_email` and nothing is written.
    pub async fn create(pool: &PgPool, input: &CreateMediador) -> Result<Mediador, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO mediadores (email, nombre, apellido, password_hash, matricula, telefono)
             VALUES (LOWER($1), $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let mediador = sqlx::query_as::<_, Mediador>(&query)
            .bind(&input.email)
            .bind(&input.nombre)
            .bind(&input.apellido)
            .bind(&input.password_hash)
            .bind(&input.matricula)
            .bind(&input.telefono)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO perfiles (mediador_id) VALUES ($1)")
            .bind(mediador.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(mediador)
    }

    /// Find a mediator by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Mediador>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM mediadores WHERE id = $1");
        sqlx::query_as::<_, Mediador>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a mediator by email (case-insensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Mediador>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM mediadores WHERE LOWER(email) = LOWER($1)");
        sqlx::query_as::<_, Mediador>(&query)
            .bind(email.trim())
            .fetch_optional(pool)
            .await
    }

    /// List mediators, newest first, optionally filtered by approval status.
    pub async fn list(
        pool: &PgPool,
        approval_status: Option<&str>,
    ) -> Result<Vec<Mediador>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM mediadores
             WHERE ($1::TEXT IS NULL OR approval_status = $1)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Mediador>(&query)
            .bind(approval_status)
            .fetch_all(pool)
            .await
    }

    /// Replace the stored password hash. Returns `true` if a row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE mediadores SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set the approval status. Returns `None` if no row with the given `id` exists.
    pub async fn set_approval_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Mediador>, sqlx::Error> {
        let query = format!(
            "UPDATE mediadores SET approval_status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Mediador>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Manually override the subscription status (admin tooling).
    pub async fn set_subscription_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Mediador>, sqlx::Error> {
        let query = format!(
            "UPDATE mediadores SET subscription_status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Mediador>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a mediator and every case and agenda event owned
    /// by their email, in one transaction. The profile row cascades.
    ///
    /// Returns `true` if the mediator existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let email: Option<String> = sqlx::query_scalar("SELECT email FROM mediadores WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(email) = email else {
            return Ok(false);
        };

        let agenda = sqlx::query(
            "DELETE FROM agenda_eventos WHERE owner_kind = $1 AND LOWER(owner_email) = LOWER($2)",
        )
        .bind(ACTOR_MEDIADOR)
        .bind(&email)
        .execute(&mut *tx)
        .await?;

        let casos = sqlx::query(
            "DELETE FROM casos WHERE owner_kind = $1 AND LOWER(owner_email) = LOWER($2)",
        )
        .bind(ACTOR_MEDIADOR)
        .bind(&email)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM mediadores WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            mediador_id = id,
            casos = casos.rows_affected(),
            agenda = agenda.rows_affected(),
            "Deleted mediator and owned rows"
        );
        Ok(true)
    }
}
