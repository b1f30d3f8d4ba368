//! Subscription status writes shared by the `mediadores` and
//! `instituciones` tables.
//!
//! Every update is a plain assignment, so replaying the same processor
//! event (or applying it via both the webhook and the confirm path) is
//! idempotent.

use mediar_core::actor::ActorKind;
use mediar_core::types::DbId;
use sqlx::PgPool;

pub struct SubscriptionRepo;

/// Table holding subscription columns for an actor kind. Admins have none.
fn table_for(kind: ActorKind) -> Option<&'static str> {
    match kind {
        ActorKind::Mediador => Some("mediadores"),
        ActorKind::Institucion => Some("instituciones"),
        ActorKind::Admin => None,
    }
}

impl SubscriptionRepo {
    /// Set the status of the actor row matching `email` (case-insensitive).
    ///
    /// Processor ids are only overwritten when provided. Returns the status
    /// the row held before this write, or `None` when no row matched. The
    /// row is locked while it is read and written, so concurrent writers
    /// each see the status left by the previous one.
    pub async fn apply_by_email(
        pool: &PgPool,
        kind: ActorKind,
        email: &str,
        status: &str,
        customer_id: Option<&str>,
        subscription_id: Option<&str>,
    ) -> Result<Option<String>, sqlx::Error> {
        let Some(table) = table_for(kind) else {
            return Ok(None);
        };
        let mut tx = pool.begin().await?;

        let select = format!(
            "SELECT id, subscription_status FROM {table}
             WHERE LOWER(email) = LOWER($1)
             FOR UPDATE"
        );
        let row: Option<(DbId, String)> = sqlx::query_as(&select)
            .bind(email.trim())
            .fetch_optional(&mut *tx)
            .await?;
        let Some((id, previous)) = row else {
            return Ok(None);
        };

        let update = format!(
            "UPDATE {table} SET
                subscription_status = $2,
                stripe_customer_id = COALESCE($3, stripe_customer_id),
                stripe_subscription_id = COALESCE($4, stripe_subscription_id),
                updated_at = NOW()
             WHERE id = $1"
        );
        sqlx::query(&update)
            .bind(id)
            .bind(status)
            .bind(customer_id)
            .bind(subscription_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(previous))
    }

    /// Set the status of every actor row linked to a processor customer id.
    ///
    /// Used for subscription events that carry no email. Both actor tables
    /// are searched; returns `true` if any row was updated.
    pub async fn apply_by_customer_id(
        pool: &PgPool,
        customer_id: &str,
        status: &str,
        subscription_id: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let mut applied = false;
        for table in ["mediadores", "instituciones"] {
            let query = format!(
                "UPDATE {table} SET
                    subscription_status = $2,
                    stripe_subscription_id = COALESCE($3, stripe_subscription_id),
                    updated_at = NOW()
                 WHERE stripe_customer_id = $1"
            );
            let result = sqlx::query(&query)
                .bind(customer_id)
                .bind(status)
                .bind(subscription_id)
                .execute(pool)
                .await?;
            applied |= result.rows_affected() > 0;
        }
        Ok(applied)
    }

    /// Current status for an actor email, or `None` if no such row exists.
    pub async fn status_for_email(
        pool: &PgPool,
        kind: ActorKind,
        email: &str,
    ) -> Result<Option<String>, sqlx::Error> {
        let Some(table) = table_for(kind) else {
            return Ok(None);
        };
        let query =
            format!("SELECT subscription_status FROM {table} WHERE LOWER(email) = LOWER($1)");
        sqlx::query_scalar(&query)
            .bind(email.trim())
            .fetch_optional(pool)
            .await
    }
}
