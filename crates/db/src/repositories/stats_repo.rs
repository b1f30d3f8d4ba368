//! Repository for admin dashboard counters.

use mediar_core::status::{ApprovalStatus, CasoEstado, SubscriptionStatus};
use sqlx::PgPool;

use crate::models::stats::PlatformStats;

pub struct StatsRepo;

impl StatsRepo {
    /// Compute every counter in a single round trip.
    pub async fn platform(pool: &PgPool) -> Result<PlatformStats, sqlx::Error> {
        sqlx::query_as::<_, PlatformStats>(
            "SELECT
                (SELECT COUNT(*) FROM mediadores) AS mediadores_total,
                (SELECT COUNT(*) FROM mediadores WHERE approval_status = $1) AS mediadores_pendientes,
                (SELECT COUNT(*) FROM mediadores WHERE approval_status = $2) AS mediadores_aprobados,
                ((SELECT COUNT(*) FROM mediadores WHERE subscription_status = $3)
                  + (SELECT COUNT(*) FROM instituciones WHERE subscription_status = $3))
                    AS suscripciones_activas,
                (SELECT COUNT(*) FROM instituciones) AS instituciones_total,
                (SELECT COUNT(*) FROM casos WHERE estado <> $4) AS casos_abiertos,
                (SELECT COUNT(*) FROM voces WHERE publicado) AS voces_publicadas,
                (SELECT COUNT(*) FROM contactos) AS contactos_total",
        )
        .bind(ApprovalStatus::Pendiente.as_str())
        .bind(ApprovalStatus::Aprobado.as_str())
        .bind(SubscriptionStatus::Active.as_str())
        .bind(CasoEstado::Cerrado.as_str())
        .fetch_one(pool)
        .await
    }
}
