//! Aggregate counters for the admin dashboard.

use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlatformStats {
    pub mediadores_total: i64,
    pub mediadores_pendientes: i64,
    pub mediadores_aprobados: i64,
    pub suscripciones_activas: i64,
    pub instituciones_total: i64,
    pub casos_abiertos: i64,
    pub voces_publicadas: i64,
    pub contactos_total: i64,
}
