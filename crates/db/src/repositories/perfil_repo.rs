//! Repository for the `perfiles` table and the public mediator directory.

use mediar_core::status::ApprovalStatus;
use mediar_core::types::DbId;
use sqlx::PgPool;

use crate::models::perfil::{DirectorioEntry, DirectorioFilter, Perfil, UpsertPerfil};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "mediador_id, bio, especialidades, provincia, localidad, modalidad, \
                       foto_url, sitio_web, updated_at";

/// Directory projection: approved mediators left-joined with their profile.
const DIRECTORIO_SELECT: &str = "SELECT m.id AS mediador_id, m.nombre, m.apellido, m.matricula,
            p.bio, COALESCE(p.especialidades, '{}'::TEXT[]) AS especialidades,
            p.provincia, p.localidad, p.modalidad, p.foto_url, p.sitio_web
     FROM mediadores m
     LEFT JOIN perfiles p ON p.mediador_id = m.id
     WHERE m.approval_status = $1";

pub struct PerfilRepo;

impl PerfilRepo {
    /// Fetch the profile of a mediator.
    pub async fn find(pool: &PgPool, mediador_id: DbId) -> Result<Option<Perfil>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM perfiles WHERE mediador_id = $1");
        sqlx::query_as::<_, Perfil>(&query)
            .bind(mediador_id)
            .fetch_optional(pool)
            .await
    }

    /// Create or update a profile. Only non-`None` fields overwrite stored values.
    pub async fn upsert(
        pool: &PgPool,
        mediador_id: DbId,
        input: &UpsertPerfil,
    ) -> Result<Perfil, sqlx::Error> {
        let query = format!(
            "INSERT INTO perfiles
                (mediador_id, bio, especialidades, provincia, localidad, modalidad, foto_url, sitio_web)
             VALUES ($1, $2, COALESCE($3, '{{}}'::TEXT[]), $4, $5, $6, $7, $8)
             ON CONFLICT (mediador_id) DO UPDATE SET
                bio = COALESCE($2, perfiles.bio),
                especialidades = COALESCE($3, perfiles.especialidades),
                provincia = COALESCE($4, perfiles.provincia),
                localidad = COALESCE($5, perfiles.localidad),
                modalidad = COALESCE($6, perfiles.modalidad),
                foto_url = COALESCE($7, perfiles.foto_url),
                sitio_web = COALESCE($8, perfiles.sitio_web),
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Perfil>(&query)
            .bind(mediador_id)
            .bind(&input.bio)
            .bind(&input.especialidades)
            .bind(&input.provincia)
            .bind(&input.localidad)
            .bind(&input.modalidad)
            .bind(&input.foto_url)
            .bind(&input.sitio_web)
            .fetch_one(pool)
            .await
    }

    /// Public directory of approved mediators, ordered by surname.
    pub async fn directorio(
        pool: &PgPool,
        filter: &DirectorioFilter,
    ) -> Result<Vec<DirectorioEntry>, sqlx::Error> {
        let query = format!(
            "{DIRECTORIO_SELECT}
               AND ($2::TEXT IS NULL OR LOWER(p.provincia) = LOWER($2))
               AND ($3::TEXT IS NULL OR EXISTS (
                    SELECT 1 FROM unnest(p.especialidades) AS e WHERE LOWER(e) = LOWER($3)))
               AND ($4::TEXT IS NULL OR
                    (m.nombre || ' ' || m.apellido || ' ' || COALESCE(p.bio, '')) ILIKE '%' || $4 || '%')
             ORDER BY m.apellido, m.nombre"
        );
        sqlx::query_as::<_, DirectorioEntry>(&query)
            .bind(ApprovalStatus::Aprobado.as_str())
            .bind(non_blank(&filter.provincia))
            .bind(non_blank(&filter.especialidad))
            .bind(non_blank(&filter.q))
            .fetch_all(pool)
            .await
    }

    /// Public profile of one approved mediator.
    pub async fn find_public(
        pool: &PgPool,
        mediador_id: DbId,
    ) -> Result<Option<DirectorioEntry>, sqlx::Error> {
        let query = format!("{DIRECTORIO_SELECT} AND m.id = $2");
        sqlx::query_as::<_, DirectorioEntry>(&query)
            .bind(ApprovalStatus::Aprobado.as_str())
            .bind(mediador_id)
            .fetch_optional(pool)
            .await
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
