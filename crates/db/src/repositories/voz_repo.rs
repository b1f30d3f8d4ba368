//! Repository for the `voces` table.

use sqlx::PgPool;

use crate::models::voz::{NewVoz, UpdateVoz, Voz};

const COLUMNS: &str = "id, slug, titulo, resumen, contenido, autor_email, autor_nombre, \
                       publicado, created_at, updated_at";

pub struct VozRepo;

impl VozRepo {
    pub async fn create(pool: &PgPool, input: &NewVoz) -> Result<Voz, sqlx::Error> {
        let query = format!(
            "INSERT INTO voces (slug, titulo, resumen, contenido, autor_email, autor_nombre, publicado)
             VALUES ($1, $2, $3, $4, LOWER($5), $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Voz>(&query)
            .bind(&input.slug)
            .bind(&input.titulo)
            .bind(&input.resumen)
            .bind(&input.contenido)
            .bind(&input.autor_email)
            .bind(&input.autor_nombre)
            .bind(input.publicado)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Voz>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM voces WHERE slug = $1");
        sqlx::query_as::<_, Voz>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Published posts, newest first.
    pub async fn list_published(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Voz>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM voces WHERE publicado
             ORDER BY created_at DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Voz>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Slugs equal to `base` or of the form `base-<suffix>`, used to pick a
    /// free slug before inserting.
    pub async fn slugs_with_base(pool: &PgPool, base: &str) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT slug FROM voces WHERE slug = $1 OR slug LIKE $1 || '-%'")
            .bind(base)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        slug: &str,
        input: &UpdateVoz,
    ) -> Result<Option<Voz>, sqlx::Error> {
        let query = format!(
            "UPDATE voces SET
                titulo = COALESCE($2, titulo),
                resumen = COALESCE($3, resumen),
                contenido = COALESCE($4, contenido),
                publicado = COALESCE($5, publicado),
                updated_at = NOW()
             WHERE slug = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Voz>(&query)
            .bind(slug)
            .bind(&input.titulo)
            .bind(&input.resumen)
            .bind(&input.contenido)
            .bind(input.publicado)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM voces WHERE slug = $1")
            .bind(slug)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
