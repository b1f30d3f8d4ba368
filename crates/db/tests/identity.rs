//! Integration tests for mediator and institution identity storage:
//! - Registration creates an empty profile in the same transaction
//! - Case-insensitive unique emails
//! - Transactional delete of owned cases and agenda events
//! - Public directory only lists approved mediators

use chrono::Utc;
use mediar_core::actor::{ActorKind, Owner};
use mediar_db::models::agenda::CreateAgendaEvento;
use mediar_db::models::caso::CreateCaso;
use mediar_db::models::institucion::CreateInstitucion;
use mediar_db::models::mediador::CreateMediador;
use mediar_db::models::nota::CreateNota;
use mediar_db::models::perfil::{DirectorioFilter, UpsertPerfil};
use mediar_db::repositories::{
    AgendaRepo, CasoRepo, InstitucionRepo, MediadorRepo, NotaRepo, PerfilRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_mediador(email: &str, apellido: &str) -> CreateMediador {
    CreateMediador {
        email: email.to_string(),
        nombre: "Ana".to_string(),
        apellido: apellido.to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
        matricula: Some("MP-1234".to_string()),
        telefono: None,
    }
}

fn new_caso(titulo: &str) -> CreateCaso {
    CreateCaso {
        titulo: titulo.to_string(),
        descripcion: None,
        partes: None,
        materia: None,
        estado: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_creates_empty_profile(pool: PgPool) {
    let mediador = MediadorRepo::create(&pool, &new_mediador("ana@example.com", "Pérez"))
        .await
        .unwrap();
    assert_eq!(mediador.approval_status, "pendiente");
    assert_eq!(mediador.subscription_status, "inactive");

    let perfil = PerfilRepo::find(&pool, mediador.id).await.unwrap().unwrap();
    assert!(perfil.bio.is_none());
    assert!(perfil.especialidades.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_is_case_insensitive(pool: PgPool) {
    MediadorRepo::create(&pool, &new_mediador("ana@example.com", "Pérez"))
        .await
        .unwrap();

    let err = MediadorRepo::create(&pool, &new_mediador("ANA@example.com", "Otra"))
        .await
        .unwrap_err();
    let db_err = err.as_database_error().unwrap();
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_mediadores_email"));

    let found = MediadorRepo::find_by_email(&pool, " Ana@Example.COM ")
        .await
        .unwrap();
    assert_eq!(found.unwrap().apellido, "Pérez");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_mediador_removes_owned_rows(pool: PgPool) {
    let mediador = MediadorRepo::create(&pool, &new_mediador("ana@example.com", "Pérez"))
        .await
        .unwrap();
    let owner = Owner::new(ActorKind::Mediador, "ana@example.com");
    let other = Owner::new(ActorKind::Mediador, "otro@example.com");

    let caso = CasoRepo::create(&pool, &owner, &new_caso("Sucesión"))
        .await
        .unwrap();
    let foreign = CasoRepo::create(&pool, &other, &new_caso("Ajeno"))
        .await
        .unwrap();
    let evento = AgendaRepo::create(
        &pool,
        &owner,
        &CreateAgendaEvento {
            titulo: "Audiencia".to_string(),
            descripcion: None,
            inicio: Utc::now(),
            fin: None,
            ubicacion: None,
            caso_id: Some(caso.id),
        },
    )
    .await
    .unwrap();

    assert!(MediadorRepo::delete(&pool, mediador.id).await.unwrap());

    assert!(MediadorRepo::find_by_id(&pool, mediador.id).await.unwrap().is_none());
    assert!(PerfilRepo::find(&pool, mediador.id).await.unwrap().is_none());
    assert!(CasoRepo::find_by_id(&pool, caso.id).await.unwrap().is_none());
    assert!(AgendaRepo::find_by_id(&pool, evento.id).await.unwrap().is_none());
    assert!(CasoRepo::find_by_id(&pool, foreign.id).await.unwrap().is_some());

    // Deleting again reports a missing row.
    assert!(!MediadorRepo::delete(&pool, mediador.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_institucion_removes_notes(pool: PgPool) {
    let institucion = InstitucionRepo::create(
        &pool,
        &CreateInstitucion {
            email: "juzgado@example.com".to_string(),
            nombre: "Juzgado Civil 3".to_string(),
            cuit: None,
            telefono: None,
            direccion: None,
            password_hash: "$argon2id$placeholder".to_string(),
        },
    )
    .await
    .unwrap();
    let nota = NotaRepo::create(
        &pool,
        "juzgado@example.com",
        &CreateNota {
            titulo: "Pendientes".to_string(),
            contenido: "Revisar expedientes".to_string(),
            caso_id: None,
        },
    )
    .await
    .unwrap();

    assert!(InstitucionRepo::delete(&pool, institucion.id).await.unwrap());
    assert!(NotaRepo::find_by_id(&pool, nota.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_directorio_lists_only_approved(pool: PgPool) {
    let aprobado = MediadorRepo::create(&pool, &new_mediador("a@example.com", "Alvarez"))
        .await
        .unwrap();
    let pendiente = MediadorRepo::create(&pool, &new_mediador("b@example.com", "Benitez"))
        .await
        .unwrap();
    MediadorRepo::set_approval_status(&pool, aprobado.id, "aprobado")
        .await
        .unwrap();
    PerfilRepo::upsert(
        &pool,
        aprobado.id,
        &UpsertPerfil {
            provincia: Some("Córdoba".to_string()),
            especialidades: Some(vec!["Familia".to_string(), "Comercial".to_string()]),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let all = PerfilRepo::directorio(&pool, &DirectorioFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].mediador_id, aprobado.id);

    let by_especialidad = PerfilRepo::directorio(
        &pool,
        &DirectorioFilter {
            especialidad: Some("familia".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_especialidad.len(), 1);

    let by_provincia = PerfilRepo::directorio(
        &pool,
        &DirectorioFilter {
            provincia: Some("Mendoza".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(by_provincia.is_empty());

    assert!(PerfilRepo::find_public(&pool, pendiente.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_perfil_upsert_keeps_omitted_fields(pool: PgPool) {
    let mediador = MediadorRepo::create(&pool, &new_mediador("ana@example.com", "Pérez"))
        .await
        .unwrap();
    PerfilRepo::upsert(
        &pool,
        mediador.id,
        &UpsertPerfil {
            bio: Some("Mediadora familiar".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let perfil = PerfilRepo::upsert(
        &pool,
        mediador.id,
        &UpsertPerfil {
            localidad: Some("Rosario".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(perfil.bio.as_deref(), Some("Mediadora familiar"));
    assert_eq!(perfil.localidad.as_deref(), Some("Rosario"));
}
