//! Integration tests for subscription status writes, voces, contact
//! submissions, and dashboard counters.

use mediar_core::actor::ActorKind;
use mediar_core::slug::first_free_slug;
use mediar_db::models::contacto::CreateContacto;
use mediar_db::models::mediador::CreateMediador;
use mediar_db::models::voz::{NewVoz, UpdateVoz};
use mediar_db::repositories::{
    ContactoRepo, MediadorRepo, StatsRepo, SubscriptionRepo, VozRepo,
};
use sqlx::PgPool;

fn new_mediador(email: &str) -> CreateMediador {
    CreateMediador {
        email: email.to_string(),
        nombre: "Ana".to_string(),
        apellido: "Pérez".to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
        matricula: None,
        telefono: None,
    }
}

fn new_voz(slug: &str, publicado: bool) -> NewVoz {
    NewVoz {
        slug: slug.to_string(),
        titulo: "La mediación comunitaria".to_string(),
        resumen: None,
        contenido: "Texto".to_string(),
        autor_email: "ana@example.com".to_string(),
        autor_nombre: "Ana Pérez".to_string(),
        publicado,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_apply_by_email_is_idempotent(pool: PgPool) {
    MediadorRepo::create(&pool, &new_mediador("ana@example.com"))
        .await
        .unwrap();

    let mut previous = Vec::new();
    for _ in 0..2 {
        let before = SubscriptionRepo::apply_by_email(
            &pool,
            ActorKind::Mediador,
            "ANA@example.com",
            "active",
            Some("cus_123"),
            Some("sub_456"),
        )
        .await
        .unwrap();
        previous.push(before);
    }
    assert_eq!(
        previous,
        vec![Some("inactive".to_string()), Some("active".to_string())]
    );

    let status = SubscriptionRepo::status_for_email(&pool, ActorKind::Mediador, "ana@example.com")
        .await
        .unwrap();
    assert_eq!(status.as_deref(), Some("active"));

    // A later event without ids keeps the stored ones.
    SubscriptionRepo::apply_by_email(
        &pool,
        ActorKind::Mediador,
        "ana@example.com",
        "past_due",
        None,
        None,
    )
    .await
    .unwrap();
    let mediador = MediadorRepo::find_by_email(&pool, "ana@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(mediador.subscription_status, "past_due");
    assert_eq!(mediador.stripe_customer_id.as_deref(), Some("cus_123"));
    assert_eq!(mediador.stripe_subscription_id.as_deref(), Some("sub_456"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_apply_by_customer_id(pool: PgPool) {
    MediadorRepo::create(&pool, &new_mediador("ana@example.com"))
        .await
        .unwrap();
    SubscriptionRepo::apply_by_email(
        &pool,
        ActorKind::Mediador,
        "ana@example.com",
        "active",
        Some("cus_999"),
        None,
    )
    .await
    .unwrap();

    assert!(SubscriptionRepo::apply_by_customer_id(&pool, "cus_999", "canceled", None)
        .await
        .unwrap());
    assert!(!SubscriptionRepo::apply_by_customer_id(&pool, "cus_unknown", "active", None)
        .await
        .unwrap());

    let status = SubscriptionRepo::status_for_email(&pool, ActorKind::Mediador, "ana@example.com")
        .await
        .unwrap();
    assert_eq!(status.as_deref(), Some("canceled"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_email_is_not_applied(pool: PgPool) {
    let previous = SubscriptionRepo::apply_by_email(
        &pool,
        ActorKind::Institucion,
        "nadie@example.com",
        "active",
        None,
        None,
    )
    .await
    .unwrap();
    assert_eq!(previous, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_activations_see_one_transition(pool: PgPool) {
    MediadorRepo::create(&pool, &new_mediador("ana@example.com"))
        .await
        .unwrap();

    let activate = || {
        SubscriptionRepo::apply_by_email(
            &pool,
            ActorKind::Mediador,
            "ana@example.com",
            "active",
            Some("cus_123"),
            None,
        )
    };
    let (a, b) = tokio::join!(activate(), activate());
    let mut previous = vec![a.unwrap().unwrap(), b.unwrap().unwrap()];
    previous.sort();

    // Exactly one writer observed the row before it became active.
    assert_eq!(previous, vec!["active".to_string(), "inactive".to_string()]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_voces_slug_collisions_and_publication(pool: PgPool) {
    VozRepo::create(&pool, &new_voz("la-mediacion-comunitaria", true))
        .await
        .unwrap();
    let taken = VozRepo::slugs_with_base(&pool, "la-mediacion-comunitaria")
        .await
        .unwrap();
    let slug = first_free_slug("la-mediacion-comunitaria", &taken);
    assert_eq!(slug, "la-mediacion-comunitaria-2");

    let borrador = VozRepo::create(&pool, &new_voz(&slug, false)).await.unwrap();

    let err = VozRepo::create(&pool, &new_voz(&slug, true))
        .await
        .unwrap_err();
    assert_eq!(
        err.as_database_error().unwrap().constraint(),
        Some("uq_voces_slug")
    );

    let published = VozRepo::list_published(&pool, 20, 0).await.unwrap();
    assert_eq!(published.len(), 1);

    let updated = VozRepo::update(
        &pool,
        &borrador.slug,
        &UpdateVoz {
            publicado: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert!(updated.publicado);
    assert_eq!(VozRepo::list_published(&pool, 20, 0).await.unwrap().len(), 2);
    assert_eq!(VozRepo::list_published(&pool, 1, 1).await.unwrap().len(), 1);

    assert!(VozRepo::delete(&pool, &borrador.slug).await.unwrap());
    assert!(VozRepo::find_by_slug(&pool, &borrador.slug)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_contactos_and_stats(pool: PgPool) {
    let mediador = MediadorRepo::create(&pool, &new_mediador("ana@example.com"))
        .await
        .unwrap();
    MediadorRepo::create(&pool, &new_mediador("beto@example.com"))
        .await
        .unwrap();
    MediadorRepo::set_approval_status(&pool, mediador.id, "aprobado")
        .await
        .unwrap();
    MediadorRepo::set_subscription_status(&pool, mediador.id, "active")
        .await
        .unwrap();

    let contacto = ContactoRepo::create(
        &pool,
        &CreateContacto {
            nombre: "Carla".to_string(),
            email: "Carla@Example.com".to_string(),
            mensaje: "Necesito una mediación".to_string(),
            categoria: "cliente".to_string(),
            confianza: 0.55,
        },
    )
    .await
    .unwrap();
    assert!(!contacto.auto_reply_sent);
    assert_eq!(contacto.email, "carla@example.com");
    ContactoRepo::mark_auto_reply_sent(&pool, contacto.id)
        .await
        .unwrap();

    let clientes = ContactoRepo::list(&pool, Some("cliente"), 20, 0).await.unwrap();
    assert_eq!(clientes.len(), 1);
    assert!(clientes[0].auto_reply_sent);
    assert!(ContactoRepo::list(&pool, Some("mediador"), 20, 0)
        .await
        .unwrap()
        .is_empty());

    let stats = StatsRepo::platform(&pool).await.unwrap();
    assert_eq!(stats.mediadores_total, 2);
    assert_eq!(stats.mediadores_pendientes, 1);
    assert_eq!(stats.mediadores_aprobados, 1);
    assert_eq!(stats.suscripciones_activas, 1);
    assert_eq!(stats.instituciones_total, 0);
    assert_eq!(stats.casos_abiertos, 0);
    assert_eq!(stats.contactos_total, 1);
}
