//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod agenda_repo;
pub mod caso_repo;
pub mod contacto_repo;
pub mod institucion_repo;
pub mod mediador_repo;
pub mod nota_repo;
pub mod perfil_repo;
pub mod stats_repo;
pub mod subscription_repo;
pub mod voz_repo;

pub use agenda_repo::AgendaRepo;
pub use caso_repo::CasoRepo;
pub use contacto_repo::ContactoRepo;
pub use institucion_repo::InstitucionRepo;
pub use mediador_repo::MediadorRepo;
pub use nota_repo::NotaRepo;
pub use perfil_repo::PerfilRepo;
pub use stats_repo::StatsRepo;
pub use subscription_repo::SubscriptionRepo;
pub use voz_repo::VozRepo;
