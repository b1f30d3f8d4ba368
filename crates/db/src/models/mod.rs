//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod agenda;
pub mod caso;
pub mod contacto;
pub mod institucion;
pub mod mediador;
pub mod nota;
pub mod perfil;
pub mod stats;
pub mod voz;
