//! Mediation acta generation.
//!
//! One generator serves every acta. Its base document is either an operator
//! supplied `.docx` template or the built-in acta below; in both cases the
//! same placeholder filling applies.

use std::collections::HashMap;
use std::path::Path;

use crate::builder::DocumentBuilder;
use crate::error::DocumentError;
use crate::header_image::{embed_header_image, HeaderImage};
use crate::package::DocxPackage;
use crate::template::{fill_package, placeholders, values_from_fields};

/// Input for one acta. Field keys are free-form (`nombre_mediador`,
/// `NOMBRE_MEDIADOR`, ...) and fill the matching bracketed token.
#[derive(Debug, Clone, Default)]
pub struct ActaRequest {
    pub fields: HashMap<String, String>,
    pub header_image: Option<HeaderImage>,
}

#[derive(Debug, Clone)]
pub struct GeneratedActa {
    pub bytes: Vec<u8>,
    /// Placeholders left unfilled, sorted.
    pub missing: Vec<String>,
    /// Whether a header image was embedded.
    pub header_image: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ActaGenerator {
    template: Option<Vec<u8>>,
}

impl ActaGenerator {
    /// Generator over the built-in acta.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Generator over a `.docx` template on disk. The file is read once and
    /// validated here so a bad template fails at start-up.
    pub fn from_template_file(path: &Path) -> Result<Self, DocumentError> {
        let bytes = std::fs::read(path)?;
        DocxPackage::from_bytes(&bytes)?;
        tracing::info!(path = %path.display(), "Loaded acta template");
        Ok(Self {
            template: Some(bytes),
        })
    }

    pub fn uses_custom_template(&self) -> bool {
        self.template.is_some()
    }

    fn base_package(&self) -> Result<DocxPackage, DocumentError> {
        match &self.template {
            Some(bytes) => DocxPackage::from_bytes(bytes),
            None => Ok(builtin_template().build()),
        }
    }

    /// Placeholders present in the active template, sorted.
    pub fn placeholders(&self) -> Result<Vec<String>, DocumentError> {
        Ok(placeholders(&self.base_package()?)?.into_iter().collect())
    }

    pub fn generate(&self, request: &ActaRequest) -> Result<GeneratedActa, DocumentError> {
        let mut package = self.base_package()?;

        let values = values_from_fields(&request.fields);
        let missing = fill_package(&mut package, &values)?;

        let header_image = match &request.header_image {
            Some(image) => match embed_header_image(&mut package, image) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(error = %e, "Header image not embedded");
                    false
                }
            },
            None => false,
        };

        Ok(GeneratedActa {
            bytes: package.to_bytes()?,
            missing,
            header_image,
        })
    }
}

fn builtin_template() -> DocumentBuilder {
    DocumentBuilder::new()
        .title("ACTA DE MEDIACIÓN")
        .centered("Caso: [TITULO]")
        .blank()
        .paragraph(
            "En la ciudad de [CIUDAD], a los [FECHA], se reúnen ante el/la mediador/a \
             [NOMBRE_MEDIADOR], matrícula [MATRICULA_MEDIADOR], las partes del caso \
             indicado, a fin de celebrar la audiencia de mediación.",
        )
        .blank()
        .labeled("Partes", "[PARTES]")
        .labeled("Materia", "[MATERIA]")
        .labeled("Requirente", "[REQUIRENTE]")
        .labeled("Requerido", "[REQUERIDO]")
        .blank()
        .heading("Acuerdo")
        .paragraph("[ACUERDO]")
        .blank()
        .heading("Observaciones")
        .paragraph("[OBSERVACIONES]")
        .blank()
        .paragraph(
            "Leída y ratificada, las partes firman de conformidad en el lugar y fecha \
             indicados, recibiendo cada una un ejemplar.",
        )
        .blank()
        .blank()
        .centered("______________________          ______________________")
        .centered("Requirente                                    Requerido")
        .blank()
        .blank()
        .centered("______________________")
        .centered("[NOMBRE_MEDIADOR]")
        .centered("Mediador/a")
}
