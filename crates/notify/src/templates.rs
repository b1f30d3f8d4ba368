//! Transactional email templates.
//!
//! Every template renders a subject and a plain-text body addressed to the
//! recipient by name. Texts are in Spanish, the language of the platform.

use mediar_core::contact::ContactCategory;
use mediar_core::status::ApprovalStatus;

const SIGNATURE: &str = "\n\nSaludos,\nEl equipo de Mediar";

/// A rendered message ready to wrap in an [`OutgoingEmail`](crate::OutgoingEmail).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailTemplate {
    pub subject: String,
    pub body: String,
}

impl EmailTemplate {
    fn new(subject: impl Into<String>, body: String) -> Self {
        Self {
            subject: subject.into(),
            body: format!("{body}{SIGNATURE}"),
        }
    }
}

fn greeting(nombre: &str) -> String {
    let nombre = nombre.trim();
    if nombre.is_empty() {
        "Hola,".to_string()
    } else {
        format!("Hola {nombre},")
    }
}

pub fn welcome_mediador(nombre: &str) -> EmailTemplate {
    EmailTemplate::new(
        "Bienvenido/a a Mediar",
        format!(
            "{}\n\nRecibimos tu registro como mediador/a. Nuestro equipo revisará tu \
             matrícula y te avisaremos por este medio cuando tu perfil sea aprobado \
             y aparezca en el directorio público.",
            greeting(nombre)
        ),
    )
}

pub fn welcome_institucion(nombre: &str) -> EmailTemplate {
    EmailTemplate::new(
        "Bienvenida a Mediar",
        format!(
            "{}\n\nLa cuenta institucional ya está activa. Desde el panel podés cargar \
             casos, organizar la agenda y llevar notas internas.",
            greeting(nombre)
        ),
    )
}

/// Notice sent when an admin changes a mediator's approval status.
pub fn approval_changed(nombre: &str, status: ApprovalStatus) -> EmailTemplate {
    let detail = match status {
        ApprovalStatus::Aprobado => {
            "Tu perfil fue aprobado. Ya aparecés en el directorio público de mediadores."
        }
        ApprovalStatus::Rechazado => {
            "No pudimos aprobar tu perfil. Respondé este correo si querés revisar la \
             documentación presentada."
        }
        ApprovalStatus::Pendiente => "Tu perfil volvió a quedar pendiente de revisión.",
    };
    EmailTemplate::new(
        format!("Estado de tu perfil: {status}"),
        format!("{}\n\n{detail}", greeting(nombre)),
    )
}

pub fn subscription_activated(nombre: &str) -> EmailTemplate {
    EmailTemplate::new(
        "Suscripción activa",
        format!(
            "{}\n\nConfirmamos el pago de tu suscripción. Ya tenés acceso a todas las \
             herramientas de la plataforma.",
            greeting(nombre)
        ),
    )
}

/// Auto-reply for a contact submission or an inbound email, by category.
pub fn contact_auto_reply(category: ContactCategory, nombre: &str) -> EmailTemplate {
    let (subject, detail) = match category {
        ContactCategory::Mediador => (
            "Gracias por tu interés en sumarte a Mediar",
            "Vimos que sos mediador/a. Podés registrarte en la plataforma y completar \
             tu perfil profesional; una vez aprobada la matrícula aparecerás en el \
             directorio.",
        ),
        ContactCategory::Cliente => (
            "Recibimos tu consulta de mediación",
            "Gracias por escribirnos. En el directorio público vas a encontrar \
             mediadores por provincia y especialidad, y en breve te contactaremos \
             para orientarte.",
        ),
        ContactCategory::Otro => (
            "Recibimos tu mensaje",
            "Gracias por escribirnos. Un integrante del equipo va a leer tu mensaje y \
             te responderá a la brevedad.",
        ),
    };
    EmailTemplate::new(subject, format!("{}\n\n{detail}", greeting(nombre)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_greet_by_name_and_sign() {
        let t = welcome_mediador("Ana");
        assert!(t.body.starts_with("Hola Ana,"));
        assert!(t.body.ends_with("El equipo de Mediar"));
    }

    #[test]
    fn blank_name_uses_generic_greeting() {
        let t = contact_auto_reply(ContactCategory::Otro, "  ");
        assert!(t.body.starts_with("Hola,\n"));
    }

    #[test]
    fn approval_subject_names_status() {
        let t = approval_changed("Ana", ApprovalStatus::Aprobado);
        assert_eq!(t.subject, "Estado de tu perfil: aprobado");
        assert!(t.body.contains("directorio"));
    }

    #[test]
    fn auto_reply_differs_by_category() {
        let subjects: Vec<_> = [
            ContactCategory::Mediador,
            ContactCategory::Cliente,
            ContactCategory::Otro,
        ]
        .into_iter()
        .map(|c| contact_auto_reply(c, "Ana").subject)
        .collect();
        assert_ne!(subjects[0], subjects[1]);
        assert_ne!(subjects[1], subjects[2]);
    }
}
