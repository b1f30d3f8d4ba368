//! Keyword classification of inbound contact messages.
//!
//! Used by the contact form and the mailbox auto-responder to pick which
//! auto-reply template to send. Scoring is plain substring containment over
//! the lower-cased text; the confidence value is a linear function of the
//! winning score and is not calibrated.

use serde::{Deserialize, Serialize};

/// Keywords that suggest the sender is (or wants to become) a mediator.
pub const MEDIADOR_KEYWORDS: &[&str] = &[
    "mediador",
    "matrícula",
    "matricula",
    "suscripción",
    "suscripcion",
    "panel",
    "registro",
    "registrarme",
    "perfil",
    "plan",
    "pago",
    "mi cuenta",
    "contraseña",
];

/// Keywords that suggest the sender is a party looking for mediation.
pub const CLIENTE_KEYWORDS: &[&str] = &[
    "mediación",
    "mediacion",
    "conflicto",
    "audiencia",
    "consulta",
    "necesito",
    "abogado",
    "divorcio",
    "herencia",
    "alquiler",
    "desalojo",
    "vecino",
    "acuerdo",
    "reclamo",
];

const BASE_CONFIDENCE: f64 = 0.40;
const CONFIDENCE_PER_HIT: f64 = 0.15;
const MAX_CONFIDENCE: f64 = 0.95;
const OTRO_CONFIDENCE: f64 = 0.30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactCategory {
    Mediador,
    Cliente,
    Otro,
}

impl ContactCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ContactCategory::Mediador => "mediador",
            ContactCategory::Cliente => "cliente",
            ContactCategory::Otro => "otro",
        }
    }
}

impl std::str::FromStr for ContactCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mediador" => Ok(ContactCategory::Mediador),
            "cliente" => Ok(ContactCategory::Cliente),
            "otro" => Ok(ContactCategory::Otro),
            other => Err(format!("Unknown contact category '{other}'")),
        }
    }
}

/// Result of classifying a message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub category: ContactCategory,
    pub confidence: f64,
    pub mediador_score: usize,
    pub cliente_score: usize,
}

/// Count how many keywords of `set` occur in the (already lower-cased) text.
fn score(text: &str, set: &[&str]) -> usize {
    set.iter().filter(|kw| text.contains(*kw)).count()
}

/// Classify a message. The higher score wins; equal scores (including no
/// hits at all) fall through to [`ContactCategory::Otro`].
pub fn classify(text: &str) -> Classification {
    let lowered = text.to_lowercase();
    let mediador_score = score(&lowered, MEDIADOR_KEYWORDS);
    let cliente_score = score(&lowered, CLIENTE_KEYWORDS);

    let (category, winning) = if mediador_score > cliente_score {
        (ContactCategory::Mediador, mediador_score)
    } else if cliente_score > mediador_score {
        (ContactCategory::Cliente, cliente_score)
    } else {
        (ContactCategory::Otro, 0)
    };

    let confidence = match category {
        ContactCategory::Otro => OTRO_CONFIDENCE,
        _ => (BASE_CONFIDENCE + CONFIDENCE_PER_HIT * winning as f64).min(MAX_CONFIDENCE),
    };

    Classification {
        category,
        confidence,
        mediador_score,
        cliente_score,
    }
}
