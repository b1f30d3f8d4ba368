//! Documented value sets for the free-text status columns.
//!
//! The columns are plain `TEXT`; these enums are the validation edge used by
//! the API. No transition order is enforced between values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! text_status {
    ($(#[$meta:meta])* $name:ident, $label:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == wanted)
                    .ok_or_else(|| {
                        let valid: Vec<&str> = $name::ALL.iter().map(|v| v.as_str()).collect();
                        format!("Invalid {} '{}'. Valid values: {}", $label, s, valid.join(", "))
                    })
            }
        }
    };
}

text_status!(
    /// Lifecycle of a case. Set directly by the client.
    CasoEstado, "case status" {
        Abierto => "abierto",
        EnCurso => "en_curso",
        Cerrado => "cerrado",
    }
);

text_status!(
    /// Admin approval of a registered mediator.
    ApprovalStatus, "approval status" {
        Pendiente => "pendiente",
        Aprobado => "aprobado",
        Rechazado => "rechazado",
    }
);

text_status!(
    /// Subscription state kept on mediator and institution rows.
    SubscriptionStatus, "subscription status" {
        Inactive => "inactive",
        Active => "active",
        PastDue => "past_due",
        Canceled => "canceled",
    }
);

impl CasoEstado {
    pub fn is_closed(self) -> bool {
        self == CasoEstado::Cerrado
    }
}
