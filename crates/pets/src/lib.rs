//! Pets domain module: pets and their care events.
//!
//! This crate contains the entity types, their enumerations and the input
//! payloads accepted for create/update, with their validation rules. It is
//! pure domain logic (no IO, no HTTP, no storage).

/// Closed enumeration whose wire and storage form is a fixed label.
macro_rules! labelled_enum {
    ($(#[$meta:meta])* $name:ident, $field:literal { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every accepted label, in declaration order.
            pub const LABELS: &'static [&'static str] = &[$($label),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl core::str::FromStr for $name {
            type Err = mascotas_core::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok(Self::$variant),)+
                    _ => Err(mascotas_core::DomainError::validation(vec![
                        mascotas_core::FieldError::new(
                            $field,
                            format!("debe ser uno de: {}", Self::LABELS.join(", ")),
                        ),
                    ])),
                }
            }
        }
    };
}

pub mod care;
pub mod pet;

pub use care::{CareEvent, CareEventDraft, CareEventInput, CareEventUpdateInput, CareType};
pub use pet::{Pet, PetDraft, PetInput, Sex, Species};
