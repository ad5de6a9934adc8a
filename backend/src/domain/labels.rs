//! Closed string vocabularies (statuses, sources, time slots).
//!
//! Each vocabulary is a fieldless enum with a stable snake_case wire label.
//! Parsing goes through [`FromStr`](std::str::FromStr) so form payloads can
//! report an unknown label as a field issue instead of a body decode failure.

use super::validation::FieldViolation;

/// A label outside the allowed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("must be one of: {}", allowed.join(", "))]
pub struct UnknownLabel {
    allowed: &'static [&'static str],
}

impl UnknownLabel {
    /// Build the error for a vocabulary.
    #[must_use]
    pub const fn new(allowed: &'static [&'static str]) -> Self {
        Self { allowed }
    }

    /// Labels that would have been accepted.
    #[must_use]
    pub const fn allowed(&self) -> &'static [&'static str] {
        self.allowed
    }
}

impl FieldViolation for UnknownLabel {
    fn code(&self) -> &'static str {
        "invalid_option"
    }
}

macro_rules! labelled_enum {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $label:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize, utoipa::ToSchema,
        )]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every wire label, in declaration order.
            pub const LABELS: &'static [&'static str] = &[$($label),+];

            /// Stable wire label.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::domain::labels::UnknownLabel;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                match raw.trim() {
                    $($label => Ok(Self::$variant),)+
                    _ => Err($crate::domain::labels::UnknownLabel::new(Self::LABELS)),
                }
            }
        }
    };
}

pub(crate) use labelled_enum;
