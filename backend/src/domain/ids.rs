//! Typed UUID identifiers.

use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize, utoipa::ToSchema,
        )]
        #[serde(transparent)]
        #[schema(value_type = String, format = Uuid)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Borrow the inner UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(raw.trim()).map(Self)
            }
        }
    };
}

uuid_id!(
    /// Lead identifier, generated before insertion.
    LeadId
);
uuid_id!(
    /// Test-ride booking identifier.
    BookingId
);
uuid_id!(
    /// Catalogue product identifier.
    ProductId
);
uuid_id!(
    /// Dealer identifier.
    DealerId
);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn ids_serialise_as_bare_strings() {
        let id: LeadId = "0b8f5e0e-8f6b-4f7e-9a43-2f2d9b9c1a10".parse().expect("uuid");
        assert_eq!(
            serde_json::to_value(id).expect("serialise"),
            serde_json::json!("0b8f5e0e-8f6b-4f7e-9a43-2f2d9b9c1a10")
        );
    }

    #[rstest]
    fn generated_ids_differ() {
        assert_ne!(BookingId::generate(), BookingId::generate());
    }
}
