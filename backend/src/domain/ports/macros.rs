//! Helper macros for port error enums.

/// Declare a `thiserror` enum with one snake_case constructor per variant.
///
/// String-like fields accept `impl Into<_>` so adapters can pass `&str` or
/// formatted values directly.
macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Build [`Self::", stringify!($variant), "`].")]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            #[doc = concat!("Build [`Self::", stringify!($variant), "`].")]
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

/// Map repository-style errors onto the domain [`Error`](crate::domain::Error).
///
/// `Unauthorized` means the hosted service rejected the caller's token and
/// becomes a 401; every other variant is an internal failure whose message is
/// kept for logs and redacted in responses.
macro_rules! repository_error_into_domain {
    ($($error:ty),+ $(,)?) => {
        $(
            impl From<$error> for $crate::domain::Error {
                fn from(err: $error) -> Self {
                    type Source = $error;
                    match err {
                        Source::Unauthorized { .. } => {
                            $crate::domain::Error::unauthorized("admin session is no longer valid")
                        }
                        other => $crate::domain::Error::internal(other.to_string()),
                    }
                }
            }
        )+
    };
}

pub(crate) use define_port_error;
pub(crate) use repository_error_into_domain;
