//! Marketing and lead-generation backend for an electric scooter brand.
//!
//! The crate follows a hexagonal layout: [`domain`] holds validated types,
//! services and port traits; [`inbound`] adapts HTTP onto the services;
//! [`outbound`] implements the ports over Supabase and SMTP; [`server`]
//! wires everything into an Actix application.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
pub mod tooling;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
