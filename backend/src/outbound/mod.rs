//! Outbound adapters implementing domain ports.
//!
//! - **supabase**: PostgREST tables and GoTrue auth over reqwest.
//! - **email**: SMTP notifications rendered from embedded templates.
//!
//! Adapters translate between wire formats and domain types. They hold no
//! business rules.

pub mod email;
pub mod supabase;
