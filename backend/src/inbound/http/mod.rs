//! HTTP inbound adapter exposing the public and admin REST endpoints.
//!
//! Handlers parse wire DTOs into domain types, call a service from
//! [`state::HttpState`] and map the outcome to JSON. Route registration
//! lives in [`crate::server`].

pub mod admin_auth;
pub mod admin_bookings;
pub mod admin_catalogue;
pub mod admin_leads;
pub mod admin_pages;
pub mod bookings;
pub mod cache_control;
pub mod catalogue;
pub mod content;
pub mod dealers;
pub mod error;
pub mod health;
pub mod leads;
pub mod schemas;
pub mod seo;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
