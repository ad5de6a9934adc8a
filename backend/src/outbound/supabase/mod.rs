//! Supabase adapters: PostgREST tables and GoTrue auth.
//!
//! Public reads and submissions authenticate with the project's anon key;
//! admin calls forward the signed-in admin's access token so the database's
//! row-level security policies decide what they may see and change.

pub mod auth;
pub mod bookings;
pub mod catalogue;
pub mod client;
pub mod content;
pub mod dealers;
mod dto;
pub mod leads;
pub mod stats;

pub use auth::SupabaseAuthService;
pub use bookings::SupabaseBookingRepository;
pub use catalogue::SupabaseCatalogueRepository;
pub use client::{RestError, SupabaseClient, SupabaseSettings};
pub use content::SupabaseContentRepository;
pub use dealers::SupabaseDealerRepository;
pub use leads::SupabaseLeadRepository;
pub use stats::SupabaseDashboardStats;
