//! Domain primitives, aggregates and services.
//!
//! Purpose: model the marketing site's leads, bookings, catalogue, dealer
//! network, editorial content and admin sessions as validated types, and
//! express use-cases against ports so adapters stay swappable.
//!
//! Public surface:
//! - Error, ErrorCode: transport-agnostic error payload.
//! - Value objects (EmailAddress, PhoneNumber, Slug, ...) whose constructors
//!   enforce invariants.
//! - Services (LeadIntakeService, AdminService, ...) consumed by the HTTP
//!   adapter.
//! - `ports`: traits implemented by outbound adapters.

pub mod admin;
pub mod admin_service;
pub mod booking;
pub mod catalogue;
pub mod catalogue_service;
pub mod contact;
pub mod content;
pub mod content_service;
pub mod dealer;
pub mod dealer_service;
pub mod error;
pub mod ids;
pub mod intake_service;
pub(crate) mod labels;
pub mod lead;
pub mod lead_export;
pub mod ports;
pub mod sitemap;
pub mod sitemap_service;
pub mod slug;
pub mod stats;
pub mod trace_id;
pub mod validation;

pub use self::admin::{
    AccessToken, AdminAllowList, AdminCredentials, AdminSession, CredentialsError, RefreshToken,
    SESSION_REFRESH_LEEWAY_SECS,
};
pub use self::admin_service::{AdminPorts, AdminService};
pub use self::booking::{
    BOOKING_HORIZON_DAYS, BOOKING_NOTES_MAX, Booking, BookingDateError, BookingFilter,
    BookingStatus, BookingUpdate, InvertedRange, NewBooking, PreferredDate, TimeSlot,
};
pub use self::catalogue::{
    COMPARE_MAX, COMPARE_MIN, HexColor, Money, Product, ProductColor, ProductUpdate,
    ProductUpdateError, ProductVariant, order_comparison, parse_comparison,
};
pub use self::catalogue_service::CatalogueService;
pub use self::contact::{City, ContactValidationError, EmailAddress, PersonName, PhoneNumber};
pub use self::content::{BlogPost, BlogPostSummary, Faq, FaqGroup, group_faqs};
pub use self::content_service::ContentService;
pub use self::dealer::{
    DEFAULT_RADIUS_KM, Dealer, DealerFilter, GeoError, GeoPoint, MAX_RADIUS_KM, NearbyDealer,
    NearbyQuery, nearest_dealers,
};
pub use self::dealer_service::DealerLocatorService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{BookingId, DealerId, LeadId, ProductId};
pub use self::intake_service::{BookingIntakeService, LeadIntakeService};
pub use self::labels::UnknownLabel;
pub use self::lead::{
    ADMIN_NOTES_MAX, EmptyUpdate, LEAD_MESSAGE_MAX, Lead, LeadFilter, LeadSource, LeadStatus,
    LeadUpdate, NewLead, SearchTerm,
};
pub use self::lead_export::leads_to_csv;
pub use self::sitemap::{
    ChangeFrequency, STATIC_ROUTES, SiteUrl, SiteUrlError, SitemapEntry, StaticRoute,
    render_robots, render_sitemap, sitemap_entries,
};
pub use self::sitemap_service::SitemapService;
pub use self::slug::{Slug, SlugValidationError};
pub use self::stats::DashboardStats;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::validation::{FieldIssue, FieldViolation, ValidationReport};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use site_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
