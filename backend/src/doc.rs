//! OpenAPI documentation.
//!
//! [`ApiDoc`] collects every public and admin endpoint together with the
//! payload schemas they reference and the session cookie security scheme.
//! Swagger UI serves it at `/docs` in debug builds; `openapi-dump` prints it
//! for client generation.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    BlogPost, BlogPostSummary, Booking, BookingStatus, DashboardStats, Dealer, Error, ErrorCode,
    Faq, FaqGroup, Lead, LeadSource, LeadStatus, NearbyDealer, Product, ProductColor,
    ProductVariant, TimeSlot,
};
use crate::inbound::http::admin_auth::{LoginRequest, SessionInfo};
use crate::inbound::http::admin_bookings::BookingPatch;
use crate::inbound::http::admin_catalogue::ProductPatch;
use crate::inbound::http::admin_leads::LeadPatch;
use crate::inbound::http::bookings::BookingRequest;
use crate::inbound::http::leads::LeadRequest;
use crate::inbound::http::schemas::CreatedResponse;
use crate::inbound::http::session_config::SESSION_COOKIE;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE,
                "Encrypted session cookie issued by POST /api/admin/login.",
            ))),
        );
    }
}

/// OpenAPI document for the site API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Electric scooter site API",
        description = "Lead capture, test-ride booking, catalogue, dealer locator, content and admin dashboard endpoints."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::leads::create_lead,
        crate::inbound::http::bookings::create_booking,
        crate::inbound::http::catalogue::list_products,
        crate::inbound::http::catalogue::compare_products,
        crate::inbound::http::catalogue::get_product,
        crate::inbound::http::dealers::list_dealers,
        crate::inbound::http::dealers::nearby_dealers,
        crate::inbound::http::content::list_faqs,
        crate::inbound::http::content::list_posts,
        crate::inbound::http::content::get_post,
        crate::inbound::http::seo::robots_txt,
        crate::inbound::http::seo::sitemap_xml,
        crate::inbound::http::admin_auth::login,
        crate::inbound::http::admin_auth::logout,
        crate::inbound::http::admin_auth::current_session,
        crate::inbound::http::admin_leads::list_leads,
        crate::inbound::http::admin_leads::update_lead,
        crate::inbound::http::admin_leads::export_leads,
        crate::inbound::http::admin_bookings::list_bookings,
        crate::inbound::http::admin_bookings::update_booking,
        crate::inbound::http::admin_catalogue::list_products,
        crate::inbound::http::admin_catalogue::update_product,
        crate::inbound::http::admin_catalogue::stats,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error, ErrorCode, CreatedResponse,
        LeadRequest, LeadSource, LeadStatus, Lead, LeadPatch,
        BookingRequest, TimeSlot, BookingStatus, Booking, BookingPatch,
        Product, ProductVariant, ProductColor, ProductPatch,
        Dealer, NearbyDealer, Faq, FaqGroup, BlogPostSummary, BlogPost,
        LoginRequest, SessionInfo, DashboardStats,
    )),
    tags(
        (name = "leads", description = "Contact and callback requests"),
        (name = "bookings", description = "Test-ride bookings"),
        (name = "catalogue", description = "Scooter models"),
        (name = "dealers", description = "Dealer locator"),
        (name = "content", description = "FAQs and blog"),
        (name = "seo", description = "robots.txt and sitemap"),
        (name = "admin", description = "Dashboard API; requires a session"),
        (name = "health", description = "Probes")
    )
)]
pub struct ApiDoc;
