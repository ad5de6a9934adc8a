//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data<HttpState>`. It holds domain
//! services built over port trait objects, so tests can swap any adapter for
//! a fixture or mock without touching handler code.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    AdminAuthService, BookingRepository, CatalogueRepository, ContentRepository,
    DashboardStatsQuery, DealerRepository, FixtureAdminAuthService, FixtureBookingRepository,
    FixtureCatalogueRepository, FixtureContentRepository, FixtureDashboardStatsQuery,
    FixtureDealerRepository, FixtureLeadRepository, FixtureSubmissionNotifier, LeadRepository,
    SubmissionNotifier,
};
use crate::domain::{
    AdminAllowList, AdminPorts, AdminService, BookingIntakeService, CatalogueService,
    ContentService, DealerLocatorService, LeadIntakeService, SiteUrl, SitemapService,
};

/// Markup served for admin pages when no built dashboard is deployed.
pub const FALLBACK_ADMIN_SHELL: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<meta name="robots" content="noindex, nofollow">
<title>Admin</title>
</head>
<body>
<div id="root"></div>
<noscript>The admin dashboard requires JavaScript.</noscript>
</body>
</html>
"#;

/// Every port implementation the HTTP adapter needs.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub leads: Arc<dyn LeadRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub catalogue: Arc<dyn CatalogueRepository>,
    pub dealers: Arc<dyn DealerRepository>,
    pub content: Arc<dyn ContentRepository>,
    pub stats: Arc<dyn DashboardStatsQuery>,
    pub auth: Arc<dyn AdminAuthService>,
    pub notifier: Arc<dyn SubmissionNotifier>,
}

impl Default for HttpStatePorts {
    fn default() -> Self {
        Self {
            leads: Arc::new(FixtureLeadRepository),
            bookings: Arc::new(FixtureBookingRepository),
            catalogue: Arc::new(FixtureCatalogueRepository),
            dealers: Arc::new(FixtureDealerRepository),
            content: Arc::new(FixtureContentRepository),
            stats: Arc::new(FixtureDashboardStatsQuery),
            auth: Arc::new(FixtureAdminAuthService),
            notifier: Arc::new(FixtureSubmissionNotifier),
        }
    }
}

/// Non-port inputs to the HTTP state.
#[derive(Clone)]
pub struct HttpStateSettings {
    pub site: SiteUrl,
    pub allow_list: AdminAllowList,
    pub clock: Arc<dyn Clock>,
    pub admin_shell: Arc<str>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub leads: LeadIntakeService,
    pub bookings: BookingIntakeService,
    pub catalogue: CatalogueService,
    pub dealers: DealerLocatorService,
    pub content: ContentService,
    pub sitemap: SitemapService,
    pub admin: AdminService,
    pub admin_shell: Arc<str>,
}

impl HttpState {
    /// Build the services over the supplied ports.
    pub fn new(ports: HttpStatePorts, settings: HttpStateSettings) -> Self {
        let HttpStateSettings {
            site,
            allow_list,
            clock,
            admin_shell,
        } = settings;
        Self {
            leads: LeadIntakeService::new(ports.leads.clone(), ports.notifier.clone()),
            bookings: BookingIntakeService::new(
                ports.bookings.clone(),
                ports.notifier,
                clock.clone(),
            ),
            catalogue: CatalogueService::new(ports.catalogue.clone()),
            dealers: DealerLocatorService::new(ports.dealers),
            content: ContentService::new(ports.content.clone(), clock.clone()),
            sitemap: SitemapService::new(
                ports.catalogue.clone(),
                ports.content,
                clock.clone(),
                site,
            ),
            admin: AdminService::new(
                AdminPorts {
                    auth: ports.auth,
                    leads: ports.leads,
                    bookings: ports.bookings,
                    catalogue: ports.catalogue,
                    stats: ports.stats,
                },
                allow_list,
                clock,
            ),
            admin_shell,
        }
    }
}
