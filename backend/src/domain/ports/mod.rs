//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::{define_port_error, repository_error_into_domain};

mod admin_auth_service;
mod booking_repository;
mod catalogue_repository;
mod content_repository;
mod dashboard_stats_query;
mod dealer_repository;
mod lead_repository;
mod submission_notifier;

#[cfg(test)]
pub use admin_auth_service::MockAdminAuthService;
pub use admin_auth_service::{AdminAuthError, AdminAuthService, FixtureAdminAuthService};
#[cfg(test)]
pub use booking_repository::MockBookingRepository;
pub use booking_repository::{BookingRepository, BookingRepositoryError, FixtureBookingRepository};
#[cfg(test)]
pub use catalogue_repository::MockCatalogueRepository;
pub use catalogue_repository::{
    CatalogueRepository, CatalogueRepositoryError, FixtureCatalogueRepository,
};
#[cfg(test)]
pub use content_repository::MockContentRepository;
pub use content_repository::{ContentRepository, ContentRepositoryError, FixtureContentRepository};
#[cfg(test)]
pub use dashboard_stats_query::MockDashboardStatsQuery;
pub use dashboard_stats_query::{
    DashboardStatsError, DashboardStatsQuery, FixtureDashboardStatsQuery,
};
#[cfg(test)]
pub use dealer_repository::MockDealerRepository;
pub use dealer_repository::{DealerRepository, DealerRepositoryError, FixtureDealerRepository};
#[cfg(test)]
pub use lead_repository::MockLeadRepository;
pub use lead_repository::{FixtureLeadRepository, LeadRepository, LeadRepositoryError};
#[cfg(test)]
pub use submission_notifier::MockSubmissionNotifier;
pub use submission_notifier::{
    FixtureSubmissionNotifier, NotificationError, SubmissionNotifier,
};

repository_error_into_domain!(
    LeadRepositoryError,
    BookingRepositoryError,
    CatalogueRepositoryError,
    DealerRepositoryError,
    ContentRepositoryError,
    DashboardStatsError,
);
