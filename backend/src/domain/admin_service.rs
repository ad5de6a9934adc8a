//! Admin dashboard use-cases.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use pagination::{Page, PageRequest};
use tracing::{info, warn};

use super::ports::{
    AdminAuthService, BookingRepository, CatalogueRepository, DashboardStatsQuery, LeadRepository,
};
use super::{
    AdminAllowList, AdminCredentials, AdminSession, Booking, BookingFilter, BookingId,
    BookingUpdate, DashboardStats, Error, Lead, LeadFilter, LeadId, LeadUpdate, Product,
    ProductId, ProductUpdate,
};

/// Ports the admin service depends on.
#[derive(Clone)]
pub struct AdminPorts {
    pub auth: Arc<dyn AdminAuthService>,
    pub leads: Arc<dyn LeadRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub catalogue: Arc<dyn CatalogueRepository>,
    pub stats: Arc<dyn DashboardStatsQuery>,
}

/// Authentication and back-office operations for administrators.
#[derive(Clone)]
pub struct AdminService {
    ports: AdminPorts,
    allow_list: AdminAllowList,
    clock: Arc<dyn Clock>,
}

impl AdminService {
    /// Wire the service.
    pub fn new(ports: AdminPorts, allow_list: AdminAllowList, clock: Arc<dyn Clock>) -> Self {
        Self {
            ports,
            allow_list,
            clock,
        }
    }

    /// Current instant, as seen by session expiry checks.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }

    /// Password sign-in restricted to the allow-list.
    ///
    /// The allow-list is checked before contacting the auth provider so
    /// unlisted addresses cannot be used to probe passwords.
    pub async fn sign_in(&self, credentials: &AdminCredentials) -> Result<AdminSession, Error> {
        if !self.allow_list.permits(credentials.email()) {
            warn!(email = %credentials.email(), "sign-in refused: not on admin allow-list");
            return Err(Error::forbidden("this account may not access the dashboard"));
        }
        let session = self.ports.auth.sign_in(credentials).await?;
        info!(user_id = %session.user_id, "admin signed in");
        Ok(session)
    }

    /// Return a usable session, refreshing it when near expiry.
    ///
    /// `Ok(None)` means the session was still fresh and is unchanged.
    pub async fn refresh_if_needed(
        &self,
        session: &AdminSession,
    ) -> Result<Option<AdminSession>, Error> {
        if !session.needs_refresh(self.now()) {
            return Ok(None);
        }
        let renewed = self.ports.auth.refresh(&session.refresh_token).await?;
        info!(user_id = %renewed.user_id, "admin session refreshed");
        Ok(Some(renewed))
    }

    /// Revoke the session upstream. Failures are logged only; the local
    /// session is cleared regardless.
    pub async fn sign_out(&self, session: &AdminSession) {
        if let Err(err) = self.ports.auth.sign_out(&session.access_token).await {
            warn!(user_id = %session.user_id, error = %err, "upstream sign-out failed");
        }
    }

    /// Page of leads.
    pub async fn leads(
        &self,
        session: &AdminSession,
        filter: &LeadFilter,
        page: PageRequest,
    ) -> Result<Page<Lead>, Error> {
        Ok(self
            .ports
            .leads
            .list(&session.access_token, filter, page)
            .await?)
    }

    /// Update a lead's status or notes.
    pub async fn update_lead(
        &self,
        session: &AdminSession,
        id: LeadId,
        update: &LeadUpdate,
    ) -> Result<Lead, Error> {
        let lead = self
            .ports
            .leads
            .update(&session.access_token, id, update)
            .await?
            .ok_or_else(|| Error::not_found(format!("lead {id} not found")))?;
        info!(lead_id = %id, status = %lead.status, by = %session.user_id, "lead updated");
        Ok(lead)
    }

    /// All leads matching `filter` rendered as CSV.
    pub async fn export_leads(
        &self,
        session: &AdminSession,
        filter: &LeadFilter,
    ) -> Result<String, Error> {
        let leads = self
            .ports
            .leads
            .export(&session.access_token, filter)
            .await?;
        info!(rows = leads.len(), by = %session.user_id, "lead export");
        super::leads_to_csv(&leads)
    }

    /// Page of bookings.
    pub async fn bookings(
        &self,
        session: &AdminSession,
        filter: &BookingFilter,
        page: PageRequest,
    ) -> Result<Page<Booking>, Error> {
        Ok(self
            .ports
            .bookings
            .list(&session.access_token, filter, page)
            .await?)
    }

    /// Update a booking's status or admin notes.
    pub async fn update_booking(
        &self,
        session: &AdminSession,
        id: BookingId,
        update: &BookingUpdate,
    ) -> Result<Booking, Error> {
        let booking = self
            .ports
            .bookings
            .update(&session.access_token, id, update)
            .await?
            .ok_or_else(|| Error::not_found(format!("booking {id} not found")))?;
        info!(booking_id = %id, status = %booking.status, by = %session.user_id, "booking updated");
        Ok(booking)
    }

    /// Every product including inactive ones.
    pub async fn products(&self, session: &AdminSession) -> Result<Vec<Product>, Error> {
        Ok(self
            .ports
            .catalogue
            .all_products(&session.access_token)
            .await?)
    }

    /// Edit price, visibility or tagline.
    pub async fn update_product(
        &self,
        session: &AdminSession,
        id: ProductId,
        update: &ProductUpdate,
    ) -> Result<Product, Error> {
        let product = self
            .ports
            .catalogue
            .update_product(&session.access_token, id, update)
            .await?
            .ok_or_else(|| Error::not_found(format!("product {id} not found")))?;
        info!(product_id = %id, by = %session.user_id, "product updated");
        Ok(product)
    }

    /// Dashboard counters for today (UTC).
    pub async fn stats(&self, session: &AdminSession) -> Result<DashboardStats, Error> {
        let today = self.now().date_naive();
        Ok(self
            .ports
            .stats
            .dashboard_stats(&session.access_token, today)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        AdminAuthError, FixtureBookingRepository, FixtureCatalogueRepository,
        FixtureDashboardStatsQuery, LeadRepositoryError, MockAdminAuthService, MockLeadRepository,
    };
    use crate::domain::{AccessToken, EmailAddress, ErrorCode, LeadStatus, RefreshToken};
    use chrono::Duration;
    use mockable::DefaultClock;
    use rstest::{fixture, rstest};

    fn ports(auth: MockAdminAuthService, leads: MockLeadRepository) -> AdminPorts {
        AdminPorts {
            auth: Arc::new(auth),
            leads: Arc::new(leads),
            bookings: Arc::new(FixtureBookingRepository),
            catalogue: Arc::new(FixtureCatalogueRepository),
            stats: Arc::new(FixtureDashboardStatsQuery),
        }
    }

    fn service(auth: MockAdminAuthService, leads: MockLeadRepository, allow: &str) -> AdminService {
        AdminService::new(
            ports(auth, leads),
            AdminAllowList::parse(allow),
            Arc::new(DefaultClock),
        )
    }

    #[fixture]
    fn session() -> AdminSession {
        AdminSession {
            user_id: "user-1".into(),
            email: EmailAddress::new("ops@example.com").expect("email"),
            access_token: AccessToken::new("access"),
            refresh_token: RefreshToken::new("refresh"),
            expires_at: Utc::now() + Duration::hours(1),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn unlisted_admin_is_forbidden_without_calling_auth() {
        let mut auth = MockAdminAuthService::new();
        auth.expect_sign_in().times(0);
        let service = service(auth, MockLeadRepository::new(), "boss@example.com");
        let creds = AdminCredentials::new("ops@example.com", "pw").expect("creds");
        let err = service.sign_in(&creds).await.expect_err("forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn bad_password_is_unauthorized() {
        let mut auth = MockAdminAuthService::new();
        auth.expect_sign_in()
            .returning(|_| Err(AdminAuthError::invalid_credentials()));
        let service = service(auth, MockLeadRepository::new(), "");
        let creds = AdminCredentials::new("ops@example.com", "wrong").expect("creds");
        let err = service.sign_in(&creds).await.expect_err("unauthorized");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn fresh_sessions_are_not_refreshed(session: AdminSession) {
        let mut auth = MockAdminAuthService::new();
        auth.expect_refresh().times(0);
        let service = service(auth, MockLeadRepository::new(), "");
        assert!(service.refresh_if_needed(&session).await.expect("ok").is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn expiring_sessions_are_refreshed(mut session: AdminSession) {
        session.expires_at = Utc::now() + Duration::seconds(5);
        let renewed = AdminSession {
            expires_at: Utc::now() + Duration::hours(1),
            ..session.clone()
        };
        let mut auth = MockAdminAuthService::new();
        let returned = renewed.clone();
        auth.expect_refresh()
            .times(1)
            .returning(move |_| Ok(returned.clone()));
        let service = service(auth, MockLeadRepository::new(), "");
        assert_eq!(
            service.refresh_if_needed(&session).await.expect("refreshed"),
            Some(renewed)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn updating_a_missing_lead_is_not_found(session: AdminSession) {
        let mut leads = MockLeadRepository::new();
        leads.expect_update().returning(|_, _, _| Ok(None));
        let service = service(MockAdminAuthService::new(), leads, "");
        let update = LeadUpdate::new(Some(LeadStatus::Lost), None).expect("update");
        let err = service
            .update_lead(&session, LeadId::generate(), &update)
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn revoked_tokens_surface_as_unauthorized(session: AdminSession) {
        let mut leads = MockLeadRepository::new();
        leads
            .expect_list()
            .returning(|_, _, _| Err(LeadRepositoryError::unauthorized("JWT expired")));
        let service = service(MockAdminAuthService::new(), leads, "");
        let page = PageRequest::new(1, 25).expect("page");
        let err = service
            .leads(&session, &LeadFilter::default(), page)
            .await
            .expect_err("unauthorized");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn sign_out_swallows_upstream_failures(session: AdminSession) {
        let mut auth = MockAdminAuthService::new();
        auth.expect_sign_out()
            .returning(|_| Err(AdminAuthError::connection("timeout")));
        let service = service(auth, MockLeadRepository::new(), "");
        service.sign_out(&session).await;
    }
}
