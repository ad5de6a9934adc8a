//! Shared doubles and app construction for integration tests.
//!
//! Port mocks generated by `mockall` exist only under `cfg(test)` inside the
//! library, so these suites use small hand-written doubles instead.

use std::sync::{Arc, Mutex};

use actix_web::cookie::{Key, SameSite};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use mockable::DefaultClock;
use pagination::{Page, PageRequest};
use site_backend::domain::ports::{
    AdminAuthError, AdminAuthService, LeadRepository, LeadRepositoryError, NotificationError,
    SubmissionNotifier,
};
use site_backend::domain::{
    AccessToken, AdminAllowList, AdminCredentials, AdminSession, EmailAddress, Lead, LeadFilter,
    LeadId, LeadSource, LeadStatus, LeadUpdate, NewBooking, NewLead, PersonName, PhoneNumber,
    RefreshToken, SiteUrl,
};
use site_backend::inbound::http::session_config::SessionSettings;
use site_backend::inbound::http::state::{
    FALLBACK_ADMIN_SHELL, HttpState, HttpStatePorts, HttpStateSettings,
};

/// Public origin used by integration tests.
pub const SITE_URL: &str = "https://ride.example";
/// Password accepted by [`StubAuth`].
pub const GOOD_PASSWORD: &str = "hunter2";

/// Session settings with a fixed key so cookies survive across app instances.
pub fn session_settings() -> SessionSettings {
    SessionSettings {
        key: Key::derive_from(&[7_u8; 64]),
        cookie_secure: false,
        same_site: SameSite::Lax,
        fingerprint: String::new(),
    }
}

/// HTTP state over `ports` with an optional allow-list.
pub fn state(ports: HttpStatePorts, allow_list: &str) -> HttpState {
    HttpState::new(
        ports,
        HttpStateSettings {
            site: SiteUrl::parse(SITE_URL).expect("site url"),
            allow_list: AdminAllowList::parse(allow_list),
            clock: Arc::new(DefaultClock),
            admin_shell: Arc::from(FALLBACK_ADMIN_SHELL),
        },
    )
}

/// Build the full application around a state value.
#[macro_export]
macro_rules! site_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state))
                .app_data(actix_web::web::Data::new(
                    site_backend::inbound::http::health::HealthState::new(),
                ))
                .wrap(site_backend::inbound::http::session_config::session_middleware(
                    &$crate::support::session_settings(),
                ))
                .wrap(site_backend::Trace)
                .configure(site_backend::server::configure_routes),
        )
        .await
    };
}

/// Accepts [`GOOD_PASSWORD`] for any well-formed email.
#[derive(Debug, Default)]
pub struct StubAuth;

#[async_trait]
impl AdminAuthService for StubAuth {
    async fn sign_in(&self, credentials: &AdminCredentials) -> Result<AdminSession, AdminAuthError> {
        if credentials.password() != GOOD_PASSWORD {
            return Err(AdminAuthError::invalid_credentials());
        }
        Ok(AdminSession {
            user_id: "admin-1".into(),
            email: credentials.email().clone(),
            access_token: AccessToken::new("access-token"),
            refresh_token: RefreshToken::new("refresh-token"),
            expires_at: Utc::now() + chrono::Duration::hours(1),
        })
    }

    async fn refresh(&self, _refresh_token: &RefreshToken) -> Result<AdminSession, AdminAuthError> {
        Err(AdminAuthError::refresh_rejected())
    }

    async fn sign_out(&self, _access_token: &AccessToken) -> Result<(), AdminAuthError> {
        Ok(())
    }
}

/// One stored lead for admin listings.
pub fn sample_lead() -> Lead {
    let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).single().expect("timestamp");
    Lead {
        id: LeadId::generate(),
        name: PersonName::new("Asha Rao").expect("name"),
        email: EmailAddress::new("asha@example.com").expect("email"),
        phone: PhoneNumber::new("+91 98765 43210").expect("phone"),
        city: None,
        model_slug: None,
        message: Some("=HYPERLINK(\"x\")".into()),
        source: LeadSource::ContactPage,
        consent: true,
        status: LeadStatus::New,
        notes: None,
        created_at: at,
        updated_at: at,
    }
}

/// Records inserts and serves a fixed set of stored leads.
#[derive(Debug, Default)]
pub struct RecordingLeads {
    pub inserted: Mutex<Vec<NewLead>>,
    pub stored: Vec<Lead>,
    pub tokens: Mutex<Vec<String>>,
}

impl RecordingLeads {
    pub fn with_stored(stored: Vec<Lead>) -> Self {
        Self {
            stored,
            ..Self::default()
        }
    }

    fn saw(&self, token: &AccessToken) {
        self.tokens.lock().expect("lock").push(token.expose().to_owned());
    }
}

#[async_trait]
impl LeadRepository for RecordingLeads {
    async fn insert(&self, lead: &NewLead) -> Result<(), LeadRepositoryError> {
        self.inserted.lock().expect("lock").push(lead.clone());
        Ok(())
    }

    async fn list(
        &self,
        token: &AccessToken,
        filter: &LeadFilter,
        page: PageRequest,
    ) -> Result<Page<Lead>, LeadRepositoryError> {
        self.saw(token);
        let items: Vec<Lead> = self
            .stored
            .iter()
            .filter(|lead| filter.status.is_none_or(|status| lead.status == status))
            .cloned()
            .collect();
        let total = items.len() as u64;
        Ok(Page::new(items, page, total))
    }

    async fn update(
        &self,
        token: &AccessToken,
        id: LeadId,
        update: &LeadUpdate,
    ) -> Result<Option<Lead>, LeadRepositoryError> {
        self.saw(token);
        Ok(self.stored.iter().find(|lead| lead.id == id).cloned().map(|mut lead| {
            if let Some(status) = update.status() {
                lead.status = status;
            }
            lead
        }))
    }

    async fn export(&self, token: &AccessToken, _filter: &LeadFilter) -> Result<Vec<Lead>, LeadRepositoryError> {
        self.saw(token);
        Ok(self.stored.clone())
    }
}

/// Counts notifications and optionally fails them.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub leads: Mutex<Vec<LeadId>>,
    pub bookings: Mutex<usize>,
    pub fail: bool,
}

#[async_trait]
impl SubmissionNotifier for RecordingNotifier {
    async fn lead_received(&self, lead: &NewLead) -> Result<(), NotificationError> {
        self.leads.lock().expect("lock").push(lead.id);
        if self.fail {
            return Err(NotificationError::delivery("relay refused"));
        }
        Ok(())
    }

    async fn booking_received(&self, _booking: &NewBooking) -> Result<(), NotificationError> {
        *self.bookings.lock().expect("lock") += 1;
        if self.fail {
            return Err(NotificationError::delivery("relay refused"));
        }
        Ok(())
    }
}
