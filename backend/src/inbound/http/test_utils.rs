//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use mockable::DefaultClock;

use crate::domain::{AdminAllowList, SiteUrl};
use crate::inbound::http::state::{FALLBACK_ADMIN_SHELL, HttpState, HttpStatePorts, HttpStateSettings};

/// Public origin used by HTTP tests.
pub const TEST_SITE_URL: &str = "https://ride.example";

/// Session middleware with a throwaway key, cookie `session`, no `Secure`.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Settings shared by HTTP tests.
pub fn test_settings() -> HttpStateSettings {
    HttpStateSettings {
        site: SiteUrl::parse(TEST_SITE_URL).expect("test site url"),
        allow_list: AdminAllowList::default(),
        clock: Arc::new(DefaultClock),
        admin_shell: Arc::from(FALLBACK_ADMIN_SHELL),
    }
}

/// State backed entirely by fixtures.
pub fn test_state() -> HttpState {
    HttpState::new(HttpStatePorts::default(), test_settings())
}

/// State with selected ports replaced.
pub fn state_with(ports: HttpStatePorts) -> HttpState {
    HttpState::new(ports, test_settings())
}
