//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The admin's [`AdminSession`] (tokens included) is stored in the private,
//! encrypted session cookie. [`AuthenticatedAdmin`] is the extractor admin
//! API handlers use: it loads the session, refreshes it when close to
//! expiry, and rejects the request with 401 otherwise.

use actix_session::{Session, SessionExt};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::{info, warn};

use crate::domain::{AdminService, AdminSession, Error};
use crate::inbound::http::state::HttpState;

pub(crate) const ADMIN_SESSION_KEY: &str = "admin";

/// Newtype wrapper exposing admin-session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap the Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist a signed-in admin, rotating the session id.
    pub fn persist_admin(&self, admin: &AdminSession) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(ADMIN_SESSION_KEY, admin)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// The stored admin, if any. Undecodable payloads are discarded.
    pub fn admin(&self) -> Result<Option<AdminSession>, Error> {
        match self.0.get::<AdminSession>(ADMIN_SESSION_KEY) {
            Ok(admin) => Ok(admin),
            Err(error) => {
                warn!(%error, "discarding unreadable admin session");
                self.0.purge();
                Ok(None)
            }
        }
    }

    /// Drop the session and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }

    /// Load the admin and refresh near-expiry tokens.
    ///
    /// Returns `Ok(None)` when nobody is signed in or the refresh was
    /// refused (the session is purged in that case). Auth-service outages
    /// propagate as internal errors so an unreachable provider does not log
    /// everyone out.
    pub async fn resolve_admin(&self, admin: &AdminService) -> Result<Option<AdminSession>, Error> {
        let Some(current) = self.admin()? else {
            return Ok(None);
        };
        match admin.refresh_if_needed(&current).await {
            Ok(None) => Ok(Some(current)),
            Ok(Some(renewed)) => {
                self.0
                    .insert(ADMIN_SESSION_KEY, &renewed)
                    .map_err(|error| Error::internal(format!("failed to persist session: {error}")))?;
                Ok(Some(renewed))
            }
            Err(error) if error.code() == crate::domain::ErrorCode::Unauthorized => {
                info!(user_id = %current.user_id, "admin session expired; signing out");
                self.purge();
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

/// A signed-in admin whose tokens are valid for the current request.
#[derive(Debug, Clone)]
pub struct AuthenticatedAdmin(pub AdminSession);

impl FromRequest for AuthenticatedAdmin {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let session = SessionContext::new(req.get_session());
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let state = state
                .ok_or_else(|| Error::internal("HTTP state is not registered on the app"))?;
            session
                .resolve_admin(&state.admin)
                .await?
                .map(AuthenticatedAdmin)
                .ok_or_else(|| Error::unauthorized("login required").into())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccessToken, EmailAddress, RefreshToken};
    use crate::inbound::http::test_utils::{test_session_middleware, test_state};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test};
    use chrono::{Duration, Utc};

    fn admin(expires_in: Duration) -> AdminSession {
        AdminSession {
            user_id: "user-1".into(),
            email: EmailAddress::new("ops@example.com").expect("email"),
            access_token: AccessToken::new("access"),
            refresh_token: RefreshToken::new("refresh"),
            expires_at: Utc::now() + expires_in,
        }
    }

    #[actix_web::test]
    async fn extractor_accepts_fresh_sessions_and_rejects_anonymous() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .wrap(test_session_middleware())
                .route(
                    "/login",
                    web::get().to(|session: SessionContext| async move {
                        session.persist_admin(&admin(Duration::hours(1)))?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/me",
                    web::get().to(|who: AuthenticatedAdmin| async move {
                        HttpResponse::Ok().body(who.0.user_id)
                    }),
                ),
        )
        .await;

        let anonymous = test::call_service(&app, test::TestRequest::get().uri("/me").to_request()).await;
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

        let login = test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
        let cookie = login
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned();
        let me = test::call_service(
            &app,
            test::TestRequest::get().uri("/me").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(me.status(), StatusCode::OK);
        assert_eq!(test::read_body(me).await, "user-1");
    }

    #[actix_web::test]
    async fn refused_refresh_purges_the_session() {
        // The fixture auth service refuses every refresh.
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .wrap(test_session_middleware())
                .route(
                    "/login",
                    web::get().to(|session: SessionContext| async move {
                        session.persist_admin(&admin(Duration::seconds(-10)))?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/me",
                    web::get().to(|_who: AuthenticatedAdmin| async { HttpResponse::Ok() }),
                ),
        )
        .await;

        let login = test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
        let cookie = login
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned();
        let me = test::call_service(
            &app,
            test::TestRequest::get().uri("/me").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(me.status(), StatusCode::UNAUTHORIZED);
    }
}
