//! Redirect gate for the admin pages.
//!
//! Anonymous visitors are sent to the login page with the page they asked
//! for in `next`; signed-in admins visiting the login page are sent on to
//! the dashboard. The decision itself is the pure [`gate_decision`]; the
//! middleware only resolves the session and turns the decision into a
//! response. The JSON admin API is not gated here: it answers 401 through
//! the [`AuthenticatedAdmin`](crate::inbound::http::session::AuthenticatedAdmin)
//! extractor instead.

use std::rc::Rc;
use std::task::{Context, Poll};

use actix_session::SessionExt;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{Error, HttpResponse, web};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Dashboard home.
pub const ADMIN_HOME: &str = "/admin";
/// Login page.
pub const ADMIN_LOGIN: &str = "/admin/login";

/// What the gate does with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Serve the page.
    Proceed,
    /// Respond `302 Found` with this `Location`.
    Redirect(String),
}

fn is_admin_path(path: &str) -> bool {
    path == ADMIN_HOME || path.starts_with("/admin/")
}

fn is_login_path(path: &str) -> bool {
    path == ADMIN_LOGIN || path == "/admin/login/"
}

/// Accept `raw` as a post-login target only when it is a local admin page.
///
/// # Examples
/// ```
/// use site_backend::middleware::admin_gate::safe_next;
///
/// assert_eq!(safe_next("/admin/leads?status=new"), Some("/admin/leads?status=new"));
/// assert_eq!(safe_next("https://evil.example/admin"), None);
/// assert_eq!(safe_next("//evil.example"), None);
/// ```
#[must_use]
pub fn safe_next(raw: &str) -> Option<&str> {
    let path = raw.split(['?', '#']).next().unwrap_or_default();
    let local = !raw.contains('\\') && !raw.chars().any(char::is_control);
    (local && is_admin_path(path) && !is_login_path(path)).then_some(raw)
}

fn next_param(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "next")
        .map(|(_, value)| value.into_owned())
}

/// Decide how to handle `path` (with its raw `query`).
///
/// # Examples
/// ```
/// use site_backend::middleware::admin_gate::{GateDecision, gate_decision};
///
/// assert_eq!(
///     gate_decision("/admin/leads", "", false),
///     GateDecision::Redirect("/admin/login?next=%2Fadmin%2Fleads".into())
/// );
/// assert_eq!(gate_decision("/admin/login", "", false), GateDecision::Proceed);
/// assert_eq!(
///     gate_decision("/admin/login", "", true),
///     GateDecision::Redirect("/admin".into())
/// );
/// ```
#[must_use]
pub fn gate_decision(path: &str, query: &str, authenticated: bool) -> GateDecision {
    if !is_admin_path(path) {
        return GateDecision::Proceed;
    }
    match (is_login_path(path), authenticated) {
        (true, true) => {
            let target = next_param(query)
                .filter(|next| safe_next(next).is_some())
                .unwrap_or_else(|| ADMIN_HOME.to_owned());
            GateDecision::Redirect(target)
        }
        (false, false) => {
            let original = if query.is_empty() {
                path.to_owned()
            } else {
                format!("{path}?{query}")
            };
            let encoded: String = url::form_urlencoded::byte_serialize(original.as_bytes()).collect();
            GateDecision::Redirect(format!("{ADMIN_LOGIN}?next={encoded}"))
        }
        _ => GateDecision::Proceed,
    }
}

/// Middleware enforcing [`gate_decision`] on admin pages.
///
/// # Examples
/// ```no_run
/// use actix_web::{App, web};
/// use site_backend::middleware::AdminGate;
///
/// let app = App::new().service(web::scope("/admin").wrap(AdminGate));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct AdminGate;

impl<S, B> Transform<S, ServiceRequest> for AdminGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminGateMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// Service produced by [`AdminGate`].
pub struct AdminGateMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AdminGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        Box::pin(async move {
            let state = req
                .app_data::<web::Data<HttpState>>()
                .cloned()
                .ok_or_else(|| crate::domain::Error::internal("HTTP state is not registered on the app"))?;
            let session = SessionContext::new(req.get_session());
            let authenticated = session.resolve_admin(&state.admin).await?.is_some();
            match gate_decision(req.path(), req.query_string(), authenticated) {
                GateDecision::Proceed => service.call(req).await.map(ServiceResponse::map_into_left_body),
                GateDecision::Redirect(location) => {
                    debug!(path = req.path(), %location, authenticated, "admin gate redirect");
                    let response = HttpResponse::Found()
                        .insert_header((header::LOCATION, location))
                        .insert_header((header::CACHE_CONTROL, "no-store"))
                        .finish();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}
