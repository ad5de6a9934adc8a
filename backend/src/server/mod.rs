//! Server construction and route wiring.

mod config;
mod state_builders;

pub use config::{ConfigError, MailSettings, SiteSettings};
pub use state_builders::{StartupError, build_http_state, build_ports, load_admin_shell};

use std::net::SocketAddr;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::session_config::{SessionSettings, session_middleware};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{json_config, path_config, query_config};
use crate::inbound::http::{
    admin_auth, admin_bookings, admin_catalogue, admin_leads, admin_pages, bookings, catalogue,
    content, dealers, leads, seo,
};
use crate::middleware::{AdminGate, Trace};

/// Everything [`create_server`] needs.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) http_state: HttpState,
}

impl ServerConfig {
    /// Bundle validated session settings, the listen address and the state.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr, http_state: HttpState) -> Self {
        Self {
            session,
            bind_addr,
            http_state,
        }
    }

    /// Address the server binds to.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

/// Register the public and admin JSON API, the SEO documents and the admin
/// pages on `cfg`. Session middleware and app data are supplied by the
/// caller so tests can use throwaway keys.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    let public = web::scope("/api")
        .service(leads::create_lead)
        .service(bookings::create_booking)
        .service(catalogue::list_products)
        .service(catalogue::compare_products)
        .service(catalogue::get_product)
        .service(dealers::nearby_dealers)
        .service(dealers::list_dealers)
        .service(content::list_faqs)
        .service(content::list_posts)
        .service(content::get_post);

    let admin_api = web::scope("/api/admin")
        .service(admin_auth::login)
        .service(admin_auth::logout)
        .service(admin_auth::current_session)
        .service(admin_leads::export_leads)
        .service(admin_leads::list_leads)
        .service(admin_leads::update_lead)
        .service(admin_bookings::list_bookings)
        .service(admin_bookings::update_booking)
        .service(admin_catalogue::list_products)
        .service(admin_catalogue::update_product)
        .service(admin_catalogue::stats);

    let admin_pages = web::scope("/admin")
        .wrap(AdminGate)
        .configure(admin_pages::configure);

    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        // Admin scope first: "/api/admin/*" must not fall into "/api".
        .service(admin_api)
        .service(public)
        .service(admin_pages)
        .service(seo::robots_txt)
        .service(seo::sitemap_xml)
        .service(ready)
        .service(live);
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    session: SessionSettings,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        session,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(session_middleware(&session))
        .wrap(Trace)
        .configure(configure_routes);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct the Actix HTTP server.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        session,
        bind_addr,
        http_state,
    } = config;
    let http_state = web::Data::new(http_state);
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            session: session.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "listening");
    health_state.mark_ready();
    Ok(server)
}
