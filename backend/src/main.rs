//! Backend entry-point.

use std::io;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use site_backend::inbound::http::health::HealthState;
use site_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use site_backend::server::{ServerConfig, SiteSettings, build_http_state, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = SiteSettings::load().map_err(|err| io::Error::other(err.to_string()))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::current())
        .map_err(io::Error::other)?;
    info!(
        fingerprint = %session.fingerprint,
        cookie_secure = session.cookie_secure,
        same_site = ?session.same_site,
        "session key loaded"
    );

    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;
    let http_state = build_http_state(&settings)?;
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state.clone(),
        ServerConfig::new(session, bind_addr, http_state),
    )?;
    let outcome = server.await;
    health_state.mark_draining();
    outcome
}
