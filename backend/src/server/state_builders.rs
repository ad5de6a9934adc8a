//! Builders for the HTTP state: adapters when configured, fixtures otherwise.

use std::path::Path;
use std::sync::Arc;

use cap_std::ambient_authority;
use cap_std::fs::Dir;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use super::config::{ConfigError, MailSettings, SiteSettings};
use crate::domain::SiteUrl;
use crate::domain::ports::{FixtureSubmissionNotifier, NotificationError, SubmissionNotifier};
use crate::inbound::http::state::{
    FALLBACK_ADMIN_SHELL, HttpState, HttpStatePorts, HttpStateSettings,
};
use crate::outbound::email::{Branding, MailNotifier, MailTemplates, smtp_transport};
use crate::outbound::supabase::{
    SupabaseAuthService, SupabaseBookingRepository, SupabaseCatalogueRepository, SupabaseClient,
    SupabaseContentRepository, SupabaseDashboardStats, SupabaseDealerRepository,
    SupabaseLeadRepository, SupabaseSettings,
};

const ADMIN_SHELL_FILE: &str = "index.html";

/// Failure assembling the application state.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build the Supabase HTTP client: {0}")]
    Supabase(#[from] reqwest::Error),
    #[error("failed to prepare outbound mail: {0}")]
    Mail(#[from] NotificationError),
}

impl From<StartupError> for std::io::Error {
    fn from(err: StartupError) -> Self {
        Self::other(err)
    }
}

fn supabase_ports(settings: SupabaseSettings, clock: Arc<dyn Clock>) -> Result<HttpStatePorts, StartupError> {
    info!(url = %settings.url, "using Supabase adapters");
    let client = SupabaseClient::new(settings)?;
    Ok(HttpStatePorts {
        leads: Arc::new(SupabaseLeadRepository::new(client.clone())),
        bookings: Arc::new(SupabaseBookingRepository::new(client.clone())),
        catalogue: Arc::new(SupabaseCatalogueRepository::new(client.clone())),
        dealers: Arc::new(SupabaseDealerRepository::new(client.clone())),
        content: Arc::new(SupabaseContentRepository::new(client.clone())),
        stats: Arc::new(SupabaseDashboardStats::new(client.clone())),
        auth: Arc::new(SupabaseAuthService::new(client, clock)),
        ..HttpStatePorts::default()
    })
}

fn mail_notifier(
    mail: MailSettings,
    branding: Branding,
) -> Result<Arc<dyn SubmissionNotifier>, StartupError> {
    info!(host = %mail.smtp.host, port = mail.smtp.port, "using SMTP notifications");
    let transport = smtp_transport(&mail.smtp)?;
    let templates = MailTemplates::new(branding)?;
    Ok(Arc::new(MailNotifier::new(
        transport,
        mail.from,
        mail.sales_inbox,
        templates,
    )))
}

/// Select the port implementations described by `settings`.
///
/// # Errors
///
/// Returns [`StartupError`] when an integration is misconfigured or its
/// client cannot be constructed.
pub fn build_ports(
    settings: &SiteSettings,
    site: &SiteUrl,
    clock: Arc<dyn Clock>,
) -> Result<HttpStatePorts, StartupError> {
    let mut ports = match settings.supabase()? {
        Some(supabase) => supabase_ports(supabase, clock)?,
        None => {
            warn!("Supabase is not configured; serving fixture data");
            HttpStatePorts::default()
        }
    };
    ports.notifier = match settings.mail()? {
        Some(mail) => mail_notifier(
            mail,
            Branding {
                site_name: settings.site_name(),
                site_url: site.clone(),
            },
        )?,
        None => {
            warn!("SMTP is not configured; submission emails are discarded");
            Arc::new(FixtureSubmissionNotifier)
        }
    };
    Ok(ports)
}

/// Read the dashboard shell from `static_dir`, falling back to a minimal
/// built-in page when the directory or file is missing.
#[must_use]
pub fn load_admin_shell(static_dir: Option<&Path>) -> Arc<str> {
    let Some(dir) = static_dir else {
        return Arc::from(FALLBACK_ADMIN_SHELL);
    };
    let loaded = Dir::open_ambient_dir(dir, ambient_authority())
        .and_then(|handle| handle.read_to_string(ADMIN_SHELL_FILE));
    match loaded {
        Ok(html) => Arc::from(html),
        Err(error) => {
            warn!(dir = %dir.display(), %error, "admin shell unavailable; serving the built-in page");
            Arc::from(FALLBACK_ADMIN_SHELL)
        }
    }
}

/// Build the complete HTTP state from runtime settings.
///
/// # Errors
///
/// See [`build_ports`].
pub fn build_http_state(settings: &SiteSettings) -> Result<HttpState, StartupError> {
    let site = settings.site_url()?;
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let ports = build_ports(settings, &site, clock.clone())?;
    Ok(HttpState::new(
        ports,
        HttpStateSettings {
            site,
            allow_list: settings.allow_list(),
            clock,
            admin_shell: load_admin_shell(settings.static_dir.as_deref()),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    fn shell_is_read_from_the_static_directory() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::write(dir.path().join("index.html"), "<html>dashboard</html>").expect("write");
        assert_eq!(&*load_admin_shell(Some(dir.path())), "<html>dashboard</html>");
    }

    #[rstest]
    fn missing_shell_falls_back() {
        let dir = TempDir::new().expect("tempdir");
        assert_eq!(&*load_admin_shell(Some(dir.path())), FALLBACK_ADMIN_SHELL);
        assert_eq!(&*load_admin_shell(None), FALLBACK_ADMIN_SHELL);
    }

    #[rstest]
    fn unconfigured_settings_build_fixture_state() {
        let state = build_http_state(&SiteSettings::default()).expect("state");
        assert_eq!(&*state.admin_shell, FALLBACK_ADMIN_SHELL);
    }

    #[rstest]
    #[tokio::test]
    async fn configured_integrations_build() {
        let settings = SiteSettings {
            supabase_url: Some("https://abc.supabase.co".into()),
            supabase_anon_key: Some("anon".into()),
            smtp_host: Some("localhost".into()),
            smtp_security: Some("plain".into()),
            mail_from: Some("Volt <hello@ride.example>".into()),
            sales_inbox: Some("sales@ride.example".into()),
            ..SiteSettings::default()
        };
        assert!(build_http_state(&settings).is_ok());
    }

    #[rstest]
    fn misconfiguration_is_reported() {
        let settings = SiteSettings {
            smtp_host: Some("localhost".into()),
            ..SiteSettings::default()
        };
        assert!(matches!(
            build_http_state(&settings),
            Err(StartupError::Config(ConfigError::Incomplete { .. }))
        ));
    }
}
