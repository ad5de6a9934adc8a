//! Runtime settings loaded via OrthoConfig.
//!
//! Every field can come from a `SITE_*` environment variable, a
//! configuration file or a `--kebab-case` flag. Optional integrations
//! (Supabase, SMTP) are enabled by supplying their settings; when they are
//! absent the server runs on fixtures.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use lettre::message::Mailbox;
use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::domain::{AdminAllowList, SiteUrl};
use crate::outbound::email::{SmtpSecurity, SmtpSettings, parse_mailbox};
use crate::outbound::supabase::SupabaseSettings;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SITE_URL: &str = "http://localhost:8080";
const DEFAULT_SITE_NAME: &str = "Volt Electric";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SMTP_PORT: u16 = 587;

/// Invalid runtime configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A value failed to parse.
    #[error("{field} is invalid: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
    /// An integration was partially configured.
    #[error("{field} is required when {because} is set")]
    Incomplete {
        field: &'static str,
        because: &'static str,
    },
}

impl ConfigError {
    fn invalid(field: &'static str, message: impl ToString) -> Self {
        Self::Invalid {
            field,
            message: message.to_string(),
        }
    }
}

/// Outbound mail settings.
#[derive(Debug, Clone)]
pub struct MailSettings {
    pub smtp: SmtpSettings,
    pub from: Mailbox,
    pub sales_inbox: Mailbox,
}

/// Process-wide settings.
#[derive(Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SITE")]
pub struct SiteSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Public origin used in sitemap and email links.
    pub site_url: Option<String>,
    /// Brand name used in emails.
    pub site_name: Option<String>,
    /// Directory holding the built admin dashboard (`index.html`).
    pub static_dir: Option<PathBuf>,
    /// Comma separated emails allowed into the dashboard.
    pub admin_emails: Option<String>,
    /// Supabase project URL.
    pub supabase_url: Option<String>,
    /// Supabase anon key.
    pub supabase_anon_key: Option<String>,
    /// Timeout for Supabase calls, in seconds.
    pub supabase_timeout_secs: Option<u64>,
    /// SMTP relay host.
    pub smtp_host: Option<String>,
    /// SMTP relay port.
    pub smtp_port: Option<u16>,
    /// `starttls`, `tls` or `plain`.
    pub smtp_security: Option<String>,
    /// SMTP username.
    pub smtp_username: Option<String>,
    /// SMTP password.
    pub smtp_password: Option<String>,
    /// Sender mailbox, e.g. `Volt Electric <hello@example.com>`.
    pub mail_from: Option<String>,
    /// Mailbox receiving sales alerts.
    pub sales_inbox: Option<String>,
}

impl std::fmt::Debug for SiteSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteSettings")
            .field("bind_addr", &self.bind_addr)
            .field("site_url", &self.site_url)
            .field("static_dir", &self.static_dir)
            .field("supabase_url", &self.supabase_url)
            .field("smtp_host", &self.smtp_host)
            .finish_non_exhaustive()
    }
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|raw| raw.trim()).filter(|raw| !raw.is_empty())
}

impl SiteSettings {
    /// Listening address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        present(self.bind_addr.as_ref())
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
            .map_err(|err| ConfigError::invalid("SITE_BIND_ADDR", err))
    }

    /// Public origin.
    pub fn site_url(&self) -> Result<SiteUrl, ConfigError> {
        SiteUrl::parse(present(self.site_url.as_ref()).unwrap_or(DEFAULT_SITE_URL))
            .map_err(|err| ConfigError::invalid("SITE_SITE_URL", err))
    }

    /// Brand name.
    #[must_use]
    pub fn site_name(&self) -> String {
        present(self.site_name.as_ref())
            .unwrap_or(DEFAULT_SITE_NAME)
            .to_owned()
    }

    /// Dashboard allow-list; empty admits every authenticated user.
    #[must_use]
    pub fn allow_list(&self) -> AdminAllowList {
        AdminAllowList::parse(self.admin_emails.as_deref().unwrap_or_default())
    }

    /// Supabase connection, when configured.
    pub fn supabase(&self) -> Result<Option<SupabaseSettings>, ConfigError> {
        let url = present(self.supabase_url.as_ref());
        let key = present(self.supabase_anon_key.as_ref());
        match (url, key) {
            (None, None) => Ok(None),
            (Some(_), None) => Err(ConfigError::Incomplete {
                field: "SITE_SUPABASE_ANON_KEY",
                because: "SITE_SUPABASE_URL",
            }),
            (None, Some(_)) => Err(ConfigError::Incomplete {
                field: "SITE_SUPABASE_URL",
                because: "SITE_SUPABASE_ANON_KEY",
            }),
            (Some(url), Some(key)) => Ok(Some(SupabaseSettings {
                url: Url::parse(url).map_err(|err| ConfigError::invalid("SITE_SUPABASE_URL", err))?,
                anon_key: key.to_owned(),
                timeout: Duration::from_secs(
                    self.supabase_timeout_secs
                        .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS)
                        .max(1),
                ),
            })),
        }
    }

    /// SMTP delivery, when configured.
    pub fn mail(&self) -> Result<Option<MailSettings>, ConfigError> {
        let Some(host) = present(self.smtp_host.as_ref()) else {
            return Ok(None);
        };
        fn required<'a>(
            value: Option<&'a String>,
            field: &'static str,
        ) -> Result<&'a str, ConfigError> {
            present(value).ok_or(ConfigError::Incomplete {
                field,
                because: "SITE_SMTP_HOST",
            })
        }
        let from = parse_mailbox(required(self.mail_from.as_ref(), "SITE_MAIL_FROM")?)
            .map_err(|err| ConfigError::invalid("SITE_MAIL_FROM", err))?;
        let sales_inbox = parse_mailbox(required(self.sales_inbox.as_ref(), "SITE_SALES_INBOX")?)
            .map_err(|err| ConfigError::invalid("SITE_SALES_INBOX", err))?;
        let security = match present(self.smtp_security.as_ref()) {
            Some(raw) => raw
                .parse::<SmtpSecurity>()
                .map_err(|err| ConfigError::invalid("SITE_SMTP_SECURITY", err))?,
            None => SmtpSecurity::default(),
        };
        Ok(Some(MailSettings {
            smtp: SmtpSettings {
                host: host.to_owned(),
                port: self.smtp_port.unwrap_or(DEFAULT_SMTP_PORT),
                security,
                username: present(self.smtp_username.as_ref()).map(str::to_owned),
                password: self.smtp_password.clone().map(Zeroizing::new),
                timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            },
            from,
            sales_inbox,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use env_lock::lock_env;
    use rstest::rstest;
    use std::ffi::OsString;

    const VARS: [&str; 6] = [
        "SITE_BIND_ADDR",
        "SITE_SITE_URL",
        "SITE_SUPABASE_URL",
        "SITE_SUPABASE_ANON_KEY",
        "SITE_SMTP_HOST",
        "SITE_ADMIN_EMAILS",
    ];

    fn load() -> SiteSettings {
        SiteSettings::load_from_iter([OsString::from("site-backend")]).expect("config should load")
    }

    fn cleared() -> Vec<(&'static str, Option<String>)> {
        VARS.iter().map(|name| (*name, None)).collect()
    }

    #[rstest]
    fn defaults_run_on_fixtures() {
        let _guard = lock_env(cleared());
        let settings = load();
        assert_eq!(settings.bind_addr().expect("addr").port(), 8080);
        assert_eq!(settings.site_url().expect("url").join("/"), "http://localhost:8080/");
        assert!(settings.supabase().expect("supabase").is_none());
        assert!(settings.mail().expect("mail").is_none());
    }

    #[rstest]
    fn environment_enables_supabase() {
        let mut vars = cleared();
        vars.push(("SITE_SUPABASE_URL", Some("https://abc.supabase.co".to_owned())));
        vars.push(("SITE_SUPABASE_ANON_KEY", Some("anon".to_owned())));
        vars.push(("SITE_ADMIN_EMAILS", Some("ops@example.com".to_owned())));
        let _guard = lock_env(vars);
        let settings = load();
        let supabase = settings.supabase().expect("valid").expect("configured");
        assert_eq!(supabase.url.host_str(), Some("abc.supabase.co"));
        assert_eq!(supabase.anon_key, "anon");
        assert_eq!(settings.allow_list(), AdminAllowList::parse("ops@example.com"));
    }

    #[rstest]
    fn half_configured_supabase_is_rejected() {
        let settings = SiteSettings {
            supabase_url: Some("https://abc.supabase.co".into()),
            ..SiteSettings::default()
        };
        assert!(matches!(
            settings.supabase(),
            Err(ConfigError::Incomplete {
                field: "SITE_SUPABASE_ANON_KEY",
                ..
            })
        ));
    }

    #[rstest]
    #[case(None, None, Some("SITE_MAIL_FROM"))]
    #[case(Some("Volt <hello@ride.example>"), None, Some("SITE_SALES_INBOX"))]
    #[case(Some("Volt <hello@ride.example>"), Some("sales@ride.example"), None)]
    fn smtp_needs_both_mailboxes(
        #[case] from: Option<&str>,
        #[case] sales: Option<&str>,
        #[case] missing: Option<&str>,
    ) {
        let settings = SiteSettings {
            smtp_host: Some("localhost".into()),
            mail_from: from.map(str::to_owned),
            sales_inbox: sales.map(str::to_owned),
            ..SiteSettings::default()
        };
        match (settings.mail(), missing) {
            (Ok(Some(mail)), None) => {
                assert_eq!(mail.smtp.port, DEFAULT_SMTP_PORT);
                assert_eq!(mail.smtp.security, SmtpSecurity::StartTls);
            }
            (Err(ConfigError::Incomplete { field, .. }), Some(expected)) => {
                assert_eq!(field, expected);
            }
            (other, _) => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[rstest]
    fn bad_bind_addresses_are_reported() {
        let settings = SiteSettings {
            bind_addr: Some("localhost".into()),
            ..SiteSettings::default()
        };
        assert!(matches!(
            settings.bind_addr(),
            Err(ConfigError::Invalid {
                field: "SITE_BIND_ADDR",
                ..
            })
        ));
    }
}
