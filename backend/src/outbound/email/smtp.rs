//! SMTP notifier built on lettre.
//!
//! Each submission produces two messages: an alert to the sales inbox with
//! `Reply-To` set to the visitor, and a confirmation to the visitor. Both are
//! attempted even when the first fails; the first failure is returned.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::templates::{MailKind, MailTemplates, RenderedMail};
use crate::domain::ports::{NotificationError, SubmissionNotifier};
use crate::domain::{EmailAddress, NewBooking, NewLead, PersonName};

/// Connection security for the relay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SmtpSecurity {
    /// Plain connection upgraded with STARTTLS (port 587).
    #[default]
    StartTls,
    /// TLS from the first byte (port 465).
    Tls,
    /// Unencrypted; only for local relays such as Mailpit.
    Plain,
}

impl std::str::FromStr for SmtpSecurity {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "starttls" => Ok(Self::StartTls),
            "tls" | "ssl" => Ok(Self::Tls),
            "plain" | "none" => Ok(Self::Plain),
            other => Err(format!("unknown SMTP security mode {other:?}; expected starttls, tls or plain")),
        }
    }
}

/// Relay connection settings.
#[derive(Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub security: SmtpSecurity,
    pub username: Option<String>,
    pub password: Option<Zeroizing<String>>,
    pub timeout: Duration,
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("security", &self.security)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Build the async relay transport.
///
/// # Errors
///
/// Returns [`NotificationError::Delivery`] when TLS parameters cannot be
/// prepared for `host`.
pub fn smtp_transport(
    settings: &SmtpSettings,
) -> Result<AsyncSmtpTransport<Tokio1Executor>, NotificationError> {
    let builder = match settings.security {
        SmtpSecurity::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|err| NotificationError::delivery(err.to_string()))?,
        SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
            .map_err(|err| NotificationError::delivery(err.to_string()))?,
        SmtpSecurity::Plain => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host),
    };
    let mut builder = builder
        .port(settings.port)
        .timeout(Some(settings.timeout));
    if let (Some(username), Some(password)) = (&settings.username, &settings.password) {
        builder = builder.credentials(Credentials::new(
            username.clone(),
            password.as_str().to_owned(),
        ));
    }
    Ok(builder.build())
}

/// Parse `"Name <addr>"` or a bare address.
///
/// # Errors
///
/// Returns [`NotificationError::Address`] for malformed input.
pub fn parse_mailbox(raw: &str) -> Result<Mailbox, NotificationError> {
    raw.trim()
        .parse::<Mailbox>()
        .map_err(|err| NotificationError::address(format!("{raw:?}: {err}")))
}

fn visitor_mailbox(name: &PersonName, email: &EmailAddress) -> Result<Mailbox, NotificationError> {
    let address: Address = email
        .as_ref()
        .parse()
        .map_err(|err| NotificationError::address(format!("{email}: {err}")))?;
    Ok(Mailbox::new(Some(name.as_ref().to_owned()), address))
}

/// Lead and booking notifications over any lettre async transport.
pub struct MailNotifier<T = AsyncSmtpTransport<Tokio1Executor>> {
    transport: T,
    from: Mailbox,
    sales: Mailbox,
    templates: MailTemplates,
}

impl<T> MailNotifier<T>
where
    T: AsyncTransport + Send + Sync,
    T::Error: std::fmt::Display,
{
    /// Assemble a notifier.
    pub const fn new(transport: T, from: Mailbox, sales: Mailbox, templates: MailTemplates) -> Self {
        Self {
            transport,
            from,
            sales,
            templates,
        }
    }

    fn message(
        &self,
        to: Mailbox,
        reply_to: Option<Mailbox>,
        mail: RenderedMail,
    ) -> Result<Message, NotificationError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(mail.subject);
        if let Some(reply_to) = reply_to {
            builder = builder.reply_to(reply_to);
        }
        builder
            .multipart(MultiPart::alternative_plain_html(mail.text, mail.html))
            .map_err(|err| NotificationError::render(err.to_string()))
    }

    async fn deliver(&self, kind: &'static str, message: Message) -> Result<(), NotificationError> {
        match self.transport.send(message).await {
            Ok(_) => {
                debug!(kind, "notification sent");
                Ok(())
            }
            Err(err) => {
                warn!(kind, error = %err, "notification delivery failed");
                Err(NotificationError::delivery(err.to_string()))
            }
        }
    }

    async fn send_pair(
        &self,
        visitor: Mailbox,
        alert: RenderedMail,
        receipt: RenderedMail,
    ) -> Result<(), NotificationError> {
        let alert = self.message(self.sales.clone(), Some(visitor.clone()), alert)?;
        let receipt = self.message(visitor, None, receipt)?;
        let alerted = self.deliver("sales_alert", alert).await;
        let confirmed = self.deliver("confirmation", receipt).await;
        alerted.and(confirmed)
    }
}

#[async_trait]
impl<T> SubmissionNotifier for MailNotifier<T>
where
    T: AsyncTransport + Send + Sync,
    T::Error: std::fmt::Display,
{
    async fn lead_received(&self, lead: &NewLead) -> Result<(), NotificationError> {
        let visitor = visitor_mailbox(&lead.name, &lead.email)?;
        let alert = self.templates.lead(lead, MailKind::SalesAlert)?;
        let receipt = self.templates.lead(lead, MailKind::Confirmation)?;
        self.send_pair(visitor, alert, receipt).await
    }

    async fn booking_received(&self, booking: &NewBooking) -> Result<(), NotificationError> {
        let visitor = visitor_mailbox(&booking.name, &booking.email)?;
        let alert = self.templates.booking(booking, MailKind::SalesAlert)?;
        let receipt = self.templates.booking(booking, MailKind::Confirmation)?;
        self.send_pair(visitor, alert, receipt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LeadId, LeadSource, PhoneNumber, SiteUrl};
    use crate::outbound::email::templates::Branding;
    use lettre::transport::stub::AsyncStubTransport;
    use rstest::rstest;

    fn notifier(transport: AsyncStubTransport) -> MailNotifier<AsyncStubTransport> {
        let templates = MailTemplates::new(Branding {
            site_name: "Volt Motors".into(),
            site_url: SiteUrl::parse("https://ride.example").expect("site"),
        })
        .expect("templates");
        MailNotifier::new(
            transport,
            parse_mailbox("Volt Motors <hello@ride.example>").expect("from"),
            parse_mailbox("sales@ride.example").expect("sales"),
            templates,
        )
    }

    fn lead() -> NewLead {
        NewLead {
            id: LeadId::generate(),
            name: PersonName::new("Asha Rao").expect("name"),
            email: EmailAddress::new("asha@example.com").expect("email"),
            phone: PhoneNumber::new("9876543210").expect("phone"),
            city: None,
            model_slug: None,
            message: None,
            source: LeadSource::Website,
            consent: false,
        }
    }

    #[tokio::test]
    async fn leads_produce_an_alert_and_a_receipt() {
        let transport = AsyncStubTransport::new_ok();
        let notifier = notifier(transport.clone());
        notifier.lead_received(&lead()).await.expect("sent");

        let messages = transport.messages().await;
        assert_eq!(messages.len(), 2);
        let (alert_envelope, alert) = &messages[0];
        assert_eq!(alert_envelope.to()[0].to_string(), "sales@ride.example");
        assert!(alert.lines().any(|line| line.starts_with("Reply-To:") && line.contains("<asha@example.com>")));
        assert!(alert.contains("multipart/alternative"));
        let (receipt_envelope, _) = &messages[1];
        assert_eq!(receipt_envelope.to()[0].to_string(), "asha@example.com");
    }

    #[tokio::test]
    async fn relay_failures_surface_as_delivery_errors() {
        let notifier = notifier(AsyncStubTransport::new_error());
        let err = notifier.lead_received(&lead()).await.expect_err("relay down");
        assert!(matches!(err, NotificationError::Delivery { .. }));
    }

    #[rstest]
    #[case("starttls", Some(SmtpSecurity::StartTls))]
    #[case("TLS", Some(SmtpSecurity::Tls))]
    #[case("plain", Some(SmtpSecurity::Plain))]
    #[case("smoke-signals", None)]
    fn security_modes_parse(#[case] raw: &str, #[case] expected: Option<SmtpSecurity>) {
        assert_eq!(raw.parse::<SmtpSecurity>().ok(), expected);
    }

    #[rstest]
    fn plain_relays_build_without_tls() {
        let settings = SmtpSettings {
            host: "localhost".into(),
            port: 1025,
            security: SmtpSecurity::Plain,
            username: None,
            password: None,
            timeout: Duration::from_secs(5),
        };
        assert!(smtp_transport(&settings).is_ok());
    }
}
