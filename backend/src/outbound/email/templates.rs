//! Embedded notification templates.
//!
//! Every notification has a plain-text and an HTML body. HTML templates are
//! registered with an `.html` suffix so Tera escapes visitor-supplied text.

use serde::Serialize;
use tera::{Context, Tera};

use crate::domain::ports::NotificationError;
use crate::domain::{NewBooking, NewLead, SiteUrl};

const TEMPLATES: [(&str, &str); 8] = [
    ("lead_sales.txt", include_str!("templates/lead_sales.txt")),
    ("lead_sales.html", include_str!("templates/lead_sales.html")),
    ("lead_confirmation.txt", include_str!("templates/lead_confirmation.txt")),
    ("lead_confirmation.html", include_str!("templates/lead_confirmation.html")),
    ("booking_sales.txt", include_str!("templates/booking_sales.txt")),
    ("booking_sales.html", include_str!("templates/booking_sales.html")),
    ("booking_confirmation.txt", include_str!("templates/booking_confirmation.txt")),
    ("booking_confirmation.html", include_str!("templates/booking_confirmation.html")),
];

/// Which message to render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MailKind {
    /// Alert to the sales inbox.
    SalesAlert,
    /// Receipt to the visitor.
    Confirmation,
}

impl MailKind {
    const fn stem(self) -> &'static str {
        match self {
            Self::SalesAlert => "sales",
            Self::Confirmation => "confirmation",
        }
    }
}

/// Subject and both bodies of one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMail {
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Site identity shown in every message.
#[derive(Debug, Clone)]
pub struct Branding {
    pub site_name: String,
    pub site_url: SiteUrl,
}

#[derive(Serialize)]
struct LeadContext<'a> {
    site_name: &'a str,
    site_url: String,
    dashboard_url: String,
    reference: String,
    name: &'a str,
    email: &'a str,
    phone: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    city: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    source: &'a str,
    consent: bool,
}

#[derive(Serialize)]
struct BookingContext<'a> {
    site_name: &'a str,
    site_url: String,
    dashboard_url: String,
    reference: String,
    name: &'a str,
    email: &'a str,
    phone: &'a str,
    city: &'a str,
    model: &'a str,
    date: String,
    slot: &'a str,
    window: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    dealer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<&'a str>,
}

/// Compiled template set.
#[derive(Debug, Clone)]
pub struct MailTemplates {
    tera: Tera,
    branding: Branding,
}

impl MailTemplates {
    /// Compile the embedded templates.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::Render`] when a template fails to parse.
    pub fn new(branding: Branding) -> Result<Self, NotificationError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)
            .map_err(|err| NotificationError::render(err.to_string()))?;
        Ok(Self { tera, branding })
    }

    /// Site identity used in the messages.
    #[must_use]
    pub const fn branding(&self) -> &Branding {
        &self.branding
    }

    fn render_pair(
        &self,
        family: &str,
        kind: MailKind,
        subject: String,
        context: &Context,
    ) -> Result<RenderedMail, NotificationError> {
        let name = format!("{family}_{}", kind.stem());
        let render = |suffix: &str| {
            self.tera
                .render(&format!("{name}.{suffix}"), context)
                .map_err(|err| NotificationError::render(format!("{name}.{suffix}: {err}")))
        };
        Ok(RenderedMail {
            subject,
            text: render("txt")?,
            html: render("html")?,
        })
    }

    /// Render a lead notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::Render`] when rendering fails.
    pub fn lead(&self, lead: &NewLead, kind: MailKind) -> Result<RenderedMail, NotificationError> {
        let context = LeadContext {
            site_name: &self.branding.site_name,
            site_url: self.branding.site_url.join("/"),
            dashboard_url: self.branding.site_url.join("/admin/leads"),
            reference: lead.id.to_string(),
            name: lead.name.as_ref(),
            email: lead.email.as_ref(),
            phone: lead.phone.as_ref(),
            city: lead.city.as_ref().map(AsRef::as_ref),
            model: lead.model_slug.as_ref().map(AsRef::as_ref),
            message: lead.message.as_deref(),
            source: lead.source.as_str(),
            consent: lead.consent,
        };
        let context =
            Context::from_serialize(&context).map_err(|err| NotificationError::render(err.to_string()))?;
        let subject = match kind {
            MailKind::SalesAlert => format!("New lead: {}", lead.name.as_ref()),
            MailKind::Confirmation => format!("Thanks for contacting {}", self.branding.site_name),
        };
        self.render_pair("lead", kind, subject, &context)
    }

    /// Render a booking notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::Render`] when rendering fails.
    pub fn booking(
        &self,
        booking: &NewBooking,
        kind: MailKind,
    ) -> Result<RenderedMail, NotificationError> {
        let date = booking.preferred_date.date().format("%A %-d %B %Y").to_string();
        let context = BookingContext {
            site_name: &self.branding.site_name,
            site_url: self.branding.site_url.join("/"),
            dashboard_url: self.branding.site_url.join("/admin/bookings"),
            reference: booking.id.to_string(),
            name: booking.name.as_ref(),
            email: booking.email.as_ref(),
            phone: booking.phone.as_ref(),
            city: booking.city.as_ref(),
            model: booking.model_slug.as_ref(),
            date: date.clone(),
            slot: booking.time_slot.as_str(),
            window: booking.time_slot.window(),
            dealer: booking.dealer_id.map(|id| id.to_string()),
            notes: booking.notes.as_deref(),
        };
        let context =
            Context::from_serialize(&context).map_err(|err| NotificationError::render(err.to_string()))?;
        let subject = match kind {
            MailKind::SalesAlert => format!(
                "Test ride: {} on {date}",
                booking.model_slug.as_ref()
            ),
            MailKind::Confirmation => format!("Your {} test ride request", self.branding.site_name),
        };
        self.render_pair("booking", kind, subject, &context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        BookingId, City, EmailAddress, LeadId, LeadSource, PersonName, PhoneNumber,
        PreferredDate, Slug, TimeSlot,
    };
    use chrono::NaiveDate;
    use rstest::{fixture, rstest};

    #[fixture]
    fn templates() -> MailTemplates {
        MailTemplates::new(Branding {
            site_name: "Volt Motors".into(),
            site_url: SiteUrl::parse("https://ride.example").expect("site url"),
        })
        .expect("templates compile")
    }

    fn lead(message: Option<&str>) -> NewLead {
        NewLead {
            id: LeadId::generate(),
            name: PersonName::new("Asha <b>Rao</b>").expect("name"),
            email: EmailAddress::new("asha@example.com").expect("email"),
            phone: PhoneNumber::new("+91 98765 43210").expect("phone"),
            city: None,
            model_slug: Some(Slug::new("volt-s1").expect("slug")),
            message: message.map(str::to_owned),
            source: LeadSource::ModelPage,
            consent: true,
        }
    }

    #[rstest]
    fn html_bodies_escape_visitor_text(templates: MailTemplates) {
        let mail = templates
            .lead(&lead(Some("<script>alert(1)</script>")), MailKind::SalesAlert)
            .expect("render");
        assert!(mail.html.contains("&lt;script&gt;"));
        assert!(!mail.html.contains("<script>"));
        assert!(mail.text.contains("<script>alert(1)</script>"));
        assert!(mail.text.contains("City:    -"));
        assert!(mail.text.contains("https://ride.example/admin/leads"));
    }

    #[rstest]
    fn confirmation_mentions_the_model(templates: MailTemplates) {
        let mail = templates.lead(&lead(None), MailKind::Confirmation).expect("render");
        assert_eq!(mail.subject, "Thanks for contacting Volt Motors");
        assert!(mail.text.contains("to talk about the volt-s1"));
        assert!(!mail.text.contains("Message:"));
    }

    #[rstest]
    fn booking_mail_spells_out_the_slot(templates: MailTemplates) {
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).expect("date");
        let booking = NewBooking {
            id: BookingId::generate(),
            name: PersonName::new("Ravi Kumar").expect("name"),
            email: EmailAddress::new("ravi@example.com").expect("email"),
            phone: PhoneNumber::new("9876543210").expect("phone"),
            city: City::new("Pune").expect("city"),
            model_slug: Slug::new("volt-x").expect("slug"),
            preferred_date: PreferredDate::new(today, today).expect("date"),
            time_slot: TimeSlot::Evening,
            dealer_id: None,
            notes: None,
        };
        let mail = templates.booking(&booking, MailKind::SalesAlert).expect("render");
        assert_eq!(mail.subject, "Test ride: volt-x on Saturday 1 March 2025");
        assert!(mail.text.contains("(evening, 16:00-19:00)"));
        assert!(mail.text.contains("Dealer:  any"));
    }
}
