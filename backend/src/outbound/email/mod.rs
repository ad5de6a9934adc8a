//! Transactional email for lead and booking submissions.

pub mod smtp;
pub mod templates;

pub use smtp::{MailNotifier, SmtpSecurity, SmtpSettings, parse_mailbox, smtp_transport};
pub use templates::{Branding, MailKind, MailTemplates, RenderedMail};
