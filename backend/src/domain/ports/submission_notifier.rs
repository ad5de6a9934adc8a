//! Driven port for submission notifications (sales alert plus customer
//! confirmation).

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{NewBooking, NewLead};

use super::define_port_error;

define_port_error! {
    /// Errors raised while sending notifications.
    pub enum NotificationError {
        /// Template rendering failed.
        Render { message: String } => "notification template failed to render: {message}",
        /// A sender or recipient address was unusable.
        Address { message: String } => "notification address rejected: {message}",
        /// The mail relay refused or could not be reached.
        Delivery { message: String } => "notification delivery failed: {message}",
    }
}

/// Tells people about new leads and bookings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionNotifier: Send + Sync {
    /// A lead was stored.
    async fn lead_received(&self, lead: &NewLead) -> Result<(), NotificationError>;

    /// A booking was stored.
    async fn booking_received(&self, booking: &NewBooking) -> Result<(), NotificationError>;
}

/// Drops notifications; used when SMTP is not configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSubmissionNotifier;

#[async_trait]
impl SubmissionNotifier for FixtureSubmissionNotifier {
    async fn lead_received(&self, lead: &NewLead) -> Result<(), NotificationError> {
        debug!(lead_id = %lead.id, "notifications disabled; lead alert dropped");
        Ok(())
    }

    async fn booking_received(&self, booking: &NewBooking) -> Result<(), NotificationError> {
        debug!(booking_id = %booking.id, "notifications disabled; booking alert dropped");
        Ok(())
    }
}
