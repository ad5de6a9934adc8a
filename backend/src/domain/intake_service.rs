//! Intake for public form submissions: leads and test-ride bookings.
//!
//! A submission is stored first and then announced. Storage failures fail
//! the request; notification failures are logged and swallowed because the
//! visitor's data is already safe and sales can follow up from the
//! dashboard.

use std::sync::Arc;

use chrono::NaiveDate;
use mockable::Clock;
use tracing::{info, warn};

use super::ports::{BookingRepository, LeadRepository, SubmissionNotifier};
use super::{BookingId, Error, LeadId, NewBooking, NewLead};

/// Stores leads and notifies sales.
#[derive(Clone)]
pub struct LeadIntakeService {
    repository: Arc<dyn LeadRepository>,
    notifier: Arc<dyn SubmissionNotifier>,
}

impl LeadIntakeService {
    /// Wire the service to its ports.
    pub fn new(repository: Arc<dyn LeadRepository>, notifier: Arc<dyn SubmissionNotifier>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// Store `lead`, then send notifications best effort.
    pub async fn submit(&self, lead: NewLead) -> Result<LeadId, Error> {
        self.repository.insert(&lead).await?;
        info!(lead_id = %lead.id, source = %lead.source, "lead stored");
        if let Err(err) = self.notifier.lead_received(&lead).await {
            warn!(lead_id = %lead.id, error = %err, "lead notification failed");
        }
        Ok(lead.id)
    }
}

/// Stores bookings and notifies sales.
#[derive(Clone)]
pub struct BookingIntakeService {
    repository: Arc<dyn BookingRepository>,
    notifier: Arc<dyn SubmissionNotifier>,
    clock: Arc<dyn Clock>,
}

impl BookingIntakeService {
    /// Wire the service to its ports and clock.
    pub fn new(
        repository: Arc<dyn BookingRepository>,
        notifier: Arc<dyn SubmissionNotifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            notifier,
            clock,
        }
    }

    /// Calendar date bookings are validated against (UTC).
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.utc().date_naive()
    }

    /// Store `booking`, then send notifications best effort.
    pub async fn submit(&self, booking: NewBooking) -> Result<BookingId, Error> {
        self.repository.insert(&booking).await?;
        info!(
            booking_id = %booking.id,
            date = %booking.preferred_date.date(),
            slot = %booking.time_slot,
            "booking stored"
        );
        if let Err(err) = self.notifier.booking_received(&booking).await {
            warn!(booking_id = %booking.id, error = %err, "booking notification failed");
        }
        Ok(booking.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        BookingRepositoryError, LeadRepositoryError, MockBookingRepository, MockLeadRepository,
        MockSubmissionNotifier, NotificationError,
    };
    use crate::domain::{
        City, EmailAddress, ErrorCode, LeadSource, PersonName, PhoneNumber, PreferredDate, Slug,
        TimeSlot,
    };
    use chrono::{DateTime, Local, TimeZone, Utc};
    use rstest::{fixture, rstest};

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn local(&self) -> DateTime<Local> {
            self.0.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[fixture]
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
            consent: true,
        }
    }

    #[fixture]
    fn booking() -> NewBooking {
        let today = NaiveDate::from_ymd_opt(2025, 6, 10).expect("date");
        NewBooking {
            id: BookingId::generate(),
            name: PersonName::new("Asha Rao").expect("name"),
            email: EmailAddress::new("asha@example.com").expect("email"),
            phone: PhoneNumber::new("9876543210").expect("phone"),
            city: City::new("Pune").expect("city"),
            model_slug: Slug::new("volt-s1").expect("slug"),
            preferred_date: PreferredDate::new(today, today).expect("date"),
            time_slot: TimeSlot::Morning,
            dealer_id: None,
            notes: None,
        }
    }

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2025, 6, 10, 23, 30, 0)
                .single()
                .expect("timestamp"),
        ))
    }

    #[rstest]
    #[tokio::test]
    async fn lead_is_stored_then_announced(lead: NewLead) {
        let mut repo = MockLeadRepository::new();
        repo.expect_insert().times(1).returning(|_| Ok(()));
        let mut notifier = MockSubmissionNotifier::new();
        notifier.expect_lead_received().times(1).returning(|_| Ok(()));

        let service = LeadIntakeService::new(Arc::new(repo), Arc::new(notifier));
        let expected = lead.id;
        assert_eq!(service.submit(lead).await.expect("stored"), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn notification_failure_does_not_fail_lead(lead: NewLead) {
        let mut repo = MockLeadRepository::new();
        repo.expect_insert().returning(|_| Ok(()));
        let mut notifier = MockSubmissionNotifier::new();
        notifier
            .expect_lead_received()
            .returning(|_| Err(NotificationError::delivery("relay down")));

        let service = LeadIntakeService::new(Arc::new(repo), Arc::new(notifier));
        assert!(service.submit(lead).await.is_ok());
    }

    #[rstest]
    #[tokio::test]
    async fn storage_failure_skips_notification(lead: NewLead) {
        let mut repo = MockLeadRepository::new();
        repo.expect_insert()
            .returning(|_| Err(LeadRepositoryError::connection("refused")));
        let mut notifier = MockSubmissionNotifier::new();
        notifier.expect_lead_received().times(0);

        let service = LeadIntakeService::new(Arc::new(repo), Arc::new(notifier));
        let err = service.submit(lead).await.expect_err("storage failed");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[rstest]
    #[tokio::test]
    async fn booking_notification_failure_is_swallowed(booking: NewBooking) {
        let mut repo = MockBookingRepository::new();
        repo.expect_insert().returning(|_| Ok(()));
        let mut notifier = MockSubmissionNotifier::new();
        notifier
            .expect_booking_received()
            .returning(|_| Err(NotificationError::render("missing variable")));

        let service = BookingIntakeService::new(Arc::new(repo), Arc::new(notifier), clock());
        let expected = booking.id;
        assert_eq!(service.submit(booking).await.expect("stored"), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn booking_storage_rejection_maps_to_internal(booking: NewBooking) {
        let mut repo = MockBookingRepository::new();
        repo.expect_insert()
            .returning(|_| Err(BookingRepositoryError::query("violates check constraint")));
        let service = BookingIntakeService::new(
            Arc::new(repo),
            Arc::new(MockSubmissionNotifier::new()),
            clock(),
        );
        let err = service.submit(booking).await.expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }

    #[rstest]
    fn today_uses_utc_date() {
        let service = BookingIntakeService::new(
            Arc::new(MockBookingRepository::new()),
            Arc::new(MockSubmissionNotifier::new()),
            clock(),
        );
        assert_eq!(service.today(), NaiveDate::from_ymd_opt(2025, 6, 10).expect("date"));
    }
}
