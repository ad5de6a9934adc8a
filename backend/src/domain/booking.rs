//! Test-ride bookings.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::labels::labelled_enum;
use super::validation::FieldViolation;
use super::{BookingId, City, DealerId, EmailAddress, PersonName, PhoneNumber, Slug};

/// How far ahead a ride can be booked.
pub const BOOKING_HORIZON_DAYS: u64 = 90;
/// Maximum characters in visitor notes on a booking.
pub const BOOKING_NOTES_MAX: usize = 1000;

labelled_enum! {
    /// Preferred part of the day for the ride.
    pub enum TimeSlot {
        /// 10:00 to 13:00.
        Morning => "morning",
        /// 13:00 to 16:00.
        Afternoon => "afternoon",
        /// 16:00 to 19:00.
        Evening => "evening",
    }
}

impl TimeSlot {
    /// Human-readable window used in notification emails.
    #[must_use]
    pub const fn window(self) -> &'static str {
        match self {
            Self::Morning => "10:00-13:00",
            Self::Afternoon => "13:00-16:00",
            Self::Evening => "16:00-19:00",
        }
    }
}

labelled_enum! {
    /// Booking lifecycle.
    pub enum BookingStatus {
        /// Awaiting dealer confirmation.
        Pending => "pending",
        /// Slot confirmed with the customer.
        Confirmed => "confirmed",
        /// Ride took place.
        Completed => "completed",
        /// Cancelled by either side.
        Cancelled => "cancelled",
        /// Customer did not turn up.
        NoShow => "no_show",
    }
}

impl BookingStatus {
    /// Whether the booking still occupies a future slot.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

/// Reasons a preferred date is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingDateError {
    /// Date is not a calendar date.
    #[error("date must use the YYYY-MM-DD format")]
    Malformed,
    /// Date before today.
    #[error("date must not be in the past")]
    InPast,
    /// Date beyond the booking horizon.
    #[error("date must be within {BOOKING_HORIZON_DAYS} days")]
    TooFarAhead,
}

impl FieldViolation for BookingDateError {
    fn code(&self) -> &'static str {
        match self {
            Self::Malformed => "invalid_date",
            Self::InPast => "date_in_past",
            Self::TooFarAhead => "date_too_far",
        }
    }
}

/// Preferred ride date inside the bookable window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PreferredDate(NaiveDate);

impl PreferredDate {
    /// Validate `date` against `today`; today itself is bookable.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use site_backend::domain::PreferredDate;
    ///
    /// let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    /// assert!(PreferredDate::new(today, today).is_ok());
    /// assert!(PreferredDate::new(today.pred_opt().unwrap(), today).is_err());
    /// ```
    pub fn new(date: NaiveDate, today: NaiveDate) -> Result<Self, BookingDateError> {
        if date < today {
            return Err(BookingDateError::InPast);
        }
        let horizon = today
            .checked_add_days(Days::new(BOOKING_HORIZON_DAYS))
            .unwrap_or(NaiveDate::MAX);
        if date > horizon {
            return Err(BookingDateError::TooFarAhead);
        }
        Ok(Self(date))
    }

    /// Parse an ISO `YYYY-MM-DD` string and validate it.
    pub fn parse(raw: &str, today: NaiveDate) -> Result<Self, BookingDateError> {
        let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| BookingDateError::Malformed)?;
        Self::new(date, today)
    }

    /// The calendar date.
    #[must_use]
    pub const fn date(self) -> NaiveDate {
        self.0
    }
}

/// Validated booking ready for storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub id: BookingId,
    pub name: PersonName,
    pub email: EmailAddress,
    pub phone: PhoneNumber,
    pub city: City,
    pub model_slug: Slug,
    pub preferred_date: PreferredDate,
    pub time_slot: TimeSlot,
    pub dealer_id: Option<DealerId>,
    pub notes: Option<String>,
}

/// Stored booking.
///
/// The date is kept as a plain [`NaiveDate`]: a booking accepted yesterday
/// for today is still valid after midnight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    #[schema(value_type = String)]
    pub name: PersonName,
    #[schema(value_type = String)]
    pub email: EmailAddress,
    #[schema(value_type = String)]
    pub phone: PhoneNumber,
    #[schema(value_type = String)]
    pub city: City,
    #[schema(value_type = String)]
    pub model_slug: Slug,
    pub preferred_date: NaiveDate,
    pub time_slot: TimeSlot,
    pub dealer_id: Option<DealerId>,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Admin changes to a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingUpdate {
    status: Option<BookingStatus>,
    admin_notes: Option<String>,
}

impl BookingUpdate {
    /// Build an update; at least one field must be present.
    pub fn new(
        status: Option<BookingStatus>,
        admin_notes: Option<String>,
    ) -> Result<Self, super::EmptyUpdate> {
        if status.is_none() && admin_notes.is_none() {
            return Err(super::EmptyUpdate);
        }
        Ok(Self {
            status,
            admin_notes,
        })
    }

    /// Requested status change.
    #[must_use]
    pub const fn status(&self) -> Option<BookingStatus> {
        self.status
    }

    /// Replacement admin notes.
    #[must_use]
    pub fn admin_notes(&self) -> Option<&str> {
        self.admin_notes.as_deref()
    }
}

/// `from` was after `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("from must not be after to")]
pub struct InvertedRange;

impl FieldViolation for InvertedRange {
    fn code(&self) -> &'static str {
        "invalid_range"
    }
}

/// Admin booking list filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilter {
    status: Option<BookingStatus>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

impl BookingFilter {
    /// Build a filter; an inverted date range is rejected.
    pub fn new(
        status: Option<BookingStatus>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Self, InvertedRange> {
        if let (Some(start), Some(end)) = (from, to) {
            if start > end {
                return Err(InvertedRange);
            }
        }
        Ok(Self { status, from, to })
    }

    /// Status to match.
    #[must_use]
    pub const fn status(&self) -> Option<BookingStatus> {
        self.status
    }

    /// Earliest preferred date, inclusive.
    #[must_use]
    pub const fn from(&self) -> Option<NaiveDate> {
        self.from
    }

    /// Latest preferred date, inclusive.
    #[must_use]
    pub const fn to(&self) -> Option<NaiveDate> {
        self.to
    }
}
