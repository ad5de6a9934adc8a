//! Port for test-ride booking storage.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{AccessToken, Booking, BookingFilter, BookingId, BookingUpdate, NewBooking};

use super::define_port_error;

define_port_error! {
    /// Errors raised by booking storage adapters.
    pub enum BookingRepositoryError {
        /// Backing service unreachable.
        Connection { message: String } => "booking store connection failed: {message}",
        /// Request failed on the backing service.
        Query { message: String } => "booking store query failed: {message}",
        /// Response body did not match the expected shape.
        Decode { message: String } => "booking store response could not be decoded: {message}",
        /// Token missing, expired, or refused by row-level security.
        Unauthorized { message: String } => "booking store rejected credentials: {message}",
    }
}

/// Booking persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Store a new booking with status `pending`.
    async fn insert(&self, booking: &NewBooking) -> Result<(), BookingRepositoryError>;

    /// Page of bookings ordered by preferred date, soonest first.
    async fn list(
        &self,
        token: &AccessToken,
        filter: &BookingFilter,
        page: PageRequest,
    ) -> Result<Page<Booking>, BookingRepositoryError>;

    /// Apply `update`; `None` when no booking has `id`.
    async fn update(
        &self,
        token: &AccessToken,
        id: BookingId,
        update: &BookingUpdate,
    ) -> Result<Option<Booking>, BookingRepositoryError>;
}

/// Accepts inserts and holds nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBookingRepository;

#[async_trait]
impl BookingRepository for FixtureBookingRepository {
    async fn insert(&self, _booking: &NewBooking) -> Result<(), BookingRepositoryError> {
        Ok(())
    }

    async fn list(
        &self,
        _token: &AccessToken,
        _filter: &BookingFilter,
        page: PageRequest,
    ) -> Result<Page<Booking>, BookingRepositoryError> {
        Ok(Page::empty(page))
    }

    async fn update(
        &self,
        _token: &AccessToken,
        _id: BookingId,
        _update: &BookingUpdate,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        Ok(None)
    }
}
