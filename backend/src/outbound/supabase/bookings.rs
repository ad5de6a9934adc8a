//! `bookings` table adapter.

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use reqwest::Method;
use serde::Serialize;

use super::client::{Caller, Prefer, SupabaseClient, rest_error_into_port, with_prefer};
use super::dto::{BookingInsert, BookingRow};
use crate::domain::ports::{BookingRepository, BookingRepositoryError};
use crate::domain::{
    AccessToken, Booking, BookingFilter, BookingId, BookingStatus, BookingUpdate, NewBooking,
};

rest_error_into_port!(BookingRepositoryError);

const TABLE: &str = "bookings";
const SOONEST_FIRST: &str = "preferred_date.asc,created_at.asc";

/// Booking storage over PostgREST.
#[derive(Clone, Debug)]
pub struct SupabaseBookingRepository {
    client: SupabaseClient,
}

impl SupabaseBookingRepository {
    /// Wrap a shared client.
    #[must_use]
    pub const fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

fn filter_params(filter: &BookingFilter) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(status) = filter.status() {
        params.push(("status", format!("eq.{status}")));
    }
    if let Some(from) = filter.from() {
        params.push(("preferred_date", format!("gte.{from}")));
    }
    if let Some(to) = filter.to() {
        params.push(("preferred_date", format!("lte.{to}")));
    }
    params
}

#[derive(Serialize)]
struct BookingPatchBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<BookingStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    admin_notes: Option<&'a str>,
}

#[async_trait]
impl BookingRepository for SupabaseBookingRepository {
    async fn insert(&self, booking: &NewBooking) -> Result<(), BookingRepositoryError> {
        let request = self
            .client
            .table(Method::POST, TABLE, Caller::Anonymous)?
            .json(&BookingInsert::from(booking));
        self.client.send(with_prefer(request, Prefer::Minimal)).await?;
        Ok(())
    }

    async fn list(
        &self,
        token: &AccessToken,
        filter: &BookingFilter,
        page: PageRequest,
    ) -> Result<Page<Booking>, BookingRepositoryError> {
        let mut params = filter_params(filter);
        params.extend([
            ("select", "*".to_owned()),
            ("order", SOONEST_FIRST.to_owned()),
            ("offset", page.offset().to_string()),
            ("limit", page.limit().to_string()),
        ]);
        let request = self
            .client
            .table(Method::GET, TABLE, Caller::Admin(token))?
            .query(&params);
        let (rows, total): (Vec<BookingRow>, u64) = self.client.send_counted(request).await?;
        Ok(Page::new(rows.into_iter().map(Booking::from).collect(), page, total))
    }

    async fn update(
        &self,
        token: &AccessToken,
        id: BookingId,
        update: &BookingUpdate,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        let request = self
            .client
            .table(Method::PATCH, TABLE, Caller::Admin(token))?
            .query(&[("id", format!("eq.{id}")), ("select", "*".to_owned())])
            .json(&BookingPatchBody {
                status: update.status(),
                admin_notes: update.admin_notes(),
            });
        let response = self
            .client
            .send(with_prefer(request, Prefer::Representation))
            .await?;
        let rows: Vec<BookingRow> = response.json()?;
        Ok(rows.into_iter().next().map(Booking::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

    #[rstest]
    fn date_window_uses_inclusive_bounds() {
        let day = |d| NaiveDate::from_ymd_opt(2025, 3, d).expect("date");
        let filter =
            BookingFilter::new(Some(BookingStatus::Pending), Some(day(1)), Some(day(31)))
                .expect("filter");
        assert_eq!(
            filter_params(&filter),
            vec![
                ("status", "eq.pending".to_owned()),
                ("preferred_date", "gte.2025-03-01".to_owned()),
                ("preferred_date", "lte.2025-03-31".to_owned()),
            ]
        );
    }
}
