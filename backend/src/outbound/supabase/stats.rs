//! Dashboard counters via `HEAD` requests with `count=exact`.

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use futures_util::future::try_join_all;
use reqwest::Method;

use super::client::{Caller, Prefer, RestError, SupabaseClient, rest_error_into_port, with_prefer};
use crate::domain::ports::{DashboardStatsError, DashboardStatsQuery};
use crate::domain::stats::RECENT_LEADS_DAYS;
use crate::domain::{AccessToken, DashboardStats};

rest_error_into_port!(DashboardStatsError);

/// Counts taken from the leads, bookings and products tables.
#[derive(Clone, Debug)]
pub struct SupabaseDashboardStats {
    client: SupabaseClient,
}

struct Count {
    table: &'static str,
    filters: Vec<(&'static str, String)>,
}

impl Count {
    fn all(table: &'static str) -> Self {
        Self {
            table,
            filters: Vec::new(),
        }
    }

    fn filtered(table: &'static str, filters: &[(&'static str, String)]) -> Self {
        Self {
            table,
            filters: filters.to_vec(),
        }
    }
}

/// The eight counts in [`DashboardStats`] field order.
fn plan(today: NaiveDate) -> [Count; 8] {
    let recent_start = today
        .checked_sub_days(Days::new(RECENT_LEADS_DAYS.unsigned_abs()))
        .unwrap_or(NaiveDate::MIN);
    [
        Count::all("leads"),
        Count::filtered("leads", &[("status", "eq.new".to_owned())]),
        Count::filtered(
            "leads",
            &[("created_at", format!("gte.{recent_start}T00:00:00Z"))],
        ),
        Count::all("bookings"),
        Count::filtered("bookings", &[("status", "eq.pending".to_owned())]),
        Count::filtered("bookings", &[("status", "eq.confirmed".to_owned())]),
        Count::filtered(
            "bookings",
            &[
                ("status", "in.(pending,confirmed)".to_owned()),
                ("preferred_date", format!("gte.{today}")),
            ],
        ),
        Count::filtered("products", &[("active", "eq.true".to_owned())]),
    ]
}

impl SupabaseDashboardStats {
    /// Wrap a shared client.
    #[must_use]
    pub const fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    async fn count(&self, token: &AccessToken, count: &Count) -> Result<u64, RestError> {
        let request = self
            .client
            .table(Method::HEAD, count.table, Caller::Admin(token))?
            .query(&[("select", "id")])
            .query(&count.filters);
        self.client
            .send(with_prefer(request, Prefer::CountExact))
            .await?
            .total()
    }
}

#[async_trait]
impl DashboardStatsQuery for SupabaseDashboardStats {
    async fn dashboard_stats(
        &self,
        token: &AccessToken,
        today: NaiveDate,
    ) -> Result<DashboardStats, DashboardStatsError> {
        let plan = plan(today);
        let counts = try_join_all(plan.iter().map(|count| self.count(token, count))).await?;
        let [
            total_leads,
            new_leads,
            recent_leads,
            total_bookings,
            pending_bookings,
            confirmed_bookings,
            upcoming_bookings,
            active_products,
        ] = <[u64; 8]>::try_from(counts)
            .map_err(|_| DashboardStatsError::decode("count plan size mismatch"))?;
        Ok(DashboardStats {
            total_leads,
            new_leads,
            recent_leads,
            total_bookings,
            pending_bookings,
            confirmed_bookings,
            upcoming_bookings,
            active_products,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_window_starts_a_week_ago_at_midnight() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 8).expect("date");
        let plan = plan(today);
        assert_eq!(
            plan[2].filters,
            vec![("created_at", "gte.2025-03-01T00:00:00Z".to_owned())]
        );
        assert_eq!(
            plan[6].filters[1],
            ("preferred_date", "gte.2025-03-08".to_owned())
        );
    }
}
