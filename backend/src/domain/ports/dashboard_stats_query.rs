//! Read port for dashboard counters.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{AccessToken, DashboardStats};

use super::define_port_error;

define_port_error! {
    /// Errors raised while counting dashboard figures.
    pub enum DashboardStatsError {
        /// Backing service unreachable.
        Connection { message: String } => "stats connection failed: {message}",
        /// A count request failed.
        Query { message: String } => "stats query failed: {message}",
        /// A count header was missing or malformed.
        Decode { message: String } => "stats response could not be decoded: {message}",
        /// Token missing, expired, or refused by row-level security.
        Unauthorized { message: String } => "stats query rejected credentials: {message}",
    }
}

/// Counts backing the admin landing page.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardStatsQuery: Send + Sync {
    /// Compute counters relative to `today`.
    async fn dashboard_stats(
        &self,
        token: &AccessToken,
        today: NaiveDate,
    ) -> Result<DashboardStats, DashboardStatsError>;
}

/// All counters zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDashboardStatsQuery;

#[async_trait]
impl DashboardStatsQuery for FixtureDashboardStatsQuery {
    async fn dashboard_stats(
        &self,
        _token: &AccessToken,
        _today: NaiveDate,
    ) -> Result<DashboardStats, DashboardStatsError> {
        Ok(DashboardStats::default())
    }
}
