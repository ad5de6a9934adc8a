//! Dashboard headline numbers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Window for "recent" leads on the dashboard.
pub const RECENT_LEADS_DAYS: i64 = 7;

/// Counters shown on the admin landing page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_leads: u64,
    pub new_leads: u64,
    /// Leads created in the last [`RECENT_LEADS_DAYS`] days.
    pub recent_leads: u64,
    pub total_bookings: u64,
    pub pending_bookings: u64,
    pub confirmed_bookings: u64,
    /// Pending or confirmed bookings dated today or later.
    pub upcoming_bookings: u64,
    pub active_products: u64,
}
