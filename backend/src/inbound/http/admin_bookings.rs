//! Admin test-ride bookings: list and patch.

use actix_web::{HttpRequest, HttpResponse, get, patch, web};
use chrono::NaiveDate;
use pagination::PageParams;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::validation::optional_text;
use crate::domain::{
    ADMIN_NOTES_MAX, Booking, BookingFilter, BookingId, BookingStatus, BookingUpdate, Error,
    ValidationReport,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_store_header;
use crate::inbound::http::session::AuthenticatedAdmin;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{page_request, parse_id, parse_label};

/// Booking list filters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(default, rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct BookingListQuery {
    /// Booking status.
    pub status: Option<String>,
    /// Earliest preferred date (`YYYY-MM-DD`), inclusive.
    pub from: Option<String>,
    /// Latest preferred date (`YYYY-MM-DD`), inclusive.
    pub to: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Items per page (1..=100).
    pub per_page: Option<u32>,
}

fn parse_day(report: &mut ValidationReport, field: &str, raw: Option<&str>) -> Option<Option<NaiveDate>> {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Some(None);
    };
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(Some(date)),
        Err(_) => {
            report.push(field, "invalid_date", format!("{field} must use the YYYY-MM-DD format"));
            None
        }
    }
}

impl BookingListQuery {
    fn filter(&self, report: &mut ValidationReport) -> Option<BookingFilter> {
        let status = parse_label::<BookingStatus>(report, "status", self.status.as_deref());
        let from = parse_day(report, "from", self.from.as_deref());
        let to = parse_day(report, "to", self.to.as_deref());
        let (Some(status), Some(from), Some(to)) = (status, from, to) else {
            return None;
        };
        report.check("from", BookingFilter::new(status, from, to))
    }
}

/// Booking patch body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct BookingPatch {
    #[schema(example = "confirmed")]
    pub status: Option<String>,
    pub admin_notes: Option<String>,
}

impl BookingPatch {
    fn into_update(self) -> Result<BookingUpdate, Error> {
        let mut report = ValidationReport::default();
        let status = parse_label::<BookingStatus>(&mut report, "status", self.status.as_deref());
        let admin_notes = optional_text(&mut report, "adminNotes", self.admin_notes, ADMIN_NOTES_MAX);
        match status {
            Some(status) if report.is_clean() => report
                .check("body", BookingUpdate::new(status, admin_notes))
                .ok_or_else(|| report.into_error()),
            _ => Err(report.into_error()),
        }
    }
}

/// Paginated bookings, soonest preferred date first.
#[utoipa::path(
    get,
    path = "/api/admin/bookings",
    params(BookingListQuery),
    responses(
        (status = 200, description = "Page envelope of bookings"),
        (status = 400, description = "Invalid filter or pagination", body = Error),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminListBookings",
    security(("SessionCookie" = []))
)]
#[get("/bookings")]
pub async fn list_bookings(
    state: web::Data<HttpState>,
    admin: AuthenticatedAdmin,
    req: HttpRequest,
    query: web::Query<BookingListQuery>,
) -> ApiResult<HttpResponse> {
    let mut report = ValidationReport::default();
    let filter = query.filter(&mut report);
    let page = page_request(
        &mut report,
        PageParams {
            page: query.page,
            per_page: query.per_page,
        },
    );
    let (Some(filter), Some(page)) = (filter, page) else {
        return Err(report.into_error());
    };
    let bookings = state.admin.bookings(&admin.0, &filter, page).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_store_header())
        .json(bookings.with_links(&req.full_url())))
}

/// Change a booking's status or admin notes.
#[utoipa::path(
    patch,
    path = "/api/admin/bookings/{id}",
    params(("id" = String, Path, description = "Booking id", format = Uuid)),
    request_body = BookingPatch,
    responses(
        (status = 200, description = "Updated booking", body = Booking),
        (status = 400, description = "Invalid id or body", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 404, description = "Unknown booking", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminUpdateBooking",
    security(("SessionCookie" = []))
)]
#[patch("/bookings/{id}")]
pub async fn update_booking(
    state: web::Data<HttpState>,
    admin: AuthenticatedAdmin,
    id: web::Path<String>,
    payload: web::Json<BookingPatch>,
) -> ApiResult<HttpResponse> {
    let id: BookingId = parse_id(&id, "id")?;
    let update = payload.into_inner().into_update()?;
    let booking = state.admin.update_booking(&admin.0, id, &update).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_store_header())
        .json(booking))
}
