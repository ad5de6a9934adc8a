//! Admin lead pipeline: list, patch and CSV export.

use actix_web::http::header::{self, ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpRequest, HttpResponse, get, patch, web};
use pagination::PageParams;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::validation::optional_text;
use crate::domain::{
    ADMIN_NOTES_MAX, Error, Lead, LeadFilter, LeadId, LeadStatus, LeadUpdate, SearchTerm,
    ValidationReport,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_store_header;
use crate::inbound::http::session::AuthenticatedAdmin;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{page_request, parse_id, parse_label};

/// Lead list filters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(default, rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct LeadListQuery {
    /// Pipeline stage.
    pub status: Option<String>,
    /// Matches name, email, phone or city.
    pub search: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Items per page (1..=100).
    pub per_page: Option<u32>,
}

impl LeadListQuery {
    fn filter(&self, report: &mut ValidationReport) -> Option<LeadFilter> {
        let status = parse_label::<LeadStatus>(report, "status", self.status.as_deref())?;
        Some(LeadFilter {
            status,
            search: self.search.as_deref().and_then(SearchTerm::new),
        })
    }
}

/// Lead patch body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct LeadPatch {
    #[schema(example = "contacted")]
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl LeadPatch {
    fn into_update(self) -> Result<LeadUpdate, Error> {
        let mut report = ValidationReport::default();
        let status = parse_label::<LeadStatus>(&mut report, "status", self.status.as_deref());
        let notes = optional_text(&mut report, "notes", self.notes, ADMIN_NOTES_MAX);
        let Some(status) = status else {
            return Err(report.into_error());
        };
        if !report.is_clean() {
            return Err(report.into_error());
        }
        let update = LeadUpdate::new(status, notes);
        report.check("body", update).ok_or_else(|| report.into_error())
    }
}

/// Paginated leads, newest first.
#[utoipa::path(
    get,
    path = "/api/admin/leads",
    params(LeadListQuery),
    responses(
        (status = 200, description = "Page envelope of leads"),
        (status = 400, description = "Invalid filter or pagination", body = Error),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminListLeads",
    security(("SessionCookie" = []))
)]
#[get("/leads")]
pub async fn list_leads(
    state: web::Data<HttpState>,
    admin: AuthenticatedAdmin,
    req: HttpRequest,
    query: web::Query<LeadListQuery>,
) -> ApiResult<HttpResponse> {
    let query = query.into_inner();
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
    let leads = state.admin.leads(&admin.0, &filter, page).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_store_header())
        .json(leads.with_links(&req.full_url())))
}

/// Change a lead's status or notes.
#[utoipa::path(
    patch,
    path = "/api/admin/leads/{id}",
    params(("id" = String, Path, description = "Lead id", format = Uuid)),
    request_body = LeadPatch,
    responses(
        (status = 200, description = "Updated lead", body = Lead),
        (status = 400, description = "Invalid id or body", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 404, description = "Unknown lead", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminUpdateLead",
    security(("SessionCookie" = []))
)]
#[patch("/leads/{id}")]
pub async fn update_lead(
    state: web::Data<HttpState>,
    admin: AuthenticatedAdmin,
    id: web::Path<String>,
    payload: web::Json<LeadPatch>,
) -> ApiResult<HttpResponse> {
    let id: LeadId = parse_id(&id, "id")?;
    let update = payload.into_inner().into_update()?;
    let lead = state.admin.update_lead(&admin.0, id, &update).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_store_header())
        .json(lead))
}

/// Download every lead matching the filters as CSV.
#[utoipa::path(
    get,
    path = "/api/admin/leads/export",
    params(LeadListQuery),
    responses(
        (status = 200, description = "CSV attachment", content_type = "text/csv", body = String),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminExportLeads",
    security(("SessionCookie" = []))
)]
#[get("/leads/export")]
pub async fn export_leads(
    state: web::Data<HttpState>,
    admin: AuthenticatedAdmin,
    query: web::Query<LeadListQuery>,
) -> ApiResult<HttpResponse> {
    let mut report = ValidationReport::default();
    let Some(filter) = query.filter(&mut report) else {
        return Err(report.into_error());
    };
    let csv = state.admin.export_leads(&admin.0, &filter).await?;
    let filename = format!("leads-{}.csv", state.admin.now().format("%Y-%m-%d"));
    Ok(HttpResponse::Ok()
        .insert_header(private_no_store_header())
        .insert_header((header::CONTENT_TYPE, "text/csv; charset=utf-8"))
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(filename)],
        })
        .body(csv))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(LeadPatch { status: Some("contacted".into()), notes: None }, true)]
    #[case(LeadPatch { status: None, notes: Some("Called back".into()) }, true)]
    #[case(LeadPatch { status: None, notes: Some("   ".into()) }, false)]
    #[case(LeadPatch { status: Some("archived".into()), notes: None }, false)]
    #[case(LeadPatch::default(), false)]
    fn patch_validation(#[case] patch: LeadPatch, #[case] ok: bool) {
        assert_eq!(patch.into_update().is_ok(), ok);
    }

    #[rstest]
    fn empty_patch_reports_empty_update() {
        let err = LeadPatch::default().into_update().expect_err("empty");
        assert_eq!(
            err.details().and_then(|d| d["fields"][0]["code"].as_str()),
            Some("empty_update")
        );
    }

    #[rstest]
    fn list_query_sanitises_search() {
        let query = LeadListQuery {
            search: Some("rao,(x)".into()),
            ..LeadListQuery::default()
        };
        let mut report = ValidationReport::default();
        let filter = query.filter(&mut report).expect("filter");
        assert_eq!(filter.search.as_ref().map(|term| term.as_ref()), Some("raox"));
    }
}
