//! Public lead capture.
//!
//! ```text
//! POST /api/leads {"name":"Asha Rao","email":"asha@example.com","phone":"9876543210"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::validation::optional_text;
use crate::domain::{
    City, EmailAddress, Error, LEAD_MESSAGE_MAX, LeadId, LeadSource, NewLead, PersonName,
    PhoneNumber, Slug, ValidationReport,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::CreatedResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_label;

/// Lead form body. Every field is optional at the JSON level so missing
/// values are reported per field rather than as a decode failure.
#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct LeadRequest {
    #[schema(example = "Asha Rao")]
    pub name: Option<String>,
    #[schema(example = "asha@example.com")]
    pub email: Option<String>,
    #[schema(example = "+91 98765 43210")]
    pub phone: Option<String>,
    pub city: Option<String>,
    #[schema(example = "volt-s1-pro")]
    pub model_slug: Option<String>,
    pub message: Option<String>,
    #[schema(example = "contact_page")]
    pub source: Option<String>,
    pub consent: Option<bool>,
}

impl LeadRequest {
    /// Validate every field, collecting all failures.
    pub fn into_new_lead(self) -> Result<NewLead, Error> {
        let mut report = ValidationReport::default();
        let name = report.check("name", PersonName::new(self.name.unwrap_or_default()));
        let email = report.check("email", EmailAddress::new(self.email.unwrap_or_default()));
        let phone = report.check("phone", PhoneNumber::new(self.phone.unwrap_or_default()));
        let city = report.check_optional("city", non_blank(self.city).map(City::new));
        let model_slug =
            report.check_optional("modelSlug", non_blank(self.model_slug).map(Slug::new));
        let message = optional_text(&mut report, "message", self.message, LEAD_MESSAGE_MAX);
        let source = parse_label::<LeadSource>(&mut report, "source", self.source.as_deref());

        match (name, email, phone, city, model_slug, source) {
            (Some(name), Some(email), Some(phone), Some(city), Some(model_slug), Some(source))
                if report.is_clean() =>
            {
                Ok(NewLead {
                    id: LeadId::generate(),
                    name,
                    email,
                    phone,
                    city,
                    model_slug,
                    message,
                    source: source.unwrap_or_default(),
                    consent: self.consent.unwrap_or(false),
                })
            }
            _ => Err(report.into_error()),
        }
    }
}

pub(crate) fn non_blank(raw: Option<String>) -> Option<String> {
    raw.filter(|value| !value.trim().is_empty())
}

/// Capture a sales lead.
#[utoipa::path(
    post,
    path = "/api/leads",
    request_body = LeadRequest,
    responses(
        (status = 201, description = "Lead stored", body = CreatedResponse),
        (status = 400, description = "Validation failed; see details.fields", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["leads"],
    operation_id = "createLead",
    security([])
)]
#[post("/leads")]
pub async fn create_lead(
    state: web::Data<HttpState>,
    payload: web::Json<LeadRequest>,
) -> ApiResult<HttpResponse> {
    let lead = payload.into_inner().into_new_lead()?;
    let id = state.leads.submit(lead).await?;
    Ok(HttpResponse::Created().json(CreatedResponse { id: *id.as_uuid() }))
}
