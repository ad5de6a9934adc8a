//! Shared validation helpers for inbound HTTP adapters.
//!
//! Extractor failures (malformed JSON, bad query strings, bad path
//! segments) are turned into the standard `invalid_request` envelope instead
//! of actix's plain-text defaults.

use std::str::FromStr;

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, web};
use pagination::{PageParams, PageRequest};
use serde_json::json;

use crate::domain::{Error, ValidationReport};

/// Largest accepted JSON body.
pub const JSON_LIMIT_BYTES: usize = 16 * 1024;

fn extractor_error(kind: &str, detail: String) -> actix_web::Error {
    Error::invalid_request(format!("malformed {kind}"))
        .with_details(json!({ "reason": detail }))
        .into()
}

/// `JsonConfig` emitting the standard envelope.
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT_BYTES)
        .error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
            extractor_error("JSON body", err.to_string())
        })
}

/// `QueryConfig` emitting the standard envelope.
#[must_use]
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, _req: &HttpRequest| {
        extractor_error("query string", err.to_string())
    })
}

/// `PathConfig` emitting the standard envelope.
#[must_use]
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: PathError, _req: &HttpRequest| {
        extractor_error("path", err.to_string())
    })
}

/// Parse a path identifier, reporting `{field, code: invalid_uuid}`.
pub(crate) fn parse_id<T: FromStr>(raw: &str, field: &str) -> Result<T, Error> {
    raw.parse().map_err(|_| {
        Error::invalid_request(format!("{field} must be a valid UUID")).with_details(json!({
            "field": field,
            "code": "invalid_uuid",
        }))
    })
}

/// Parse an optional closed-vocabulary label into `report`.
pub(crate) fn parse_label<T>(
    report: &mut ValidationReport,
    field: &str,
    raw: Option<&str>,
) -> Option<Option<T>>
where
    T: FromStr<Err = crate::domain::UnknownLabel>,
{
    let raw = raw.map(str::trim).filter(|value| !value.is_empty());
    report.check_optional(field, raw.map(str::parse::<T>))
}

/// Validate pagination parameters into `report`.
pub(crate) fn page_request(report: &mut ValidationReport, params: PageParams) -> Option<PageRequest> {
    match params.validate() {
        Ok(request) => Some(request),
        Err(err) => {
            report.push(err.field(), "out_of_range", err.to_string());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LeadStatus;
    use rstest::rstest;

    #[rstest]
    fn parse_id_reports_the_field() {
        let err = parse_id::<crate::domain::LeadId>("nope", "id").expect_err("invalid");
        assert_eq!(err.details().and_then(|d| d.get("code")), Some(&json!("invalid_uuid")));
    }

    #[rstest]
    #[case(None, true)]
    #[case(Some(""), true)]
    #[case(Some("new"), true)]
    #[case(Some("archived"), false)]
    fn labels_are_optional(#[case] raw: Option<&str>, #[case] clean: bool) {
        let mut report = ValidationReport::default();
        let _ = parse_label::<LeadStatus>(&mut report, "status", raw);
        assert_eq!(report.is_clean(), clean);
    }

    #[rstest]
    fn page_errors_name_the_field() {
        let mut report = ValidationReport::default();
        let params = PageParams {
            page: Some(1),
            per_page: Some(500),
        };
        assert!(page_request(&mut report, params).is_none());
        assert_eq!(report.issues()[0].field, "perPage");
    }
}
