//! Field-level validation reporting.
//!
//! Submission payloads are checked field by field and every failure is
//! collected, so a form can highlight all invalid inputs from one response.
//! The resulting [`Error`] carries `details.fields[]` entries of the shape
//! `{ "field", "code", "message" }`.

use serde::Serialize;
use serde_json::json;

use super::Error;

/// A validation failure that knows its machine-readable code.
pub trait FieldViolation: std::fmt::Display {
    /// Stable snake_case code, e.g. `invalid_email`.
    fn code(&self) -> &'static str;
}

/// One failing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    /// Client-facing (camelCase) field name.
    pub field: String,
    /// Stable failure code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

/// Accumulates [`FieldIssue`]s while a payload is converted into domain
/// values.
///
/// # Examples
/// ```
/// use site_backend::domain::{EmailAddress, ValidationReport};
///
/// let mut report = ValidationReport::default();
/// let email = report.check("email", EmailAddress::new("not-an-email"));
/// assert!(email.is_none());
/// assert!(report.into_result(()).is_err());
/// ```
#[derive(Debug, Default)]
pub struct ValidationReport {
    issues: Vec<FieldIssue>,
}

impl ValidationReport {
    /// Record the failure (if any) and hand back the successful value.
    pub fn check<T, E>(&mut self, field: &str, result: Result<T, E>) -> Option<T>
    where
        E: FieldViolation,
    {
        match result {
            Ok(value) => Some(value),
            Err(violation) => {
                self.push(field, violation.code(), violation.to_string());
                None
            }
        }
    }

    /// Record an optional input; `None` passes through untouched.
    pub fn check_optional<T, E>(
        &mut self,
        field: &str,
        result: Option<Result<T, E>>,
    ) -> Option<Option<T>>
    where
        E: FieldViolation,
    {
        match result {
            None => Some(None),
            Some(inner) => self.check(field, inner).map(Some),
        }
    }

    /// Record an ad-hoc failure.
    pub fn push(&mut self, field: &str, code: &str, message: impl Into<String>) {
        self.issues.push(FieldIssue {
            field: field.to_owned(),
            code: code.to_owned(),
            message: message.into(),
        });
    }

    /// Whether no failures have been recorded.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Recorded failures.
    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    /// Return `value` when clean, otherwise the aggregated validation error.
    pub fn into_result<T>(self, value: T) -> Result<T, Error> {
        if self.issues.is_empty() {
            Ok(value)
        } else {
            Err(self.into_error())
        }
    }

    /// Convert the recorded failures into an `invalid_request` error.
    pub fn into_error(self) -> Error {
        Error::invalid_request("request validation failed")
            .with_details(json!({ "fields": self.issues }))
    }
}

/// Validate an optional free-text field with a maximum length.
///
/// Blank input is treated as absent.
pub(crate) fn optional_text(
    report: &mut ValidationReport,
    field: &str,
    raw: Option<String>,
    max_chars: usize,
) -> Option<String> {
    let trimmed = raw
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())?;
    if trimmed.chars().count() > max_chars {
        report.push(
            field,
            "too_long",
            format!("{field} must be at most {max_chars} characters"),
        );
        return None;
    }
    Some(trimmed)
}
