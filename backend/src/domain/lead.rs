//! Sales leads captured from contact forms across the site.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::labels::labelled_enum;
use super::{City, EmailAddress, LeadId, PersonName, PhoneNumber, Slug};

/// Maximum characters in a visitor's free-text message.
pub const LEAD_MESSAGE_MAX: usize = 1000;
/// Maximum characters in admin notes.
pub const ADMIN_NOTES_MAX: usize = 2000;
/// Maximum characters in an admin search term.
pub const SEARCH_MAX: usize = 100;

labelled_enum! {
    /// Page or widget that produced the lead.
    pub enum LeadSource {
        /// Generic site-wide form (default).
        Website => "website",
        /// The contact page.
        ContactPage => "contact_page",
        /// A model detail page.
        ModelPage => "model_page",
        /// The comparison tool.
        ComparePage => "compare_page",
        /// The dealer locator.
        DealerLocator => "dealer_locator",
        /// A blog post call to action.
        Blog => "blog",
    }
}

impl Default for LeadSource {
    fn default() -> Self {
        Self::Website
    }
}

labelled_enum! {
    /// Sales pipeline stage.
    pub enum LeadStatus {
        /// Not yet handled.
        New => "new",
        /// Sales has reached out.
        Contacted => "contacted",
        /// Confirmed purchase intent.
        Qualified => "qualified",
        /// Bought a scooter.
        Converted => "converted",
        /// Dropped out.
        Lost => "lost",
    }
}

/// Validated lead ready for storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLead {
    pub id: LeadId,
    pub name: PersonName,
    pub email: EmailAddress,
    pub phone: PhoneNumber,
    pub city: Option<City>,
    pub model_slug: Option<Slug>,
    pub message: Option<String>,
    pub source: LeadSource,
    pub consent: bool,
}

/// Stored lead as seen by administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: LeadId,
    #[schema(value_type = String)]
    pub name: PersonName,
    #[schema(value_type = String)]
    pub email: EmailAddress,
    #[schema(value_type = String)]
    pub phone: PhoneNumber,
    #[schema(value_type = Option<String>)]
    pub city: Option<City>,
    #[schema(value_type = Option<String>)]
    pub model_slug: Option<Slug>,
    pub message: Option<String>,
    pub source: LeadSource,
    pub consent: bool,
    pub status: LeadStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Admin changes to a lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadUpdate {
    status: Option<LeadStatus>,
    notes: Option<String>,
}

/// A patch that changes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("at least one of status or notes must be provided")]
pub struct EmptyUpdate;

impl super::validation::FieldViolation for EmptyUpdate {
    fn code(&self) -> &'static str {
        "empty_update"
    }
}

impl LeadUpdate {
    /// Build an update; at least one field must be present.
    pub fn new(status: Option<LeadStatus>, notes: Option<String>) -> Result<Self, EmptyUpdate> {
        if status.is_none() && notes.is_none() {
            return Err(EmptyUpdate);
        }
        Ok(Self { status, notes })
    }

    /// Requested status change.
    #[must_use]
    pub const fn status(&self) -> Option<LeadStatus> {
        self.status
    }

    /// Replacement notes.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

/// Admin list and export filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadFilter {
    pub status: Option<LeadStatus>,
    pub search: Option<SearchTerm>,
}

/// Free-text search term safe to embed in a PostgREST `or=()` filter.
///
/// # Examples
/// ```
/// use site_backend::domain::SearchTerm;
///
/// let term = SearchTerm::new("  asha,(rao)* ").unwrap();
/// assert_eq!(term.as_ref(), "asharao");
/// assert!(SearchTerm::new("(),*").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Strip filter syntax characters, trim and truncate. Returns `None` when
    /// nothing searchable remains.
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let cleaned: String = raw
            .chars()
            .filter(|ch| !matches!(ch, ',' | '(' | ')' | '*' | '%' | '"' | '\\' | ':'))
            .collect();
        let trimmed: String = cleaned.trim().chars().take(SEARCH_MAX).collect();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed))
        }
    }
}

impl AsRef<str> for SearchTerm {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
