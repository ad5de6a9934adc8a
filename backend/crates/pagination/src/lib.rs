//! Page request validation and page envelopes for admin list endpoints.
//!
//! Admin listings (leads, bookings) are offset paginated. Clients send
//! `page` and `perPage` query parameters; adapters translate a validated
//! [`PageRequest`] into `offset`/`limit` pairs and wrap results in a
//! [`Page`] envelope that also carries navigation links.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// First page number accepted by [`PageRequest`].
pub const FIRST_PAGE: u32 = 1;
/// Page size used when the client does not supply one.
pub const DEFAULT_PER_PAGE: u32 = 25;
/// Largest page size a client may request.
pub const MAX_PER_PAGE: u32 = 100;

/// Reasons a page request is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// `page` was zero.
    #[error("page must be at least {FIRST_PAGE}")]
    PageOutOfRange,
    /// `perPage` was zero or larger than [`MAX_PER_PAGE`].
    #[error("perPage must be between 1 and {MAX_PER_PAGE}")]
    PerPageOutOfRange,
}

impl PaginationError {
    /// Name of the query parameter that caused the rejection.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::PageOutOfRange => "page",
            Self::PerPageOutOfRange => "perPage",
        }
    }
}

/// Raw page parameters as they arrive on the query string.
///
/// ```
/// use pagination::PageParams;
///
/// let params: PageParams = serde_json::from_str(r#"{"perPage":10}"#).unwrap();
/// let request = params.validate().unwrap();
/// assert_eq!(request.page(), 1);
/// assert_eq!(request.per_page(), 10);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    /// One-based page number.
    pub page: Option<u32>,
    /// Number of items per page.
    pub per_page: Option<u32>,
}

impl PageParams {
    /// Apply defaults and validate the parameters.
    ///
    /// # Errors
    /// Returns [`PaginationError`] when either value is out of range.
    pub fn validate(self) -> Result<PageRequest, PaginationError> {
        PageRequest::new(
            self.page.unwrap_or(FIRST_PAGE),
            self.per_page.unwrap_or(DEFAULT_PER_PAGE),
        )
    }
}

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: FIRST_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageRequest {
    /// Validate and construct a page request.
    ///
    /// # Errors
    /// Returns [`PaginationError`] when `page` is zero or `per_page` is
    /// outside `1..=MAX_PER_PAGE`.
    pub const fn new(page: u32, per_page: u32) -> Result<Self, PaginationError> {
        if page < FIRST_PAGE {
            return Err(PaginationError::PageOutOfRange);
        }
        if per_page == 0 || per_page > MAX_PER_PAGE {
            return Err(PaginationError::PerPageOutOfRange);
        }
        Ok(Self { page, per_page })
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Items per page.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Number of rows to skip before this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - FIRST_PAGE).saturating_mul(u64::from(self.per_page))
    }

    /// Maximum number of rows in this page.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }
}

/// Navigation links for a page, derived from the request URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLinks {
    /// The URL of the current page.
    #[serde(rename = "self")]
    pub self_: String,
    /// The URL of the following page, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// The URL of the preceding page, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
}

/// A page of items plus totals.
///
/// ```
/// use pagination::{Page, PageRequest};
///
/// let request = PageRequest::new(2, 10).unwrap();
/// let page = Page::new(vec!["k"; 10], request, 35);
/// assert_eq!(page.total_pages, 4);
/// assert!(page.has_next());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// One-based page number.
    pub page: u32,
    /// Requested page size.
    pub per_page: u32,
    /// Total matching rows across all pages.
    pub total: u64,
    /// Number of pages needed to show `total` rows.
    pub total_pages: u64,
    /// Navigation links, present once [`Page::with_links`] has been applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<PageLinks>,
}

impl<T> Page<T> {
    /// Build a page envelope.
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            page: request.page(),
            per_page: request.per_page(),
            total,
            total_pages: total.div_ceil(u64::from(request.per_page())),
            links: None,
        }
    }

    /// An empty first page.
    #[must_use]
    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), request, 0)
    }

    /// Whether a following page exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages
    }

    /// Whether a preceding page exists.
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page > FIRST_PAGE
    }

    /// Transform the items while keeping the totals.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            total_pages: self.total_pages,
            links: self.links,
        }
    }

    /// Attach navigation links derived from the request URL.
    ///
    /// Existing `page`/`perPage` query pairs are replaced; every other query
    /// pair (filters, search terms) is preserved.
    #[must_use]
    pub fn with_links(mut self, request_url: &Url) -> Self {
        let per_page = self.per_page;
        let current = self.page;
        let link_for = |page: u32| page_url(request_url, page, per_page).to_string();
        let next = self.has_next().then(|| link_for(current.saturating_add(1)));
        let prev = self.has_prev().then(|| link_for(current.saturating_sub(1)));
        self.links = Some(PageLinks {
            self_: link_for(current),
            next,
            prev,
        });
        self
    }
}

fn page_url(base: &Url, page: u32, per_page: u32) -> Url {
    let retained: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != "page" && key != "perPage")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    let mut url = base.clone();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
        pairs.append_pair("page", &page.to_string());
        pairs.append_pair("perPage", &per_page.to_string());
    }
    url
}
