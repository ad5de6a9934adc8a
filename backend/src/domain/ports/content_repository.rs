//! Port for editorial content.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{BlogPost, BlogPostSummary, Faq, Slug};

use super::define_port_error;

define_port_error! {
    /// Errors raised by content adapters.
    pub enum ContentRepositoryError {
        /// Backing service unreachable.
        Connection { message: String } => "content store connection failed: {message}",
        /// Request failed on the backing service.
        Query { message: String } => "content store query failed: {message}",
        /// Response body did not match the expected shape.
        Decode { message: String } => "content store response could not be decoded: {message}",
        /// Anonymous key refused.
        Unauthorized { message: String } => "content store rejected credentials: {message}",
    }
}

/// FAQ and blog reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// All FAQs ordered by `sort_order`.
    async fn faqs(&self) -> Result<Vec<Faq>, ContentRepositoryError>;

    /// Posts published at or before `now`, newest first.
    async fn published_posts(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<BlogPostSummary>, ContentRepositoryError>;

    /// Post with `slug` if published at or before `now`.
    async fn post_by_slug(
        &self,
        slug: &Slug,
        now: DateTime<Utc>,
    ) -> Result<Option<BlogPost>, ContentRepositoryError>;
}

/// No content.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureContentRepository;

#[async_trait]
impl ContentRepository for FixtureContentRepository {
    async fn faqs(&self) -> Result<Vec<Faq>, ContentRepositoryError> {
        Ok(Vec::new())
    }

    async fn published_posts(
        &self,
        _now: DateTime<Utc>,
    ) -> Result<Vec<BlogPostSummary>, ContentRepositoryError> {
        Ok(Vec::new())
    }

    async fn post_by_slug(
        &self,
        _slug: &Slug,
        _now: DateTime<Utc>,
    ) -> Result<Option<BlogPost>, ContentRepositoryError> {
        Ok(None)
    }
}
