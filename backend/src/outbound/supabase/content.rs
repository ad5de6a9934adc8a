//! `faqs` and `blog_posts` adapters.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Method;

use super::client::{Caller, SupabaseClient, rest_error_into_port};
use super::dto::{FaqRow, POST_SUMMARY_SELECT, PostRow, PostSummaryRow};
use crate::domain::ports::{ContentRepository, ContentRepositoryError};
use crate::domain::{BlogPost, BlogPostSummary, Faq, Slug};

rest_error_into_port!(ContentRepositoryError);

/// Editorial content over PostgREST.
#[derive(Clone, Debug)]
pub struct SupabaseContentRepository {
    client: SupabaseClient,
}

impl SupabaseContentRepository {
    /// Wrap a shared client.
    #[must_use]
    pub const fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

fn published_before(now: DateTime<Utc>) -> String {
    format!("lte.{}", now.to_rfc3339_opts(SecondsFormat::Secs, true))
}

#[async_trait]
impl ContentRepository for SupabaseContentRepository {
    async fn faqs(&self) -> Result<Vec<Faq>, ContentRepositoryError> {
        let request = self
            .client
            .table(Method::GET, "faqs", Caller::Anonymous)?
            .query(&[("select", "*"), ("order", "sort_order.asc")]);
        let rows: Vec<FaqRow> = self.client.send(request).await?.json()?;
        Ok(rows.into_iter().map(Faq::from).collect())
    }

    async fn published_posts(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<BlogPostSummary>, ContentRepositoryError> {
        let request = self
            .client
            .table(Method::GET, "blog_posts", Caller::Anonymous)?
            .query(&[
                ("select", POST_SUMMARY_SELECT.to_owned()),
                ("published_at", published_before(now)),
                ("order", "published_at.desc".to_owned()),
            ]);
        let rows: Vec<PostSummaryRow> = self.client.send(request).await?.json()?;
        Ok(rows.into_iter().map(BlogPostSummary::from).collect())
    }

    async fn post_by_slug(
        &self,
        slug: &Slug,
        now: DateTime<Utc>,
    ) -> Result<Option<BlogPost>, ContentRepositoryError> {
        let request = self
            .client
            .table(Method::GET, "blog_posts", Caller::Anonymous)?
            .query(&[
                ("select", "*".to_owned()),
                ("slug", format!("eq.{slug}")),
                ("published_at", published_before(now)),
                ("limit", "1".to_owned()),
            ]);
        let rows: Vec<PostRow> = self.client.send(request).await?.json()?;
        Ok(rows.into_iter().next().map(BlogPost::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn publication_cut_off_is_utc_seconds() {
        let now = Utc
            .with_ymd_and_hms(2025, 3, 1, 9, 30, 0)
            .single()
            .expect("timestamp");
        assert_eq!(published_before(now), "lte.2025-03-01T09:30:00Z");
    }
}
