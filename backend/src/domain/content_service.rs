//! FAQ and blog reads.

use std::sync::Arc;

use mockable::Clock;

use super::ports::ContentRepository;
use super::{BlogPost, BlogPostSummary, Error, FaqGroup, Slug, group_faqs};

/// Editorial content for the public site.
#[derive(Clone)]
pub struct ContentService {
    repository: Arc<dyn ContentRepository>,
    clock: Arc<dyn Clock>,
}

impl ContentService {
    /// Wire the service to its repository and clock.
    pub fn new(repository: Arc<dyn ContentRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// FAQs grouped by category.
    pub async fn faqs(&self) -> Result<Vec<FaqGroup>, Error> {
        Ok(group_faqs(self.repository.faqs().await?))
    }

    /// Published posts, newest first.
    pub async fn posts(&self) -> Result<Vec<BlogPostSummary>, Error> {
        let now = self.clock.utc();
        let mut posts = self.repository.published_posts(now).await?;
        posts.retain(|post| post.is_published(now));
        Ok(posts)
    }

    /// One published post.
    pub async fn post(&self, raw_slug: &str) -> Result<BlogPost, Error> {
        let not_found = || Error::not_found(format!("post {raw_slug:?} not found"));
        let slug = Slug::new(raw_slug).map_err(|_| not_found())?;
        let now = self.clock.utc();
        self.repository
            .post_by_slug(&slug, now)
            .await?
            .filter(|post| post.summary.is_published(now))
            .ok_or_else(not_found)
    }
}
