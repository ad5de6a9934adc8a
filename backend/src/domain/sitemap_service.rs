//! Builds the SEO documents from live catalogue and blog data.

use std::sync::Arc;

use mockable::Clock;

use super::ports::{CatalogueRepository, ContentRepository};
use super::{Error, SiteUrl, Slug, render_robots, render_sitemap, sitemap_entries};

/// `sitemap.xml` and `robots.txt` generator.
#[derive(Clone)]
pub struct SitemapService {
    catalogue: Arc<dyn CatalogueRepository>,
    content: Arc<dyn ContentRepository>,
    clock: Arc<dyn Clock>,
    site: SiteUrl,
}

impl SitemapService {
    /// Wire the service.
    pub fn new(
        catalogue: Arc<dyn CatalogueRepository>,
        content: Arc<dyn ContentRepository>,
        clock: Arc<dyn Clock>,
        site: SiteUrl,
    ) -> Self {
        Self {
            catalogue,
            content,
            clock,
            site,
        }
    }

    /// Render the sitemap: static routes plus one entry per active model and
    /// published post.
    pub async fn sitemap(&self) -> Result<String, Error> {
        let now = self.clock.utc();
        let (products, posts) = futures_util::future::try_join(
            async { self.catalogue.active_products().await.map_err(Error::from) },
            async { self.content.published_posts(now).await.map_err(Error::from) },
        )
        .await?;
        let slugs: Vec<Slug> = products.into_iter().map(|product| product.slug).collect();
        let entries = sitemap_entries(&slugs, &posts);
        Ok(render_sitemap(&self.site, &entries))
    }

    /// Render robots.txt.
    #[must_use]
    pub fn robots(&self) -> String {
        render_robots(&self.site)
    }
}
