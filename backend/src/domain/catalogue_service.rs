//! Public catalogue queries.

use std::sync::Arc;

use super::ports::CatalogueRepository;
use super::{Error, Product, Slug, order_comparison, parse_comparison};

/// Listing, detail and comparison of active models.
#[derive(Clone)]
pub struct CatalogueService {
    repository: Arc<dyn CatalogueRepository>,
}

impl CatalogueService {
    /// Wire the service to its repository.
    pub fn new(repository: Arc<dyn CatalogueRepository>) -> Self {
        Self { repository }
    }

    /// Active models in display order.
    pub async fn products(&self) -> Result<Vec<Product>, Error> {
        Ok(self.repository.active_products().await?)
    }

    /// One active model; unknown or malformed slugs are 404s.
    pub async fn product(&self, raw_slug: &str) -> Result<Product, Error> {
        let not_found = || Error::not_found(format!("model {raw_slug:?} not found"));
        let slug = Slug::new(raw_slug).map_err(|_| not_found())?;
        self.repository
            .product_by_slug(&slug)
            .await?
            .ok_or_else(not_found)
    }

    /// Side-by-side comparison in the requested order.
    pub async fn compare(&self, raw_slugs: &str) -> Result<Vec<Product>, Error> {
        let slugs = parse_comparison(raw_slugs)?;
        let found = self.repository.products_by_slugs(&slugs).await?;
        order_comparison(&slugs, found)
    }
}
