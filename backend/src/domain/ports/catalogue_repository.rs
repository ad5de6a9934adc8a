//! Port for the scooter catalogue.
//!
//! Public reads only ever see active products. Admin reads and edits pass
//! the admin's token.

use async_trait::async_trait;

use crate::domain::{AccessToken, Product, ProductId, ProductUpdate, Slug};

use super::define_port_error;

define_port_error! {
    /// Errors raised by catalogue adapters.
    pub enum CatalogueRepositoryError {
        /// Backing service unreachable.
        Connection { message: String } => "catalogue connection failed: {message}",
        /// Request failed on the backing service.
        Query { message: String } => "catalogue query failed: {message}",
        /// Response body did not match the expected shape.
        Decode { message: String } => "catalogue response could not be decoded: {message}",
        /// Token missing, expired, or refused by row-level security.
        Unauthorized { message: String } => "catalogue rejected credentials: {message}",
    }
}

/// Catalogue reads and admin edits.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueRepository: Send + Sync {
    /// Active products in display order (`sort_order`, then name).
    async fn active_products(&self) -> Result<Vec<Product>, CatalogueRepositoryError>;

    /// Active product with `slug`.
    async fn product_by_slug(&self, slug: &Slug)
    -> Result<Option<Product>, CatalogueRepositoryError>;

    /// Active products whose slug is in `slugs`, in no particular order.
    async fn products_by_slugs(
        &self,
        slugs: &[Slug],
    ) -> Result<Vec<Product>, CatalogueRepositoryError>;

    /// Every product including inactive ones.
    async fn all_products(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<Product>, CatalogueRepositoryError>;

    /// Apply `update`; `None` when no product has `id`.
    async fn update_product(
        &self,
        token: &AccessToken,
        id: ProductId,
        update: &ProductUpdate,
    ) -> Result<Option<Product>, CatalogueRepositoryError>;
}

/// Empty catalogue.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCatalogueRepository;

#[async_trait]
impl CatalogueRepository for FixtureCatalogueRepository {
    async fn active_products(&self) -> Result<Vec<Product>, CatalogueRepositoryError> {
        Ok(Vec::new())
    }

    async fn product_by_slug(
        &self,
        _slug: &Slug,
    ) -> Result<Option<Product>, CatalogueRepositoryError> {
        Ok(None)
    }

    async fn products_by_slugs(
        &self,
        _slugs: &[Slug],
    ) -> Result<Vec<Product>, CatalogueRepositoryError> {
        Ok(Vec::new())
    }

    async fn all_products(
        &self,
        _token: &AccessToken,
    ) -> Result<Vec<Product>, CatalogueRepositoryError> {
        Ok(Vec::new())
    }

    async fn update_product(
        &self,
        _token: &AccessToken,
        _id: ProductId,
        _update: &ProductUpdate,
    ) -> Result<Option<Product>, CatalogueRepositoryError> {
        Ok(None)
    }
}
