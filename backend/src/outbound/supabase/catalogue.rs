//! `products` table adapter with embedded variants and colours.

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;

use super::client::{Caller, Prefer, SupabaseClient, rest_error_into_port, with_prefer};
use super::dto::{PRODUCT_SELECT, ProductRow};
use crate::domain::ports::{CatalogueRepository, CatalogueRepositoryError};
use crate::domain::{AccessToken, Product, ProductId, ProductUpdate, Slug};

rest_error_into_port!(CatalogueRepositoryError);

const TABLE: &str = "products";
const DISPLAY_ORDER: &str = "sort_order.asc,name.asc";

/// Catalogue reads and edits over PostgREST.
#[derive(Clone, Debug)]
pub struct SupabaseCatalogueRepository {
    client: SupabaseClient,
}

impl SupabaseCatalogueRepository {
    /// Wrap a shared client.
    #[must_use]
    pub const fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    async fn fetch(
        &self,
        caller: Caller<'_>,
        params: &[(&str, String)],
    ) -> Result<Vec<Product>, CatalogueRepositoryError> {
        let request = self
            .client
            .table(Method::GET, TABLE, caller)?
            .query(&[("select", PRODUCT_SELECT), ("order", DISPLAY_ORDER)])
            .query(params);
        let rows: Vec<ProductRow> = self.client.send(request).await?.json()?;
        Ok(rows.into_iter().map(Product::from).collect())
    }
}

/// `in.(a,b,c)` list; slugs never contain commas or parentheses.
fn in_list(slugs: &[Slug]) -> String {
    let joined = slugs
        .iter()
        .map(AsRef::<str>::as_ref)
        .collect::<Vec<_>>()
        .join(",");
    format!("in.({joined})")
}

#[derive(Serialize)]
struct ProductPatchBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    price_minor: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tagline: Option<&'a str>,
}

#[async_trait]
impl CatalogueRepository for SupabaseCatalogueRepository {
    async fn active_products(&self) -> Result<Vec<Product>, CatalogueRepositoryError> {
        self.fetch(Caller::Anonymous, &[("active", "eq.true".to_owned())])
            .await
    }

    async fn product_by_slug(
        &self,
        slug: &Slug,
    ) -> Result<Option<Product>, CatalogueRepositoryError> {
        let products = self
            .fetch(
                Caller::Anonymous,
                &[
                    ("active", "eq.true".to_owned()),
                    ("slug", format!("eq.{slug}")),
                    ("limit", "1".to_owned()),
                ],
            )
            .await?;
        Ok(products.into_iter().next())
    }

    async fn products_by_slugs(
        &self,
        slugs: &[Slug],
    ) -> Result<Vec<Product>, CatalogueRepositoryError> {
        if slugs.is_empty() {
            return Ok(Vec::new());
        }
        self.fetch(
            Caller::Anonymous,
            &[("active", "eq.true".to_owned()), ("slug", in_list(slugs))],
        )
        .await
    }

    async fn all_products(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<Product>, CatalogueRepositoryError> {
        self.fetch(Caller::Admin(token), &[]).await
    }

    async fn update_product(
        &self,
        token: &AccessToken,
        id: ProductId,
        update: &ProductUpdate,
    ) -> Result<Option<Product>, CatalogueRepositoryError> {
        let request = self
            .client
            .table(Method::PATCH, TABLE, Caller::Admin(token))?
            .query(&[("id", format!("eq.{id}")), ("select", PRODUCT_SELECT.to_owned())])
            .json(&ProductPatchBody {
                price_minor: update.price_minor(),
                active: update.active(),
                tagline: update.tagline(),
            });
        let response = self
            .client
            .send(with_prefer(request, Prefer::Representation))
            .await?;
        let rows: Vec<ProductRow> = response.json()?;
        Ok(rows.into_iter().next().map(Product::from))
    }
}
