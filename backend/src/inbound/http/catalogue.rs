//! Public model catalogue.
//!
//! ```text
//! GET /api/products
//! GET /api/products/compare?slugs=volt-s1,volt-s1-pro
//! GET /api/products/{slug}
//! ```
//!
//! `compare` is registered ahead of `{slug}` so it is not captured as a slug.

use actix_web::{HttpResponse, get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{Error, Product};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::public_short_cache_header;
use crate::inbound::http::state::HttpState;

/// Query for the comparison endpoint.
#[derive(Debug, Deserialize, IntoParams)]
pub struct CompareQuery {
    /// Comma separated slugs, two or three.
    #[param(example = "volt-s1,volt-s1-pro")]
    #[serde(default)]
    pub slugs: String,
}

/// Active models in display order.
#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "Active models", body = [Product]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "listProducts",
    security([])
)]
#[get("/products")]
pub async fn list_products(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let products = state.catalogue.products().await?;
    Ok(HttpResponse::Ok()
        .insert_header(public_short_cache_header())
        .json(products))
}

/// Compare two or three models.
#[utoipa::path(
    get,
    path = "/api/products/compare",
    params(CompareQuery),
    responses(
        (status = 200, description = "Models in the requested order", body = [Product]),
        (status = 400, description = "Wrong number of slugs, duplicates or invalid slugs", body = Error),
        (status = 404, description = "A requested model does not exist; see details.missing", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "compareProducts",
    security([])
)]
#[get("/products/compare")]
pub async fn compare_products(
    state: web::Data<HttpState>,
    query: web::Query<CompareQuery>,
) -> ApiResult<HttpResponse> {
    let products = state.catalogue.compare(&query.slugs).await?;
    Ok(HttpResponse::Ok()
        .insert_header(public_short_cache_header())
        .json(products))
}

/// One active model.
#[utoipa::path(
    get,
    path = "/api/products/{slug}",
    params(("slug" = String, Path, description = "Model slug")),
    responses(
        (status = 200, description = "Model detail", body = Product),
        (status = 404, description = "Unknown model", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "getProduct",
    security([])
)]
#[get("/products/{slug}")]
pub async fn get_product(
    state: web::Data<HttpState>,
    slug: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let product = state.catalogue.product(&slug).await?;
    Ok(HttpResponse::Ok()
        .insert_header(public_short_cache_header())
        .json(product))
}
