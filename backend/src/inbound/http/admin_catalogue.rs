//! Admin catalogue edits and dashboard counters.

use actix_web::{HttpResponse, get, patch, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    DashboardStats, Error, Product, ProductId, ProductUpdate, ProductUpdateError, ValidationReport,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_store_header;
use crate::inbound::http::session::AuthenticatedAdmin;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_id;

/// Product patch body. Prices are in minor units (paise).
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductPatch {
    #[schema(example = 11_499_900)]
    pub price_minor: Option<i64>,
    pub active: Option<bool>,
    pub tagline: Option<String>,
}

impl ProductPatch {
    fn into_update(self) -> Result<ProductUpdate, Error> {
        ProductUpdate::new(self.price_minor, self.active, self.tagline).map_err(|err| {
            let field = match err {
                ProductUpdateError::Empty => "body",
                ProductUpdateError::NonPositivePrice => "priceMinor",
                ProductUpdateError::TaglineTooLong => "tagline",
            };
            let mut report = ValidationReport::default();
            report.check::<(), _>(field, Err(err));
            report.into_error()
        })
    }
}

/// Every product, including inactive ones.
#[utoipa::path(
    get,
    path = "/api/admin/products",
    responses(
        (status = 200, description = "All products", body = [Product]),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminListProducts",
    security(("SessionCookie" = []))
)]
#[get("/products")]
pub async fn list_products(
    state: web::Data<HttpState>,
    admin: AuthenticatedAdmin,
) -> ApiResult<HttpResponse> {
    let products = state.admin.products(&admin.0).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_store_header())
        .json(products))
}

/// Change a product's price, visibility or tagline.
#[utoipa::path(
    patch,
    path = "/api/admin/products/{id}",
    params(("id" = String, Path, description = "Product id", format = Uuid)),
    request_body = ProductPatch,
    responses(
        (status = 200, description = "Updated product", body = Product),
        (status = 400, description = "Invalid id or body", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 404, description = "Unknown product", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminUpdateProduct",
    security(("SessionCookie" = []))
)]
#[patch("/products/{id}")]
pub async fn update_product(
    state: web::Data<HttpState>,
    admin: AuthenticatedAdmin,
    id: web::Path<String>,
    payload: web::Json<ProductPatch>,
) -> ApiResult<HttpResponse> {
    let id: ProductId = parse_id(&id, "id")?;
    let update = payload.into_inner().into_update()?;
    let product = state.admin.update_product(&admin.0, id, &update).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_store_header())
        .json(product))
}

/// Dashboard counters.
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Counters for the dashboard home", body = DashboardStats),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminStats",
    security(("SessionCookie" = []))
)]
#[get("/stats")]
pub async fn stats(state: web::Data<HttpState>, admin: AuthenticatedAdmin) -> ApiResult<HttpResponse> {
    let stats = state.admin.stats(&admin.0).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_store_header())
        .json(stats))
}
