//! Crawler documents served from the site root.

use actix_web::{HttpResponse, get, http::header::ContentType, web};

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::public_daily_cache_header;
use crate::inbound::http::state::HttpState;

/// `robots.txt` pointing crawlers at the sitemap.
#[utoipa::path(
    get,
    path = "/robots.txt",
    responses((status = 200, description = "Robots exclusion rules", content_type = "text/plain", body = String)),
    tags = ["seo"],
    operation_id = "robotsTxt",
    security([])
)]
#[get("/robots.txt")]
pub async fn robots_txt(state: web::Data<HttpState>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .insert_header(public_daily_cache_header())
        .body(state.sitemap.robots())
}

/// `sitemap.xml` listing static pages, models and posts.
#[utoipa::path(
    get,
    path = "/sitemap.xml",
    responses(
        (status = 200, description = "Sitemap", content_type = "application/xml", body = String),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["seo"],
    operation_id = "sitemapXml",
    security([])
)]
#[get("/sitemap.xml")]
pub async fn sitemap_xml(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let xml = state.sitemap.sitemap().await?;
    Ok(HttpResponse::Ok()
        .content_type("application/xml")
        .insert_header(public_daily_cache_header())
        .body(xml))
}
