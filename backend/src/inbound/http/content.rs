//! FAQ and blog endpoints.

use actix_web::{HttpResponse, get, web};

use crate::domain::{BlogPost, BlogPostSummary, Error, FaqGroup};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::public_short_cache_header;
use crate::inbound::http::state::HttpState;

/// FAQs grouped by category.
#[utoipa::path(
    get,
    path = "/api/faqs",
    responses(
        (status = 200, description = "FAQ groups", body = [FaqGroup]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["content"],
    operation_id = "listFaqs",
    security([])
)]
#[get("/faqs")]
pub async fn list_faqs(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let groups = state.content.faqs().await?;
    Ok(HttpResponse::Ok()
        .insert_header(public_short_cache_header())
        .json(groups))
}

/// Published posts, newest first.
#[utoipa::path(
    get,
    path = "/api/blog",
    responses(
        (status = 200, description = "Published posts", body = [BlogPostSummary]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["content"],
    operation_id = "listPosts",
    security([])
)]
#[get("/blog")]
pub async fn list_posts(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let posts = state.content.posts().await?;
    Ok(HttpResponse::Ok()
        .insert_header(public_short_cache_header())
        .json(posts))
}

/// One published post.
#[utoipa::path(
    get,
    path = "/api/blog/{slug}",
    params(("slug" = String, Path, description = "Post slug")),
    responses(
        (status = 200, description = "Post", body = BlogPost),
        (status = 404, description = "Unknown or unpublished post", body = Error)
    ),
    tags = ["content"],
    operation_id = "getPost",
    security([])
)]
#[get("/blog/{slug}")]
pub async fn get_post(
    state: web::Data<HttpState>,
    slug: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let post = state.content.post(&slug).await?;
    Ok(HttpResponse::Ok()
        .insert_header(public_short_cache_header())
        .json(post))
}
