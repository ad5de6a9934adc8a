//! Crawler documents served from the site root.

// Shared doubles include helpers other suites use.
#[allow(dead_code)]
mod support;

use actix_web::http::{StatusCode, header};
use actix_web::test;
use site_backend::domain::STATIC_ROUTES;
use site_backend::inbound::http::state::HttpStatePorts;

use support::{SITE_URL, state};

fn text(bytes: &[u8]) -> String {
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

#[actix_web::test]
async fn robots_keeps_crawlers_out_of_admin_and_api() {
    let app = site_app!(state(HttpStatePorts::default(), ""));
    let res = test::call_service(&app, test::TestRequest::get().uri("/robots.txt").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = text(&test::read_body(res).await);
    assert!(body.starts_with("User-agent: *\n"));
    assert!(body.contains("Disallow: /admin\n"));
    assert!(body.contains("Disallow: /api/\n"));
    assert!(body.contains(&format!("Sitemap: {SITE_URL}/sitemap.xml")));
}

#[actix_web::test]
async fn sitemap_lists_every_static_page_once() {
    let app = site_app!(state(HttpStatePorts::default(), ""));
    let res = test::call_service(&app, test::TestRequest::get().uri("/sitemap.xml").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let content_type = res
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    assert!(content_type.starts_with("application/xml"));
    assert!(res.headers().contains_key(header::CACHE_CONTROL));

    let body = text(&test::read_body(res).await);
    assert!(body.starts_with("<?xml"));
    assert_eq!(body.matches("<loc>").count(), STATIC_ROUTES.len());
    for route in STATIC_ROUTES {
        let loc = format!("<loc>{SITE_URL}{}</loc>", route.path);
        assert_eq!(body.matches(&loc).count(), 1, "{loc}");
    }
    assert!(!body.contains("/admin"));
}
