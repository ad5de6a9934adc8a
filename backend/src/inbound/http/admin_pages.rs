//! Admin application shell.
//!
//! Every dashboard page serves the same single-page shell; the client
//! router takes over from there. Access control lives in
//! [`AdminGate`](crate::middleware::AdminGate).

use actix_web::http::header::{self, ContentType};
use actix_web::{HttpResponse, web};

use crate::inbound::http::cache_control::PRIVATE_NO_STORE;
use crate::inbound::http::state::HttpState;

/// Dashboard pages, relative to the `/admin` scope.
pub const ADMIN_PAGES: [&str; 5] = ["", "/leads", "/bookings", "/products", "/login"];

/// Serve the admin shell.
pub async fn admin_shell(state: web::Data<HttpState>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .insert_header((header::CACHE_CONTROL, PRIVATE_NO_STORE))
        .insert_header(("X-Robots-Tag", "noindex, nofollow"))
        .body(state.admin_shell.to_string())
}

/// Register the shell under each dashboard page, with and without a
/// trailing slash.
pub fn configure(cfg: &mut web::ServiceConfig) {
    for page in ADMIN_PAGES {
        cfg.route(page, web::get().to(admin_shell))
            .route(&format!("{page}/"), web::get().to(admin_shell));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::test_state;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;

    #[rstest]
    #[case("/admin")]
    #[case("/admin/leads")]
    #[case("/admin/login")]
    #[case("/admin/")]
    #[case("/admin/login/")]
    #[case("/admin/leads/")]
    #[actix_web::test]
    async fn pages_serve_the_shell(#[case] uri: &str) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .service(web::scope("/admin").configure(configure)),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers().get("X-Robots-Tag").and_then(|v| v.to_str().ok()),
            Some("noindex, nofollow")
        );
        let body = test::read_body(res).await;
        assert!(std::str::from_utf8(&body).is_ok_and(|html| html.contains("<div id=\"root\">")));
    }
}
