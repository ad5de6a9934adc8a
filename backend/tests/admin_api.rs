//! Admin JSON API: authentication, allow-list, listings and export.

// Shared doubles include helpers other suites use.
#[allow(dead_code)]
mod support;

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::http::{StatusCode, header};
use actix_web::test;
use rstest::rstest;
use serde_json::{Value, json};
use site_backend::inbound::http::session_config::SESSION_COOKIE;
use site_backend::inbound::http::state::HttpStatePorts;

use support::{GOOD_PASSWORD, RecordingLeads, StubAuth, sample_lead, state};

fn ports(leads: Arc<RecordingLeads>) -> HttpStatePorts {
    HttpStatePorts {
        leads,
        auth: Arc::new(StubAuth),
        ..HttpStatePorts::default()
    }
}

fn login(email: &str, password: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/admin/login")
        .set_json(json!({ "email": email, "password": password }))
}

fn session_cookie<B>(res: &actix_web::dev::ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .expect("session cookie")
        .into_owned()
}

#[rstest]
#[case("/api/admin/session")]
#[case("/api/admin/leads")]
#[case("/api/admin/leads/export")]
#[case("/api/admin/bookings")]
#[case("/api/admin/products")]
#[case("/api/admin/stats")]
#[actix_web::test]
async fn anonymous_requests_are_rejected(#[case] uri: &str) {
    let app = site_app!(state(HttpStatePorts::default(), ""));
    let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "unauthorized");
}

#[rstest]
#[case("ops@example.com", GOOD_PASSWORD, StatusCode::OK)]
#[case("ops@example.com", "nope", StatusCode::UNAUTHORIZED)]
#[case("intern@example.com", GOOD_PASSWORD, StatusCode::FORBIDDEN)]
#[actix_web::test]
async fn sign_in_honours_the_allow_list(
    #[case] email: &str,
    #[case] password: &str,
    #[case] expected: StatusCode,
) {
    let app = site_app!(state(ports(Arc::default()), "ops@example.com"));
    let res = test::call_service(&app, login(email, password).to_request()).await;
    assert_eq!(res.status(), expected);
    let issued = res
        .response()
        .cookies()
        .any(|cookie| cookie.name() == SESSION_COOKIE && !cookie.value().is_empty());
    assert_eq!(issued, expected == StatusCode::OK);
}

#[actix_web::test]
async fn signed_in_admin_reads_leads_with_their_own_token() {
    let leads = Arc::new(RecordingLeads::with_stored(vec![sample_lead()]));
    let app = site_app!(state(ports(leads.clone()), ""));
    let res = test::call_service(&app, login("ops@example.com", GOOD_PASSWORD).to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = session_cookie(&res);
    assert!(cookie.http_only().unwrap_or(false));

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/admin/leads?status=new&perPage=10")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get(header::CACHE_CONTROL).and_then(|v| v.to_str().ok()),
        Some("private, no-store")
    );
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["perPage"], 10);
    assert_eq!(body["items"][0]["email"], "asha@example.com");
    assert_eq!(
        leads.tokens.lock().expect("lock").as_slice(),
        ["access-token".to_owned()]
    );

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/admin/leads?perPage=500")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn export_is_a_neutralised_csv_attachment() {
    let leads = Arc::new(RecordingLeads::with_stored(vec![sample_lead()]));
    let app = site_app!(state(ports(leads), ""));
    let res = test::call_service(&app, login("ops@example.com", GOOD_PASSWORD).to_request()).await;
    let cookie = session_cookie(&res);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/admin/leads/export")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let disposition = res
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    assert!(disposition.starts_with("attachment"), "{disposition}");
    assert!(disposition.contains(".csv"));
    let body = test::read_body(res).await;
    let csv = std::str::from_utf8(&body).expect("utf8");
    assert!(csv.contains("asha@example.com"));
    assert!(csv.contains("'=HYPERLINK"));
}

#[actix_web::test]
async fn patching_an_unknown_lead_is_404() {
    let app = site_app!(state(ports(Arc::default()), ""));
    let res = test::call_service(&app, login("ops@example.com", GOOD_PASSWORD).to_request()).await;
    let cookie = session_cookie(&res);
    let res = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri("/api/admin/leads/6f1c1b9e-2d1e-4c55-9a8f-5b8a1d0c2e11")
            .cookie(cookie)
            .set_json(json!({ "status": "contacted" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn logout_clears_the_session() {
    let app = site_app!(state(ports(Arc::default()), ""));
    let res = test::call_service(&app, login("ops@example.com", GOOD_PASSWORD).to_request()).await;
    let cookie = session_cookie(&res);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/admin/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let cleared = session_cookie(&res);
    assert_eq!(cleared.value(), "");
}
