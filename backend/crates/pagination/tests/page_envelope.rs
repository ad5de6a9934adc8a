//! Behaviour of page request validation and page envelopes.

use pagination::{DEFAULT_PER_PAGE, MAX_PER_PAGE, Page, PageParams, PageRequest, PaginationError};
use rstest::rstest;
use url::Url;

#[rstest]
#[case(None, None, 1, DEFAULT_PER_PAGE)]
#[case(Some(3), None, 3, DEFAULT_PER_PAGE)]
#[case(Some(2), Some(MAX_PER_PAGE), 2, MAX_PER_PAGE)]
fn params_apply_defaults(
    #[case] page: Option<u32>,
    #[case] per_page: Option<u32>,
    #[case] expected_page: u32,
    #[case] expected_per_page: u32,
) {
    let request = PageParams { page, per_page }
        .validate()
        .expect("valid page params");
    assert_eq!(request.page(), expected_page);
    assert_eq!(request.per_page(), expected_per_page);
}

#[rstest]
#[case(0, 10, PaginationError::PageOutOfRange, "page")]
#[case(1, 0, PaginationError::PerPageOutOfRange, "perPage")]
#[case(1, MAX_PER_PAGE + 1, PaginationError::PerPageOutOfRange, "perPage")]
fn out_of_range_requests_are_rejected(
    #[case] page: u32,
    #[case] per_page: u32,
    #[case] expected: PaginationError,
    #[case] field: &str,
) {
    let error = PageRequest::new(page, per_page).expect_err("request should be rejected");
    assert_eq!(error, expected);
    assert_eq!(error.field(), field);
}

#[rstest]
#[case(1, 25, 0)]
#[case(3, 25, 50)]
#[case(4, 10, 30)]
fn offset_skips_previous_pages(#[case] page: u32, #[case] per_page: u32, #[case] offset: u64) {
    let request = PageRequest::new(page, per_page).expect("valid request");
    assert_eq!(request.offset(), offset);
    assert_eq!(request.limit(), u64::from(per_page));
}

#[rstest]
#[case(0, 0)]
#[case(1, 1)]
#[case(25, 1)]
#[case(26, 2)]
#[case(137, 6)]
fn total_pages_round_up(#[case] total: u64, #[case] pages: u64) {
    let page: Page<u8> = Page::new(Vec::new(), PageRequest::default(), total);
    assert_eq!(page.total_pages, pages);
}

#[rstest]
fn links_preserve_filters_and_replace_page() {
    let url = Url::parse("https://example.test/api/admin/leads?status=new&page=2&perPage=10")
        .expect("valid url");
    let request = PageRequest::new(2, 10).expect("valid request");
    let page = Page::new(vec![1_u8; 10], request, 35).with_links(&url);
    let links = page.links.expect("links attached");

    assert_eq!(
        links.self_,
        "https://example.test/api/admin/leads?status=new&page=2&perPage=10"
    );
    assert_eq!(
        links.next.as_deref(),
        Some("https://example.test/api/admin/leads?status=new&page=3&perPage=10")
    );
    assert_eq!(
        links.prev.as_deref(),
        Some("https://example.test/api/admin/leads?status=new&page=1&perPage=10")
    );
}

#[rstest]
fn last_page_has_no_next_link() {
    let url = Url::parse("https://example.test/list").expect("valid url");
    let request = PageRequest::new(4, 10).expect("valid request");
    let page = Page::new(vec![1_u8; 5], request, 35).with_links(&url);
    let links = page.links.expect("links attached");
    assert!(links.next.is_none());
    assert!(links.prev.is_some());
}

#[rstest]
fn envelope_serialises_camel_case() {
    let page = Page::new(vec!["a"], PageRequest::default(), 1).map(str::to_uppercase);
    let value = serde_json::to_value(&page).expect("serialise page");
    assert_eq!(value["items"][0], "A");
    assert_eq!(value["perPage"], 25);
    assert_eq!(value["totalPages"], 1);
    assert!(value.get("links").is_none());
}
