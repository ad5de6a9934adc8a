//! Shared cache-control policies for HTTP handlers.

/// Catalogue and content reads may be cached briefly by browsers and CDNs.
pub const PUBLIC_SHORT_CACHE: &str = "public, max-age=300";

/// Crawler documents change rarely.
pub const PUBLIC_DAILY_CACHE: &str = "public, max-age=86400";

/// Admin responses carry customer data and must never be stored.
pub const PRIVATE_NO_STORE: &str = "private, no-store";

/// Header tuple for cacheable public reads.
pub const fn public_short_cache_header() -> (&'static str, &'static str) {
    ("Cache-Control", PUBLIC_SHORT_CACHE)
}

/// Header tuple for `robots.txt` and `sitemap.xml`.
pub const fn public_daily_cache_header() -> (&'static str, &'static str) {
    ("Cache-Control", PUBLIC_DAILY_CACHE)
}

/// Header tuple for admin responses.
pub const fn private_no_store_header() -> (&'static str, &'static str) {
    ("Cache-Control", PRIVATE_NO_STORE)
}
