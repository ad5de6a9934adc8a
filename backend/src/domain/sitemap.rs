//! Search-engine documents: `sitemap.xml` and `robots.txt`.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use url::Url;

use super::{BlogPostSummary, Slug};

/// Sitemap protocol namespace.
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// How often a page is expected to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFrequency {
    /// Several times a day.
    Daily,
    /// Roughly weekly.
    Weekly,
    /// Roughly monthly.
    Monthly,
    /// Rarely.
    Yearly,
}

impl ChangeFrequency {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

/// A public page that always exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticRoute {
    pub path: &'static str,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

const fn route(path: &'static str, change_frequency: ChangeFrequency, priority: f32) -> StaticRoute {
    StaticRoute {
        path,
        change_frequency,
        priority,
    }
}

/// Every static marketing page, in navigation order.
pub const STATIC_ROUTES: &[StaticRoute] = &[
    route("/", ChangeFrequency::Weekly, 1.0),
    route("/models", ChangeFrequency::Weekly, 0.9),
    route("/compare", ChangeFrequency::Monthly, 0.7),
    route("/dealers", ChangeFrequency::Monthly, 0.7),
    route("/book-test-ride", ChangeFrequency::Monthly, 0.8),
    route("/faq", ChangeFrequency::Monthly, 0.5),
    route("/blog", ChangeFrequency::Daily, 0.6),
    route("/about", ChangeFrequency::Yearly, 0.4),
    route("/contact", ChangeFrequency::Yearly, 0.5),
    route("/privacy", ChangeFrequency::Yearly, 0.2),
    route("/terms", ChangeFrequency::Yearly, 0.2),
];

/// One `<url>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub path: String,
    pub last_modified: Option<NaiveDate>,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

impl From<&StaticRoute> for SitemapEntry {
    fn from(route: &StaticRoute) -> Self {
        Self {
            path: route.path.to_owned(),
            last_modified: None,
            change_frequency: route.change_frequency,
            priority: route.priority,
        }
    }
}

/// Static pages followed by one entry per distinct product and post slug.
#[must_use]
pub fn sitemap_entries(product_slugs: &[Slug], posts: &[BlogPostSummary]) -> Vec<SitemapEntry> {
    let mut entries: Vec<SitemapEntry> = STATIC_ROUTES.iter().map(SitemapEntry::from).collect();

    let mut seen_products = BTreeSet::new();
    for slug in product_slugs {
        if seen_products.insert(slug) {
            entries.push(SitemapEntry {
                path: format!("/models/{slug}"),
                last_modified: None,
                change_frequency: ChangeFrequency::Weekly,
                priority: 0.8,
            });
        }
    }

    let mut seen_posts = BTreeSet::new();
    for post in posts {
        if seen_posts.insert(&post.slug) {
            entries.push(SitemapEntry {
                path: format!("/blog/{}", post.slug),
                last_modified: Some(post.published_at.date_naive()),
                change_frequency: ChangeFrequency::Monthly,
                priority: 0.6,
            });
        }
    }
    entries
}

/// Public origin of the marketing site, without a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteUrl(String);

/// Configured site URL is unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SiteUrlError {
    /// Not an absolute URL.
    #[error("site url is not a valid absolute URL: {0}")]
    Parse(String),
    /// Scheme other than http(s).
    #[error("site url must use http or https")]
    Scheme,
}

impl SiteUrl {
    /// Validate and normalise the public site URL.
    ///
    /// # Examples
    /// ```
    /// use site_backend::domain::SiteUrl;
    ///
    /// let site = SiteUrl::parse("https://rideelectric.example/").unwrap();
    /// assert_eq!(site.join("/models"), "https://rideelectric.example/models");
    /// ```
    pub fn parse(raw: &str) -> Result<Self, SiteUrlError> {
        let url = Url::parse(raw.trim()).map_err(|err| SiteUrlError::Parse(err.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SiteUrlError::Scheme);
        }
        Ok(Self(url.as_str().trim_end_matches('/').to_owned()))
    }

    /// Absolute URL for a site-relative path.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        format!("{}{path}", self.0)
    }
}

fn escape_xml(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Render `sitemap.xml`.
#[must_use]
pub fn render_sitemap(site: &SiteUrl, entries: &[SitemapEntry]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!("<urlset xmlns=\"{SITEMAP_NAMESPACE}\">\n"));
    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!(
            "    <loc>{}</loc>\n",
            escape_xml(&site.join(&entry.path))
        ));
        if let Some(date) = entry.last_modified {
            xml.push_str(&format!(
                "    <lastmod>{}</lastmod>\n",
                date.format("%Y-%m-%d")
            ));
        }
        xml.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            entry.change_frequency.as_str()
        ));
        xml.push_str(&format!("    <priority>{:.1}</priority>\n", entry.priority));
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Render `robots.txt`.
#[must_use]
pub fn render_robots(site: &SiteUrl) -> String {
    format!(
        "User-agent: *\nAllow: /\nDisallow: /admin\nDisallow: /api/\n\nSitemap: {}\n",
        site.join("/sitemap.xml")
    )
}
