//! Visual smoke test: sitemap-driven availability checks and screenshots.
//!
//! The page list comes from the deployed `/sitemap.xml` plus the admin login
//! page. Every page must answer 2xx; screenshots are captured at a desktop
//! and a mobile viewport by a headless Chromium.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use regex::Regex;
use reqwest::Url;
use thiserror::Error;
use tokio::process::Command;
use tracing::{info, warn};

/// Page always checked in addition to the sitemap.
pub const ADMIN_LOGIN_PATH: &str = "/admin/login";

static LOC_RE: OnceLock<Regex> = OnceLock::new();

fn loc_regex() -> &'static Regex {
    LOC_RE.get_or_init(|| {
        Regex::new(r"<loc>\s*([^<\s]+)\s*</loc>")
            .unwrap_or_else(|error| panic!("loc regex failed to compile: {error}"))
    })
}

/// Browser window size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Desktop then mobile.
pub const VIEWPORTS: [Viewport; 2] = [
    Viewport { name: "desktop", width: 1440, height: 900 },
    Viewport { name: "mobile", width: 390, height: 844 },
];

/// Errors that abort a smoke run.
#[derive(Debug, Error)]
pub enum SmokeError {
    #[error("invalid base URL {0:?}")]
    BaseUrl(String),
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("sitemap returned HTTP {0}")]
    SitemapStatus(u16),
    #[error("filesystem operation failed ({path}): {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("browser command '{command}' failed to start: {message}")]
    BrowserUnavailable { command: String, message: String },
    #[error("browser command '{command}' failed (status {status:?}): {stderr}")]
    BrowserFailed {
        command: String,
        status: Option<i32>,
        stderr: String,
    },
}

/// One screenshot to capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shot {
    pub url: Url,
    pub viewport: Viewport,
    pub output: PathBuf,
}

/// Captures screenshots.
#[async_trait]
pub trait Screenshotter: Send + Sync {
    async fn capture(&self, shot: &Shot) -> Result<(), SmokeError>;
}

/// Screenshotter backed by a Chromium-compatible CLI.
#[derive(Debug, Clone)]
pub struct ChromiumScreenshotter {
    program: OsString,
}

impl ChromiumScreenshotter {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for ChromiumScreenshotter {
    fn default() -> Self {
        Self::new("chromium")
    }
}

#[async_trait]
impl Screenshotter for ChromiumScreenshotter {
    async fn capture(&self, shot: &Shot) -> Result<(), SmokeError> {
        let command = self.program.to_string_lossy().into_owned();
        let mut screenshot_arg = OsString::from("--screenshot=");
        screenshot_arg.push(shot.output.as_os_str());
        let output = Command::new(&self.program)
            .arg("--headless")
            .arg("--disable-gpu")
            .arg("--hide-scrollbars")
            .arg(format!(
                "--window-size={},{}",
                shot.viewport.width, shot.viewport.height
            ))
            .arg(screenshot_arg)
            .arg(shot.url.as_str())
            .output()
            .await
            .map_err(|err| SmokeError::BrowserUnavailable {
                command: command.clone(),
                message: err.to_string(),
            })?;
        if output.status.success() {
            return Ok(());
        }
        Err(SmokeError::BrowserFailed {
            command,
            status: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        })
    }
}

/// Paths listed in a sitemap document, in document order.
///
/// # Examples
/// ```
/// use site_backend::tooling::smoke::sitemap_paths;
///
/// let xml = "<urlset><url><loc>https://ride.example/</loc></url>\
///            <url><loc>https://ride.example/models/volt-s1</loc></url></urlset>";
/// assert_eq!(sitemap_paths(xml), vec!["/", "/models/volt-s1"]);
/// ```
#[must_use]
pub fn sitemap_paths(xml: &str) -> Vec<String> {
    loc_regex()
        .captures_iter(xml)
        .filter_map(|caps| Url::parse(&caps[1].replace("&amp;", "&")).ok())
        .map(|url| match url.query() {
            Some(query) => format!("{}?{query}", url.path()),
            None => url.path().to_owned(),
        })
        .collect()
}

/// Sitemap pages plus the admin login page, without duplicates.
#[must_use]
pub fn page_list(sitemap: Vec<String>) -> Vec<String> {
    let mut pages: Vec<String> = Vec::with_capacity(sitemap.len() + 1);
    for path in sitemap.into_iter().chain([ADMIN_LOGIN_PATH.to_owned()]) {
        if !pages.contains(&path) {
            pages.push(path);
        }
    }
    pages
}

/// File stem for a page: `/` becomes `home`, separators become dashes.
#[must_use]
pub fn page_slug(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return "home".to_owned();
    }
    trimmed
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect()
}

fn join(base: &Url, path: &str) -> Result<Url, SmokeError> {
    base.join(path.trim_start_matches('/'))
        .map_err(|_| SmokeError::BaseUrl(base.to_string()))
}

/// Every page at every viewport.
pub fn plan_shots(base: &Url, pages: &[String], out_dir: &Path) -> Result<Vec<Shot>, SmokeError> {
    let mut shots = Vec::with_capacity(pages.len() * VIEWPORTS.len());
    for page in pages {
        let url = join(base, page)?;
        for viewport in VIEWPORTS {
            shots.push(Shot {
                url: url.clone(),
                viewport,
                output: out_dir.join(format!("{}-{}.png", page_slug(page), viewport.name)),
            });
        }
    }
    Ok(shots)
}

/// Outcome of one availability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCheck {
    pub path: String,
    pub status: Option<u16>,
    pub error: Option<String>,
}

impl PageCheck {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status.is_some_and(|status| (200..300).contains(&status))
    }
}

/// Run options.
#[derive(Debug, Clone)]
pub struct SmokeOptions {
    pub base_url: String,
    pub out_dir: PathBuf,
    pub screenshots: bool,
}

/// Results of a run.
#[derive(Debug, Default)]
pub struct SmokeReport {
    pub checks: Vec<PageCheck>,
    pub screenshots: Vec<PathBuf>,
    pub screenshot_failures: Vec<String>,
}

impl SmokeReport {
    /// Whether every check and screenshot succeeded.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.checks.iter().all(PageCheck::passed) && self.screenshot_failures.is_empty()
    }
}

fn parse_base(raw: &str) -> Result<Url, SmokeError> {
    let with_slash = if raw.ends_with('/') {
        raw.to_owned()
    } else {
        format!("{raw}/")
    };
    Url::parse(&with_slash).map_err(|_| SmokeError::BaseUrl(raw.to_owned()))
}

async fn fetch_sitemap(client: &reqwest::Client, base: &Url) -> Result<String, SmokeError> {
    let url = join(base, "/sitemap.xml")?;
    let http = |source| SmokeError::Http {
        url: url.to_string(),
        source,
    };
    let response = client.get(url.clone()).send().await.map_err(http)?;
    if !response.status().is_success() {
        return Err(SmokeError::SitemapStatus(response.status().as_u16()));
    }
    response.text().await.map_err(http)
}

async fn check_page(client: &reqwest::Client, base: &Url, path: &str) -> Result<PageCheck, SmokeError> {
    let url = join(base, path)?;
    let check = match client.get(url).send().await {
        Ok(response) => PageCheck {
            path: path.to_owned(),
            status: Some(response.status().as_u16()),
            error: None,
        },
        Err(err) => PageCheck {
            path: path.to_owned(),
            status: None,
            error: Some(err.to_string()),
        },
    };
    if check.passed() {
        info!(path, status = ?check.status, "page ok");
    } else {
        warn!(path, status = ?check.status, error = ?check.error, "page check failed");
    }
    Ok(check)
}

/// Fetch the sitemap, check each page, then capture screenshots unless
/// `options.screenshots` is off. Failed checks are reported, not raised.
pub async fn run_smoke(
    client: &reqwest::Client,
    options: &SmokeOptions,
    screenshotter: &dyn Screenshotter,
) -> Result<SmokeReport, SmokeError> {
    let base = parse_base(&options.base_url)?;
    let pages = page_list(sitemap_paths(&fetch_sitemap(client, &base).await?));
    let mut report = SmokeReport::default();
    for page in &pages {
        report.checks.push(check_page(client, &base, page).await?);
    }
    if !options.screenshots {
        return Ok(report);
    }
    Dir::create_ambient_dir_all(&options.out_dir, ambient_authority()).map_err(|source| SmokeError::Io {
        path: options.out_dir.clone(),
        source,
    })?;
    for shot in plan_shots(&base, &pages, &options.out_dir)? {
        match screenshotter.capture(&shot).await {
            Ok(()) => report.screenshots.push(shot.output),
            Err(err) => {
                warn!(url = %shot.url, viewport = shot.viewport.name, error = %err, "screenshot failed");
                report.screenshot_failures.push(format!("{} ({}): {err}", shot.url, shot.viewport.name));
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use rstest::rstest;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Recorder {
        shots: Mutex<Vec<Shot>>,
    }

    #[async_trait]
    impl Screenshotter for Recorder {
        async fn capture(&self, shot: &Shot) -> Result<(), SmokeError> {
            self.shots.lock().expect("lock").push(shot.clone());
            Ok(())
        }
    }

    fn sitemap(base: &str, paths: &[&str]) -> String {
        let urls: String = paths
            .iter()
            .map(|path| format!("<url><loc>{base}{path}</loc><priority>0.5</priority></url>"))
            .collect();
        format!(r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{urls}</urlset>"#)
    }

    #[rstest]
    #[case("/", "home")]
    #[case("/models/volt-s1", "models-volt-s1")]
    #[case("/blog/Winter_Riding/", "blog-winter-riding")]
    fn slugs(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(page_slug(path), expected);
    }

    #[rstest]
    fn admin_login_is_appended_once() {
        let pages = page_list(vec!["/".into(), ADMIN_LOGIN_PATH.into()]);
        assert_eq!(pages, vec!["/".to_owned(), ADMIN_LOGIN_PATH.to_owned()]);
        assert_eq!(page_list(vec!["/".into()]).last().map(String::as_str), Some(ADMIN_LOGIN_PATH));
    }

    #[rstest]
    fn shots_cover_both_viewports() {
        let base = Url::parse("https://ride.example/").expect("url");
        let shots = plan_shots(&base, &["/".to_owned(), "/dealers".to_owned()], Path::new("out")).expect("plan");
        assert_eq!(shots.len(), 4);
        assert_eq!(shots[1].output, PathBuf::from("out/home-mobile.png"));
        assert_eq!((shots[1].viewport.width, shots[1].viewport.height), (390, 844));
        assert_eq!(shots[2].url.as_str(), "https://ride.example/dealers");
    }

    #[rstest]
    #[tokio::test]
    async fn failing_pages_fail_the_run() {
        let server = MockServer::start_async().await;
        let base = server.base_url();
        server
            .mock_async(|when, then| {
                when.method(GET).path("/sitemap.xml");
                then.status(200).body(sitemap(&base, &["/", "/dealers"]));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/");
                then.status(200).body("<html></html>");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/dealers");
                then.status(500);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(ADMIN_LOGIN_PATH);
                then.status(200);
            })
            .await;

        let out = TempDir::new().expect("tempdir");
        let recorder = Recorder::default();
        let report = run_smoke(
            &reqwest::Client::new(),
            &SmokeOptions {
                base_url: base.clone(),
                out_dir: out.path().join("shots"),
                screenshots: true,
            },
            &recorder,
        )
        .await
        .expect("run");

        assert!(!report.passed());
        let failed: Vec<&str> = report
            .checks
            .iter()
            .filter(|check| !check.passed())
            .map(|check| check.path.as_str())
            .collect();
        assert_eq!(failed, vec!["/dealers"]);
        assert_eq!(recorder.shots.lock().expect("lock").len(), 6);
        assert!(out.path().join("shots").is_dir());
    }

    #[rstest]
    #[tokio::test]
    async fn missing_sitemap_aborts() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/sitemap.xml");
                then.status(404);
            })
            .await;
        let err = run_smoke(
            &reqwest::Client::new(),
            &SmokeOptions {
                base_url: server.base_url(),
                out_dir: PathBuf::from("unused"),
                screenshots: false,
            },
            &Recorder::default(),
        )
        .await
        .expect_err("404 sitemap");
        assert!(matches!(err, SmokeError::SitemapStatus(404)));
    }
}
