//! Check every sitemap page of a deployment and capture screenshots.
//!
//! # Examples
//! ```sh
//! cargo run --bin site-smoke -- --base-url https://staging.ride.example --out-dir screenshots
//! ```
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use site_backend::tooling::smoke::{ChromiumScreenshotter, SmokeOptions, run_smoke};
use tokio::runtime::Builder;
use tracing_subscriber::{EnvFilter, fmt};

/// `site-smoke` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "site-smoke",
    about = "Verify sitemap pages answer 2xx and capture desktop and mobile screenshots",
    version
)]
struct CliArgs {
    /// Deployment origin, e.g. `https://staging.ride.example`.
    #[arg(long = "base-url", value_name = "url")]
    base_url: String,
    /// Screenshot directory.
    #[arg(long = "out-dir", value_name = "dir", default_value = "screenshots")]
    out_dir: PathBuf,
    /// Chromium-compatible browser binary.
    #[arg(long, value_name = "path", default_value = "chromium")]
    browser: PathBuf,
    /// Only run the availability checks.
    #[arg(long = "skip-screenshots")]
    skip_screenshots: bool,
}

fn main() -> io::Result<ExitCode> {
    let _ = fmt().with_env_filter(EnvFilter::from_default_env()).try_init();
    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main(args))
}

async fn async_main(args: CliArgs) -> io::Result<ExitCode> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(io::Error::other)?;
    let screenshotter = ChromiumScreenshotter::new(args.browser);
    let report = run_smoke(
        &client,
        &SmokeOptions {
            base_url: args.base_url,
            out_dir: args.out_dir,
            screenshots: !args.skip_screenshots,
        },
        &screenshotter,
    )
    .await
    .map_err(|error| io::Error::other(format!("smoke run: {error}")))?;

    for check in &report.checks {
        let status = check
            .status
            .map_or_else(|| "error".to_owned(), |status| status.to_string());
        let mark = if check.passed() { "ok  " } else { "FAIL" };
        println!("{mark} {status:>5} {}", check.path);
    }
    for path in &report.screenshots {
        println!("shot {}", path.display());
    }
    for failure in &report.screenshot_failures {
        println!("FAIL screenshot {failure}");
    }
    Ok(if report.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
