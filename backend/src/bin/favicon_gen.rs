//! Generate the favicon set and web manifest from a square source image.
//!
//! # Examples
//! ```sh
//! cargo run --bin favicon-gen -- --source brand/logo.png --out-dir public --name "Volt Electric"
//! ```
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;
use std::path::PathBuf;

use clap::Parser;
use site_backend::tooling::favicon::{DEFAULT_THEME_COLOR, FaviconRequest, generate_favicons};

/// `favicon-gen` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "favicon-gen",
    about = "Resize a square source image into favicons and a web manifest",
    version
)]
struct CliArgs {
    /// Square PNG (or other decodable image), at least 512 px.
    #[arg(long, value_name = "path")]
    source: PathBuf,
    /// Directory receiving the generated files.
    #[arg(long = "out-dir", value_name = "dir", default_value = "public")]
    out_dir: PathBuf,
    /// Name written to the manifest.
    #[arg(long, value_name = "site name", default_value = "Volt Electric")]
    name: String,
    /// Manifest theme colour.
    #[arg(long = "theme-color", value_name = "hex", default_value = DEFAULT_THEME_COLOR)]
    theme_color: String,
}

fn main() -> io::Result<()> {
    let args = CliArgs::parse();
    let written = generate_favicons(&FaviconRequest {
        source: args.source,
        out_dir: args.out_dir,
        site_name: args.name,
        theme_color: args.theme_color,
    })
    .map_err(|error| io::Error::other(format!("generate favicons: {error}")))?;
    for path in written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}
