//! Favicon set generation from one square source image.
//!
//! Produces the PNG sizes browsers and home-screen launchers ask for, a
//! 32 px `favicon.ico` and a `site.webmanifest` that references the
//! Android icons.

use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageOutputFormat};
use serde::Serialize;
use thiserror::Error;

/// Smallest accepted source edge, in pixels.
pub const MIN_SOURCE_SIZE: u32 = 512;
/// Manifest theme colour used when none is given.
pub const DEFAULT_THEME_COLOR: &str = "#111827";
const ICO_SIZE: u32 = 32;
const ICO_FILE: &str = "favicon.ico";
const MANIFEST_FILE: &str = "site.webmanifest";

/// One PNG output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconSpec {
    pub file: &'static str,
    pub size: u32,
}

/// PNG outputs, smallest first.
pub const PNG_ICONS: [IconSpec; 6] = [
    IconSpec { file: "favicon-16x16.png", size: 16 },
    IconSpec { file: "favicon-32x32.png", size: 32 },
    IconSpec { file: "favicon-48x48.png", size: 48 },
    IconSpec { file: "apple-touch-icon.png", size: 180 },
    IconSpec { file: "android-chrome-192x192.png", size: 192 },
    IconSpec { file: "android-chrome-512x512.png", size: 512 },
];

/// What to generate and where.
#[derive(Debug, Clone)]
pub struct FaviconRequest {
    pub source: PathBuf,
    pub out_dir: PathBuf,
    pub site_name: String,
    pub theme_color: String,
}

/// Errors surfaced by favicon generation.
#[derive(Debug, Error)]
pub enum FaviconError {
    #[error("filesystem operation failed ({path}): {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("source image could not be decoded: {0}")]
    Decode(#[source] image::ImageError),
    #[error("source image must be square, got {width}x{height}")]
    NotSquare { width: u32, height: u32 },
    #[error("source image is {size}px; at least {MIN_SOURCE_SIZE}px is required")]
    TooSmall { size: u32 },
    #[error("failed to encode {file}: {source}")]
    Encode {
        file: &'static str,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to serialise the web manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

impl FaviconError {
    fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(Serialize)]
struct ManifestIcon {
    src: String,
    sizes: String,
    #[serde(rename = "type")]
    mime: &'static str,
}

#[derive(Serialize)]
struct WebManifest<'a> {
    name: &'a str,
    short_name: &'a str,
    icons: Vec<ManifestIcon>,
    theme_color: &'a str,
    background_color: &'a str,
    display: &'static str,
}

/// Check the source is square and large enough.
pub fn validate_source(image: &DynamicImage) -> Result<(), FaviconError> {
    let (width, height) = image.dimensions();
    if width != height {
        return Err(FaviconError::NotSquare { width, height });
    }
    if width < MIN_SOURCE_SIZE {
        return Err(FaviconError::TooSmall { size: width });
    }
    Ok(())
}

fn encode(image: &DynamicImage, size: u32, file: &'static str, format: ImageOutputFormat) -> Result<Vec<u8>, FaviconError> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .resize_exact(size, size, FilterType::Lanczos3)
        .write_to(&mut buffer, format)
        .map_err(|source| FaviconError::Encode { file, source })?;
    Ok(buffer.into_inner())
}

/// Render the manifest JSON.
pub fn web_manifest(site_name: &str, theme_color: &str) -> Result<String, FaviconError> {
    let icons = PNG_ICONS
        .iter()
        .filter(|icon| icon.file.starts_with("android-chrome"))
        .map(|icon| ManifestIcon {
            src: format!("/{}", icon.file),
            sizes: format!("{0}x{0}", icon.size),
            mime: "image/png",
        })
        .collect();
    let manifest = WebManifest {
        name: site_name,
        short_name: site_name,
        icons,
        theme_color,
        background_color: "#ffffff",
        display: "standalone",
    };
    Ok(serde_json::to_string_pretty(&manifest)?)
}

fn read_source(path: &Path) -> Result<Vec<u8>, FaviconError> {
    let parent = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .ok_or_else(|| FaviconError::io(path, io::Error::new(io::ErrorKind::InvalidInput, "not a file")))?;
    Dir::open_ambient_dir(parent, ambient_authority())
        .and_then(|dir| dir.read(name))
        .map_err(|err| FaviconError::io(path, err))
}

/// Generate every icon and the manifest into `request.out_dir`.
///
/// Returns the written paths in generation order.
///
/// # Examples
/// ```no_run
/// use site_backend::tooling::favicon::{DEFAULT_THEME_COLOR, FaviconRequest, generate_favicons};
///
/// let written = generate_favicons(&FaviconRequest {
///     source: "brand/logo.png".into(),
///     out_dir: "public".into(),
///     site_name: "Volt Electric".into(),
///     theme_color: DEFAULT_THEME_COLOR.into(),
/// })?;
/// assert_eq!(written.len(), 8);
/// # Ok::<(), site_backend::tooling::favicon::FaviconError>(())
/// ```
pub fn generate_favicons(request: &FaviconRequest) -> Result<Vec<PathBuf>, FaviconError> {
    let bytes = read_source(&request.source)?;
    let source = image::load_from_memory(&bytes).map_err(FaviconError::Decode)?;
    validate_source(&source)?;

    Dir::create_ambient_dir_all(&request.out_dir, ambient_authority())
        .map_err(|err| FaviconError::io(&request.out_dir, err))?;
    let out = Dir::open_ambient_dir(&request.out_dir, ambient_authority())
        .map_err(|err| FaviconError::io(&request.out_dir, err))?;

    let mut outputs: Vec<(&'static str, Vec<u8>)> = Vec::with_capacity(PNG_ICONS.len() + 2);
    for icon in PNG_ICONS {
        outputs.push((icon.file, encode(&source, icon.size, icon.file, ImageOutputFormat::Png)?));
    }
    outputs.push((ICO_FILE, encode(&source, ICO_SIZE, ICO_FILE, ImageOutputFormat::Ico)?));
    outputs.push((
        MANIFEST_FILE,
        web_manifest(&request.site_name, &request.theme_color)?.into_bytes(),
    ));

    let mut written = Vec::with_capacity(outputs.len());
    for (file, data) in outputs {
        let path = request.out_dir.join(file);
        out.write(file, &data).map_err(|err| FaviconError::io(&path, err))?;
        written.push(path);
    }
    Ok(written)
}
