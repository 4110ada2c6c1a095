//! Configuration types for PDF-to-image conversion.
//!
//! Two kinds of settings exist and they live in different places:
//!
//! * **Per-request inputs** — target width and image format — travel with
//!   each [`crate::request::ConversionRequest`].
//! * **Process-wide setup** — where the pdfium library lives, the document
//!   password, the pixel budget — is collected once in [`ConversionConfig`]
//!   and handed to the engine at construction. Nothing is read from ambient
//!   globals during a conversion.

use crate::error::Pdf2ImgError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Target width used when a request does not specify one.
pub const DEFAULT_WIDTH: f64 = 1240.0;

/// Default upper bound on `width × height` of a single surface.
///
/// 100 megapixels of RGBA is 400 MB of backing store.
pub const DEFAULT_MAX_SURFACE_PIXELS: u64 = 100_000_000;

/// Process-wide configuration for the conversion engine.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2img::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .pdfium_library_path("/opt/pdfium/lib")
///     .max_surface_pixels(50_000_000)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Location of the pdfium shared library: either the library file or the
    /// directory containing it. If None, `PDFIUM_LIB_PATH`, the working
    /// directory and the system library path are tried in that order.
    pub pdfium_library_path: Option<PathBuf>,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Maximum pixel area of a rendered surface. Default: 100 000 000.
    ///
    /// Requests whose viewport exceeds this are rejected with
    /// `InvalidArgument` before any backing store is allocated.
    pub max_surface_pixels: u64,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            pdfium_library_path: None,
            password: None,
            max_surface_pixels: DEFAULT_MAX_SURFACE_PIXELS,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("pdfium_library_path", &self.pdfium_library_path)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("max_surface_pixels", &self.max_surface_pixels)
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn pdfium_library_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_library_path = Some(path.into());
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn max_surface_pixels(mut self, px: u64) -> Self {
        self.config.max_surface_pixels = px;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2ImgError> {
        let c = &self.config;
        if c.max_surface_pixels == 0 {
            return Err(Pdf2ImgError::invalid_argument(
                "max_surface_pixels must be ≥ 1",
            ));
        }
        if let Some(ref p) = c.pdfium_library_path {
            if p.as_os_str().is_empty() {
                return Err(Pdf2ImgError::invalid_argument(
                    "pdfium_library_path must not be empty",
                ));
            }
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Output image format.
///
/// Only the exact lowercase names `"png"` and `"jpeg"` parse; anything else
/// (including `"jpg"`) is an `InvalidArgument`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Lossless, fast-compressed, unfiltered. (default)
    #[default]
    Png,
    /// Maximum quality, no chroma subsampling.
    Jpeg,
}

impl ImageFormat {
    /// The wire name accepted by [`ImageFormat::from_str`].
    pub fn as_str(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }

    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageFormat {
    type Err = Pdf2ImgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "png" => Ok(ImageFormat::Png),
            "jpeg" => Ok(ImageFormat::Jpeg),
            other => Err(Pdf2ImgError::invalid_argument(format!(
                "unsupported image format {other:?}; allowed values are \"png\", \"jpeg\""
            ))),
        }
    }
}
