//! PDFium-backed document engine.
//!
//! ## Binding
//!
//! `pdfium-render` loads the pdfium shared library at runtime. The library
//! is located once, when the engine is built, in this order:
//!
//! 1. [`ConversionConfig::pdfium_library_path`] (file or directory)
//! 2. the `PDFIUM_LIB_PATH` environment variable
//! 3. the platform library name in the working directory
//! 4. the system library search path
//!
//! ## Threading
//!
//! pdfium keeps thread-local state and is not async-safe. Callers run the
//! whole engine on a blocking thread (see [`crate::convert::convert`]), and
//! each conversion binds its own engine.

use super::{DocumentEngine, PageHandle, PageSize, SourceDocument};
use crate::config::ConversionConfig;
use crate::error::Pdf2ImgError;
use crate::pipeline::surface::Surface;
use crate::pipeline::viewport::Viewport;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming an existing pdfium library.
pub const LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// The PDF header may be preceded by up to 1 KiB of junk.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// A bound pdfium library plus the per-process document settings.
pub struct PdfiumEngine {
    pdfium: Pdfium,
    password: Option<String>,
}

impl PdfiumEngine {
    /// Bind to pdfium using the library location and password in `config`.
    pub fn bind(config: &ConversionConfig) -> Result<Self, Pdf2ImgError> {
        let pdfium = bind_library(config.pdfium_library_path.as_deref())?;
        Ok(Self {
            pdfium,
            password: config.password.clone(),
        })
    }
}

impl DocumentEngine for PdfiumEngine {
    fn load(&self, bytes: Vec<u8>) -> Result<Box<dyn SourceDocument + '_>, Pdf2ImgError> {
        if !has_pdf_header(&bytes) {
            let magic: Vec<u8> = bytes.iter().take(4).copied().collect();
            warn!("Rejected payload without a PDF header ({} bytes)", bytes.len());
            return Err(Pdf2ImgError::DocumentLoad {
                detail: format!("payload is not a PDF (first bytes: {magic:?})"),
            });
        }

        let document = self
            .pdfium
            .load_pdf_from_byte_vec(bytes, self.password.as_deref())
            .map_err(|e| load_error(format!("{:?}", e), self.password.is_some()))?;

        info!("PDF loaded: {} pages", document.pages().len());
        Ok(Box::new(PdfiumDocument { document }))
    }
}

struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

impl SourceDocument for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page(&self, index: usize) -> Result<Box<dyn PageHandle + '_>, Pdf2ImgError> {
        let total = self.page_count();
        if index >= total {
            return Err(Pdf2ImgError::PageNotFound { index, total });
        }

        let page = self
            .document
            .pages()
            .get(index as u16)
            .map_err(|e| Pdf2ImgError::DocumentLoad {
                detail: format!("cannot open page {}: {:?}", index + 1, e),
            })?;

        Ok(Box::new(PdfiumPage { page }))
    }
}

struct PdfiumPage<'a> {
    page: PdfPage<'a>,
}

impl PageHandle for PdfiumPage<'_> {
    fn native_size(&self) -> PageSize {
        PageSize {
            width: f64::from(self.page.width().value),
            height: f64::from(self.page.height().value),
        }
    }

    fn render_into(&self, surface: &mut Surface, viewport: &Viewport) -> Result<(), Pdf2ImgError> {
        // pdfium scales each axis to its target independently, so the floored
        // remainder is absorbed as a sub-pixel stretch rather than cropped.
        let render_config = PdfRenderConfig::new()
            .set_target_width(to_pixels(viewport.pixel_width)?)
            .set_target_height(to_pixels(viewport.pixel_height)?)
            .set_image_smoothing(surface.image_smoothing());

        let bitmap = self
            .page
            .render_with_config(&render_config)
            .map_err(|e| Pdf2ImgError::Render {
                detail: format!("{:?}", e),
            })?;

        let raster = bitmap.as_image().to_rgba8();
        debug!(
            "pdfium painted {}x{} px (smoothing={})",
            raster.width(),
            raster.height(),
            surface.image_smoothing()
        );

        surface.draw(raster)
    }
}

fn to_pixels(value: u32) -> Result<i32, Pdf2ImgError> {
    i32::try_from(value).map_err(|_| Pdf2ImgError::Render {
        detail: format!("dimension {value} px exceeds pdfium's limit"),
    })
}

fn has_pdf_header(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(HEADER_SEARCH_WINDOW)];
    window.windows(4).any(|w| w == b"%PDF")
}

fn load_error(detail: String, password_supplied: bool) -> Pdf2ImgError {
    let detail = if detail.contains("Password") || detail.contains("password") {
        if password_supplied {
            format!("wrong password ({detail})")
        } else {
            format!("document is encrypted and requires a password ({detail})")
        }
    } else {
        detail
    };
    Pdf2ImgError::DocumentLoad { detail }
}

// ── Library binding ──────────────────────────────────────────────────────────

fn bind_library(configured: Option<&Path>) -> Result<Pdfium, Pdf2ImgError> {
    if let Some(path) = configured {
        return bind_at(path);
    }

    if let Ok(env_path) = std::env::var(LIB_PATH_ENV) {
        let p = PathBuf::from(env_path);
        if p.exists() {
            return bind_at(&p);
        }
        warn!(
            "{} '{}' not found; trying the working directory and system library",
            LIB_PATH_ENV,
            p.display()
        );
    }

    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map(Pdfium::new)
        .map_err(|e| Pdf2ImgError::PdfiumBindingFailed(format!("{:?}", e)))
}

fn bind_at(path: &Path) -> Result<Pdfium, Pdf2ImgError> {
    let lib_path = library_file(path);
    debug!("Binding pdfium from {}", lib_path.display());
    Pdfium::bind_to_library(&lib_path)
        .map(Pdfium::new)
        .map_err(|e| {
            Pdf2ImgError::PdfiumBindingFailed(format!("'{}': {:?}", lib_path.display(), e))
        })
}

/// A directory resolves to the platform library name inside it.
fn library_file(path: &Path) -> PathBuf {
    if path.is_dir() {
        Pdfium::pdfium_platform_library_name_at_path(path)
    } else {
        path.to_path_buf()
    }
}
