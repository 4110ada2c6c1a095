//! Document engine abstraction.
//!
//! The pipeline never touches a concrete PDF library. It drives three
//! traits — [`DocumentEngine`], [`SourceDocument`] and [`PageHandle`] — so
//! orchestration can be exercised with fakes that hand back canned geometry
//! and pixels. [`pdfium::PdfiumEngine`] is the production implementation.
//!
//! Lifetimes follow ownership: a document borrows its engine and a page
//! borrows its document, so neither can outlive the conversion call that
//! opened them.

pub mod pdfium;

use crate::error::Pdf2ImgError;
use crate::pipeline::surface::Surface;
use crate::pipeline::viewport::Viewport;
use serde::Serialize;

pub use self::pdfium::PdfiumEngine;

/// Native page geometry in document units (PDF points) at scale 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

/// Decodes raw document bytes into a navigable document.
pub trait DocumentEngine {
    /// Decode `bytes`.
    ///
    /// Fails with `DocumentLoad` on malformed or unsupported payloads.
    fn load(&self, bytes: Vec<u8>) -> Result<Box<dyn SourceDocument + '_>, Pdf2ImgError>;
}

/// A decoded document.
pub trait SourceDocument {
    fn page_count(&self) -> usize;

    /// Open the page at 0-based `index`.
    ///
    /// Fails with `PageNotFound` when `index >= page_count()`.
    fn page(&self, index: usize) -> Result<Box<dyn PageHandle + '_>, Pdf2ImgError>;
}

/// One page of a [`SourceDocument`].
pub trait PageHandle {
    /// Native geometry at scale 1.0.
    fn native_size(&self) -> PageSize;

    /// Paint the page into `surface` at `viewport.scale`.
    ///
    /// `surface` is already `viewport.pixel_width × viewport.pixel_height`.
    /// Implementations honour [`Surface::image_smoothing`].
    fn render_into(&self, surface: &mut Surface, viewport: &Viewport) -> Result<(), Pdf2ImgError>;
}
