//! Error type for the pdf2img library.
//!
//! Every failure is fatal for the conversion that raised it. Nothing is
//! retried or recovered internally: the caller receives the specific
//! condition and decides whether to log, abort, or report upstream.
//!
//! The variants fall into three groups:
//!
//! * **Input** — [`Pdf2ImgError::InvalidArgument`], detected before any
//!   document is decoded or surface allocated.
//! * **Document** — [`Pdf2ImgError::DocumentLoad`],
//!   [`Pdf2ImgError::PageNotFound`], [`Pdf2ImgError::InvalidGeometry`],
//!   [`Pdf2ImgError::Render`]. Retrying with the same bytes cannot succeed.
//! * **Caller bugs** — [`Pdf2ImgError::Encode`] and
//!   [`Pdf2ImgError::UseAfterRelease`] signal an ordering mistake in code
//!   driving the surface lifecycle, not bad input data.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf2img library.
#[derive(Debug, Error)]
pub enum Pdf2ImgError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Caller-supplied input failed validation.
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    // ── Document errors ───────────────────────────────────────────────────
    /// The payload does not decode to a usable document.
    #[error("Failed to load document: {detail}")]
    DocumentLoad { detail: String },

    /// The requested page does not exist.
    #[error("Page index {index} not found (document has {total} pages)")]
    PageNotFound { index: usize, total: usize },

    /// The page reports non-positive or non-finite native dimensions.
    #[error("Page has invalid geometry {width}x{height}; the source document is malformed")]
    InvalidGeometry { width: f64, height: f64 },

    /// The engine could not paint the page.
    #[error("Rendering failed: {detail}")]
    Render { detail: String },

    // ── Surface lifecycle errors ──────────────────────────────────────────
    /// Encoding was attempted on a released or zero-sized surface.
    #[error("Encoding failed: {detail}")]
    Encode { detail: String },

    /// A lifecycle method was called on a released surface.
    #[error("Surface used after release ({operation})")]
    UseAfterRelease { operation: &'static str },

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
You can:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium (or pass --pdfium-lib).\n\
  • Place the platform pdfium library in the working directory.\n\
  • Install pdfium system-wide.\n\
Pre-built libraries: https://github.com/bblanchon/pdfium-binaries/releases\n"
    )]
    PdfiumBindingFailed(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output image file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Condition tag of a [`Pdf2ImgError`], for hosts that route on the
/// failure class without matching on payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    DocumentLoadError,
    PageNotFound,
    InvalidGeometry,
    RenderError,
    EncodeError,
    UseAfterRelease,
    Binding,
    Io,
    Internal,
}

impl Pdf2ImgError {
    /// Shorthand for [`Pdf2ImgError::InvalidArgument`].
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Pdf2ImgError::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// The condition tag of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Pdf2ImgError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Pdf2ImgError::DocumentLoad { .. } => ErrorKind::DocumentLoadError,
            Pdf2ImgError::PageNotFound { .. } => ErrorKind::PageNotFound,
            Pdf2ImgError::InvalidGeometry { .. } => ErrorKind::InvalidGeometry,
            Pdf2ImgError::Render { .. } => ErrorKind::RenderError,
            Pdf2ImgError::Encode { .. } => ErrorKind::EncodeError,
            Pdf2ImgError::UseAfterRelease { .. } => ErrorKind::UseAfterRelease,
            Pdf2ImgError::PdfiumBindingFailed(_) => ErrorKind::Binding,
            Pdf2ImgError::OutputWriteFailed { .. } => ErrorKind::Io,
            Pdf2ImgError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// `true` when the error points at a bug in the code driving the
    /// pipeline rather than at the input data.
    pub fn is_caller_bug(&self) -> bool {
        matches!(
            self,
            Pdf2ImgError::Encode { .. } | Pdf2ImgError::UseAfterRelease { .. }
        )
    }
}
