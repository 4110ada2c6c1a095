//! # pdf2img
//!
//! Rasterise the first page of a PDF into a PNG or JPEG at a target width.
//!
//! The caller supplies a base64 document, a pixel width and a format; the
//! library returns the compressed image, its base64 text form, and the
//! resolved pixel dimensions. The height is always derived from the page's
//! aspect ratio.
//!
//! ## Pipeline Overview
//!
//! ```text
//! base64 PDF
//!  │
//!  ├─ 1. Validate  base64, width > 0, format ∈ {png, jpeg}
//!  ├─ 2. Load      decode via pdfium, open page 1
//!  ├─ 3. Scale     scale = width / native width; height follows
//!  ├─ 4. Surface   allocate the RGBA render target
//!  ├─ 5. Render    paint the page, image smoothing off
//!  ├─ 6. Encode    PNG (fast, unfiltered) or JPEG (q100, 4:4:4)
//!  ├─ 7. Release   free the surface, on success and failure alike
//!  └─ 8. Assemble  bytes + base64 + width × height
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2img::{convert, ConversionConfig, ConversionRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pdf_base64 = std::fs::read_to_string("document.pdf.b64")?;
//!     let request = ConversionRequest::new(pdf_base64)
//!         .desired_width(1240.0)
//!         .image_format("png");
//!     let image = convert(&request, &ConversionConfig::default()).await?;
//!     println!("{}x{}, {} bytes", image.width, image.height, image.bytes.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Testing without pdfium
//!
//! [`Rasterizer`] is generic over [`engine::DocumentEngine`],
//! [`pipeline::surface::SurfaceFactory`] and
//! [`pipeline::encode::SurfaceEncoder`]. Supply a fake engine that returns
//! canned geometry and pixels to exercise the orchestration without a PDF
//! library.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2img` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod request;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, ImageFormat};
pub use convert::{convert, convert_sync, convert_to_file, inspect, write_image, Rasterizer};
pub use engine::{DocumentEngine, PageHandle, PageSize, PdfiumEngine, SourceDocument};
pub use error::{ErrorKind, Pdf2ImgError};
pub use output::{DocumentInfo, EncodedImage};
pub use pipeline::surface::{Surface, SurfaceState};
pub use pipeline::viewport::{compute_viewport, Viewport};
pub use request::ConversionRequest;
