//! Conversion entry points.
//!
//! [`Rasterizer`] is the synchronous orchestration core, generic over the
//! document engine, surface factory and encoder so it runs unchanged against
//! pdfium in production and against fakes in tests.
//!
//! The free functions are the public API for the pdfium engine:
//!
//! * [`convert`] — async; validates on the calling task, then runs pdfium on
//!   a `spawn_blocking` thread
//! * [`convert_sync`] — the same on the current thread
//! * [`convert_to_file`] — convert, then write the image atomically
//! * [`inspect`] — page count and first-page geometry, no rendering

use crate::config::{ConversionConfig, DEFAULT_MAX_SURFACE_PIXELS};
use crate::engine::{DocumentEngine, PdfiumEngine};
use crate::error::Pdf2ImgError;
use crate::output::{DocumentInfo, EncodedImage};
use crate::pipeline::encode::{self, RasterEncoder, SurfaceEncoder};
use crate::pipeline::input::{self, ValidatedRequest};
use crate::pipeline::load::{self, FIRST_PAGE};
use crate::pipeline::surface::{RasterSurfaceFactory, SurfaceFactory};
use crate::pipeline::{assemble, render, viewport};
use crate::request::ConversionRequest;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Drives one page through load → viewport → surface → render → encode.
///
/// # Example
/// ```rust,no_run
/// use pdf2img::{ConversionConfig, ConversionRequest, PdfiumEngine, Rasterizer};
///
/// # fn main() -> Result<(), pdf2img::Pdf2ImgError> {
/// let engine = PdfiumEngine::bind(&ConversionConfig::default())?;
/// let rasterizer = Rasterizer::new(engine);
/// let image = rasterizer.convert(&ConversionRequest::new("JVBERi0xLjcK..."))?;
/// println!("{}x{}", image.width, image.height);
/// # Ok(())
/// # }
/// ```
pub struct Rasterizer<E, F = RasterSurfaceFactory, C = RasterEncoder> {
    engine: E,
    surfaces: F,
    encoder: C,
    max_surface_pixels: u64,
}

impl<E: DocumentEngine> Rasterizer<E> {
    /// A rasterizer with the default surface factory and encoder.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            surfaces: RasterSurfaceFactory,
            encoder: RasterEncoder,
            max_surface_pixels: DEFAULT_MAX_SURFACE_PIXELS,
        }
    }
}

impl<E, F, C> Rasterizer<E, F, C>
where
    E: DocumentEngine,
    F: SurfaceFactory,
    C: SurfaceEncoder,
{
    pub fn with_surface_factory<G: SurfaceFactory>(self, surfaces: G) -> Rasterizer<E, G, C> {
        Rasterizer {
            engine: self.engine,
            surfaces,
            encoder: self.encoder,
            max_surface_pixels: self.max_surface_pixels,
        }
    }

    pub fn with_encoder<D: SurfaceEncoder>(self, encoder: D) -> Rasterizer<E, F, D> {
        Rasterizer {
            engine: self.engine,
            surfaces: self.surfaces,
            encoder,
            max_surface_pixels: self.max_surface_pixels,
        }
    }

    pub fn max_surface_pixels(mut self, px: u64) -> Self {
        self.max_surface_pixels = px;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn surface_factory(&self) -> &F {
        &self.surfaces
    }

    /// Validate `request`, then rasterise it.
    pub fn convert(&self, request: &ConversionRequest) -> Result<EncodedImage, Pdf2ImgError> {
        let validated = input::validate(request)?;
        self.rasterize(validated)
    }

    /// Rasterise the first page of an already validated request.
    ///
    /// The surface, once created, is released exactly once whether
    /// rendering and encoding succeed or not.
    pub fn rasterize(&self, request: ValidatedRequest) -> Result<EncodedImage, Pdf2ImgError> {
        let ValidatedRequest {
            document,
            desired_width,
            format,
        } = request;

        let document = load::load_document(&self.engine, document)?;
        let page = load::open_page(document.as_ref(), FIRST_PAGE)?;

        let native = page.native_size();
        let viewport = viewport::compute_viewport(native.width, native.height, desired_width)?;
        viewport.ensure_within(self.max_surface_pixels)?;
        debug!(
            "Page {}x{} pt → {}x{} px (scale {:.4})",
            native.width, native.height, viewport.pixel_width, viewport.pixel_height, viewport.scale
        );

        let mut surface = self
            .surfaces
            .create(viewport.pixel_width, viewport.pixel_height)?;

        let encoded = render::render_page(page.as_ref(), &mut surface, &viewport)
            .and_then(|()| encode::encode_surface(&self.encoder, &surface, format));
        let released = self.surfaces.release(&mut surface);

        let bytes = encoded?;
        released?;

        Ok(assemble::assemble(bytes, &viewport, format))
    }

    /// Page count and first-page geometry of `document`.
    pub fn inspect(&self, document: Vec<u8>) -> Result<DocumentInfo, Pdf2ImgError> {
        let document = load::load_document(&self.engine, document)?;
        let page = load::open_page(document.as_ref(), FIRST_PAGE)?;
        Ok(DocumentInfo {
            page_count: document.page_count(),
            first_page: page.native_size(),
        })
    }
}

/// Convert the first page of a base64 PDF to an image.
///
/// This is the primary entry point for the library. Arguments are validated
/// before pdfium is bound, so an `InvalidArgument` never costs a library
/// load.
///
/// # Errors
/// Any [`Pdf2ImgError`]; no partial record is ever returned.
pub async fn convert(
    request: &ConversionRequest,
    config: &ConversionConfig,
) -> Result<EncodedImage, Pdf2ImgError> {
    let total_start = Instant::now();
    let validated = input::validate(request)?;
    info!(
        "Starting conversion: {} bytes → {} at width {}",
        validated.document.len(),
        validated.format,
        validated.desired_width
    );

    let config = config.clone();
    let image = tokio::task::spawn_blocking(move || rasterize_with_pdfium(&config, validated))
        .await
        .map_err(|e| Pdf2ImgError::Internal(format!("Render task panicked: {}", e)))??;

    info!(
        "Conversion complete: {}x{} {} ({} bytes) in {}ms",
        image.width,
        image.height,
        image.format,
        image.bytes.len(),
        total_start.elapsed().as_millis()
    );
    Ok(image)
}

/// Synchronous counterpart of [`convert`], running pdfium on the calling
/// thread.
pub fn convert_sync(
    request: &ConversionRequest,
    config: &ConversionConfig,
) -> Result<EncodedImage, Pdf2ImgError> {
    let validated = input::validate(request)?;
    rasterize_with_pdfium(config, validated)
}

/// Convert and write the image bytes to `output_path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn convert_to_file(
    request: &ConversionRequest,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<EncodedImage, Pdf2ImgError> {
    let image = convert(request, config).await?;
    write_image(&image, output_path).await?;
    Ok(image)
}

/// Write `image.bytes` to `path` atomically.
pub async fn write_image(image: &EncodedImage, path: impl AsRef<Path>) -> Result<(), Pdf2ImgError> {
    let path = path.as_ref();
    let write_err = |source| Pdf2ImgError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let tmp_path = path.with_extension(format!("{}.tmp", image.format.extension()));
    tokio::fs::write(&tmp_path, &image.bytes)
        .await
        .map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;

    debug!("Wrote {} bytes to {}", image.bytes.len(), path.display());
    Ok(())
}

/// Report page count and first-page geometry without rendering.
pub async fn inspect(
    document_base64: &str,
    config: &ConversionConfig,
) -> Result<DocumentInfo, Pdf2ImgError> {
    let document = input::decode_document(document_base64)?;
    let config = config.clone();
    tokio::task::spawn_blocking(move || {
        let engine = PdfiumEngine::bind(&config)?;
        Rasterizer::new(engine).inspect(document)
    })
    .await
    .map_err(|e| Pdf2ImgError::Internal(format!("Inspect task panicked: {}", e)))?
}

fn rasterize_with_pdfium(
    config: &ConversionConfig,
    request: ValidatedRequest,
) -> Result<EncodedImage, Pdf2ImgError> {
    let engine = PdfiumEngine::bind(config)?;
    Rasterizer::new(engine)
        .max_surface_pixels(config.max_surface_pixels)
        .rasterize(request)
}
