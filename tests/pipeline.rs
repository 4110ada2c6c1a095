//! Orchestration tests against a fake document engine.
//!
//! No pdfium library is needed: the fake engine hands back canned page
//! geometry and paints a deterministic pattern, while a counting surface
//! factory records every allocation and release.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::Rgba;
use pdf2img::engine::{DocumentEngine, PageHandle, PageSize, SourceDocument};
use pdf2img::pipeline::encode::{EncoderProfile, SurfaceEncoder};
use pdf2img::pipeline::surface::{Surface, SurfaceFactory};
use pdf2img::{
    compute_viewport, ConversionConfig, ConversionRequest, ErrorKind, ImageFormat, Pdf2ImgError,
    Rasterizer, Viewport,
};
use std::cell::Cell;

// ── Fakes ────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct FakeEngine {
    pages: Vec<PageSize>,
    fail_load: bool,
    fail_render: bool,
    loads: Cell<usize>,
}

impl FakeEngine {
    fn with_pages(pages: &[(f64, f64)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|&(width, height)| PageSize { width, height })
                .collect(),
            ..Self::default()
        }
    }

    fn letter() -> Self {
        Self::with_pages(&[(612.0, 792.0), (792.0, 612.0)])
    }
}

impl DocumentEngine for FakeEngine {
    fn load(&self, bytes: Vec<u8>) -> Result<Box<dyn SourceDocument + '_>, Pdf2ImgError> {
        self.loads.set(self.loads.get() + 1);
        if self.fail_load || bytes.is_empty() {
            return Err(Pdf2ImgError::DocumentLoad {
                detail: "fake engine refused the payload".into(),
            });
        }
        Ok(Box::new(FakeDocument { engine: self }))
    }
}

struct FakeDocument<'a> {
    engine: &'a FakeEngine,
}

impl SourceDocument for FakeDocument<'_> {
    fn page_count(&self) -> usize {
        self.engine.pages.len()
    }

    fn page(&self, index: usize) -> Result<Box<dyn PageHandle + '_>, Pdf2ImgError> {
        let size = self
            .engine
            .pages
            .get(index)
            .copied()
            .ok_or(Pdf2ImgError::PageNotFound {
                index,
                total: self.engine.pages.len(),
            })?;
        Ok(Box::new(FakePage {
            size,
            fail: self.engine.fail_render,
        }))
    }
}

struct FakePage {
    size: PageSize,
    fail: bool,
}

impl PageHandle for FakePage {
    fn native_size(&self) -> PageSize {
        self.size
    }

    fn render_into(&self, surface: &mut Surface, _viewport: &Viewport) -> Result<(), Pdf2ImgError> {
        if self.fail {
            return Err(Pdf2ImgError::Render {
                detail: "unsupported page feature".into(),
            });
        }
        assert!(!surface.image_smoothing(), "smoothing must be off while drawing");
        for (x, y, p) in surface.pixels_mut()?.enumerate_pixels_mut() {
            *p = Rgba([(x % 256) as u8, (y % 256) as u8, ((x ^ y) % 256) as u8, 255]);
        }
        Ok(())
    }
}

#[derive(Default)]
struct CountingFactory {
    created: Cell<usize>,
    released: Cell<usize>,
}

impl SurfaceFactory for CountingFactory {
    fn create(&self, width: u32, height: u32) -> Result<Surface, Pdf2ImgError> {
        let surface = Surface::create(width, height)?;
        self.created.set(self.created.get() + 1);
        Ok(surface)
    }

    fn release(&self, surface: &mut Surface) -> Result<(), Pdf2ImgError> {
        self.released.set(self.released.get() + 1);
        surface.release()
    }
}

struct FailingEncoder;

impl SurfaceEncoder for FailingEncoder {
    fn encode(&self, _: &Surface, _: &EncoderProfile) -> Result<Vec<u8>, Pdf2ImgError> {
        Err(Pdf2ImgError::Encode {
            detail: "codec exploded".into(),
        })
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn pdf_base64() -> String {
    STANDARD.encode(b"%PDF-1.7\n% fake document\n")
}

fn rasterizer(engine: FakeEngine) -> Rasterizer<FakeEngine, CountingFactory> {
    Rasterizer::new(engine).with_surface_factory(CountingFactory::default())
}

fn assert_surface_accounting(r: &Rasterizer<FakeEngine, CountingFactory>, expected: usize) {
    let f = r.surface_factory();
    assert_eq!(f.created.get(), expected, "surfaces created");
    assert_eq!(f.released.get(), expected, "surfaces released");
}

// ── Happy paths ──────────────────────────────────────────────────────────────

#[test]
fn letter_page_at_default_width_as_png() {
    let r = rasterizer(FakeEngine::letter());
    let image = r.convert(&ConversionRequest::new(pdf_base64())).unwrap();

    assert_eq!((image.width, image.height), (1240, 1604));
    assert_eq!(image.format, ImageFormat::Png);
    assert_eq!(STANDARD.decode(&image.base64).unwrap(), image.bytes);

    let decoded = image::load_from_memory(&image.bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (1240, 1604));
    assert_eq!(decoded.to_rgba8().get_pixel(3, 5).0, [3, 5, 6, 255]);

    assert_surface_accounting(&r, 1);
}

#[test]
fn jpeg_output_matches_viewport() {
    let r = rasterizer(FakeEngine::letter());
    let request = ConversionRequest::new(pdf_base64())
        .desired_width(300.0)
        .image_format("jpeg");
    let image = r.convert(&request).unwrap();

    let viewport = compute_viewport(612.0, 792.0, 300.0).unwrap();
    assert!(!image.bytes.is_empty());
    assert_eq!(&image.bytes[..2], &[0xFF, 0xD8]);
    assert_eq!(STANDARD.decode(&image.base64).unwrap(), image.bytes);
    assert_eq!(
        (image.width, image.height),
        (viewport.pixel_width, viewport.pixel_height)
    );
    assert_eq!(image.mime_type(), "image/jpeg");
    assert_surface_accounting(&r, 1);
}

#[test]
fn only_the_first_page_is_used() {
    // Page 2 is landscape; a portrait result proves page 1 was rendered.
    let r = rasterizer(FakeEngine::letter());
    let image = r
        .convert(&ConversionRequest::new(pdf_base64()).desired_width(100.0))
        .unwrap();
    assert!(image.height > image.width);
}

#[test]
fn width_of_one_pixel() {
    let r = rasterizer(FakeEngine::letter());
    let image = r
        .convert(&ConversionRequest::new(pdf_base64()).desired_width(1.0))
        .unwrap();
    assert_eq!((image.width, image.height), (1, 1));
    assert_surface_accounting(&r, 1);
}

#[test]
fn repeated_conversion_is_byte_identical() {
    let r = rasterizer(FakeEngine::letter());
    for format in ["png", "jpeg"] {
        let request = ConversionRequest::new(pdf_base64())
            .desired_width(257.0)
            .image_format(format);
        let a = r.convert(&request).unwrap();
        let b = r.convert(&request).unwrap();
        assert_eq!(a.bytes, b.bytes, "{format}");
        assert_eq!(a.base64, b.base64, "{format}");
    }
    assert_surface_accounting(&r, 4);
}

#[test]
fn host_message_drives_a_conversion() {
    let json = format!(
        r#"{{"payload":"{}","desiredWidth":64,"imageFormat":"jpeg"}}"#,
        pdf_base64()
    );
    let request: ConversionRequest = serde_json::from_str(&json).unwrap();
    let image = rasterizer(FakeEngine::letter()).convert(&request).unwrap();
    assert_eq!(image.width, 64);
    assert_eq!(image.format, ImageFormat::Jpeg);
}

#[test]
fn inspect_reports_first_page() {
    let r = rasterizer(FakeEngine::letter());
    let info = r.inspect(b"%PDF-1.7".to_vec()).unwrap();
    assert_eq!(info.page_count, 2);
    assert_eq!(
        info.first_page,
        PageSize {
            width: 612.0,
            height: 792.0
        }
    );
    assert_surface_accounting(&r, 0);
}

// ── Failure paths ────────────────────────────────────────────────────────────

#[test]
fn invalid_base64_never_touches_the_engine() {
    let r = rasterizer(FakeEngine::letter());
    let err = r
        .convert(&ConversionRequest::new("this is *not* base64"))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(r.engine().loads.get(), 0);
    assert_surface_accounting(&r, 0);
}

#[test]
fn invalid_width_and_format_are_rejected_up_front() {
    let r = rasterizer(FakeEngine::letter());
    for request in [
        ConversionRequest::new(pdf_base64()).desired_width(0.0),
        ConversionRequest::new(pdf_base64()).desired_width(-10.0),
        ConversionRequest::new(pdf_base64()).image_format("tiff"),
    ] {
        let err = r.convert(&request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{request:?}");
    }
    assert_eq!(r.engine().loads.get(), 0);
    assert_surface_accounting(&r, 0);
}

#[test]
fn document_without_pages_is_page_not_found() {
    let r = rasterizer(FakeEngine::with_pages(&[]));
    let err = r.convert(&ConversionRequest::new(pdf_base64())).unwrap_err();
    assert!(matches!(
        err,
        Pdf2ImgError::PageNotFound { index: 0, total: 0 }
    ));
    assert_surface_accounting(&r, 0);
}

#[test]
fn load_failure_is_propagated() {
    let engine = FakeEngine {
        fail_load: true,
        ..FakeEngine::letter()
    };
    let r = rasterizer(engine);
    let err = r.convert(&ConversionRequest::new(pdf_base64())).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DocumentLoadError);
    assert_surface_accounting(&r, 0);
}

#[test]
fn malformed_geometry_is_invalid_geometry() {
    let r = rasterizer(FakeEngine::with_pages(&[(0.0, 792.0)]));
    let err = r.convert(&ConversionRequest::new(pdf_base64())).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidGeometry);
    assert_surface_accounting(&r, 0);
}

#[test]
fn render_failure_still_releases_the_surface() {
    let engine = FakeEngine {
        fail_render: true,
        ..FakeEngine::letter()
    };
    let r = rasterizer(engine);
    let err = r.convert(&ConversionRequest::new(pdf_base64())).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RenderError);
    assert_surface_accounting(&r, 1);
}

#[test]
fn encode_failure_still_releases_the_surface() {
    let r = rasterizer(FakeEngine::letter()).with_encoder(FailingEncoder);
    let err = r.convert(&ConversionRequest::new(pdf_base64())).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EncodeError);

    let f = r.surface_factory();
    assert_eq!(f.created.get(), 1);
    assert_eq!(f.released.get(), 1);
}

#[test]
fn zero_height_viewport_allocates_nothing() {
    // A 1000:10 page at 1 px wide rounds its height to 0.
    let r = rasterizer(FakeEngine::with_pages(&[(1000.0, 10.0)]));
    let err = r
        .convert(&ConversionRequest::new(pdf_base64()).desired_width(1.0))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_surface_accounting(&r, 0);
}

#[test]
fn pixel_budget_is_enforced_before_allocation() {
    let r = rasterizer(FakeEngine::letter()).max_surface_pixels(10_000);
    let err = r.convert(&ConversionRequest::new(pdf_base64())).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(err.to_string().contains("exceeds"));
    assert_surface_accounting(&r, 0);
}

// ── Async entry point ────────────────────────────────────────────────────────

#[test]
fn async_convert_validates_before_binding_pdfium() {
    let config = ConversionConfig::builder()
        .pdfium_library_path("/nonexistent/pdfium")
        .build()
        .unwrap();
    let request = ConversionRequest::new(pdf_base64()).desired_width(f64::NAN);

    let err = tokio_test::block_on(pdf2img::convert(&request, &config)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn async_convert_reports_binding_failure() {
    let config = ConversionConfig::builder()
        .pdfium_library_path("/nonexistent/pdfium/libpdfium.so")
        .build()
        .unwrap();
    let err = pdf2img::convert(&ConversionRequest::new(pdf_base64()), &config)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Binding);
}
