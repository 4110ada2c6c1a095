//! Off-screen drawing surface and its lifecycle.
//!
//! A [`Surface`] is an RGBA backing store owned by exactly one conversion.
//! It moves through three states:
//!
//! ```text
//!            create                render              release
//!   (none) ─────────▶ Created ─────────▶ Rendered ─────────▶ Released
//!                        ▲                  │
//!                        └────── reset ─────┘
//! ```
//!
//! Release frees the backing store and zeroes the dimensions. Any lifecycle
//! call on a released surface, including a second release, fails with
//! [`Pdf2ImgError::UseAfterRelease`].
//!
//! The orchestrator releases the surface on every exit path instead of
//! waiting for drop. [`SurfaceFactory`] is the seam where that lifecycle is
//! driven; hosts and tests wrap it to observe allocations.

use crate::error::Pdf2ImgError;
use image::RgbaImage;
use tracing::debug;

/// Where a [`Surface`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    /// Fresh backing store; pixel contents undefined.
    Created,
    /// Contents populated by the page renderer.
    Rendered,
    /// Backing store freed; the handle is no longer usable.
    Released,
}

/// An RGBA raster buffer used as the render target.
#[derive(Debug)]
pub struct Surface {
    pixels: RgbaImage,
    state: SurfaceState,
    image_smoothing: bool,
}

impl Surface {
    /// Allocate a `width × height` surface.
    pub fn create(width: u32, height: u32) -> Result<Self, Pdf2ImgError> {
        check_dimensions(width, height)?;
        debug!("Surface created: {}x{} px", width, height);
        Ok(Self {
            pixels: RgbaImage::new(width, height),
            state: SurfaceState::Created,
            image_smoothing: true,
        })
    }

    /// Re-dimension the surface in place, discarding its contents.
    ///
    /// Drawing state (image smoothing) returns to its defaults.
    pub fn reset(&mut self, width: u32, height: u32) -> Result<(), Pdf2ImgError> {
        self.ensure_live("reset")?;
        check_dimensions(width, height)?;
        debug!(
            "Surface reset: {}x{} → {}x{} px",
            self.width(),
            self.height(),
            width,
            height
        );
        self.pixels = RgbaImage::new(width, height);
        self.state = SurfaceState::Created;
        self.image_smoothing = true;
        Ok(())
    }

    /// Free the backing store. Must be called at most once.
    pub fn release(&mut self) -> Result<(), Pdf2ImgError> {
        self.ensure_live("release")?;
        debug!("Surface released: {}x{} px", self.width(), self.height());
        self.pixels = RgbaImage::new(0, 0);
        self.state = SurfaceState::Released;
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    pub fn is_released(&self) -> bool {
        self.state == SurfaceState::Released
    }

    /// Whether scaled images are interpolated when drawn. Default: `true`.
    pub fn image_smoothing(&self) -> bool {
        self.image_smoothing
    }

    pub fn set_image_smoothing(&mut self, enabled: bool) {
        self.image_smoothing = enabled;
    }

    /// Read access to the raster.
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Mutable access to the raster, for engines that paint in place.
    pub fn pixels_mut(&mut self) -> Result<&mut RgbaImage, Pdf2ImgError> {
        self.ensure_live("draw")?;
        Ok(&mut self.pixels)
    }

    /// Replace the surface contents with `raster`, which must match the
    /// surface dimensions exactly.
    pub fn draw(&mut self, raster: RgbaImage) -> Result<(), Pdf2ImgError> {
        self.ensure_live("draw")?;
        if raster.dimensions() != self.pixels.dimensions() {
            return Err(Pdf2ImgError::Render {
                detail: format!(
                    "raster is {}x{} px but the surface is {}x{} px",
                    raster.width(),
                    raster.height(),
                    self.width(),
                    self.height()
                ),
            });
        }
        self.pixels = raster;
        Ok(())
    }

    pub(crate) fn mark_rendered(&mut self) -> Result<(), Pdf2ImgError> {
        self.ensure_live("render")?;
        self.state = SurfaceState::Rendered;
        Ok(())
    }

    fn ensure_live(&self, operation: &'static str) -> Result<(), Pdf2ImgError> {
        if self.is_released() {
            return Err(Pdf2ImgError::UseAfterRelease { operation });
        }
        Ok(())
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<(), Pdf2ImgError> {
    if width == 0 || height == 0 {
        return Err(Pdf2ImgError::invalid_argument(format!(
            "invalid surface size {width}x{height}: both dimensions must be positive"
        )));
    }
    Ok(())
}

/// Creates, resets and releases surfaces on behalf of the pipeline.
///
/// The default methods delegate to [`Surface`]; implementors override them
/// to pool, account for, or trace allocations.
pub trait SurfaceFactory {
    fn create(&self, width: u32, height: u32) -> Result<Surface, Pdf2ImgError> {
        Surface::create(width, height)
    }

    fn reset(&self, surface: &mut Surface, width: u32, height: u32) -> Result<(), Pdf2ImgError> {
        surface.reset(width, height)
    }

    fn release(&self, surface: &mut Surface) -> Result<(), Pdf2ImgError> {
        surface.release()
    }
}

/// The default [`SurfaceFactory`]: a fresh heap buffer per surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterSurfaceFactory;

impl SurfaceFactory for RasterSurfaceFactory {}
