//! Page rendering: paint a page into a surface at the viewport's scale.
//!
//! Image smoothing is switched off before the engine draws, so scaled raster
//! content embedded in the page keeps hard edges.
//!
//! A render failure is final: it is not retried, and the caller still owns
//! (and must release) the surface.

use crate::engine::PageHandle;
use crate::error::Pdf2ImgError;
use crate::pipeline::surface::Surface;
use crate::pipeline::viewport::Viewport;
use std::time::Instant;
use tracing::debug;

/// Render `page` into `surface`.
///
/// On success the surface is in the *rendered* state.
pub fn render_page(
    page: &dyn PageHandle,
    surface: &mut Surface,
    viewport: &Viewport,
) -> Result<(), Pdf2ImgError> {
    if surface.is_released() {
        return Err(Pdf2ImgError::UseAfterRelease { operation: "render" });
    }
    if (surface.width(), surface.height()) != (viewport.pixel_width, viewport.pixel_height) {
        return Err(Pdf2ImgError::Render {
            detail: format!(
                "surface is {}x{} px but the viewport is {}x{} px",
                surface.width(),
                surface.height(),
                viewport.pixel_width,
                viewport.pixel_height
            ),
        });
    }

    surface.set_image_smoothing(false);

    let start = Instant::now();
    page.render_into(surface, viewport)?;
    surface.mark_rendered()?;

    debug!(
        "Rendered page → {}x{} px at scale {:.4} in {}ms",
        viewport.pixel_width,
        viewport.pixel_height,
        viewport.scale,
        start.elapsed().as_millis()
    );
    Ok(())
}
