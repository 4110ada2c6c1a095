//! Result assembly: compressed bytes + viewport → [`EncodedImage`].

use crate::config::ImageFormat;
use crate::output::EncodedImage;
use crate::pipeline::viewport::Viewport;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

/// Package `bytes` with their base64 text form and the viewport's size.
pub fn assemble(bytes: Vec<u8>, viewport: &Viewport, format: ImageFormat) -> EncodedImage {
    let base64 = STANDARD.encode(&bytes);
    debug!("Encoded image → {} bytes base64", base64.len());

    EncodedImage {
        bytes,
        base64,
        width: viewport.pixel_width,
        height: viewport.pixel_height,
        format,
    }
}
