//! Output records returned by the conversion entry points.

use crate::config::ImageFormat;
use crate::engine::PageSize;
use serde::Serialize;

/// A rasterised page, compressed and base64-encoded.
///
/// `base64` is exactly `STANDARD.encode(&bytes)`: no `data:` URI prefix.
/// Consumers of the text form must know the format out-of-band, which is
/// why `format` travels alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedImage {
    /// Compressed image bytes. Not serialised; `base64` carries the same data.
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// Standard base64 of `bytes`.
    pub base64: String,
    /// Pixel width of the rendered viewport.
    pub width: u32,
    /// Pixel height of the rendered viewport.
    pub height: u32,
    /// Format of `bytes`.
    pub format: ImageFormat,
}

impl EncodedImage {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Summary of a document, as reported by [`crate::inspect`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentInfo {
    pub page_count: usize,
    /// Native geometry of the page that [`crate::convert`] rasterises.
    pub first_page: PageSize,
}
