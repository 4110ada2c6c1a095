//! Image encoding: rendered [`Surface`] → compressed PNG or JPEG bytes.
//!
//! Each format has a fixed tuning profile:
//!
//! | Format | Profile |
//! |--------|---------|
//! | PNG    | fast deflate, no scanline filter, RGBA8 |
//! | JPEG   | quality 100, 4:4:4 (no chroma subsampling), RGB8 |
//!
//! The actual codec sits behind [`SurfaceEncoder`]; [`RasterEncoder`] is the
//! `image`-crate implementation.

use crate::config::ImageFormat;
use crate::error::Pdf2ImgError;
use crate::pipeline::surface::Surface;
use image::buffer::ConvertBuffer;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use tracing::debug;

/// JPEG quality used for every conversion.
pub const JPEG_QUALITY: u8 = 100;

/// Tuning parameters applied when compressing a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderProfile {
    /// Fast deflate, no scanline filter, RGBA8.
    Png,
    /// Baseline JPEG at `quality` (1–100), 4:4:4, RGB8.
    Jpeg { quality: u8 },
}

impl EncoderProfile {
    /// The profile used for `format`.
    pub fn for_format(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Png => EncoderProfile::Png,
            ImageFormat::Jpeg => EncoderProfile::Jpeg {
                quality: JPEG_QUALITY,
            },
        }
    }
}

/// Serialises surface pixels with a given profile.
pub trait SurfaceEncoder {
    /// Encode `surface`, which is live and non-empty.
    fn encode(&self, surface: &Surface, profile: &EncoderProfile) -> Result<Vec<u8>, Pdf2ImgError>;
}

/// [`SurfaceEncoder`] backed by the `image` crate codecs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterEncoder;

impl SurfaceEncoder for RasterEncoder {
    fn encode(&self, surface: &Surface, profile: &EncoderProfile) -> Result<Vec<u8>, Pdf2ImgError> {
        let pixels = surface.pixels();
        let mut buf = Vec::new();

        match *profile {
            EncoderProfile::Png => {
                PngEncoder::new_with_quality(&mut buf, CompressionType::Fast, FilterType::NoFilter)
                    .write_image(
                        pixels.as_raw(),
                        pixels.width(),
                        pixels.height(),
                        ExtendedColorType::Rgba8,
                    )
                    .map_err(codec_error)?;
            }
            EncoderProfile::Jpeg { quality } => {
                // JPEG has no alpha channel; it is dropped, not composited.
                // The image crate's encoder never subsamples chroma.
                let rgb: RgbImage = pixels.convert();
                JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100))
                    .write_image(
                        rgb.as_raw(),
                        rgb.width(),
                        rgb.height(),
                        ExtendedColorType::Rgb8,
                    )
                    .map_err(codec_error)?;
            }
        }

        Ok(buf)
    }
}

fn codec_error(e: image::ImageError) -> Pdf2ImgError {
    Pdf2ImgError::Encode {
        detail: e.to_string(),
    }
}

/// Encode `surface` as `format` with that format's profile.
///
/// # Errors
/// `Encode` if the surface is released or has a zero dimension, or if the
/// codec fails.
pub fn encode_surface(
    encoder: &dyn SurfaceEncoder,
    surface: &Surface,
    format: ImageFormat,
) -> Result<Vec<u8>, Pdf2ImgError> {
    if surface.is_released() {
        return Err(Pdf2ImgError::Encode {
            detail: "surface has been released".into(),
        });
    }
    if surface.width() == 0 || surface.height() == 0 {
        return Err(Pdf2ImgError::Encode {
            detail: format!(
                "surface has zero size ({}x{})",
                surface.width(),
                surface.height()
            ),
        });
    }

    let profile = EncoderProfile::for_format(format);
    let bytes = encoder.encode(surface, &profile)?;
    debug!(
        "Encoded {}x{} surface → {} bytes {}",
        surface.width(),
        surface.height(),
        bytes.len(),
        format
    );
    Ok(bytes)
}
