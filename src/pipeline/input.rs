//! Input validation: turn a host [`ConversionRequest`] into typed inputs.
//!
//! Validation is pure and runs before anything expensive: no document is
//! decoded and no surface is allocated until every argument has passed.
//! A failure here is always [`Pdf2ImgError::InvalidArgument`].

use crate::config::ImageFormat;
use crate::error::Pdf2ImgError;
use crate::request::ConversionRequest;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

/// Inputs that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    /// Decoded document bytes; never empty.
    pub document: Vec<u8>,
    /// Finite and > 0.
    pub desired_width: f64,
    pub format: ImageFormat,
}

/// Validate `request`.
///
/// ASCII whitespace inside the base64 payload (MIME line breaks, trailing
/// newlines from files) is ignored.
pub fn validate(request: &ConversionRequest) -> Result<ValidatedRequest, Pdf2ImgError> {
    let format: ImageFormat = request.image_format.parse()?;
    let desired_width = validate_width(request.desired_width)?;
    let document = decode_document(&request.document)?;

    debug!(
        "Validated request: {} document bytes, width {}, format {}",
        document.len(),
        desired_width,
        format
    );

    Ok(ValidatedRequest {
        document,
        desired_width,
        format,
    })
}

fn validate_width(width: f64) -> Result<f64, Pdf2ImgError> {
    if !width.is_finite() || width <= 0.0 {
        return Err(Pdf2ImgError::invalid_argument(format!(
            "desired width must be a positive number, got {width}"
        )));
    }
    Ok(width)
}

/// Decode a base64 document payload.
pub fn decode_document(encoded: &str) -> Result<Vec<u8>, Pdf2ImgError> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| Pdf2ImgError::invalid_argument(format!("document is not valid base64: {e}")))?;

    if bytes.is_empty() {
        return Err(Pdf2ImgError::invalid_argument("document payload is empty"));
    }
    Ok(bytes)
}
