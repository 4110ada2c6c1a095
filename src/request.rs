//! Host-facing conversion request.
//!
//! [`ConversionRequest`] is deliberately untyped where the host is
//! untyped: the document is a base64 string and the format a plain string.
//! [`crate::pipeline::input::validate`] turns it into a
//! [`crate::pipeline::input::ValidatedRequest`] before any work starts.
//!
//! The serde field aliases accept the message shape used by event-driven
//! hosts (`payload`, `desiredWidth`, `imageFormat`), so an adapter can
//! deserialize an incoming message straight into a request.

use crate::config::{ImageFormat, DEFAULT_WIDTH};
use serde::{Deserialize, Serialize};

/// Inputs for one conversion.
///
/// # Example
/// ```rust
/// use pdf2img::ConversionRequest;
///
/// let req = ConversionRequest::new("JVBERi0xLjQK")
///     .desired_width(800.0)
///     .image_format("jpeg");
/// assert_eq!(req.image_format, "jpeg");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    /// Base64-encoded PDF payload.
    #[serde(alias = "payload", alias = "documentBytes")]
    pub document: String,

    /// Target pixel width; height is derived. Default: 1240.
    #[serde(default = "default_width")]
    pub desired_width: f64,

    /// `"png"` or `"jpeg"`. Default: `"png"`.
    #[serde(default = "default_format")]
    pub image_format: String,
}

fn default_width() -> f64 {
    DEFAULT_WIDTH
}

fn default_format() -> String {
    ImageFormat::default().as_str().to_string()
}

impl ConversionRequest {
    /// A request for `document` at the default width and format.
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            desired_width: default_width(),
            image_format: default_format(),
        }
    }

    pub fn desired_width(mut self, width: f64) -> Self {
        self.desired_width = width;
        self
    }

    pub fn image_format(mut self, format: impl Into<String>) -> Self {
        self.image_format = format.into();
        self
    }
}
