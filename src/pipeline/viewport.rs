//! Viewport scaling: native page geometry + desired width → pixel size.
//!
//! Only the width is a caller input. The height is always derived from the
//! page's aspect ratio, so a single uniform scale factor applies to both
//! axes and the rendered page is never stretched.

use crate::error::Pdf2ImgError;

/// Scale factor and resulting integer pixel size for one rasterisation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// `desired_width / native_width`; always > 0.
    pub scale: f64,
    /// `floor(native_width * scale)`.
    pub pixel_width: u32,
    /// `floor(native_height * scale)`.
    pub pixel_height: u32,
}

impl Viewport {
    /// `pixel_width × pixel_height`.
    pub fn pixel_area(&self) -> u64 {
        u64::from(self.pixel_width) * u64::from(self.pixel_height)
    }

    /// Reject viewports larger than `max_pixels` before anything is allocated.
    pub fn ensure_within(&self, max_pixels: u64) -> Result<(), Pdf2ImgError> {
        if self.pixel_area() > max_pixels {
            return Err(Pdf2ImgError::invalid_argument(format!(
                "viewport {}x{} px ({} pixels) exceeds the limit of {} pixels",
                self.pixel_width,
                self.pixel_height,
                self.pixel_area(),
                max_pixels
            )));
        }
        Ok(())
    }
}

/// Compute the viewport that renders a `native_width × native_height` page
/// at `desired_width` pixels wide.
///
/// # Errors
/// * `InvalidArgument` — `desired_width` is not a finite number > 0, or the
///   result does not fit in `u32` pixels.
/// * `InvalidGeometry` — the native geometry is non-positive or non-finite.
pub fn compute_viewport(
    native_width: f64,
    native_height: f64,
    desired_width: f64,
) -> Result<Viewport, Pdf2ImgError> {
    if !desired_width.is_finite() || desired_width <= 0.0 {
        return Err(Pdf2ImgError::invalid_argument(format!(
            "desired width must be a positive number, got {desired_width}"
        )));
    }
    if !native_width.is_finite()
        || !native_height.is_finite()
        || native_width <= 0.0
        || native_height <= 0.0
    {
        return Err(Pdf2ImgError::InvalidGeometry {
            width: native_width,
            height: native_height,
        });
    }

    let scale = desired_width / native_width;
    // native_width * scale is desired_width exactly. The height multiplies
    // before dividing so an integral true result is rounded to itself.
    let pixel_width = floor_px(desired_width)?;
    let pixel_height = floor_px(native_height * desired_width / native_width)?;

    Ok(Viewport {
        scale,
        pixel_width,
        pixel_height,
    })
}

fn floor_px(value: f64) -> Result<u32, Pdf2ImgError> {
    let floored = value.floor();
    if floored > f64::from(u32::MAX) {
        return Err(Pdf2ImgError::invalid_argument(format!(
            "viewport dimension {value} does not fit in a surface"
        )));
    }
    Ok(floored as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_page_at_default_width() {
        let v = compute_viewport(612.0, 792.0, 1240.0).unwrap();
        assert!((v.scale - 1240.0 / 612.0).abs() < 1e-12);
        assert!((v.scale - 2.0261).abs() < 1e-4);
        assert_eq!(v.pixel_width, 1240);
        assert_eq!(v.pixel_height, 1604);
    }

    #[test]
    fn width_of_one_pixel() {
        let v = compute_viewport(612.0, 792.0, 1.0).unwrap();
        assert_eq!(v.pixel_width, 1);
        assert_eq!(v.pixel_height, 1);

        // A very wide page rounds its height down to zero.
        let v = compute_viewport(1000.0, 10.0, 1.0).unwrap();
        assert_eq!(v.pixel_width, 1);
        assert_eq!(v.pixel_height, 0);
    }

    #[test]
    fn pixel_width_equals_floor_of_desired() {
        for native in [100.0, 595.28, 612.0, 841.89, 1191.0, 2384.0] {
            for desired in [1.0, 17.0, 640.0, 1240.0, 1240.75, 4000.0] {
                let v = compute_viewport(native, native * 1.3, desired).unwrap();
                assert_eq!(
                    v.pixel_width,
                    desired.floor() as u32,
                    "native={native} desired={desired}"
                );
            }
        }
    }

    #[test]
    fn width_just_below_an_integer_is_not_rounded_up() {
        let v = compute_viewport(612.0, 792.0, 1240.9999999).unwrap();
        assert_eq!(v.pixel_width, 1240);
        assert_eq!(v.pixel_height, 1605);

        let v = compute_viewport(595.28, 841.89, 640.0 - 1e-9).unwrap();
        assert_eq!(v.pixel_width, 639);
    }

    #[test]
    fn integral_heights_are_exact() {
        // 792 * w / 612 is an integer whenever w is a multiple of 17.
        for k in 1..=200u32 {
            let desired = f64::from(17 * k);
            let v = compute_viewport(612.0, 792.0, desired).unwrap();
            assert_eq!(v.pixel_height, 22 * k, "desired={desired}");
        }
    }

    #[test]
    fn aspect_ratio_within_one_pixel() {
        let cases = [(612.0, 792.0), (595.28, 841.89), (842.0, 595.0), (300.0, 300.0)];
        for (w, h) in cases {
            for desired in [50.0, 333.0, 1240.0, 2000.0] {
                let v = compute_viewport(w, h, desired).unwrap();
                let expected = f64::from(v.pixel_width) * h / w;
                assert!(
                    (f64::from(v.pixel_height) - expected).abs() <= 1.0,
                    "{w}x{h}@{desired}: got {}",
                    v.pixel_height
                );
            }
        }
    }

    #[test]
    fn non_positive_native_width_is_invalid_geometry() {
        for w in [0.0, -612.0, f64::NAN] {
            let err = compute_viewport(w, 792.0, 1240.0).unwrap_err();
            assert!(matches!(err, Pdf2ImgError::InvalidGeometry { .. }));
        }
        let err = compute_viewport(612.0, 0.0, 1240.0).unwrap_err();
        assert!(matches!(err, Pdf2ImgError::InvalidGeometry { .. }));
    }

    #[test]
    fn non_positive_desired_width_is_invalid_argument() {
        for d in [0.0, -1.0, f64::INFINITY, f64::NAN] {
            let err = compute_viewport(612.0, 792.0, d).unwrap_err();
            assert!(matches!(err, Pdf2ImgError::InvalidArgument { .. }));
        }
    }

    #[test]
    fn pixel_budget() {
        let v = compute_viewport(612.0, 792.0, 1240.0).unwrap();
        assert_eq!(v.pixel_area(), 1240 * 1604);
        assert!(v.ensure_within(1240 * 1604).is_ok());
        assert!(matches!(
            v.ensure_within(1_000_000),
            Err(Pdf2ImgError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn oversized_viewport_is_rejected() {
        let err = compute_viewport(1.0, 1e12, 10.0).unwrap_err();
        assert!(matches!(err, Pdf2ImgError::InvalidArgument { .. }));
    }
}
