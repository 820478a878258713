//! Scale, pad and center geometry shared by raster and vector sources.
//!
//! [`resolve`] decides how large the source is drawn inside a target canvas
//! and where. Both rasterization paths consume the resulting [`Geometry`], so
//! a raster PNG and a vector SVG of the same aspect ratio land on exactly the
//! same pixels.

use crate::error::GeometryError;

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if width equals height.
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// Returns true if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A rectangle defined in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RectPx {
    /// X offset from the left edge of the canvas
    pub x: u32,
    /// Y offset from the top edge of the canvas
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl RectPx {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Returns the right edge coordinate (x + width).
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Returns the bottom edge coordinate (y + height).
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }
}

/// Resolved placement of scaled content within a destination canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    /// The destination canvas size.
    pub canvas: SizePx,
    /// The size the source is scaled to.
    pub content: SizePx,
    /// Top-left corner of the content on the canvas.
    pub origin_x: u32,
    pub origin_y: u32,
    /// Uniform scale factor applied to the source.
    pub scale: f64,
}

impl Geometry {
    /// The rectangle the content occupies on the canvas.
    pub fn content_rect(&self) -> RectPx {
        RectPx::new(
            self.origin_x,
            self.origin_y,
            self.content.width,
            self.content.height,
        )
    }
}

/// Largest canvas, in pixels, a profile may request (1 GiB of RGBA).
pub const MAX_CANVAS_PIXELS: u64 = 1 << 28;

/// Computes the available size along one axis after padding.
///
/// The padding is `floor(proportion * dimension * 0.5)` and is subtracted
/// once from the dimension.
fn available(dimension: u32, padding: f64) -> u32 {
    if padding <= 0.0 {
        return dimension;
    }
    let pad = (padding * dimension as f64 * 0.5).floor() as u32;
    dimension.saturating_sub(pad)
}

/// Resolves the geometry for drawing `source` into `target` with the given
/// padding proportion.
///
/// The scale is the largest uniform factor that keeps the content inside the
/// padded box, and the content is centered on both axes.
///
/// # Example
///
/// ```
/// use iconset_renderer::{resolve, SizePx};
///
/// let g = resolve(SizePx::new(512, 512), SizePx::new(192, 192), 0.3).unwrap();
/// assert_eq!(g.content, SizePx::new(164, 164));
/// assert_eq!((g.origin_x, g.origin_y), (14, 14));
/// ```
pub fn resolve(source: SizePx, target: SizePx, padding: f64) -> Result<Geometry, GeometryError> {
    if source.is_empty() {
        return Err(GeometryError::EmptySource);
    }
    if u64::from(target.width) * u64::from(target.height) > MAX_CANVAS_PIXELS {
        return Err(GeometryError::CanvasTooLarge {
            width: target.width,
            height: target.height,
            max_pixels: MAX_CANVAS_PIXELS,
        });
    }
    let too_small = GeometryError::ViewingAreaTooSmall {
        width: target.width,
        height: target.height,
    };

    let avail_w = available(target.width, padding);
    let avail_h = available(target.height, padding);

    let ratio_w = avail_w as f64 / source.width as f64;
    let ratio_h = avail_h as f64 / source.height as f64;
    let scale = ratio_w.min(ratio_h);
    if !(scale > 0.0) {
        return Err(too_small);
    }

    let content_w = ((source.width as f64 * scale).round() as u32).min(avail_w);
    let content_h = ((source.height as f64 * scale).round() as u32).min(avail_h);
    if content_w == 0 || content_h == 0 {
        return Err(too_small);
    }

    Ok(Geometry {
        canvas: target,
        content: SizePx::new(content_w, content_h),
        origin_x: (target.width - content_w) / 2,
        origin_y: (target.height - content_h) / 2,
        scale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn size_px_is_square() {
        assert!(SizePx::new(100, 100).is_square());
        assert!(!SizePx::new(100, 200).is_square());
    }

    #[test]
    fn rect_edges() {
        let rect = RectPx::new(10, 20, 100, 200);
        assert_eq!(rect.right(), 110);
        assert_eq!(rect.bottom(), 220);
    }

    #[test]
    fn padded_square_is_centered() {
        let g = resolve(SizePx::new(512, 512), SizePx::new(192, 192), 0.3).unwrap();
        assert_eq!(g.content, SizePx::new(164, 164));
        assert_eq!(g.origin_x, 14);
        assert_eq!(g.origin_y, 14);
        assert!((g.scale - 164.0 / 512.0).abs() < 1e-9);
    }

    #[test]
    fn zero_padding_fills_canvas() {
        let g = resolve(SizePx::new(64, 64), SizePx::new(48, 48), 0.0).unwrap();
        assert_eq!(g.content, SizePx::new(48, 48));
        assert_eq!(g.content_rect(), RectPx::new(0, 0, 48, 48));
    }

    #[test]
    fn wide_source_is_letterboxed() {
        let g = resolve(SizePx::new(200, 100), SizePx::new(100, 100), 0.0).unwrap();
        assert_eq!(g.content, SizePx::new(100, 50));
        assert_eq!((g.origin_x, g.origin_y), (0, 25));
    }

    #[test]
    fn tall_source_into_wide_canvas() {
        let g = resolve(SizePx::new(100, 400), SizePx::new(620, 300), 0.0).unwrap();
        assert_eq!(g.content, SizePx::new(75, 300));
        assert_eq!((g.origin_x, g.origin_y), (272, 0));
    }

    #[test]
    fn full_padding_halves_the_box() {
        let g = resolve(SizePx::new(10, 10), SizePx::new(100, 100), 1.0).unwrap();
        assert_eq!(g.content, SizePx::new(50, 50));
        assert_eq!((g.origin_x, g.origin_y), (25, 25));
    }

    #[test]
    fn zero_target_is_too_small() {
        let err = resolve(SizePx::new(10, 10), SizePx::new(0, 0), 0.0).unwrap_err();
        assert_eq!(
            err,
            GeometryError::ViewingAreaTooSmall {
                width: 0,
                height: 0
            }
        );
    }

    #[test]
    fn empty_source_is_rejected() {
        let err = resolve(SizePx::new(0, 10), SizePx::new(10, 10), 0.0).unwrap_err();
        assert_eq!(err, GeometryError::EmptySource);
    }

    #[test]
    fn oversized_canvas_is_rejected() {
        let err = resolve(SizePx::new(64, 64), SizePx::new(u32::MAX, u32::MAX), 0.0).unwrap_err();
        assert!(matches!(err, GeometryError::CanvasTooLarge { .. }));

        let err = resolve(SizePx::new(64, 64), SizePx::new(70_000, 70_000), 0.3).unwrap_err();
        assert!(matches!(err, GeometryError::CanvasTooLarge { .. }));

        assert!(resolve(SizePx::new(64, 64), SizePx::new(16_384, 16_384), 0.0).is_ok());
    }

    proptest! {
        #[test]
        fn content_fits_and_one_axis_is_fitted(
            src_w in 1u32..2048,
            src_h in 1u32..2048,
            dst_w in 1u32..1024,
            dst_h in 1u32..1024,
            padding in 0.0f64..=1.0,
        ) {
            let target = SizePx::new(dst_w, dst_h);
            match resolve(SizePx::new(src_w, src_h), target, padding) {
                Ok(g) => {
                    let avail_w = available(dst_w, padding);
                    let avail_h = available(dst_h, padding);
                    prop_assert!(g.content.width <= avail_w);
                    prop_assert!(g.content.height <= avail_h);
                    prop_assert!(g.content_rect().right() <= dst_w);
                    prop_assert!(g.content_rect().bottom() <= dst_h);
                    // At least one axis touches its available size, within rounding.
                    let fitted = avail_w - g.content.width <= 1 || avail_h - g.content.height <= 1;
                    prop_assert!(fitted);
                }
                Err(GeometryError::ViewingAreaTooSmall { .. }) => {
                    // Only extreme aspect ratios round a dimension down to zero.
                    let scale = (available(dst_w, padding) as f64 / src_w as f64)
                        .min(available(dst_h, padding) as f64 / src_h as f64);
                    prop_assert!((src_w as f64 * scale).round() < 1.0
                        || (src_h as f64 * scale).round() < 1.0);
                }
                Err(other) => prop_assert!(false, "unexpected error {other:?}"),
            }
        }

        #[test]
        fn resolve_is_deterministic(
            src in 1u32..4096,
            dst in 1u32..1024,
            padding in 0.0f64..=1.0,
        ) {
            let a = resolve(SizePx::new(src, src), SizePx::new(dst, dst), padding);
            let b = resolve(SizePx::new(src, src), SizePx::new(dst, dst), padding);
            prop_assert_eq!(a, b);
        }
    }
}
