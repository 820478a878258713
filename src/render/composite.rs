//! Canvas allocation, resampling and source-over blending.
//!
//! Every output bitmap is produced here, whatever the source kind: the
//! raster and vector paths only prepare content, and [`composite`] decides
//! where it lands and what surrounds it.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::color::Background;
use crate::geometry::Geometry;

/// Places `content` on a canvas of `geometry.canvas` size.
///
/// The canvas is filled with `background`, or left fully transparent. The
/// content is resampled with Lanczos3 into the geometry's content rectangle
/// if its size differs, then blended over the canvas. Nothing is drawn
/// outside that rectangle.
pub fn composite(
    content: &RgbaImage,
    geometry: &Geometry,
    background: Option<Background>,
) -> RgbaImage {
    let canvas_size = geometry.canvas;
    let fill = background.map_or(Rgba([0, 0, 0, 0]), |bg| bg.to_pixel());
    let mut canvas = RgbaImage::from_pixel(canvas_size.width, canvas_size.height, fill);

    let rect = geometry.content_rect();
    if content.dimensions() == (rect.width, rect.height) {
        composite_over(&mut canvas, content, rect.x as i32, rect.y as i32);
    } else {
        let scaled = imageops::resize(content, rect.width, rect.height, FilterType::Lanczos3);
        composite_over(&mut canvas, &scaled, rect.x as i32, rect.y as i32);
    }

    canvas
}

/// Composites a source image onto a destination image at the specified position.
///
/// Uses standard alpha blending (source over destination). Pixels falling
/// outside the destination are skipped.
pub fn composite_over(dest: &mut RgbaImage, src: &RgbaImage, x: i32, y: i32) {
    let dest_width = dest.width() as i32;
    let dest_height = dest.height() as i32;

    for (sx, sy, src_pixel) in src.enumerate_pixels() {
        let dx = x + sx as i32;
        let dy = y + sy as i32;
        if dx < 0 || dy < 0 || dx >= dest_width || dy >= dest_height {
            continue;
        }

        let dst_pixel = dest.get_pixel_mut(dx as u32, dy as u32);
        *dst_pixel = alpha_blend(*src_pixel, *dst_pixel);
    }
}

/// Alpha blends two straight-alpha RGBA pixels (source over destination).
fn alpha_blend(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    match src[3] {
        255 => return src,
        0 => return dst,
        _ => {}
    }

    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);

    let blend = |s: u8, d: u8| -> u8 {
        let sf = s as f32 / 255.0;
        let df = d as f32 / 255.0;
        let out = (sf * sa + df * da * (1.0 - sa)) / out_a;
        (out * 255.0).round() as u8
    };

    Rgba([
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}
