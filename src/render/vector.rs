//! Vector rasterization using resvg.
//!
//! The document is rendered directly at the content size chosen by the
//! geometry resolver, so no bitmap resampling happens on this path. The result
//! goes through the same compositor as raster sources.

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};

use super::composite::composite;
use crate::color::Background;
use crate::error::VectorError;
use crate::geometry::Geometry;
use crate::source::VectorSource;

/// Rasterizes `doc` and composites it onto the geometry's canvas.
pub fn rasterize_vector(
    doc: &VectorSource,
    geometry: &Geometry,
    background: Option<Background>,
) -> Result<RgbaImage, VectorError> {
    let content = render_content(doc, geometry)?;
    Ok(composite(&content, geometry, background))
}

/// Renders the document into a pixmap of exactly the content size.
///
/// One uniform scale is used on both axes; any slack from rounding the
/// content size is split evenly around the drawing.
pub fn render_content(doc: &VectorSource, geometry: &Geometry) -> Result<RgbaImage, VectorError> {
    let (doc_w, doc_h) = doc.intrinsic_size()?;
    let width = geometry.content.width;
    let height = geometry.content.height;

    let scale = (width as f32 / doc_w).min(height as f32 / doc_h);
    let dx = (width as f32 - doc_w * scale) / 2.0;
    let dy = (height as f32 - doc_h * scale) / 2.0;

    let mut pixmap = Pixmap::new(width, height).ok_or(VectorError::Pixmap { width, height })?;
    let transform = Transform::from_scale(scale, scale).post_translate(dx, dy);
    resvg::render(doc.tree(), transform, &mut pixmap.as_mut());

    Ok(pixmap_to_rgba_image(&pixmap))
}

/// Converts a tiny_skia Pixmap to an image::RgbaImage.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());

    for (pixel, src) in img.pixels_mut().zip(pixmap.pixels()) {
        // tiny_skia uses premultiplied alpha, we need to unpremultiply
        let color = src.demultiply();
        *pixel = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
    }

    img
}
