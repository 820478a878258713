//! Bitmap decode/encode through the `image` crate.

use std::io::Cursor;

use image::{DynamicImage, Rgba, RgbaImage};

use crate::color::Background;
use crate::error::CodecError;
use crate::profile::ImageFormat;

/// Decodes any supported raster format into RGBA.
pub fn decode(data: &[u8]) -> Result<RgbaImage, CodecError> {
    image::load_from_memory(data)
        .map(DynamicImage::into_rgba8)
        .map_err(CodecError::Decode)
}

/// Encodes a bitmap in `format`.
///
/// Formats without an alpha channel get the bitmap flattened onto `matte`
/// first. The matte's own alpha is ignored; it is always painted opaque.
pub fn encode(
    bitmap: &RgbaImage,
    format: ImageFormat,
    matte: Background,
) -> Result<Vec<u8>, CodecError> {
    let image = if format.supports_alpha() {
        DynamicImage::ImageRgba8(bitmap.clone())
    } else {
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(flatten(bitmap, matte)).into_rgb8())
    };

    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, format.codec_format())
        .map_err(|source| CodecError::Encode {
            format: format.extension(),
            source,
        })?;
    Ok(buf.into_inner())
}

/// Blends every pixel over an opaque matte color.
pub fn flatten(bitmap: &RgbaImage, matte: Background) -> RgbaImage {
    let [mr, mg, mb, _] = matte.rgba();
    let mut out = bitmap.clone();
    for pixel in out.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as f32 / 255.0;
        let mix = |s: u8, m: u8| (s as f32 * alpha + m as f32 * (1.0 - alpha)).round() as u8;
        *pixel = Rgba([mix(r, mr), mix(g, mg), mix(b, mb), u8::MAX]);
    }
    out
}
