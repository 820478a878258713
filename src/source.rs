//! The source graphic an icon set is generated from.
//!
//! A request carries exactly one source: either a raster bitmap decoded by the
//! `image` crate, or a vector document parsed by `usvg`. Both are read-only for
//! the lifetime of a batch and dropped at the end of the request.

use std::ops::Range;

use image::RgbaImage;
use resvg::usvg::{Options, Tree};

use crate::codec;
use crate::error::{Error, RenderError, ValidationError, VectorError};
use crate::geometry::SizePx;

// ============================================================================
// VectorSource
// ============================================================================

/// A parsed vector document.
pub struct VectorSource {
    tree: Tree,
    declared: Option<(f32, f32)>,
}

impl VectorSource {
    /// Parses SVG data.
    ///
    /// Documents without an intrinsic size parse successfully; rasterizing
    /// them fails later with [`VectorError::NoIntrinsicSize`].
    pub fn from_data(data: &[u8]) -> Result<Self, VectorError> {
        let text = std::str::from_utf8(data).map_err(|e| VectorError::Parse(e.to_string()))?;
        let tree = Tree::from_str(text, &Options::default())
            .map_err(|e| VectorError::Parse(e.to_string()))?;
        Ok(Self {
            tree,
            declared: declared_size(text),
        })
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The size the document declares through `width`/`height` or `viewBox`.
    pub fn declared_size(&self) -> Option<(f32, f32)> {
        self.declared
    }

    /// The document size to rasterize from.
    pub fn intrinsic_size(&self) -> Result<(f32, f32), VectorError> {
        self.declared.ok_or(VectorError::NoIntrinsicSize)?;
        let size = self.tree.size();
        Ok((size.width(), size.height()))
    }

    /// Intrinsic size rounded to whole pixels, used for geometry.
    pub fn pixel_size(&self) -> Result<SizePx, VectorError> {
        let (w, h) = self.intrinsic_size()?;
        Ok(SizePx::new(w.round().max(1.0) as u32, h.round().max(1.0) as u32))
    }
}

impl std::fmt::Debug for VectorSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorSource")
            .field("declared", &self.declared)
            .finish_non_exhaustive()
    }
}

/// Reads the size declared on the root `<svg>` element.
///
/// Absolute `width` and `height` win; percentages count as undeclared. A
/// `viewBox` with positive extent is the fallback.
fn declared_size(svg: &str) -> Option<(f32, f32)> {
    let tag = root_tag(svg)?;
    let width = attribute(tag, "width").and_then(parse_length);
    let height = attribute(tag, "height").and_then(parse_length);
    if let (Some(w), Some(h)) = (width, height) {
        return Some((w, h));
    }

    let view_box = attribute(tag, "viewBox")?;
    let numbers: Vec<f32> = view_box
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;
    match numbers[..] {
        [_, _, w, h] if w > 0.0 && h > 0.0 => Some((w, h)),
        _ => None,
    }
}

/// Returns the text of the opening `<svg ...>` tag.
fn root_tag(svg: &str) -> Option<&str> {
    let mut rest = svg;
    loop {
        let start = rest.find("<svg")?;
        let after = &rest[start + 4..];
        // Skip prefixes like <svgfoo.
        if after.starts_with(|c: char| c.is_whitespace() || c == '>' || c == '/') {
            let end = after.find('>')?;
            return Some(&after[..end]);
        }
        rest = after;
    }
}

/// Finds `name="value"` (or single-quoted) inside a tag.
pub(crate) fn attribute<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    attribute_span(tag, name).map(|range| &tag[range])
}

/// Byte range of an attribute's value inside a tag, quotes excluded.
pub(crate) fn attribute_span(tag: &str, name: &str) -> Option<Range<usize>> {
    let mut offset = 0;
    while let Some(pos) = tag[offset..].find(name) {
        let start = offset + pos;
        let boundary = tag[..start]
            .chars()
            .next_back()
            .is_none_or(|c| c.is_whitespace());
        let after_name = start + name.len();
        if boundary {
            let rest = &tag[after_name..];
            let trimmed = rest.trim_start();
            if let Some(value) = trimmed.strip_prefix('=') {
                let value_trimmed = value.trim_start();
                let quote = value_trimmed.chars().next()?;
                if quote == '"' || quote == '\'' {
                    let value_start = tag.len() - value_trimmed.len() + 1;
                    let len = tag[value_start..].find(quote)?;
                    return Some(value_start..value_start + len);
                }
            }
        }
        offset = after_name;
    }
    None
}

fn parse_length(value: &str) -> Option<f32> {
    let value = value.trim();
    if value.ends_with('%') {
        return None;
    }
    // Longest numeric prefix, so unit suffixes like `px` or `em` are dropped.
    let number = (1..=value.len())
        .rev()
        .filter(|&end| value.is_char_boundary(end))
        .find_map(|end| value[..end].parse::<f32>().ok())?;
    (number.is_finite() && number > 0.0).then_some(number)
}

// ============================================================================
// SourceImage
// ============================================================================

/// The single source graphic of a request.
#[derive(Debug)]
pub enum SourceImage {
    /// A decoded bitmap.
    Raster(RgbaImage),
    /// A vector document.
    Vector(VectorSource),
}

impl SourceImage {
    /// Loads a source from uploaded bytes.
    ///
    /// A `content_type` containing `svg` selects the vector path. Without a
    /// content type, data that starts with `<svg` or `<?xml` is treated as
    /// vector; everything else is decoded as a bitmap.
    pub fn from_bytes(data: &[u8], content_type: Option<&str>) -> Result<Self, Error> {
        if data.is_empty() {
            return Err(ValidationError::MissingSource.into());
        }
        let is_vector = match content_type {
            Some(ct) => ct.to_ascii_lowercase().contains("svg"),
            None => looks_like_svg(data),
        };

        if is_vector {
            let vector = VectorSource::from_data(data)
                .map_err(|e| Error::Source(RenderError::Vector(e)))?;
            tracing::debug!(declared = ?vector.declared_size(), "Loaded vector source");
            Ok(Self::Vector(vector))
        } else {
            let bitmap = codec::decode(data).map_err(|e| Error::Source(RenderError::Codec(e)))?;
            tracing::debug!(
                width = bitmap.width(),
                height = bitmap.height(),
                "Decoded raster source"
            );
            Ok(Self::Raster(bitmap))
        }
    }

    /// Parses an SVG string.
    pub fn from_svg(svg: &str) -> Result<Self, VectorError> {
        VectorSource::from_data(svg.as_bytes()).map(Self::Vector)
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, Self::Vector(_))
    }

    pub fn is_raster(&self) -> bool {
        matches!(self, Self::Raster(_))
    }

    /// The decoded bitmap for raster sources.
    pub fn as_raster(&self) -> Option<&RgbaImage> {
        match self {
            Self::Raster(img) => Some(img),
            Self::Vector(_) => None,
        }
    }
}

impl From<RgbaImage> for SourceImage {
    fn from(img: RgbaImage) -> Self {
        Self::Raster(img)
    }
}

fn looks_like_svg(data: &[u8]) -> bool {
    let head = &data[..data.len().min(512)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || text.starts_with("<?xml")
}

// ============================================================================
// Tests
// ============================================================================
