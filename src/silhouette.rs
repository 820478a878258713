//! Monochrome silhouettes of generated icons.
//!
//! Platforms such as Windows tiles and Safari pinned tabs want a single-color
//! glyph. Raster icons are traced into an SVG made of one white path; vector
//! sources are recolored in place.


use image::RgbaImage;

use crate::codec;
use crate::color::Background;
use crate::error::SilhouetteError;
use crate::icon::GeneratedIcon;
use crate::source::attribute_span;

/// Silhouette fill color.
const FOREGROUND: &str = "#ffffff";

/// SVG elements that paint shapes.
static GRAPHICAL_ELEMENTS: &[&str] = &[
    "circle", "ellipse", "line", "path", "polygon", "polyline", "rect", "text", "use",
];

/// SVG elements whose `fill` is inherited by their children.
static CONTAINER_ELEMENTS: &[&str] = &[
    "defs", "g", "marker", "mask", "pattern", "switch", "symbol",
];

fn is_graphical(name: &str) -> bool {
    GRAPHICAL_ELEMENTS.contains(&name)
}

fn is_container(name: &str) -> bool {
    CONTAINER_ELEMENTS.contains(&name)
}

// ============================================================================
// Raster tracing
// ============================================================================

/// Traces a generated icon into a white-on-transparent SVG of the same size.
///
/// Pixels that are mostly transparent, white, or equal to `background` are
/// background; everything else is foreground. Foreground pixels are emitted
/// as horizontal runs, one subpath per run.
pub fn trace_icon(
    icon: &GeneratedIcon,
    background: Option<Background>,
) -> Result<String, SilhouetteError> {
    let bitmap = codec::decode(icon.bytes())?;
    let (width, height) = bitmap.dimensions();
    let d = trace_runs(&bitmap, background);

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    if !d.is_empty() {
        svg.push_str(&format!(r#"<path fill="{FOREGROUND}" d="{d}"/>"#));
    }
    svg.push_str("</svg>");

    tracing::debug!(icon = icon.relative_path(), path_len = d.len(), "Traced silhouette");
    Ok(svg)
}

fn is_background_pixel(pixel: [u8; 4], background: Option<Background>) -> bool {
    let [r, g, b, a] = pixel;
    if a < 128 || (r, g, b) == (255, 255, 255) {
        return true;
    }
    background.is_some_and(|bg| (bg.r, bg.g, bg.b) == (r, g, b))
}

fn trace_runs(bitmap: &RgbaImage, background: Option<Background>) -> String {
    let mut d = String::new();
    for (y, row) in bitmap.rows().enumerate() {
        let mut run_start = None;
        for (x, pixel) in row.enumerate() {
            let foreground = !is_background_pixel(pixel.0, background);
            match (foreground, run_start) {
                (true, None) => run_start = Some(x),
                (false, Some(start)) => {
                    push_run(&mut d, start, x, y);
                    run_start = None;
                }
                _ => {}
            }
        }
        if let Some(start) = run_start {
            push_run(&mut d, start, bitmap.width() as usize, y);
        }
    }
    d
}

fn push_run(d: &mut String, start: usize, end: usize, y: usize) {
    let len = end - start;
    d.push_str(&format!("M{start} {y}h{len}v1h-{len}z"));
}

// ============================================================================
// Vector recoloring
// ============================================================================

/// Recolors an SVG document into a white silhouette.
///
/// Graphical and container elements filled with white or with `background`
/// become transparent; every other fill becomes white. Graphical elements
/// without a `fill` default to black and are painted white too. `none` and
/// `transparent` are left alone.
pub fn recolor_svg(svg: &str, background: Option<Background>) -> String {
    let mut result = String::with_capacity(svg.len());
    let mut remaining = svg;

    while let Some(open) = remaining.find('<') {
        result.push_str(&remaining[..open]);
        remaining = &remaining[open..];

        let name_end = remaining[1..]
            .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
            .map_or(remaining.len(), |i| i + 1);
        let name = &remaining[1..name_end];
        let Some(close) = remaining.find('>') else {
            break;
        };

        if is_graphical(name) || is_container(name) {
            result.push_str(&recolor_tag(&remaining[..close], is_graphical(name), background));
        } else {
            result.push_str(&remaining[..close]);
        }
        remaining = &remaining[close..];
        result.push('>');
        remaining = &remaining[1..];
    }

    result.push_str(remaining);
    result
}

/// Rewrites the `fill` of one start tag, given without its closing `>`.
fn recolor_tag(tag: &str, paints_by_default: bool, background: Option<Background>) -> String {
    match attribute_span(tag, "fill") {
        Some(span) => {
            let value = &tag[span.clone()];
            let replacement = if value == "none" || value == "transparent" {
                value
            } else if is_background_fill(value, background) {
                "transparent"
            } else {
                FOREGROUND
            };
            format!("{}{}{}", &tag[..span.start], replacement, &tag[span.end..])
        }
        None if paints_by_default => {
            let (body, self_closing) = match tag.strip_suffix('/') {
                Some(body) => (body.trim_end(), "/"),
                None => (tag, ""),
            };
            format!(r#"{body} fill="{FOREGROUND}"{self_closing}"#)
        }
        None => tag.to_string(),
    }
}

fn is_background_fill(value: &str, background: Option<Background>) -> bool {
    let Ok(color) = value.parse::<Background>() else {
        return false;
    };
    let rgb = (color.r, color.g, color.b);
    rgb == (255, 255, 255) || background.is_some_and(|bg| (bg.r, bg.g, bg.b) == rgb)
}
