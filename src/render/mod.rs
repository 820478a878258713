//! Rendering of one profile's bitmap.
//!
//! Raster and vector sources converge on [`composite`]: each path prepares
//! its content at the resolved size, then the compositor allocates the canvas,
//! fills the background and places the content.
//!
//! ```text
//! SourceImage ──► resolve() ──► Geometry
//!    │                            │
//!    ├─ Raster ──► (Lanczos3 in composite) ─┐
//!    └─ Vector ──► render_content()  ───────┴──► composite() ──► RgbaImage
//! ```

pub mod composite;
pub mod vector;

pub use composite::{composite, composite_over};
pub use vector::rasterize_vector;

use image::RgbaImage;

use crate::color::Background;
use crate::error::RenderError;
use crate::geometry::{Geometry, SizePx, resolve};
use crate::source::SourceImage;

/// Source kinds that can be drawn into a resolved geometry.
pub trait Rasterize {
    /// Size the geometry resolver scales from.
    fn source_size(&self) -> Result<SizePx, RenderError>;

    /// Produces the full canvas for `geometry`.
    fn rasterize(
        &self,
        geometry: &Geometry,
        background: Option<Background>,
    ) -> Result<RgbaImage, RenderError>;
}

impl Rasterize for RgbaImage {
    fn source_size(&self) -> Result<SizePx, RenderError> {
        Ok(SizePx::new(self.width(), self.height()))
    }

    fn rasterize(
        &self,
        geometry: &Geometry,
        background: Option<Background>,
    ) -> Result<RgbaImage, RenderError> {
        Ok(composite(self, geometry, background))
    }
}

impl Rasterize for crate::source::VectorSource {
    fn source_size(&self) -> Result<SizePx, RenderError> {
        Ok(self.pixel_size()?)
    }

    fn rasterize(
        &self,
        geometry: &Geometry,
        background: Option<Background>,
    ) -> Result<RgbaImage, RenderError> {
        Ok(rasterize_vector(self, geometry, background)?)
    }
}

impl Rasterize for SourceImage {
    fn source_size(&self) -> Result<SizePx, RenderError> {
        match self {
            Self::Raster(img) => img.source_size(),
            Self::Vector(doc) => doc.source_size(),
        }
    }

    fn rasterize(
        &self,
        geometry: &Geometry,
        background: Option<Background>,
    ) -> Result<RgbaImage, RenderError> {
        match self {
            Self::Raster(img) => img.rasterize(geometry, background),
            Self::Vector(doc) => doc.rasterize(geometry, background),
        }
    }
}

/// Resolves geometry for `target` and renders the source into it.
pub fn render<S: Rasterize + ?Sized>(
    source: &S,
    target: SizePx,
    padding: f64,
    background: Option<Background>,
) -> Result<RgbaImage, RenderError> {
    let geometry = resolve(source.source_size()?, target, padding)?;
    source.rasterize(&geometry, background)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64"><rect width="64" height="64" fill="#ffffff"/></svg>"##;

    #[test]
    fn raster_and_vector_share_placement() {
        let raster = SourceImage::Raster(RgbaImage::from_pixel(64, 64, Rgba([255, 255, 255, 255])));
        let vector = SourceImage::from_svg(SVG).unwrap();

        let a = render(&raster, SizePx::new(96, 48), 0.3, None).unwrap();
        let b = render(&vector, SizePx::new(96, 48), 0.3, None).unwrap();
        assert_eq!(a.dimensions(), b.dimensions());

        let opaque = |img: &RgbaImage| -> Vec<(u32, u32)> {
            img.enumerate_pixels()
                .filter(|(_, _, p)| p[3] == 255)
                .map(|(x, y, _)| (x, y))
                .collect()
        };
        assert_eq!(opaque(&a), opaque(&b));
    }

    #[test]
    fn geometry_errors_surface() {
        let raster = SourceImage::Raster(RgbaImage::new(8, 8));
        assert!(matches!(
            render(&raster, SizePx::new(0, 0), 0.0, None),
            Err(RenderError::Geometry(_))
        ));
    }
}
