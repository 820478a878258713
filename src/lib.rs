//! iconset-renderer: icon set generation from a single source graphic
//!
//! This crate renders one raster or vector source into many platform icons.
//! Every output profile gets its own canvas size, padding and encoding, and
//! the batch produces an ordered icon set plus an `icons.json` manifest.
//!
//! # Example
//!
//! ```
//! use iconset_renderer::{
//!     CancelToken, IconGenerator, Manifest, ProfileCatalog, RenderOptions, SourceImage,
//!     profiles_for,
//! };
//! use image::{Rgba, RgbaImage};
//!
//! let mut catalog = ProfileCatalog::new();
//! catalog
//!     .insert_json(
//!         "android",
//!         r#"[
//!             { "width": 192, "height": 192, "name": "android-launchericon-192-192", "folder": "android/" },
//!             { "width": 48, "height": 48, "name": "android-launchericon-48-48", "folder": "android/" }
//!         ]"#,
//!     )
//!     .unwrap();
//! let profiles = profiles_for(&catalog, &["android"]).unwrap();
//!
//! let source = SourceImage::from(RgbaImage::from_pixel(512, 512, Rgba([30, 90, 200, 255])));
//! let options = RenderOptions::from_form(Some("0.3"), Some("#ffffff")).unwrap();
//!
//! let output = IconGenerator::new(options)
//!     .run(&source, &profiles, &CancelToken::new())
//!     .unwrap();
//! let manifest = Manifest::build(&output.icons);
//! assert_eq!(manifest.icons[0].sizes, "192x192");
//! ```
//!
//! # Geometry
//!
//! Placement is computed once per profile by [`resolve`] and shared by the
//! raster and vector paths:
//!
//! ```
//! use iconset_renderer::{SizePx, resolve};
//!
//! let geometry = resolve(SizePx::new(512, 512), SizePx::new(192, 192), 0.3).unwrap();
//! assert_eq!(geometry.content, SizePx::new(164, 164));
//! assert_eq!((geometry.origin_x, geometry.origin_y), (14, 14));
//! ```

mod archive;
mod codec;
mod color;
mod error;
mod generator;
mod geometry;
mod icon;
mod manifest;
mod options;
mod profile;
pub mod render;
pub mod silhouette;
mod source;

pub use archive::{ArchiveSink, MANIFEST_FILE_NAME, ZipSink, write_icon_set};
pub use codec::{decode, encode, flatten};
pub use color::{Background, BackgroundMode};
pub use error::{
    ArchiveError, CodecError, Error, GeometryError, RenderError, SilhouetteError, ValidationError,
    VectorError,
};
pub use generator::{BatchOutput, CancelToken, IconGenerator, ProfileFailure};
pub use geometry::{Geometry, MAX_CANVAS_PIXELS, RectPx, SizePx, resolve};
pub use icon::{GeneratedIcon, IconSet};
pub use manifest::{Manifest, ManifestEntry, WebManifestIcon, web_manifest_icons};
pub use options::RenderOptions;
pub use profile::{ImageFormat, Profile, ProfileCatalog, ProfileProvider, profiles_for};
pub use render::{Rasterize, render};
pub use source::{SourceImage, VectorSource};
