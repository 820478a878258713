//! Error types for icon generation.
//!
//! Request-level problems ([`ValidationError`]) are reported before any
//! profile is processed. Per-profile problems ([`RenderError`]) are collected
//! next to the successfully generated icons and never abort a batch.

use crate::generator::ProfileFailure;

/// A request parameter was missing or malformed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("no base image specified, request must contain an image")]
    MissingSource,

    #[error("no platform has been specified")]
    MissingPlatform,

    #[error("no profiles to generate")]
    NoProfiles,

    #[error("no profiles found for platform '{0}'")]
    UnknownPlatform(String),

    #[error("{field} value {value} is outside the range 0 to 1")]
    PaddingOutOfRange { field: &'static str, value: f64 },

    #[error("padding value '{value}' is not a number")]
    InvalidPadding { value: String },

    #[error("background color '{value}' is not a valid color")]
    InvalidColor { value: String },

    #[error("profile list for '{platform}' is not valid JSON: {reason}")]
    InvalidProfiles { platform: String, reason: String },
}

/// The target canvas cannot hold the scaled source.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("viewing area too small ({width}x{height}) to render the image")]
    ViewingAreaTooSmall { width: u32, height: u32 },

    #[error("source image has no pixels")]
    EmptySource,

    #[error("canvas {width}x{height} exceeds the maximum of {max_pixels} pixels")]
    CanvasTooLarge {
        width: u32,
        height: u32,
        max_pixels: u64,
    },
}

/// A vector source could not be rasterized.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VectorError {
    #[error("vector document has no intrinsic size (no width/height and no viewBox)")]
    NoIntrinsicSize,

    #[error("failed to parse vector document: {0}")]
    Parse(String),

    #[error("failed to allocate a {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },
}

/// Decoding or encoding a bitmap failed.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("failed to encode {format} image: {source}")]
    Encode {
        format: &'static str,
        #[source]
        source: image::ImageError,
    },
}

/// Why a single profile produced no icon.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Vector(#[from] VectorError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Top-level failure of a generation request.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("failed to load source image: {0}")]
    Source(#[source] RenderError),

    #[error("no icons generated, all {} profiles failed", .failures.len())]
    NothingGenerated { failures: Vec<ProfileFailure> },

    #[error("generation cancelled")]
    Cancelled,

    #[error("system error: {0}")]
    System(String),
}

/// A monochrome silhouette could not be produced.
#[derive(Debug, thiserror::Error)]
pub enum SilhouetteError {
    #[error("cannot trace icon: {0}")]
    Decode(#[from] CodecError),
}

/// Writing the generated set to an archive failed.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("zip error on '{path}': {source}")]
    Zip {
        path: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_name_the_field() {
        let err = ValidationError::PaddingOutOfRange {
            field: "padding",
            value: 1.5,
        };
        assert!(err.to_string().contains("padding"));

        let err = ValidationError::InvalidColor {
            value: "notacolor".into(),
        };
        assert!(err.to_string().contains("notacolor"));
    }

    #[test]
    fn render_error_is_transparent() {
        let err: RenderError = VectorError::NoIntrinsicSize.into();
        assert_eq!(err.to_string(), VectorError::NoIntrinsicSize.to_string());
    }
}
