//! Output profiles and platform profile lists.
//!
//! A [`Profile`] describes one requested output image. Platforms such as
//! `android` or `windows11` map to ordered profile lists, stored as JSON in
//! the same shape the icon service has always used:
//!
//! ```json
//! [
//!   { "width": 192, "height": 192, "name": "android-launchericon-192-192", "folder": "android/" },
//!   { "width": 620, "height": 300, "name": "SplashScreen.scale-100", "folder": "windows11/", "padding": 0.1 }
//! ]
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;
use crate::geometry::SizePx;

// ============================================================================
// ImageFormat
// ============================================================================

/// Output encoding of a generated icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
    Bmp,
    Tiff,
}

impl ImageFormat {
    /// Parses a format name leniently.
    ///
    /// Matching is case-insensitive and by suffix, so `"image/png"` and
    /// `"PNG"` are both PNG and `"jpg"` is JPEG. Anything unrecognized,
    /// including an empty string, falls back to PNG.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim().to_ascii_lowercase();
        if name.ends_with("png") {
            Self::Png
        } else if name.ends_with("jpeg") || name.ends_with("jpg") {
            Self::Jpeg
        } else if name.ends_with("webp") {
            Self::Webp
        } else if name.ends_with("bmp") {
            Self::Bmp
        } else if name.ends_with("tiff") || name.ends_with("tif") {
            Self::Tiff
        } else {
            Self::Png
        }
    }

    /// File extension used in the generated path.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Webp => "webp",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
        }
    }

    /// Returns true if the encoding can store transparency.
    pub fn supports_alpha(&self) -> bool {
        !matches!(self, Self::Jpeg)
    }

    /// The matching `image` crate format.
    pub fn codec_format(&self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Webp => image::ImageFormat::WebP,
            Self::Bmp => image::ImageFormat::Bmp,
            Self::Tiff => image::ImageFormat::Tiff,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl<'de> Deserialize<'de> for ImageFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = Option::<String>::deserialize(deserializer)?;
        Ok(name.as_deref().map(Self::from_name).unwrap_or_default())
    }
}

// ============================================================================
// Profile
// ============================================================================

/// One requested output image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub width: u32,
    pub height: u32,

    /// File name without extension.
    pub name: String,

    /// Free-form description, carried through but not used for rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,

    /// Folder prefix including its trailing separator, e.g. `"android/"`.
    #[serde(default)]
    pub folder: String,

    #[serde(default)]
    pub format: ImageFormat,

    /// Padding proportion overriding the request padding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
}

impl Profile {
    /// Creates a PNG profile with no folder and no padding override.
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            name: name.into(),
            desc: None,
            folder: String::new(),
            format: ImageFormat::Png,
            padding: None,
        }
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }

    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = Some(padding);
        self
    }

    pub fn size(&self) -> SizePx {
        SizePx::new(self.width, self.height)
    }

    /// Path of the generated file: folder + name + "." + extension.
    ///
    /// The extension is the canonical one of the parsed format, so a
    /// profile declared as `"jpg"` writes `.jpeg` and `"tif"` writes `.tiff`.
    pub fn relative_path(&self) -> String {
        format!("{}{}.{}", self.folder, self.name, self.format.extension())
    }

    /// Size label in `{width}x{height}` form.
    pub fn size_label(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    /// The padding to render with, falling back to the request padding.
    ///
    /// Fails if the profile's own padding lies outside [0, 1].
    pub fn effective_padding(&self, request_padding: f64) -> Result<f64, ValidationError> {
        match self.padding {
            Some(p) if !(0.0..=1.0).contains(&p) => Err(ValidationError::PaddingOutOfRange {
                field: "profile.padding",
                value: p,
            }),
            Some(p) => Ok(p),
            None => Ok(request_padding),
        }
    }
}

// ============================================================================
// Profile providers
// ============================================================================

/// Looks up the ordered profile list for a platform id.
pub trait ProfileProvider {
    /// Returns the profiles for `platform`, or
    /// [`ValidationError::UnknownPlatform`] if it is not known.
    fn profiles(&self, platform: &str) -> Result<Vec<Profile>, ValidationError>;
}

/// In-memory platform catalog.
///
/// ```
/// use iconset_renderer::{ProfileCatalog, ProfileProvider};
///
/// let mut catalog = ProfileCatalog::new();
/// catalog
///     .insert_json("chrome", r#"[{ "width": 128, "height": 128, "name": "icon-128", "folder": "chrome/" }]"#)
///     .unwrap();
///
/// let profiles = catalog.profiles("chrome").unwrap();
/// assert_eq!(profiles[0].relative_path(), "chrome/icon-128.png");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProfileCatalog {
    platforms: HashMap<String, Vec<Profile>>,
}

impl ProfileCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a platform's profile list, replacing any previous list.
    pub fn insert(&mut self, platform: impl Into<String>, profiles: Vec<Profile>) {
        self.platforms.insert(platform.into(), profiles);
    }

    /// Parses a JSON profile array and registers it under `platform`.
    pub fn insert_json(&mut self, platform: &str, json: &str) -> Result<(), ValidationError> {
        let profiles: Vec<Profile> =
            serde_json::from_str(json).map_err(|e| ValidationError::InvalidProfiles {
                platform: platform.to_string(),
                reason: e.to_string(),
            })?;
        self.insert(platform, profiles);
        Ok(())
    }

    /// Returns the registered platform ids in no particular order.
    pub fn platforms(&self) -> impl Iterator<Item = &str> {
        self.platforms.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }
}

impl ProfileProvider for ProfileCatalog {
    fn profiles(&self, platform: &str) -> Result<Vec<Profile>, ValidationError> {
        self.platforms
            .get(platform)
            .cloned()
            .ok_or_else(|| ValidationError::UnknownPlatform(platform.to_string()))
    }
}

/// Concatenates the profile lists of several platforms in request order.
pub fn profiles_for<P, S>(provider: &P, platforms: &[S]) -> Result<Vec<Profile>, ValidationError>
where
    P: ProfileProvider + ?Sized,
    S: AsRef<str>,
{
    if platforms.is_empty() {
        return Err(ValidationError::MissingPlatform);
    }
    let mut profiles = Vec::new();
    for platform in platforms {
        profiles.extend(provider.profiles(platform.as_ref())?);
    }
    Ok(profiles)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const ANDROID: &str = r#"[
        { "width": 512, "height": 512, "name": "android-launchericon-512-512", "folder": "android/" },
        { "width": 48, "height": 48, "name": "android-launchericon-48-48", "folder": "android/", "format": "png" }
    ]"#;

    const WINDOWS: &str = r#"[
        { "width": 620, "height": 300, "name": "SplashScreen.scale-100", "desc": "splash", "folder": "windows11/", "padding": 0.1, "format": "image/jpeg" }
    ]"#;

    #[test]
    fn format_parsing_is_lenient() {
        assert_eq!(ImageFormat::from_name("PNG"), ImageFormat::Png);
        assert_eq!(ImageFormat::from_name("image/jpeg"), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_name("jpg"), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_name("webp"), ImageFormat::Webp);
        assert_eq!(ImageFormat::from_name("bmp"), ImageFormat::Bmp);
        assert_eq!(ImageFormat::from_name("tiff"), ImageFormat::Tiff);
        assert_eq!(ImageFormat::from_name("gif"), ImageFormat::Png);
        assert_eq!(ImageFormat::from_name(""), ImageFormat::Png);
    }

    #[test]
    fn profile_json_defaults() {
        let profiles: Vec<Profile> = serde_json::from_str(ANDROID).unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].format, ImageFormat::Png);
        assert_eq!(profiles[0].padding, None);
        assert_eq!(
            profiles[0].relative_path(),
            "android/android-launchericon-512-512.png"
        );
        assert_eq!(profiles[1].size_label(), "48x48");
    }

    #[test]
    fn null_and_unknown_format_fall_back_to_png() {
        let json = r#"[
            { "width": 1, "height": 1, "name": "a", "format": null },
            { "width": 1, "height": 1, "name": "b", "format": "ico" }
        ]"#;
        let profiles: Vec<Profile> = serde_json::from_str(json).unwrap();
        assert!(profiles.iter().all(|p| p.format == ImageFormat::Png));
        assert_eq!(profiles[0].relative_path(), "a.png");
    }

    #[test]
    fn relative_path_uses_canonical_extension() {
        let json = r#"[
            { "width": 1, "height": 1, "name": "a", "folder": "web/", "format": "jpg" },
            { "width": 1, "height": 1, "name": "b", "format": "image/tif" }
        ]"#;
        let profiles: Vec<Profile> = serde_json::from_str(json).unwrap();
        assert_eq!(profiles[0].relative_path(), "web/a.jpeg");
        assert_eq!(profiles[1].relative_path(), "b.tiff");
    }

    #[test]
    fn profile_padding_override() {
        let profiles: Vec<Profile> = serde_json::from_str(WINDOWS).unwrap();
        let splash = &profiles[0];
        assert_eq!(splash.format, ImageFormat::Jpeg);
        assert_eq!(splash.relative_path(), "windows11/SplashScreen.scale-100.jpeg");
        assert_eq!(splash.effective_padding(0.3).unwrap(), 0.1);
        assert_eq!(Profile::new("x", 1, 1).effective_padding(0.3).unwrap(), 0.3);

        let bad = Profile::new("x", 1, 1).with_padding(1.5);
        assert!(matches!(
            bad.effective_padding(0.0),
            Err(ValidationError::PaddingOutOfRange { .. })
        ));
    }

    #[test]
    fn serialized_profile_reads_back() {
        let profile = Profile::new("icon", 32, 16)
            .with_folder("web/")
            .with_format(ImageFormat::Webp)
            .with_padding(0.25);
        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("\"format\":\"webp\""));
        let restored: Profile = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, profile);
    }

    #[test]
    fn catalog_lookup_and_concatenation() {
        let mut catalog = ProfileCatalog::new();
        catalog.insert_json("android", ANDROID).unwrap();
        catalog.insert_json("windows11", WINDOWS).unwrap();
        assert_eq!(catalog.len(), 2);

        let profiles = profiles_for(&catalog, &["windows11", "android"]).unwrap();
        let names: Vec<_> = profiles.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "SplashScreen.scale-100",
                "android-launchericon-512-512",
                "android-launchericon-48-48"
            ]
        );
    }

    #[test]
    fn catalog_errors() {
        let mut catalog = ProfileCatalog::new();
        assert_eq!(
            catalog.profiles("ios").unwrap_err(),
            ValidationError::UnknownPlatform("ios".into())
        );
        assert_eq!(
            profiles_for::<_, &str>(&catalog, &[]).unwrap_err(),
            ValidationError::MissingPlatform
        );
        assert!(matches!(
            catalog.insert_json("broken", "{ not json"),
            Err(ValidationError::InvalidProfiles { .. })
        ));
    }
}
