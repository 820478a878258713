//! Manifests describing a generated icon set.
//!
//! [`Manifest`] is the `icons.json` written next to the icons:
//!
//! ```json
//! {
//!   "icons": [
//!     { "src": "android/android-launchericon-192-192.png", "sizes": "192x192" }
//!   ]
//! }
//! ```
//!
//! [`WebManifestIcon`] is the web app manifest form, with the image inlined
//! as a data URL.

use serde::{Deserialize, Serialize};

use crate::icon::{GeneratedIcon, IconSet};

/// One `icons.json` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    /// Relative path of the icon inside the set.
    pub src: String,
    /// `{width}x{height}`.
    pub sizes: String,
}

impl From<&GeneratedIcon> for ManifestEntry {
    fn from(icon: &GeneratedIcon) -> Self {
        Self {
            src: icon.relative_path().to_string(),
            sizes: icon.size_label(),
        }
    }
}

/// Ordered list of generated icons.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct Manifest {
    pub icons: Vec<ManifestEntry>,
}

impl Manifest {
    /// Lists every icon of `set` in set order.
    pub fn build(set: &IconSet) -> Self {
        Self {
            icons: set.iter().map(ManifestEntry::from).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    /// Serializes the manifest to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the manifest to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// Web manifest icons
// ============================================================================

/// An icon entry of a web app manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct WebManifestIcon {
    pub src: String,
    /// MIME type of the image.
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Space-separated `{width}x{height}` sizes.
    pub sizes: String,
    /// `any`, `maskable` or `monochrome`.
    pub purpose: String,
}

impl WebManifestIcon {
    /// Builds an entry with the icon inlined as a base64 data URL.
    pub fn inline(icon: &GeneratedIcon) -> Self {
        Self {
            src: icon.to_data_url(),
            mime_type: icon.format().mime_type().to_string(),
            sizes: icon.size_label(),
            purpose: "any".to_string(),
        }
    }

    /// Parses every valid `{width}x{height}` token of `sizes`.
    ///
    /// Malformed tokens and zero dimensions are skipped.
    pub fn dimensions(&self) -> Vec<(u32, u32)> {
        self.sizes
            .split_whitespace()
            .filter_map(|token| {
                let (w, h) = token.split_once('x')?;
                Some((w.parse().ok()?, h.parse().ok()?))
            })
            .filter(|&(w, h)| w != 0 && h != 0)
            .collect()
    }

    /// The dimension with the largest width + height.
    pub fn largest_dimension(&self) -> Option<(u32, u32)> {
        self.dimensions()
            .into_iter()
            .max_by_key(|&(w, h)| u64::from(w) + u64::from(h))
    }

    /// Returns true if any listed size is square.
    pub fn is_square(&self) -> bool {
        self.dimensions().iter().any(|&(w, h)| w == h)
    }
}

/// Inlines every icon of `set` as a web manifest entry, in set order.
pub fn web_manifest_icons(set: &IconSet) -> Vec<WebManifestIcon> {
    set.iter().map(WebManifestIcon::inline).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{ImageFormat, Profile};

    fn icon_set() -> IconSet {
        IconSet::from_icons(vec![
            GeneratedIcon::new(
                &Profile::new("icon-512", 512, 512).with_folder("android/"),
                vec![0],
            ),
            GeneratedIcon::new(
                &Profile::new("splash", 620, 300)
                    .with_folder("windows11/")
                    .with_format(ImageFormat::Jpeg),
                vec![1, 2],
            ),
        ])
    }

    #[test]
    fn build_lists_icons_in_order() {
        let manifest = Manifest::build(&icon_set());
        assert_eq!(
            manifest.icons,
            [
                ManifestEntry {
                    src: "android/icon-512.png".into(),
                    sizes: "512x512".into()
                },
                ManifestEntry {
                    src: "windows11/splash.jpeg".into(),
                    sizes: "620x300".into()
                },
            ]
        );
    }

    #[test]
    fn json_shape() {
        let manifest = Manifest::build(&icon_set());
        assert_eq!(
            manifest.to_json().unwrap(),
            r#"{"icons":[{"src":"android/icon-512.png","sizes":"512x512"},{"src":"windows11/splash.jpeg","sizes":"620x300"}]}"#
        );
        let pretty = manifest.to_json_pretty().unwrap();
        assert_eq!(Manifest::from_json(&pretty).unwrap(), manifest);
    }

    #[test]
    fn empty_set_gives_empty_manifest() {
        let manifest = Manifest::build(&IconSet::new());
        assert!(manifest.is_empty());
        assert_eq!(manifest.to_json().unwrap(), r#"{"icons":[]}"#);
    }

    #[test]
    fn web_icons_inline_data() {
        let icons = web_manifest_icons(&icon_set());
        assert_eq!(icons.len(), 2);
        assert_eq!(icons[1].src, "data:image/jpeg;base64,AQI=");
        assert_eq!(icons[1].mime_type, "image/jpeg");
        assert_eq!(icons[1].purpose, "any");

        let json = serde_json::to_value(&icons[0]).unwrap();
        assert_eq!(json["type"], "image/png");
        assert_eq!(json["sizes"], "512x512");
    }

    #[test]
    fn sizes_helpers() {
        let mut icon = WebManifestIcon::inline(&icon_set().icons[1]);
        assert_eq!(icon.dimensions(), [(620, 300)]);
        assert!(!icon.is_square());

        icon.sizes = "48x48 bogus 0x10 192x96".into();
        assert_eq!(icon.dimensions(), [(48, 48), (192, 96)]);
        assert_eq!(icon.largest_dimension(), Some((192, 96)));
        assert!(icon.is_square());

        icon.sizes = "any".into();
        assert_eq!(icon.largest_dimension(), None);
    }
}
