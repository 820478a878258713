//! Generated icon types.
//!
//! A [`GeneratedIcon`] is one encoded output file; an [`IconSet`] holds the
//! icons of a request in profile order.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::geometry::SizePx;
use crate::profile::{ImageFormat, Profile};

/// One encoded icon produced from a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedIcon {
    relative_path: String,
    size: SizePx,
    format: ImageFormat,
    bytes: Vec<u8>,
}

impl GeneratedIcon {
    /// Wraps encoded bytes produced for `profile`.
    pub fn new(profile: &Profile, bytes: Vec<u8>) -> Self {
        Self {
            relative_path: profile.relative_path(),
            size: profile.size(),
            format: profile.format,
            bytes,
        }
    }

    /// Path inside the generated set: folder + name + "." + extension.
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    /// Pixel size in `{width}x{height}` form.
    pub fn size_label(&self) -> String {
        format!("{}x{}", self.size.width, self.size.height)
    }

    pub fn size(&self) -> SizePx {
        self.size
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// The encoded file contents.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Encodes the icon as a `data:` URL.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            STANDARD.encode(&self.bytes)
        )
    }
}

/// Icons generated for one request, in profile order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IconSet {
    pub icons: Vec<GeneratedIcon>,
}

impl IconSet {
    pub fn new() -> Self {
        Self { icons: Vec::new() }
    }

    pub fn from_icons(icons: Vec<GeneratedIcon>) -> Self {
        Self { icons }
    }

    pub fn push(&mut self, icon: GeneratedIcon) {
        self.icons.push(icon);
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    /// Finds an icon by its relative path.
    pub fn get(&self, relative_path: &str) -> Option<&GeneratedIcon> {
        self.icons.iter().find(|icon| icon.relative_path == relative_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeneratedIcon> {
        self.icons.iter()
    }
}

impl IntoIterator for IconSet {
    type Item = GeneratedIcon;
    type IntoIter = std::vec::IntoIter<GeneratedIcon>;

    fn into_iter(self) -> Self::IntoIter {
        self.icons.into_iter()
    }
}

impl<'a> IntoIterator for &'a IconSet {
    type Item = &'a GeneratedIcon;
    type IntoIter = std::slice::Iter<'a, GeneratedIcon>;

    fn into_iter(self) -> Self::IntoIter {
        self.icons.iter()
    }
}
