//! Background colors and the background fill policy.

use std::fmt;
use std::str::FromStr;

use image::{Rgba, RgbaImage};
use palette::Srgb;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// An RGBA background color.
///
/// Parses from `#rgb`, `#rrggbb`, `#rrggbbaa` (the `#` is optional), CSS
/// color names such as `"teal"`, and the keyword `"transparent"`. Serializes
/// as `#rrggbbaa`.
///
/// ```
/// use iconset_renderer::Background;
///
/// let bg: Background = "#1a2b3c".parse().unwrap();
/// assert_eq!(bg.rgba(), [26, 43, 60, 255]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Background {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Background {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgba(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Returns the color as an `image` pixel.
    pub fn to_pixel(&self) -> Rgba<u8> {
        Rgba(self.rgba())
    }

    pub fn from_pixel(pixel: Rgba<u8>) -> Self {
        let [r, g, b, a] = pixel.0;
        Self::new(r, g, b, a)
    }

    pub fn is_opaque(&self) -> bool {
        self.a == u8::MAX
    }

    /// Formats the color as lowercase `#rrggbbaa`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Background {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidColor {
            value: s.to_string(),
        };
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("transparent") {
            return Ok(Self::TRANSPARENT);
        }

        if let Some(named) = palette::named::from_str(&trimmed.to_ascii_lowercase()) {
            return Ok(Self::new(named.red, named.green, named.blue, u8::MAX));
        }

        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        // palette handles the 3 and 6 digit forms; the alpha digits are ours.
        let (rgb, alpha) = match hex.len() {
            3 | 6 => (hex, u8::MAX),
            4 => (&hex[..3], expand_nibble(&hex[3..]).ok_or_else(invalid)?),
            8 => (
                &hex[..6],
                u8::from_str_radix(&hex[6..], 16).map_err(|_| invalid())?,
            ),
            _ => return Err(invalid()),
        };
        let color: Srgb<u8> = rgb.parse().map_err(|_| invalid())?;
        Ok(Self::new(color.red, color.green, color.blue, alpha))
    }
}

fn expand_nibble(digit: &str) -> Option<u8> {
    let v = u8::from_str_radix(digit, 16).ok()?;
    Some(v * 16 + v)
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Background {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Background {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "jsonschema")]
impl schemars::JsonSchema for Background {
    fn schema_name() -> String {
        "Background".to_string()
    }

    fn json_schema(generator: &mut schemars::r#gen::SchemaGenerator) -> schemars::schema::Schema {
        <String as schemars::JsonSchema>::json_schema(generator)
    }
}

/// What fills the canvas when no background color is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundMode {
    /// Leave the canvas fully transparent.
    #[default]
    Transparent,
    /// Use the color of the raster source's top-left pixel.
    ///
    /// Vector sources have no pixel to sample and stay transparent.
    SampleCorner,
}

impl BackgroundMode {
    /// Picks the effective background for a source bitmap.
    ///
    /// An explicit color always wins. `raster` is `None` for vector sources.
    pub fn resolve(
        &self,
        explicit: Option<Background>,
        raster: Option<&RgbaImage>,
    ) -> Option<Background> {
        if explicit.is_some() {
            return explicit;
        }
        match self {
            Self::Transparent => None,
            Self::SampleCorner => raster
                .filter(|img| img.width() > 0 && img.height() > 0)
                .map(|img| Background::from_pixel(*img.get_pixel(0, 0))),
        }
    }
}
