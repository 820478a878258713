//! Request-level render options.
//!
//! [`RenderOptions`] round-trips through JSON so a front end and the
//! generator can share one settings object:
//!
//! ```json
//! { "padding": 0.3, "background": "#1a2b3cff", "backgroundMode": "transparent", "parallel": true }
//! ```

use serde::{Deserialize, Serialize};

use crate::color::{Background, BackgroundMode};
use crate::error::ValidationError;

/// Settings shared by every profile of a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Padding proportion in [0, 1], used by profiles without their own.
    pub padding: f64,

    /// Explicit canvas fill.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,

    /// Fill policy when `background` is unset.
    pub background_mode: BackgroundMode,

    /// Render profiles on the rayon thread pool.
    pub parallel: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            padding: 0.0,
            background: None,
            background_mode: BackgroundMode::Transparent,
            parallel: true,
        }
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = Some(background);
        self
    }

    pub fn with_background_mode(mut self, mode: BackgroundMode) -> Self {
        self.background_mode = mode;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Builds options from raw form fields.
    ///
    /// Padding accepts `,` as decimal separator. A missing or blank field
    /// keeps its default.
    ///
    /// ```
    /// use iconset_renderer::RenderOptions;
    ///
    /// let options = RenderOptions::from_form(Some("0,3"), Some("#1a2b3c")).unwrap();
    /// assert_eq!(options.padding, 0.3);
    /// assert_eq!(options.background.unwrap().rgba(), [26, 43, 60, 255]);
    /// ```
    pub fn from_form(padding: Option<&str>, color: Option<&str>) -> Result<Self, ValidationError> {
        let mut options = Self::default();

        if let Some(raw) = padding.map(str::trim).filter(|s| !s.is_empty()) {
            options.padding = raw
                .replace(',', ".")
                .parse()
                .map_err(|_| ValidationError::InvalidPadding {
                    value: raw.to_string(),
                })?;
        }

        if let Some(raw) = color.map(str::trim).filter(|s| !s.is_empty()) {
            options.background = Some(raw.parse()?);
        }

        options.validate()?;
        Ok(options)
    }

    /// Checks the request padding.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&self.padding) {
            return Err(ValidationError::PaddingOutOfRange {
                field: "padding",
                value: self.padding,
            });
        }
        Ok(())
    }

    /// Serializes the options to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the options to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes options from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
