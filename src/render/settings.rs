//! Renderer Settings
//!
//! Startup configuration for [`Renderer`](crate::render::Renderer).
//!
//! ```rust,ignore
//! use arbor::render::RendererSettings;
//!
//! let settings = RendererSettings::from_json(r#"{ "background": { "r": 0.1, "g": 0.1, "b": 0.2, "a": 1.0 } }"#)?;
//! assert!(settings.depth_test);
//! ```
//!
//! Missing fields fall back to [`Default`]. Parsed settings are validated the
//! same way as values passed to the renderer's setters.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::errors::{ArborError, Result};

/// Highest texture unit the renderer will bind to.
pub const MAX_TEXTURE_UNIT: u32 = 15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    /// Clear color at the start of every frame.
    ///
    /// Default: black.
    pub background: Color,

    /// Whether depth testing is enabled.
    ///
    /// Default: `true`.
    pub depth_test: bool,

    /// Texture unit material textures are bound to.
    ///
    /// Default: `0`.
    pub texture_unit: u32,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            background: Color::BLACK,
            depth_test: true,
            texture_unit: 0,
        }
    }
}

impl RendererSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.background.validate()?;
        if self.texture_unit > MAX_TEXTURE_UNIT {
            return Err(ArborError::invalid(format!(
                "texture unit {} exceeds {MAX_TEXTURE_UNIT}",
                self.texture_unit
            )));
        }
        Ok(())
    }
}
