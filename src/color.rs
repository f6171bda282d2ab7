use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::errors::{ArborError, Result};

/// Linear RGBA color with channels in `[0, 1]`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self::rgb_unchecked(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb_unchecked(1.0, 1.0, 1.0);

    const fn rgb_unchecked(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Validates every channel against `[0, 1]`.
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Result<Self> {
        let color = Self { r, g, b, a };
        color.validate()?;
        Ok(color)
    }

    /// Opaque color.
    pub fn rgb(r: f32, g: f32, b: f32) -> Result<Self> {
        Self::new(r, g, b, 1.0)
    }

    /// Builds an opaque color from a `0xRRGGBB` value.
    #[must_use]
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xFF) as f32 / 255.0;
        Self::rgb_unchecked(channel(16), channel(8), channel(0))
    }

    /// Checks that every channel lies in `[0, 1]`. Also used after
    /// deserialization, which bypasses the constructors.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("r", self.r), ("g", self.g), ("b", self.b), ("a", self.a)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ArborError::invalid(format!(
                    "color channel {name} = {value} is outside [0, 1]"
                )));
            }
        }
        Ok(())
    }

    /// RGB channels multiplied by `factor`, alpha dropped.
    #[must_use]
    pub fn scaled_rgb(&self, factor: f32) -> [f32; 3] {
        [self.r * factor, self.g * factor, self.b * factor]
    }

    #[inline]
    #[must_use]
    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
