use uuid::Uuid;

use crate::color::Color;
use crate::errors::{ArborError, Result};

/// Default intensity of the ambient light every scene starts with.
pub const DEFAULT_AMBIENT_INTENSITY: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Uniform light with no position or direction.
    Ambient,
    /// Parallel rays along the entity's local `-Z`.
    Directional,
    /// Omnidirectional light at the entity's position.
    Point { range: f32 },
}

/// Light payload of a [`LIGHT`](crate::scene::EntityKind::Light) entity.
#[derive(Debug, Clone)]
pub struct Light {
    pub uuid: Uuid,
    kind: LightKind,
    color: Color,
    intensity: f32,
}

impl Light {
    fn build(kind: LightKind, color: Color, intensity: f32) -> Result<Self> {
        color.validate()?;
        check_intensity(intensity)?;
        Ok(Self {
            uuid: Uuid::new_v4(),
            kind,
            color,
            intensity,
        })
    }

    /// White ambient light at [`DEFAULT_AMBIENT_INTENSITY`].
    pub(crate) fn default_ambient() -> Self {
        Self {
            uuid: Uuid::new_v4(),
            kind: LightKind::Ambient,
            color: Color::WHITE,
            intensity: DEFAULT_AMBIENT_INTENSITY,
        }
    }

    pub fn new_ambient(color: Color, intensity: f32) -> Result<Self> {
        Self::build(LightKind::Ambient, color, intensity)
    }

    pub fn new_directional(color: Color, intensity: f32) -> Result<Self> {
        Self::build(LightKind::Directional, color, intensity)
    }

    pub fn new_point(color: Color, intensity: f32, range: f32) -> Result<Self> {
        if range <= 0.0 || !range.is_finite() {
            return Err(ArborError::invalid(format!("point light range must be positive, got {range}")));
        }
        Self::build(LightKind::Point { range }, color, intensity)
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> LightKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn is_ambient(&self) -> bool {
        self.kind == LightKind::Ambient
    }

    #[inline]
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) -> Result<()> {
        color.validate()?;
        self.color = color;
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn set_intensity(&mut self, intensity: f32) -> Result<()> {
        check_intensity(intensity)?;
        self.intensity = intensity;
        Ok(())
    }
}

fn check_intensity(intensity: f32) -> Result<()> {
    if intensity < 0.0 || !intensity.is_finite() {
        return Err(ArborError::invalid(format!(
            "light intensity must be finite and non-negative, got {intensity}"
        )));
    }
    Ok(())
}
