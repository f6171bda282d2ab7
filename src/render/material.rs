use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::color::Color;
use crate::errors::Result;
use crate::render::device::TextureHandle;

/// Shading model of a material. Each kind maps to one shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialKind {
    /// Unlit: flat color, optionally modulated by vertex colors or a texture.
    Basic,
    /// Diffuse lit by the scene's ambient light.
    Lambert,
    /// Visualizes world-space normals.
    Normal,
}

impl MaterialKind {
    pub const ALL: [Self; 3] = [Self::Basic, Self::Lambert, Self::Normal];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Lambert => "lambert",
            Self::Normal => "normal",
        }
    }
}

/// Surface description shared between meshes.
#[derive(Debug, Clone)]
pub struct Material {
    pub uuid: Uuid,
    kind: MaterialKind,
    color: Color,
    texture: Option<TextureHandle>,
    vertex_colors: bool,
}

impl Material {
    pub fn new(kind: MaterialKind, color: Color) -> Result<Self> {
        color.validate()?;
        Ok(Self {
            uuid: Uuid::new_v4(),
            kind,
            color,
            texture: None,
            vertex_colors: false,
        })
    }

    pub fn basic(color: Color) -> Result<Self> {
        Self::new(MaterialKind::Basic, color)
    }

    pub fn lambert(color: Color) -> Result<Self> {
        Self::new(MaterialKind::Lambert, color)
    }

    #[must_use]
    pub fn normal() -> Self {
        Self {
            uuid: Uuid::new_v4(),
            kind: MaterialKind::Normal,
            color: Color::WHITE,
            texture: None,
            vertex_colors: false,
        }
    }

    #[must_use]
    pub fn with_texture(mut self, texture: TextureHandle) -> Self {
        self.texture = Some(texture);
        self
    }

    #[must_use]
    pub fn with_vertex_colors(mut self, enabled: bool) -> Self {
        self.vertex_colors = enabled;
        self
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> MaterialKind {
        self.kind
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
    pub fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }

    pub fn set_texture(&mut self, texture: Option<TextureHandle>) {
        self.texture = texture;
    }

    #[inline]
    #[must_use]
    pub fn uses_vertex_colors(&self) -> bool {
        self.vertex_colors
    }

    pub fn set_vertex_colors(&mut self, enabled: bool) {
        self.vertex_colors = enabled;
    }
}
