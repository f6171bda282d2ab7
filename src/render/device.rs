//! Graphics device abstraction.
//!
//! The renderer never talks to a graphics API directly. Everything it needs
//! from the GPU goes through [`GraphicsDevice`]: vertex/index buffers, shader
//! programs, uniforms, texture binding, and indexed draws. A backend (GL,
//! a software rasterizer, a recording mock) implements the trait.
//!
//! Handles are plain ids issued by the device. They are only meaningful to
//! the device that created them.

use crate::color::Color;
use crate::errors::Result;
use crate::render::geometry::VertexAttributes;
use crate::render::shader::ShaderSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Value uploaded to a named shader uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    /// Column-major 4x4 matrix.
    Mat4([f32; 16]),
}

pub trait GraphicsDevice {
    /// Uploads interleaved vertex data laid out per `attributes`, plus the
    /// triangle index list.
    fn create_buffer(
        &mut self,
        attributes: VertexAttributes,
        vertices: &[f32],
        indices: &[u32],
    ) -> Result<BufferHandle>;

    fn bind_buffer(&mut self, buffer: BufferHandle) -> Result<()>;

    fn destroy_buffer(&mut self, buffer: BufferHandle);

    /// Compiles and links a program. Failures surface as
    /// [`ArborError::Instantiation`](crate::errors::ArborError::Instantiation).
    fn create_program(&mut self, source: &ShaderSource) -> Result<ProgramHandle>;

    fn use_program(&mut self, program: ProgramHandle) -> Result<()>;

    /// Sets a uniform on the program in use.
    fn set_uniform(&mut self, name: &str, value: UniformValue) -> Result<()>;

    fn bind_texture(&mut self, texture: TextureHandle, unit: u32) -> Result<()>;

    fn set_viewport(&mut self, width: u32, height: u32);

    fn set_depth_test(&mut self, enabled: bool);

    /// Clears color and depth.
    fn clear(&mut self, color: Color);

    /// Draws `index_count` indices from the bound buffer as triangles.
    fn draw_indexed(&mut self, index_count: u32) -> Result<()>;
}
