//! Rendering.
//!
//! - [`Geometry`] / [`Material`]: what a mesh draws
//! - [`GraphicsDevice`] / [`RenderTarget`]: the backend seams
//! - [`RenderContext`]: shader programs and geometry buffers owned by one renderer
//! - [`Renderer`]: per-frame orchestration

pub mod context;
pub mod device;
pub mod geometry;
pub mod input;
pub mod material;
pub mod primitives;
pub mod renderer;
pub mod settings;
pub mod shader;
pub mod uniforms;
pub mod window;

pub use context::RenderContext;
pub use device::{BufferHandle, GraphicsDevice, ProgramHandle, TextureHandle, UniformValue};
pub use geometry::{Geometry, VertexAttributes};
pub use input::Input;
pub use material::{Material, MaterialKind};
pub use renderer::{FrameStats, Renderer};
pub use settings::RendererSettings;
pub use shader::{ShaderLibrary, ShaderSource};
pub use window::{InputEvent, MouseButton, RenderTarget, WindowId};
