#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod color;
pub mod errors;
pub mod math;
pub mod render;
pub mod scene;

pub use color::Color;
pub use errors::{ArborError, Result};
pub use math::{Matrix3, Matrix4, Vector2, Vector3};
pub use render::{Geometry, GraphicsDevice, Material, MaterialKind, RenderTarget, Renderer, RendererSettings};
pub use scene::{Camera, Entity, EntityHandle, EntityKind, Light, Mesh, Scene};
