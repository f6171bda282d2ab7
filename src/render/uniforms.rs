//! Uniform names shared by the built-in shaders.

pub const MODEL: &str = "u_model";
pub const VIEW: &str = "u_view";
pub const PROJECTION: &str = "u_projection";
pub const COLOR: &str = "u_color";
pub const AMBIENT: &str = "u_ambient";
pub const USE_VERTEX_COLORS: &str = "u_use_vertex_colors";
pub const USE_TEXTURE: &str = "u_use_texture";
pub const TEXTURE: &str = "u_texture";
