//! Scene graph.
//!
//! - [`Entity`]: tagged node (group, camera, light, mesh) with a local transform
//! - [`Transform`]: TRS with a lazily recomputed local matrix
//! - [`Scene`]: entity arena, hierarchy, world/view/projection matrices
//! - [`traversal`]: per-frame flattening into [`RenderItem`]s

pub mod camera;
pub mod entity;
pub mod light;
pub mod mesh;
pub mod scene;
pub mod transform;
pub mod traversal;

pub use camera::{Camera, Projection};
pub use entity::{Entity, EntityData, EntityKind};
pub use light::{Light, LightKind};
pub use mesh::Mesh;
pub use scene::Scene;
pub use transform::Transform;
pub use traversal::RenderItem;

use slotmap::new_key_type;

new_key_type! {
    /// Stable handle of an entity inside a [`Scene`].
    pub struct EntityHandle;
}
