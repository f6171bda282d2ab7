use std::sync::Arc;

use crate::render::{Geometry, Material};

/// Mesh payload of a [`MESH`](crate::scene::EntityKind::Mesh) entity.
///
/// Geometry and material are shared: several meshes may draw the same
/// geometry with different materials. Cloning a mesh clones the handles only.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub geometry: Arc<Geometry>,
    pub material: Arc<Material>,
}

impl Mesh {
    #[must_use]
    pub fn new(geometry: Arc<Geometry>, material: Arc<Material>) -> Self {
        Self { geometry, material }
    }
}
