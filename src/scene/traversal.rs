//! Render flattening.
//!
//! Walks the scene graph once per frame and turns every MESH entity into a
//! [`RenderItem`] carrying its local-to-world matrix. The walk is depth-first
//! pre-order over children in insertion order, so the output order is
//! reproducible.
//!
//! A child's world matrix is `accumulated * child.local`, computed when the
//! child is reached. The accumulated matrix of a mesh already is its world
//! matrix; nothing else is multiplied in when the item is emitted. Cameras and
//! lights emit nothing, but their children are still visited, as are the
//! children of meshes.
//!
//! The walk uses an explicit stack so that deep hierarchies cannot overflow
//! the call stack.

use crate::math::Matrix4;
use crate::scene::mesh::Mesh;
use crate::scene::scene::Scene;
use crate::scene::EntityHandle;

/// One mesh to draw this frame. Not kept across frames.
#[derive(Debug, Clone)]
pub struct RenderItem {
    pub entity: EntityHandle,
    pub mesh: Mesh,
    /// Local-to-world matrix of the mesh.
    pub transform: Matrix4,
}

/// Flattens the whole scene, starting at the root with an identity
/// accumulated transform.
pub fn flatten(scene: &mut Scene) -> Vec<RenderItem> {
    let mut items = Vec::new();
    let root = scene.root();
    traverse(scene, root, Matrix4::identity(), &mut items);
    items
}

/// Flattens the subtree at `start`, treating `accumulated` as the transform
/// of `start` into world space. Items are appended to `out`.
pub fn traverse(
    scene: &mut Scene,
    start: EntityHandle,
    accumulated: Matrix4,
    out: &mut Vec<RenderItem>,
) {
    let mut stack = vec![(start, accumulated)];
    let mut pending = Vec::new();

    while let Some((handle, world)) = stack.pop() {
        let Some(entity) = scene.get(handle) else {
            continue;
        };

        if let Some(mesh) = entity.as_mesh() {
            out.push(RenderItem {
                entity: handle,
                mesh: mesh.clone(),
                transform: world.clone(),
            });
        }

        let children = entity.children().to_vec();
        pending.clear();
        for child in children {
            if let Some(child_entity) = scene.get_mut(child) {
                pending.push((child, world.multiply(child_entity.local_matrix())));
            }
        }
        // Reversed so the first child is popped first.
        stack.extend(pending.drain(..).rev());
    }
}
