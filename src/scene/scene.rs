use std::sync::atomic::{AtomicU32, Ordering};

use slotmap::SlotMap;

use crate::errors::{ArborError, Result};
use crate::math::Matrix4;
use crate::scene::camera::Camera;
use crate::scene::entity::Entity;
use crate::scene::light::Light;
use crate::scene::mesh::Mesh;
use crate::scene::EntityHandle;

static NEXT_SCENE_ID: AtomicU32 = AtomicU32::new(1);

/// The scene graph.
///
/// Owns every entity in an arena addressed by [`EntityHandle`]. The traversal
/// root is a GROUP entity created with the scene; the scene also references
/// one ambient light, which lives in the arena but outside the tree.
///
/// Entities created through [`insert`](Self::insert) or the `create_*`
/// helpers start detached. [`add`](Self::add) places them under a parent,
/// moving them away from any previous one. Detached entities stay alive until
/// [`destroy`](Self::destroy) is called.
pub struct Scene {
    id: u32,
    entities: SlotMap<EntityHandle, Entity>,
    root: EntityHandle,
    ambient_light: EntityHandle,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        let mut entities = SlotMap::with_key();
        let root = entities.insert(Entity::group("Scene"));
        let ambient_light = entities.insert(Entity::light(
            "AmbientLight",
            Light::default_ambient(),
        ));

        Self {
            id: NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed),
            entities,
            root,
            ambient_light,
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// The GROUP entity traversal starts from.
    #[inline]
    #[must_use]
    pub fn root(&self) -> EntityHandle {
        self.root
    }

    #[inline]
    #[must_use]
    pub fn ambient_light_handle(&self) -> EntityHandle {
        self.ambient_light
    }

    #[must_use]
    pub fn ambient_light(&self) -> Option<&Light> {
        self.entities.get(self.ambient_light).and_then(Entity::as_light)
    }

    pub fn ambient_light_mut(&mut self) -> Option<&mut Light> {
        self.entities.get_mut(self.ambient_light).and_then(Entity::as_light_mut)
    }

    /// Makes another ambient light entity the scene's ambient light.
    pub fn set_ambient_light(&mut self, handle: EntityHandle) -> Result<()> {
        let entity = self.entity(handle)?;
        if !entity.as_light().is_some_and(Light::is_ambient) {
            return Err(ArborError::invalid(format!(
                "entity '{}' is not an ambient light",
                entity.name()
            )));
        }
        self.ambient_light = handle;
        Ok(())
    }

    // ========================================================================
    // Creation & lookup
    // ========================================================================

    /// Stores a detached entity and returns its handle.
    pub fn insert(&mut self, entity: Entity) -> EntityHandle {
        self.entities.insert(entity)
    }

    pub fn create_group(&mut self, name: &str) -> EntityHandle {
        self.insert(Entity::group(name))
    }

    pub fn create_camera(&mut self, name: &str, camera: Camera) -> EntityHandle {
        self.insert(Entity::camera(name, camera))
    }

    pub fn create_light(&mut self, name: &str, light: Light) -> EntityHandle {
        self.insert(Entity::light(name, light))
    }

    pub fn create_mesh(&mut self, name: &str, mesh: Mesh) -> EntityHandle {
        self.insert(Entity::mesh(name, mesh))
    }

    #[must_use]
    pub fn get(&self, handle: EntityHandle) -> Option<&Entity> {
        self.entities.get(handle)
    }

    pub fn get_mut(&mut self, handle: EntityHandle) -> Option<&mut Entity> {
        self.entities.get_mut(handle)
    }

    pub fn entity(&self, handle: EntityHandle) -> Result<&Entity> {
        self.entities
            .get(handle)
            .ok_or_else(|| ArborError::not_found(format!("entity {handle:?}")))
    }

    pub fn entity_mut(&mut self, handle: EntityHandle) -> Result<&mut Entity> {
        self.entities
            .get_mut(handle)
            .ok_or_else(|| ArborError::not_found(format!("entity {handle:?}")))
    }

    #[must_use]
    pub fn contains(&self, handle: EntityHandle) -> bool {
        self.entities.contains_key(handle)
    }

    /// Number of live entities, detached ones and the ambient light included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityHandle, &Entity)> {
        self.entities.iter()
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    #[must_use]
    pub fn parent(&self, handle: EntityHandle) -> Option<EntityHandle> {
        self.entities.get(handle).and_then(Entity::parent)
    }

    #[must_use]
    pub fn children(&self, handle: EntityHandle) -> &[EntityHandle] {
        self.entities.get(handle).map(Entity::children).unwrap_or_default()
    }

    #[must_use]
    pub fn number_of_children(&self, handle: EntityHandle) -> usize {
        self.children(handle).len()
    }

    /// Whether `ancestor` lies on the parent chain of `node`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: EntityHandle, node: EntityHandle) -> bool {
        let mut current = self.parent(node);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }

    /// Appends `child` to `parent`'s children, first detaching it from its
    /// current parent.
    ///
    /// Rejected with `InvalidArgument` when the insertion would create a cycle
    /// (self-parenting, or `child` is an ancestor of `parent`) or when `child`
    /// is the scene root. Adding a child to its current parent is a no-op.
    pub fn add(&mut self, parent: EntityHandle, child: EntityHandle) -> Result<()> {
        self.entity(parent)?;
        self.entity(child)?;

        if parent == child {
            return Err(ArborError::invalid("an entity cannot be its own child"));
        }
        if child == self.root {
            return Err(ArborError::invalid("the scene root cannot become a child"));
        }
        if self.is_ancestor(child, parent) {
            return Err(ArborError::invalid(
                "adding an ancestor as a child would create a cycle",
            ));
        }

        let old_parent = self.parent(child);
        if old_parent == Some(parent) {
            return Ok(());
        }
        if let Some(old) = old_parent {
            self.unlink(old, child);
        }

        if let Some(p) = self.entities.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.entities.get_mut(child) {
            c.parent = Some(parent);
        }
        log::debug!("Attached {child:?} to {parent:?}");
        Ok(())
    }

    /// [`add`](Self::add) under the scene root.
    pub fn add_to_root(&mut self, child: EntityHandle) -> Result<()> {
        self.add(self.root, child)
    }

    /// Removes `child` from `parent` if `parent` is its current parent.
    /// Returns whether anything changed.
    pub fn remove(&mut self, parent: EntityHandle, child: EntityHandle) -> bool {
        if self.parent(child) != Some(parent) {
            log::warn!("remove ignored: {child:?} is not a child of {parent:?}");
            return false;
        }
        self.unlink(parent, child);
        log::debug!("Detached {child:?} from {parent:?}");
        true
    }

    /// Detaches `child` from whatever parent it has.
    pub fn detach(&mut self, child: EntityHandle) -> bool {
        match self.parent(child) {
            Some(parent) => self.remove(parent, child),
            None => false,
        }
    }

    fn unlink(&mut self, parent: EntityHandle, child: EntityHandle) {
        if let Some(p) = self.entities.get_mut(parent) {
            p.children.retain(|&c| c != child);
        }
        if let Some(c) = self.entities.get_mut(child) {
            c.parent = None;
        }
    }

    /// Removes an entity and its whole subtree from the scene.
    ///
    /// The root cannot be destroyed. The scene's ambient light is detached
    /// rather than destroyed if it sits in the subtree, and cannot be destroyed
    /// directly.
    pub fn destroy(&mut self, handle: EntityHandle) -> Result<()> {
        self.entity(handle)?;
        if handle == self.root {
            return Err(ArborError::invalid("the scene root cannot be destroyed"));
        }
        if handle == self.ambient_light {
            return Err(ArborError::invalid("the scene's ambient light cannot be destroyed"));
        }

        self.detach(handle);

        let mut stack = vec![handle];
        while let Some(current) = stack.pop() {
            if current == self.ambient_light {
                self.detach(current);
                continue;
            }
            if let Some(entity) = self.entities.remove(current) {
                stack.extend(entity.children);
            }
        }
        log::debug!("Destroyed subtree rooted at {handle:?}");
        Ok(())
    }

    // ========================================================================
    // Matrices
    // ========================================================================

    /// Local-to-parent matrix of `handle`, refreshed if dirty.
    pub fn local_matrix(&mut self, handle: EntityHandle) -> Result<Matrix4> {
        let entity = self.entity_mut(handle)?;
        Ok(entity.local_matrix().clone())
    }

    /// Local-to-world matrix of `handle`, relative to the scene root.
    ///
    /// Collects the parent chain up to (not including) the root, then composes
    /// local matrices from the outermost ancestor down:
    /// `A.local * B.local * ... * handle.local`. The root's own transform is
    /// never applied, matching the identity that flattening starts from.
    pub fn world_matrix(&mut self, handle: EntityHandle) -> Result<Matrix4> {
        self.entity(handle)?;
        if handle == self.root {
            return Ok(Matrix4::identity());
        }

        let mut chain = vec![handle];
        let mut current = self.parent(handle);
        while let Some(p) = current {
            if p == self.root {
                break;
            }
            chain.push(p);
            current = self.parent(p);
        }

        let mut world = Matrix4::identity();
        for &node in chain.iter().rev() {
            if let Some(entity) = self.entities.get_mut(node) {
                world = world.multiply(entity.local_matrix());
            }
        }
        Ok(world)
    }

    fn camera_entity(&self, handle: EntityHandle) -> Result<&Camera> {
        let entity = self.entity(handle)?;
        entity.as_camera().ok_or_else(|| {
            ArborError::invalid(format!("entity '{}' is not a camera", entity.name()))
        })
    }

    pub fn camera_mut(&mut self, handle: EntityHandle) -> Result<&mut Camera> {
        let entity = self.entity_mut(handle)?;
        let name = entity.name().to_owned();
        entity
            .as_camera_mut()
            .ok_or_else(|| ArborError::invalid(format!("entity '{name}' is not a camera")))
    }

    /// World-to-view matrix of a camera: the inverse of its world matrix.
    /// The camera's local `-Z` (its forward axis) maps to view-space `-Z`.
    pub fn view_matrix(&mut self, camera: EntityHandle) -> Result<Matrix4> {
        self.camera_entity(camera)?;
        let world = self.world_matrix(camera)?;
        world
            .inverse()
            .map(|inv| Matrix4::from_values(*inv.values()))
            .ok_or_else(|| ArborError::invalid("camera world transform is not invertible"))
    }

    pub fn projection_matrix(&self, camera: EntityHandle) -> Result<Matrix4> {
        Ok(self.camera_entity(camera)?.projection_matrix())
    }
}
