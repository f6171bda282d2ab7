use crate::errors::{ArborError, Result};
use crate::math::{Matrix3, Matrix4, Vector3};
use crate::scene::camera::Camera;
use crate::scene::light::Light;
use crate::scene::mesh::Mesh;
use crate::scene::transform::Transform;
use crate::scene::EntityHandle;

/// Kind tag of an entity. Decides which operations are legal and how the
/// traversal treats the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Group,
    Camera,
    Mesh,
    Light,
}

/// Kind-specific payload.
#[derive(Debug, Clone)]
pub enum EntityData {
    Group,
    Camera(Camera),
    Mesh(Mesh),
    Light(Light),
}

impl EntityData {
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityData::Group => EntityKind::Group,
            EntityData::Camera(_) => EntityKind::Camera,
            EntityData::Mesh(_) => EntityKind::Mesh,
            EntityData::Light(_) => EntityKind::Light,
        }
    }
}

/// A node of the scene graph.
///
/// # Hierarchy
///
/// `parent` and `children` are handles into the owning
/// [`Scene`](crate::scene::Scene) arena. They are only changed through the
/// scene (`add`, `remove`, `detach`), which keeps both sides in agreement.
///
/// # Transform
///
/// Spatial mutators go through kind guards first: cameras and lights cannot be
/// scaled, ambient lights cannot be moved or rotated. A rejected call returns
/// [`ArborError::UnsupportedOperation`] and changes nothing.
#[derive(Debug, Clone)]
pub struct Entity {
    name: String,
    data: EntityData,
    transform: Transform,

    pub(crate) parent: Option<EntityHandle>,
    pub(crate) children: Vec<EntityHandle>,
}

impl Entity {
    fn with_data(name: impl Into<String>, data: EntityData) -> Self {
        Self {
            name: name.into(),
            data,
            transform: Transform::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn group(name: impl Into<String>) -> Self {
        Self::with_data(name, EntityData::Group)
    }

    #[must_use]
    pub fn camera(name: impl Into<String>, camera: Camera) -> Self {
        Self::with_data(name, EntityData::Camera(camera))
    }

    #[must_use]
    pub fn light(name: impl Into<String>, light: Light) -> Self {
        Self::with_data(name, EntityData::Light(light))
    }

    #[must_use]
    pub fn mesh(name: impl Into<String>, mesh: Mesh) -> Self {
        Self::with_data(name, EntityData::Mesh(mesh))
    }

    // ========================================================================
    // Identity & payload
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.data.kind()
    }

    #[inline]
    #[must_use]
    pub fn data(&self) -> &EntityData {
        &self.data
    }

    #[must_use]
    pub fn as_camera(&self) -> Option<&Camera> {
        match &self.data {
            EntityData::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    pub fn as_camera_mut(&mut self) -> Option<&mut Camera> {
        match &mut self.data {
            EntityData::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_light(&self) -> Option<&Light> {
        match &self.data {
            EntityData::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn as_light_mut(&mut self) -> Option<&mut Light> {
        match &mut self.data {
            EntityData::Light(light) => Some(light),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_mesh(&self) -> Option<&Mesh> {
        match &self.data {
            EntityData::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn as_mesh_mut(&mut self) -> Option<&mut Mesh> {
        match &mut self.data {
            EntityData::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    // ========================================================================
    // Hierarchy (read-only)
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<EntityHandle> {
        self.parent
    }

    /// Children in insertion order.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[EntityHandle] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn number_of_children(&self) -> usize {
        self.children.len()
    }

    // ========================================================================
    // Capability guards
    // ========================================================================

    fn ensure_scalable(&self) -> Result<()> {
        match self.kind() {
            EntityKind::Camera | EntityKind::Light => Err(ArborError::unsupported(format!(
                "{:?} entity '{}' cannot be scaled",
                self.kind(),
                self.name
            ))),
            EntityKind::Group | EntityKind::Mesh => Ok(()),
        }
    }

    fn ensure_placeable(&self) -> Result<()> {
        if self.as_light().is_some_and(Light::is_ambient) {
            return Err(ArborError::unsupported(format!(
                "ambient light '{}' has no position or rotation",
                self.name
            )));
        }
        Ok(())
    }

    // ========================================================================
    // Transform
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn position(&self) -> Vector3 {
        self.transform.position()
    }

    #[inline]
    #[must_use]
    pub fn rotation(&self) -> &Matrix3 {
        self.transform.rotation()
    }

    #[inline]
    #[must_use]
    pub fn scaling(&self) -> Vector3 {
        self.transform.scale()
    }

    #[inline]
    #[must_use]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    #[inline]
    #[must_use]
    pub fn transform_needs_update(&self) -> bool {
        self.transform.needs_update()
    }

    pub fn set_position(&mut self, position: Vector3) -> Result<()> {
        self.ensure_placeable()?;
        ensure_finite(&self.name, position)?;
        self.transform.set_position(position);
        Ok(())
    }

    pub fn add_position(&mut self, delta: Vector3) -> Result<()> {
        self.ensure_placeable()?;
        ensure_finite(&self.name, self.position() + delta)?;
        self.transform.add_position(delta);
        Ok(())
    }

    pub fn set_rotation(&mut self, rotation: Matrix3) -> Result<()> {
        self.ensure_placeable()?;
        self.transform.set_rotation(rotation);
        Ok(())
    }

    /// See [`Transform::add_rotation`] for the composition order.
    pub fn add_rotation(&mut self, delta: &Matrix3) -> Result<()> {
        self.ensure_placeable()?;
        self.transform.add_rotation(delta);
        Ok(())
    }

    pub fn set_scaling(&mut self, scale: Vector3) -> Result<()> {
        self.ensure_scalable()?;
        self.transform.set_scale(scale);
        Ok(())
    }

    pub fn add_scaling(&mut self, factors: Vector3) -> Result<()> {
        self.ensure_scalable()?;
        self.transform.add_scale(factors);
        Ok(())
    }

    /// Turns the entity toward `target` (parent space) keeping `+Y` as up.
    pub fn look_at(&mut self, target: Vector3) -> Result<()> {
        self.ensure_placeable()?;
        if !self.transform.look_at(target, Vector3::Y) {
            log::warn!("look_at on '{}' ignored: degenerate direction", self.name);
        }
        Ok(())
    }

    /// Moves the entity to `position`, then turns it toward `target`.
    pub fn look_at_from(&mut self, position: Vector3, target: Vector3, up: Vector3) -> Result<()> {
        self.ensure_placeable()?;
        ensure_finite(&self.name, position)?;
        self.transform.set_position(position);
        if !self.transform.look_at(target, up) {
            log::warn!("look_at on '{}' ignored: degenerate direction", self.name);
        }
        Ok(())
    }

    /// Local-to-parent matrix, recomputed only when dirty.
    pub fn local_matrix(&mut self) -> &Matrix4 {
        self.transform.local_matrix()
    }
}

fn ensure_finite(name: &str, position: Vector3) -> Result<()> {
    if position.is_finite() {
        Ok(())
    } else {
        Err(ArborError::invalid(format!(
            "position of '{name}' must be finite, got {position:?}"
        )))
    }
}
