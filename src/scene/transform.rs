use crate::math::{Matrix3, Matrix4, Vector3};

/// Local TRS transform of an entity.
///
/// Holds position, rotation and scale together with the cached local matrix
/// (`Translation * Rotation * Scale`). Every setter raises the dirty flag; the
/// flag is only cleared when [`local_matrix`](Self::local_matrix) recomputes
/// the cache.
#[derive(Debug, Clone)]
pub struct Transform {
    position: Vector3,
    rotation: Matrix3,
    scale: Vector3,

    local_matrix: Matrix4,
    needs_update: bool,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vector3::ZERO,
            rotation: Matrix3::identity(),
            scale: Vector3::ONE,

            local_matrix: Matrix4::identity(),
            needs_update: true,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn position(&self) -> Vector3 {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn rotation(&self) -> &Matrix3 {
        &self.rotation
    }

    #[inline]
    #[must_use]
    pub fn scale(&self) -> Vector3 {
        self.scale
    }

    /// Whether the cached local matrix is stale.
    #[inline]
    #[must_use]
    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    // ========================================================================
    // Mutators
    // ========================================================================

    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
        self.mark_dirty();
    }

    pub fn add_position(&mut self, delta: Vector3) {
        self.position += delta;
        self.mark_dirty();
    }

    pub fn set_rotation(&mut self, rotation: Matrix3) {
        self.rotation = rotation;
        self.mark_dirty();
    }

    /// Composes `delta` with the current rotation as `current * delta`, so the
    /// added rotation acts in local space before the existing one.
    pub fn add_rotation(&mut self, delta: &Matrix3) {
        self.rotation = self.rotation.multiply(delta);
        self.mark_dirty();
    }

    pub fn set_scale(&mut self, scale: Vector3) {
        self.scale = scale;
        self.mark_dirty();
    }

    /// Multiplies the current scale component-wise by `factors`.
    pub fn add_scale(&mut self, factors: Vector3) {
        self.scale = self.scale.scale_by(&factors);
        self.mark_dirty();
    }

    /// Orients the transform so that local `-Z` points from `position` toward
    /// `target`, with `up` as the approximate vertical.
    ///
    /// The basis is `forward = normalize(target - position)`,
    /// `right = normalize(forward × up)`, `up' = right × forward`, stored as the
    /// columns `(right, up', -forward)`.
    ///
    /// Returns `false` and leaves the rotation untouched when `target`
    /// coincides with the position, `forward` is parallel to `up`, or either
    /// input is not finite.
    pub fn look_at(&mut self, target: Vector3, up: Vector3) -> bool {
        if !target.is_finite() || !up.is_finite() {
            return false;
        }
        let forward = (target - self.position).normalize();
        let side = forward.cross(&up);
        if forward.is_zero(0.0) || side.dot(&side) < 1e-8 {
            return false;
        }

        let right = side.normalize();
        let new_up = right.cross(&forward);
        self.set_rotation(Matrix3::from_columns(right, new_up, -forward));
        true
    }

    /// Raises the dirty flag without changing any component.
    #[inline]
    pub fn mark_dirty(&mut self) {
        self.needs_update = true;
    }

    // ========================================================================
    // Matrix cache
    // ========================================================================

    /// Returns the local matrix, recomputing it only if a setter ran since the
    /// last call.
    pub fn local_matrix(&mut self) -> &Matrix4 {
        if self.needs_update {
            self.local_matrix
                .set_values(*Matrix4::from_trs(self.position, &self.rotation, self.scale).values());
            self.needs_update = false;
        }
        &self.local_matrix
    }

    /// The cached local matrix, or `None` while it is stale.
    #[must_use]
    pub fn cached_local_matrix(&self) -> Option<&Matrix4> {
        (!self.needs_update).then_some(&self.local_matrix)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
