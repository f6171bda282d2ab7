use crate::errors::{ArborError, Result};
use crate::math::Matrix4;

/// Projection model of a camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Perspective {
        /// Vertical field of view in degrees.
        fov_y_degrees: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
    Orthographic {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    },
}

impl Projection {
    fn validate(&self) -> Result<()> {
        match *self {
            Projection::Perspective { fov_y_degrees, aspect, near, far } => {
                if !(fov_y_degrees > 0.0 && fov_y_degrees < 180.0) {
                    return Err(ArborError::invalid(format!(
                        "field of view must be in (0, 180) degrees, got {fov_y_degrees}"
                    )));
                }
                if aspect <= 0.0 || !aspect.is_finite() {
                    return Err(ArborError::invalid(format!("aspect must be positive, got {aspect}")));
                }
                if near <= 0.0 || far <= near {
                    return Err(ArborError::invalid(format!(
                        "perspective planes require 0 < near < far, got near={near} far={far}"
                    )));
                }
            }
            Projection::Orthographic { left, right, bottom, top, near, far } => {
                if left == right || bottom == top || near == far {
                    return Err(ArborError::invalid("orthographic volume has zero extent"));
                }
            }
        }
        Ok(())
    }
}

/// Camera payload of a [`CAMERA`](crate::scene::EntityKind::Camera) entity.
///
/// The camera itself only knows its projection; the view matrix is derived
/// from the owning entity's world transform by the scene.
#[derive(Debug, Clone)]
pub struct Camera {
    projection: Projection,
}

impl Camera {
    /// `fov_y_degrees` is the vertical field of view.
    pub fn new_perspective(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Result<Self> {
        Self::with_projection(Projection::Perspective { fov_y_degrees, aspect, near, far })
    }

    pub fn new_orthographic(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Result<Self> {
        Self::with_projection(Projection::Orthographic { left, right, bottom, top, near, far })
    }

    pub fn with_projection(projection: Projection) -> Result<Self> {
        projection.validate()?;
        Ok(Self { projection })
    }

    #[inline]
    #[must_use]
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn set_projection(&mut self, projection: Projection) -> Result<()> {
        projection.validate()?;
        self.projection = projection;
        Ok(())
    }

    /// Updates the aspect ratio of a perspective camera. Orthographic cameras
    /// keep their explicit volume.
    pub fn set_aspect(&mut self, new_aspect: f32) -> Result<()> {
        if let Projection::Perspective { fov_y_degrees, near, far, .. } = self.projection {
            self.set_projection(Projection::Perspective {
                fov_y_degrees,
                aspect: new_aspect,
                near,
                far,
            })?;
        }
        Ok(())
    }

    #[must_use]
    pub fn projection_matrix(&self) -> Matrix4 {
        match self.projection {
            Projection::Perspective { fov_y_degrees, aspect, near, far } => {
                Matrix4::perspective(fov_y_degrees.to_radians(), aspect, near, far)
            }
            Projection::Orthographic { left, right, bottom, top, near, far } => {
                Matrix4::orthographic(left, right, bottom, top, near, far)
            }
        }
    }
}
