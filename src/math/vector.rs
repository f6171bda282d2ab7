use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// A 2D point or direction.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

/// A 3D point or direction.
///
/// Operations return new values. The `*_into` variants write the result into
/// an output vector instead and return it for chaining.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0);

    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns `true` when every component is within `tolerance` of zero.
    #[must_use]
    pub fn is_zero(&self, tolerance: f32) -> bool {
        self.x.abs() <= tolerance && self.y.abs() <= tolerance
    }

    /// Component-wise comparison; `tolerance = 0.0` is exact equality.
    #[must_use]
    pub fn equal_to(&self, other: &Self, tolerance: f32) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }

    #[must_use]
    pub fn magnitude(&self) -> f32 {
        self.dot(self).sqrt()
    }

    #[must_use]
    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    #[must_use]
    pub fn scale(&self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    pub fn scale_into<'a>(&self, factor: f32, out: &'a mut Self) -> &'a mut Self {
        *out = self.scale(factor);
        out
    }

    /// `self - other`.
    #[must_use]
    pub fn minus(&self, other: &Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    pub fn minus_into<'a>(&self, other: &Self, out: &'a mut Self) -> &'a mut Self {
        *out = self.minus(other);
        out
    }

    /// Unit-length copy of this vector. A zero vector is returned unchanged.
    #[must_use]
    pub fn normalize(&self) -> Self {
        self.normalize_with_tolerance(0.0)
    }

    /// Like [`normalize`](Self::normalize), treating anything within
    /// `tolerance` of zero as the zero vector.
    #[must_use]
    pub fn normalize_with_tolerance(&self, tolerance: f32) -> Self {
        let magnitude = self.magnitude();
        if self.is_zero(tolerance) || magnitude == 0.0 {
            return *self;
        }
        self.scale(1.0 / magnitude)
    }

    pub fn normalize_into<'a>(&self, out: &'a mut Self) -> &'a mut Self {
        *out = self.normalize();
        out
    }

    #[inline]
    #[must_use]
    pub fn to_array(&self) -> [f32; 2] {
        [self.x, self.y]
    }
}

impl Vector3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    #[must_use]
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    /// Returns `true` when every component is within `tolerance` of zero.
    #[must_use]
    pub fn is_zero(&self, tolerance: f32) -> bool {
        self.x.abs() <= tolerance && self.y.abs() <= tolerance && self.z.abs() <= tolerance
    }

    /// Component-wise comparison; `tolerance = 0.0` is exact equality.
    #[must_use]
    pub fn equal_to(&self, other: &Self, tolerance: f32) -> bool {
        (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.z - other.z).abs() <= tolerance
    }

    #[must_use]
    pub fn magnitude(&self) -> f32 {
        self.dot(self).sqrt()
    }

    #[must_use]
    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Right-handed cross product `self × other`.
    #[must_use]
    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn cross_into<'a>(&self, other: &Self, out: &'a mut Self) -> &'a mut Self {
        *out = self.cross(other);
        out
    }

    #[must_use]
    pub fn scale(&self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }

    pub fn scale_into<'a>(&self, factor: f32, out: &'a mut Self) -> &'a mut Self {
        *out = self.scale(factor);
        out
    }

    /// Component-wise product.
    #[must_use]
    pub fn scale_by(&self, factors: &Self) -> Self {
        Self::new(self.x * factors.x, self.y * factors.y, self.z * factors.z)
    }

    /// `self - other`.
    #[must_use]
    pub fn minus(&self, other: &Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn minus_into<'a>(&self, other: &Self, out: &'a mut Self) -> &'a mut Self {
        *out = self.minus(other);
        out
    }

    /// Unit-length copy of this vector. A zero vector is returned unchanged.
    #[must_use]
    pub fn normalize(&self) -> Self {
        self.normalize_with_tolerance(0.0)
    }

    /// Like [`normalize`](Self::normalize), treating anything within
    /// `tolerance` of zero as the zero vector.
    #[must_use]
    pub fn normalize_with_tolerance(&self, tolerance: f32) -> Self {
        let magnitude = self.magnitude();
        if self.is_zero(tolerance) || magnitude == 0.0 {
            return *self;
        }
        self.scale(1.0 / magnitude)
    }

    pub fn normalize_into<'a>(&self, out: &'a mut Self) -> &'a mut Self {
        *out = self.normalize();
        out
    }

    #[inline]
    #[must_use]
    pub fn to_array(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

// ============================================================================
// Operators
// ============================================================================

macro_rules! impl_vector_ops {
    ($ty:ident { $($field:ident),+ }) => {
        impl Add for $ty {
            type Output = Self;
            #[inline]
            fn add(self, rhs: Self) -> Self {
                Self { $($field: self.$field + rhs.$field),+ }
            }
        }

        impl AddAssign for $ty {
            #[inline]
            fn add_assign(&mut self, rhs: Self) {
                $(self.$field += rhs.$field;)+
            }
        }

        impl Sub for $ty {
            type Output = Self;
            #[inline]
            fn sub(self, rhs: Self) -> Self {
                self.minus(&rhs)
            }
        }

        impl SubAssign for $ty {
            #[inline]
            fn sub_assign(&mut self, rhs: Self) {
                $(self.$field -= rhs.$field;)+
            }
        }

        impl Mul<f32> for $ty {
            type Output = Self;
            #[inline]
            fn mul(self, rhs: f32) -> Self {
                self.scale(rhs)
            }
        }

        impl Neg for $ty {
            type Output = Self;
            #[inline]
            fn neg(self) -> Self {
                Self { $($field: -self.$field),+ }
            }
        }
    };
}

impl_vector_ops!(Vector2 { x, y });
impl_vector_ops!(Vector3 { x, y, z });

// ============================================================================
// glam interop
// ============================================================================

impl From<Vector2> for glam::Vec2 {
    fn from(v: Vector2) -> Self {
        glam::Vec2::new(v.x, v.y)
    }
}

impl From<glam::Vec2> for Vector2 {
    fn from(v: glam::Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vector3> for glam::Vec3 {
    fn from(v: Vector3) -> Self {
        glam::Vec3::new(v.x, v.y, v.z)
    }
}

impl From<glam::Vec3> for Vector3 {
    fn from(v: glam::Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}
