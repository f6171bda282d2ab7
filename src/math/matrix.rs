//! Row-major square matrices.
//!
//! Values are stored flat, `index = row * N + col`, and vectors are treated as
//! columns: `M * v`. Composition therefore reads right-to-left, a local
//! transform is `Translation * Rotation * Scale` and a child's world matrix is
//! `parent_world * child_local`.
//!
//! Each matrix lazily computes its inverse once and keeps it until the next
//! mutation. Every path that writes values (`set_values`, `set`, `IndexMut`,
//! `multiply_into`) drops the cached inverse.

use std::cell::OnceCell;
use std::fmt;
use std::ops::{Index, IndexMut, Mul};

use crate::errors::{ArborError, Result};
use crate::math::vector::Vector3;
use crate::math::DETERMINANT_EPSILON;

// ============================================================================
// Shared kernel
// ============================================================================

fn multiply<const N: usize, const LEN: usize>(a: &[f32; LEN], b: &[f32; LEN]) -> [f32; LEN] {
    let mut out = [0.0; LEN];
    for r in 0..N {
        for c in 0..N {
            let mut sum = 0.0;
            for k in 0..N {
                sum += a[r * N + k] * b[k * N + c];
            }
            out[r * N + c] = sum;
        }
    }
    out
}

fn transpose<const N: usize, const LEN: usize>(m: &[f32; LEN]) -> [f32; LEN] {
    let mut out = [0.0; LEN];
    for r in 0..N {
        for c in 0..N {
            out[c * N + r] = m[r * N + c];
        }
    }
    out
}

/// Gaussian elimination with partial pivoting, carried out in `f64`.
///
/// Returns the determinant and, when `|det| > DETERMINANT_EPSILON`, the inverse.
fn eliminate<const N: usize, const LEN: usize>(m: &[f32; LEN]) -> (f64, Option<[f32; LEN]>) {
    let mut a = [0.0f64; LEN];
    let mut inv = [0.0f64; LEN];
    for i in 0..LEN {
        a[i] = f64::from(m[i]);
    }
    for i in 0..N {
        inv[i * N + i] = 1.0;
    }

    let mut det = 1.0f64;
    for col in 0..N {
        let mut pivot = col;
        for row in (col + 1)..N {
            if a[row * N + col].abs() > a[pivot * N + col].abs() {
                pivot = row;
            }
        }
        if a[pivot * N + col] == 0.0 {
            return (0.0, None);
        }
        if pivot != col {
            for k in 0..N {
                a.swap(pivot * N + k, col * N + k);
                inv.swap(pivot * N + k, col * N + k);
            }
            det = -det;
        }

        let p = a[col * N + col];
        det *= p;
        for k in 0..N {
            a[col * N + k] /= p;
            inv[col * N + k] /= p;
        }

        for row in 0..N {
            if row == col {
                continue;
            }
            let factor = a[row * N + col];
            if factor == 0.0 {
                continue;
            }
            for k in 0..N {
                a[row * N + k] -= factor * a[col * N + k];
                inv[row * N + k] -= factor * inv[col * N + k];
            }
        }
    }

    if det.abs() <= DETERMINANT_EPSILON {
        return (det, None);
    }

    let mut out = [0.0f32; LEN];
    for i in 0..LEN {
        out[i] = inv[i] as f32;
    }
    (det, Some(out))
}

// ============================================================================
// Matrix types
// ============================================================================

macro_rules! square_matrix {
    ($(#[$meta:meta])* $name:ident, $n:literal, $len:literal) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name {
            values: [f32; $len],
            inverse: OnceCell<Option<Box<$name>>>,
        }

        impl $name {
            /// Number of rows (and columns).
            pub const SIZE: usize = $n;

            /// The identity matrix.
            #[must_use]
            pub fn identity() -> Self {
                let mut values = [0.0; $len];
                for i in 0..$n {
                    values[i * $n + i] = 1.0;
                }
                Self::from_values(values)
            }

            /// Builds a matrix from row-major values.
            #[must_use]
            pub fn from_values(values: [f32; $len]) -> Self {
                Self {
                    values,
                    inverse: OnceCell::new(),
                }
            }

            /// Row-major values.
            #[inline]
            #[must_use]
            pub fn values(&self) -> &[f32; $len] {
                &self.values
            }

            /// Replaces all values and drops the cached inverse.
            pub fn set_values(&mut self, values: [f32; $len]) {
                self.values = values;
                self.invalidate_inverse();
            }

            pub fn get(&self, row: usize, col: usize) -> Result<f32> {
                Self::check_index(row, col)?;
                Ok(self.values[row * $n + col])
            }

            pub fn set(&mut self, row: usize, col: usize, value: f32) -> Result<()> {
                Self::check_index(row, col)?;
                self.values[row * $n + col] = value;
                self.invalidate_inverse();
                Ok(())
            }

            fn check_index(row: usize, col: usize) -> Result<()> {
                if row >= $n || col >= $n {
                    return Err(ArborError::invalid(format!(
                        "matrix index ({row}, {col}) out of range for a {0}x{0} matrix",
                        $n
                    )));
                }
                Ok(())
            }

            /// `self * other`.
            #[must_use]
            pub fn multiply(&self, other: &Self) -> Self {
                Self::from_values(multiply::<$n, $len>(&self.values, &other.values))
            }

            /// Writes `self * other` into `out` and returns it.
            pub fn multiply_into<'a>(&self, other: &Self, out: &'a mut Self) -> &'a mut Self {
                out.set_values(multiply::<$n, $len>(&self.values, &other.values));
                out
            }

            #[must_use]
            pub fn transpose(&self) -> Self {
                Self::from_values(transpose::<$n, $len>(&self.values))
            }

            #[must_use]
            pub fn determinant(&self) -> f32 {
                eliminate::<$n, $len>(&self.values).0 as f32
            }

            /// The cached inverse, computed on first use.
            ///
            /// Returns `None` when the determinant is within
            /// [`DETERMINANT_EPSILON`] of zero. Repeated calls on an unmodified
            /// matrix return the same object.
            #[must_use]
            pub fn inverse(&self) -> Option<&Self> {
                self.inverse
                    .get_or_init(|| {
                        eliminate::<$n, $len>(&self.values)
                            .1
                            .map(|values| Box::new(Self::from_values(values)))
                    })
                    .as_deref()
            }

            /// Copies the inverse into `out`. On a singular matrix returns `false`
            /// and leaves `out` untouched.
            pub fn inverse_into(&self, out: &mut Self) -> bool {
                match self.inverse() {
                    Some(inv) => {
                        out.set_values(inv.values);
                        true
                    }
                    None => false,
                }
            }

            /// Whether the inverse (or its absence) has been computed since the
            /// last mutation.
            #[inline]
            #[must_use]
            pub fn has_computed_inverse(&self) -> bool {
                self.inverse.get().is_some()
            }

            /// Component-wise comparison; `tolerance = 0.0` is exact equality.
            #[must_use]
            pub fn equal_to(&self, other: &Self, tolerance: f32) -> bool {
                self.values
                    .iter()
                    .zip(other.values.iter())
                    .all(|(a, b)| (a - b).abs() <= tolerance)
            }

            #[must_use]
            pub fn is_identity(&self, tolerance: f32) -> bool {
                self.equal_to(&Self::identity(), tolerance)
            }

            #[inline]
            fn invalidate_inverse(&mut self) {
                self.inverse.take();
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::identity()
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.values == other.values
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let rows: Vec<&[f32]> = self.values.chunks($n).collect();
                f.debug_struct(stringify!($name)).field("rows", &rows).finish()
            }
        }

        impl Index<(usize, usize)> for $name {
            type Output = f32;

            fn index(&self, (row, col): (usize, usize)) -> &f32 {
                assert!(row < $n && col < $n, "matrix index ({row}, {col}) out of range");
                &self.values[row * $n + col]
            }
        }

        impl IndexMut<(usize, usize)> for $name {
            fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f32 {
                assert!(row < $n && col < $n, "matrix index ({row}, {col}) out of range");
                self.invalidate_inverse();
                &mut self.values[row * $n + col]
            }
        }

        impl Mul for &$name {
            type Output = $name;

            fn mul(self, rhs: Self) -> $name {
                self.multiply(rhs)
            }
        }

        impl Mul for $name {
            type Output = $name;

            fn mul(self, rhs: Self) -> $name {
                self.multiply(&rhs)
            }
        }
    };
}

square_matrix!(
    /// A 3x3 row-major matrix, used for rotations.
    Matrix3, 3, 9
);

square_matrix!(
    /// A 4x4 row-major matrix for affine and projective transforms.
    Matrix4, 4, 16
);

// ============================================================================
// Matrix3
// ============================================================================

impl Matrix3 {
    /// Builds a matrix whose columns are `x`, `y` and `z`.
    #[must_use]
    pub fn from_columns(x: Vector3, y: Vector3, z: Vector3) -> Self {
        Self::from_values([x.x, y.x, z.x, x.y, y.y, z.y, x.z, y.z, z.z])
    }

    #[must_use]
    pub fn column(&self, col: usize) -> Vector3 {
        let m = &self.values;
        Vector3::new(m[col], m[3 + col], m[6 + col])
    }

    #[must_use]
    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_values([1.0, 0.0, 0.0, 0.0, c, -s, 0.0, s, c])
    }

    #[must_use]
    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_values([c, 0.0, s, 0.0, 1.0, 0.0, -s, 0.0, c])
    }

    #[must_use]
    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_values([c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0])
    }

    /// Rotation of `angle` radians about `axis` (normalized internally).
    /// A zero axis yields the identity.
    #[must_use]
    pub fn from_axis_angle(axis: Vector3, angle: f32) -> Self {
        let a = axis.normalize();
        if a.is_zero(0.0) {
            return Self::identity();
        }
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        Self::from_values([
            t * a.x * a.x + c,
            t * a.x * a.y - s * a.z,
            t * a.x * a.z + s * a.y,
            t * a.x * a.y + s * a.z,
            t * a.y * a.y + c,
            t * a.y * a.z - s * a.x,
            t * a.x * a.z - s * a.y,
            t * a.y * a.z + s * a.x,
            t * a.z * a.z + c,
        ])
    }

    /// `self * v`.
    #[must_use]
    pub fn transform(&self, v: Vector3) -> Vector3 {
        let m = &self.values;
        Vector3::new(
            m[0] * v.x + m[1] * v.y + m[2] * v.z,
            m[3] * v.x + m[4] * v.y + m[5] * v.z,
            m[6] * v.x + m[7] * v.y + m[8] * v.z,
        )
    }
}

// ============================================================================
// Matrix4
// ============================================================================

impl Matrix4 {
    #[must_use]
    pub fn from_translation(t: Vector3) -> Self {
        Self::from_values([
            1.0, 0.0, 0.0, t.x, //
            0.0, 1.0, 0.0, t.y, //
            0.0, 0.0, 1.0, t.z, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    #[must_use]
    pub fn from_scale(s: Vector3) -> Self {
        Self::from_values([
            s.x, 0.0, 0.0, 0.0, //
            0.0, s.y, 0.0, 0.0, //
            0.0, 0.0, s.z, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Embeds a 3x3 rotation in the upper-left block.
    #[must_use]
    pub fn from_rotation(r: &Matrix3) -> Self {
        let m = r.values();
        Self::from_values([
            m[0], m[1], m[2], 0.0, //
            m[3], m[4], m[5], 0.0, //
            m[6], m[7], m[8], 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// `Translation * Rotation * Scale`, built directly.
    #[must_use]
    pub fn from_trs(translation: Vector3, rotation: &Matrix3, scale: Vector3) -> Self {
        let m = rotation.values();
        Self::from_values([
            m[0] * scale.x, m[1] * scale.y, m[2] * scale.z, translation.x, //
            m[3] * scale.x, m[4] * scale.y, m[5] * scale.z, translation.y, //
            m[6] * scale.x, m[7] * scale.y, m[8] * scale.z, translation.z, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Right-handed perspective projection with OpenGL clip depth [-1, 1].
    #[must_use]
    pub fn perspective(fov_y_radians: f32, aspect: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov_y_radians * 0.5).tan();
        let depth = near - far;
        Self::from_values([
            f / aspect, 0.0, 0.0, 0.0, //
            0.0, f, 0.0, 0.0, //
            0.0, 0.0, (far + near) / depth, 2.0 * far * near / depth, //
            0.0, 0.0, -1.0, 0.0,
        ])
    }

    /// Right-handed orthographic projection with OpenGL clip depth [-1, 1].
    #[must_use]
    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        let w = right - left;
        let h = top - bottom;
        let d = far - near;
        Self::from_values([
            2.0 / w, 0.0, 0.0, -(right + left) / w, //
            0.0, 2.0 / h, 0.0, -(top + bottom) / h, //
            0.0, 0.0, -2.0 / d, -(far + near) / d, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Transforms a point (`w = 1`), applying the perspective divide when the
    /// resulting `w` is neither 0 nor 1.
    #[must_use]
    pub fn transform_position(&self, p: Vector3) -> Vector3 {
        let m = &self.values;
        let x = m[0] * p.x + m[1] * p.y + m[2] * p.z + m[3];
        let y = m[4] * p.x + m[5] * p.y + m[6] * p.z + m[7];
        let z = m[8] * p.x + m[9] * p.y + m[10] * p.z + m[11];
        let w = m[12] * p.x + m[13] * p.y + m[14] * p.z + m[15];
        if w == 0.0 || w == 1.0 {
            Vector3::new(x, y, z)
        } else {
            Vector3::new(x / w, y / w, z / w)
        }
    }

    /// Transforms a direction (`w = 0`); translation is ignored.
    #[must_use]
    pub fn transform_direction(&self, d: Vector3) -> Vector3 {
        let m = &self.values;
        Vector3::new(
            m[0] * d.x + m[1] * d.y + m[2] * d.z,
            m[4] * d.x + m[5] * d.y + m[6] * d.z,
            m[8] * d.x + m[9] * d.y + m[10] * d.z,
        )
    }

    #[must_use]
    pub fn translation(&self) -> Vector3 {
        Vector3::new(self.values[3], self.values[7], self.values[11])
    }

    /// The upper-left 3x3 block.
    #[must_use]
    pub fn upper_left(&self) -> Matrix3 {
        let m = &self.values;
        Matrix3::from_values([m[0], m[1], m[2], m[4], m[5], m[6], m[8], m[9], m[10]])
    }

    /// Column-major copy, the layout uniform uploads expect.
    #[must_use]
    pub fn to_cols_array(&self) -> [f32; 16] {
        transpose::<4, 16>(&self.values)
    }
}

// ============================================================================
// glam interop
// ============================================================================

impl From<&Matrix4> for glam::Mat4 {
    fn from(m: &Matrix4) -> Self {
        glam::Mat4::from_cols_array(&m.to_cols_array())
    }
}

impl From<glam::Mat4> for Matrix4 {
    fn from(m: glam::Mat4) -> Self {
        // The columns of the transpose are the rows of `m`.
        Matrix4::from_values(m.transpose().to_cols_array())
    }
}

impl From<&Matrix3> for glam::Mat3 {
    fn from(m: &Matrix3) -> Self {
        glam::Mat3::from_cols_array(&transpose::<3, 9>(m.values()))
    }
}

impl From<glam::Mat3> for Matrix3 {
    fn from(m: glam::Mat3) -> Self {
        Matrix3::from_values(m.transpose().to_cols_array())
    }
}
