//! Vector and matrix algebra.
//!
//! - [`Vector2`] / [`Vector3`]: plain value types
//! - [`Matrix3`] / [`Matrix4`]: row-major matrices with a one-shot cached inverse

pub mod matrix;
pub mod vector;

pub use matrix::{Matrix3, Matrix4};
pub use vector::{Vector2, Vector3};

/// Determinants whose magnitude is at most this value are treated as zero.
pub const DETERMINANT_EPSILON: f64 = 1e-11;
