use std::sync::atomic::{AtomicU64, Ordering};

use bitflags::bitflags;
use uuid::Uuid;

use crate::color::Color;
use crate::errors::{ArborError, Result};
use crate::math::{Vector2, Vector3};

bitflags! {
    /// Vertex attributes present in a geometry, in interleaving order.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct VertexAttributes: u32 {
        const POSITION = 1 << 0;
        const NORMAL   = 1 << 1;
        const COLOR    = 1 << 2;
        const UV       = 1 << 3;
    }
}

impl VertexAttributes {
    /// Floats per interleaved vertex.
    #[must_use]
    pub fn stride(self) -> usize {
        let mut stride = 0;
        if self.contains(Self::POSITION) {
            stride += 3;
        }
        if self.contains(Self::NORMAL) {
            stride += 3;
        }
        if self.contains(Self::COLOR) {
            stride += 4;
        }
        if self.contains(Self::UV) {
            stride += 2;
        }
        stride
    }
}

static NEXT_GEOMETRY_VERSION: AtomicU64 = AtomicU64::new(1);

fn next_version() -> u64 {
    NEXT_GEOMETRY_VERSION.fetch_add(1, Ordering::Relaxed)
}

/// Indexed triangle geometry.
///
/// Positions and indices are required; normals, colors and UVs are optional
/// and must match the vertex count. Every change bumps [`version`](Self::version)
/// so GPU buffers built from an older state get rebuilt.
///
/// Cloning yields a distinct geometry with a fresh id.
#[derive(Debug)]
pub struct Geometry {
    id: Uuid,
    version: u64,

    positions: Vec<Vector3>,
    normals: Option<Vec<Vector3>>,
    colors: Option<Vec<Color>>,
    uvs: Option<Vec<Vector2>>,
    indices: Vec<u32>,
}

impl Clone for Geometry {
    fn clone(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            version: next_version(),
            positions: self.positions.clone(),
            normals: self.normals.clone(),
            colors: self.colors.clone(),
            uvs: self.uvs.clone(),
            indices: self.indices.clone(),
        }
    }
}

impl Geometry {
    /// Triangle list over `positions`. `indices` must come in triples and
    /// stay within the vertex range.
    pub fn new(positions: Vec<Vector3>, indices: Vec<u32>) -> Result<Self> {
        check_indices(&indices, positions.len())?;
        Ok(Self::from_parts(positions, indices))
    }

    pub(crate) fn from_parts(positions: Vec<Vector3>, indices: Vec<u32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            version: next_version(),
            positions,
            normals: None,
            colors: None,
            uvs: None,
            indices,
        }
    }

    pub fn with_normals(mut self, normals: Vec<Vector3>) -> Result<Self> {
        self.set_normals(Some(normals))?;
        Ok(self)
    }

    pub fn with_colors(mut self, colors: Vec<Color>) -> Result<Self> {
        self.set_colors(Some(colors))?;
        Ok(self)
    }

    pub fn with_uvs(mut self, uvs: Vec<Vector2>) -> Result<Self> {
        self.set_uvs(Some(uvs))?;
        Ok(self)
    }

    // ========================================================================
    // Mutators
    // ========================================================================

    pub fn set_normals(&mut self, normals: Option<Vec<Vector3>>) -> Result<()> {
        if let Some(n) = &normals {
            self.check_attribute_len("normal", n.len())?;
        }
        self.normals = normals;
        self.version = next_version();
        Ok(())
    }

    pub fn set_colors(&mut self, colors: Option<Vec<Color>>) -> Result<()> {
        if let Some(c) = &colors {
            self.check_attribute_len("color", c.len())?;
            for color in c {
                color.validate()?;
            }
        }
        self.colors = colors;
        self.version = next_version();
        Ok(())
    }

    pub fn set_uvs(&mut self, uvs: Option<Vec<Vector2>>) -> Result<()> {
        if let Some(u) = &uvs {
            self.check_attribute_len("uv", u.len())?;
        }
        self.uvs = uvs;
        self.version = next_version();
        Ok(())
    }

    fn check_attribute_len(&self, attribute: &str, len: usize) -> Result<()> {
        if len != self.positions.len() {
            return Err(ArborError::invalid(format!(
                "{attribute} count {len} does not match vertex count {}",
                self.positions.len()
            )));
        }
        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[must_use]
    pub fn positions(&self) -> &[Vector3] {
        &self.positions
    }

    #[must_use]
    pub fn normals(&self) -> Option<&[Vector3]> {
        self.normals.as_deref()
    }

    #[must_use]
    pub fn colors(&self) -> Option<&[Color]> {
        self.colors.as_deref()
    }

    #[must_use]
    pub fn uvs(&self) -> Option<&[Vector2]> {
        self.uvs.as_deref()
    }

    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn attributes(&self) -> VertexAttributes {
        let mut attributes = VertexAttributes::POSITION;
        attributes.set(VertexAttributes::NORMAL, self.normals.is_some());
        attributes.set(VertexAttributes::COLOR, self.colors.is_some());
        attributes.set(VertexAttributes::UV, self.uvs.is_some());
        attributes
    }

    /// Floats per vertex in [`interleave`](Self::interleave) output.
    #[must_use]
    pub fn stride(&self) -> usize {
        self.attributes().stride()
    }

    /// Flat vertex array: position, then normal, color and UV when present.
    #[must_use]
    pub fn interleave(&self) -> Vec<f32> {
        if self.attributes() == VertexAttributes::POSITION {
            return bytemuck::cast_slice(&self.positions).to_vec();
        }

        let mut out = Vec::with_capacity(self.vertex_count() * self.stride());
        for i in 0..self.vertex_count() {
            out.extend_from_slice(&self.positions[i].to_array());
            if let Some(normals) = &self.normals {
                out.extend_from_slice(&normals[i].to_array());
            }
            if let Some(colors) = &self.colors {
                out.extend_from_slice(&colors[i].to_array());
            }
            if let Some(uvs) = &self.uvs {
                out.extend_from_slice(&uvs[i].to_array());
            }
        }
        out
    }
}

fn check_indices(indices: &[u32], vertex_count: usize) -> Result<()> {
    if indices.len() % 3 != 0 {
        return Err(ArborError::invalid(format!(
            "index count {} is not a multiple of 3",
            indices.len()
        )));
    }
    if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertex_count) {
        return Err(ArborError::invalid(format!(
            "index {bad} out of range for {vertex_count} vertices"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Geometry {
        Geometry::new(
            vec![Vector3::ZERO, Vector3::X, Vector3::Y],
            vec![0, 1, 2],
        )
        .unwrap()
    }

    #[test]
    fn stride_grows_with_attributes() {
        assert_eq!(VertexAttributes::POSITION.stride(), 3);
        assert_eq!(
            (VertexAttributes::POSITION | VertexAttributes::NORMAL | VertexAttributes::UV).stride(),
            8
        );
        assert_eq!(VertexAttributes::all().stride(), 12);
    }

    #[test]
    fn interleave_orders_position_normal_color_uv() {
        let geometry = triangle()
            .with_normals(vec![Vector3::Z; 3])
            .unwrap()
            .with_uvs(vec![Vector2::new(0.0, 0.0), Vector2::new(1.0, 0.0), Vector2::new(0.0, 1.0)])
            .unwrap();

        let data = geometry.interleave();
        assert_eq!(geometry.stride(), 8);
        assert_eq!(data.len(), 24);
        // Second vertex: position (1,0,0), normal (0,0,1), uv (1,0)
        assert_eq!(&data[8..16], &[1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn rejects_out_of_range_index() {
        let err = Geometry::new(vec![Vector3::ZERO; 3], vec![0, 1, 3]);
        assert!(matches!(err, Err(ArborError::InvalidArgument(_))));
    }

    #[test]
    fn rejects_mismatched_attribute_length() {
        let mut geometry = triangle();
        let version = geometry.version();
        assert!(geometry.set_normals(Some(vec![Vector3::Z; 2])).is_err());
        assert!(geometry.normals().is_none());
        assert_eq!(geometry.version(), version);
    }

    #[test]
    fn clone_gets_fresh_identity() {
        let a = triangle();
        let b = a.clone();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.positions(), b.positions());
    }
}
