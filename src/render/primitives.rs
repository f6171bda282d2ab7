//! Built-in geometries.

use crate::math::{Vector2, Vector3};
use crate::render::geometry::Geometry;

struct FaceBuilder {
    positions: Vec<Vector3>,
    normals: Vec<Vector3>,
    uvs: Vec<Vector2>,
    indices: Vec<u32>,
}

impl FaceBuilder {
    fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            uvs: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Adds a quad centered at `center`, spanned by `u` and `v` (half
    /// extents), facing `normal`. Corners are counter-clockwise seen from the
    /// normal side.
    fn quad(&mut self, center: Vector3, u: Vector3, v: Vector3, normal: Vector3) {
        let base = self.positions.len() as u32;
        let corners = [
            (center - u - v, Vector2::new(0.0, 0.0)),
            (center + u - v, Vector2::new(1.0, 0.0)),
            (center + u + v, Vector2::new(1.0, 1.0)),
            (center - u + v, Vector2::new(0.0, 1.0)),
        ];
        for (position, uv) in corners {
            self.positions.push(position);
            self.normals.push(normal);
            self.uvs.push(uv);
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    fn build(self) -> Geometry {
        let mut geometry = Geometry::from_parts(self.positions, self.indices);
        // Counts line up by construction.
        if geometry.set_normals(Some(self.normals)).is_err() || geometry.set_uvs(Some(self.uvs)).is_err() {
            log::error!("Primitive attribute count mismatch");
        }
        geometry
    }
}

impl Geometry {
    /// Axis-aligned box centered at the origin, with normals and UVs.
    #[must_use]
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let (hx, hy, hz) = (width * 0.5, height * 0.5, depth * 0.5);
        let x = Vector3::new(hx, 0.0, 0.0);
        let y = Vector3::new(0.0, hy, 0.0);
        let z = Vector3::new(0.0, 0.0, hz);

        let mut faces = FaceBuilder::new();
        faces.quad(x, -z, y, Vector3::X);
        faces.quad(-x, z, y, -Vector3::X);
        faces.quad(y, x, -z, Vector3::Y);
        faces.quad(-y, x, z, -Vector3::Y);
        faces.quad(z, x, y, Vector3::Z);
        faces.quad(-z, -x, y, -Vector3::Z);
        faces.build()
    }

    /// Plane in the XY plane facing `+Z`.
    #[must_use]
    pub fn plane(width: f32, height: f32) -> Self {
        let mut faces = FaceBuilder::new();
        faces.quad(
            Vector3::ZERO,
            Vector3::new(width * 0.5, 0.0, 0.0),
            Vector3::new(0.0, height * 0.5, 0.0),
            Vector3::Z,
        );
        faces.build()
    }
}
