//! Shared cube mesh for every element of the field.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Vertex data for the cube mesh (position + normal + UV coordinates)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Axis-aligned cube centred at the origin, four vertices per face
pub struct CubeMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl CubeMesh {
    /// Create a cube with edge length `size`
    pub fn new(size: f32) -> Self {
        let half = size / 2.0;

        // (normal, u, v) with u × v = normal so faces wind counter-clockwise from outside
        let faces = [
            (Vec3::X, Vec3::Y, Vec3::Z),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::Z, Vec3::X),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::Y, Vec3::X),
        ];
        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (normal, u, v) in faces {
            let base = vertices.len() as u16;
            for (su, sv) in corners {
                let position = (normal + u * su + v * sv) * half;
                vertices.push(Vertex {
                    position: position.to_array(),
                    normal: normal.to_array(),
                    uv: [(su + 1.0) / 2.0, (sv + 1.0) / 2.0],
                });
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self { vertices, indices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_counts() {
        let cube = CubeMesh::new(100.0);

        // 6 faces * 4 vertices, 6 faces * 2 triangles * 3 indices
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
    }

    #[test]
    fn test_cube_extent() {
        let cube = CubeMesh::new(100.0);
        for vertex in &cube.vertices {
            for coord in vertex.position {
                assert_eq!(coord.abs(), 50.0);
            }
        }
    }

    #[test]
    fn test_triangles_face_outwards() {
        let cube = CubeMesh::new(2.0);

        for tri in cube.indices.chunks(3) {
            let a = Vec3::from_array(cube.vertices[tri[0] as usize].position);
            let b = Vec3::from_array(cube.vertices[tri[1] as usize].position);
            let c = Vec3::from_array(cube.vertices[tri[2] as usize].position);
            let normal = Vec3::from_array(cube.vertices[tri[0] as usize].normal);

            let winding = (b - a).cross(c - a).normalize();
            assert!((winding - normal).length() < 1e-5);
        }
    }
}
