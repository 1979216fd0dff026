/// Indexed triangle meshes
use nalgebra::{Point3, Vector3};

/// A triangle mesh: positions, normals and triangle indices into the positions.
///
/// `indices` always holds a multiple of three entries and every entry is a
/// valid index into `vertices`. Normals are associated with positions by
/// array position, not through the face records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Point3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether there is one normal per position, so normals can be looked up by index.
    pub fn has_vertex_normals(&self) -> bool {
        !self.normals.is_empty() && self.normals.len() == self.vertices.len()
    }

    /// Iterate the triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
    }

    /// Positions of the corners of a triangle.
    pub fn corners(&self, triangle: [usize; 3]) -> [Point3<f32>; 3] {
        triangle.map(|i| self.vertices[i])
    }

    /// Normal of a triangle: the mean vertex normal when the mesh has per-vertex
    /// normals, the geometric face normal otherwise.
    pub fn triangle_normal(&self, triangle: [usize; 3]) -> Vector3<f32> {
        if self.has_vertex_normals() {
            let sum: Vector3<f32> = triangle.iter().map(|&i| self.normals[i]).sum();
            if let Some(n) = sum.try_normalize(f32::EPSILON) {
                return n;
            }
        }
        let [v0, v1, v2] = self.corners(triangle);
        (v1 - v0)
            .cross(&(v2 - v0))
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::z)
    }

    /// Create a cube centered at the origin with one normal per corner of each face.
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let faces: [(Vector3<f32>, [[f32; 3]; 4]); 6] = [
            // Front
            (Vector3::z(), [[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]]),
            // Back
            (-Vector3::z(), [[h, -h, -h], [-h, -h, -h], [-h, h, -h], [h, h, -h]]),
            // Top
            (Vector3::y(), [[-h, h, h], [h, h, h], [h, h, -h], [-h, h, -h]]),
            // Bottom
            (-Vector3::y(), [[-h, -h, -h], [h, -h, -h], [h, -h, h], [-h, -h, h]]),
            // Right
            (Vector3::x(), [[h, -h, h], [h, -h, -h], [h, h, -h], [h, h, h]]),
            // Left
            (-Vector3::x(), [[-h, -h, -h], [-h, -h, h], [-h, h, h], [-h, h, -h]]),
        ];

        let mut mesh = Self::new();
        for (normal, quad) in faces {
            let base = mesh.vertices.len() as u32;
            for [x, y, z] in quad {
                mesh.vertices.push(Point3::new(x, y, z));
                mesh.normals.push(normal);
            }
            mesh.indices
                .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
        }
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_is_well_formed() {
        let cube = Mesh::cube(2.0);
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
        assert!(cube.has_vertex_normals());
        assert!(cube.indices.iter().all(|&i| (i as usize) < cube.vertex_count()));
    }

    #[test]
    fn test_cube_winding_matches_normals() {
        let cube = Mesh::cube(1.0);
        for tri in cube.triangles() {
            let [v0, v1, v2] = cube.corners(tri);
            let geometric = (v1 - v0).cross(&(v2 - v0)).normalize();
            assert!((geometric - cube.triangle_normal(tri)).norm() < 1e-5);
        }
    }

    #[test]
    fn test_face_normal_without_vertex_normals() {
        let mesh = Mesh {
            vertices: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            normals: vec![Vector3::x()],
            indices: vec![0, 1, 2],
        };
        assert!(!mesh.has_vertex_normals());
        let n = mesh.triangle_normal([0, 1, 2]);
        assert!((n - Vector3::z()).norm() < 1e-6);
    }
}
