use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use shaderloop_kernel::Geometry;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Indexed triangle list, counter-clockwise front faces.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

const T: f32 = 1.618_034;

#[rustfmt::skip]
const ICOSAHEDRON_VERTICES: [[f32; 3]; 12] = [
    [-1.0,  T, 0.0], [ 1.0,  T, 0.0], [-1.0, -T, 0.0], [ 1.0, -T, 0.0],
    [0.0, -1.0,  T], [0.0,  1.0,  T], [0.0, -1.0, -T], [0.0,  1.0, -T],
    [ T, 0.0, -1.0], [ T, 0.0,  1.0], [-T, 0.0, -1.0], [-T, 0.0,  1.0],
];

#[rustfmt::skip]
const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
    [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
    [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
    [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
];

impl MeshData {
    pub fn from_geometry(geometry: &Geometry) -> Self {
        match *geometry {
            Geometry::Sphere { radius, detail } => Self::icosphere(radius, detail),
            Geometry::Plane {
                width,
                depth,
                segments,
            } => Self::plane(width, depth, segments),
        }
    }

    /// Icosahedron with every edge split into `detail + 1` segments and all
    /// vertices pushed onto the sphere. Faces do not share vertices.
    pub fn icosphere(radius: f32, detail: u32) -> Self {
        let n = detail + 1;
        let per_face = ((n + 1) * (n + 2) / 2) as usize;
        let mut mesh = Self {
            vertices: Vec::with_capacity(per_face * 20),
            indices: Vec::with_capacity((n * n * 3 * 20) as usize),
        };
        for [a, b, c] in ICOSAHEDRON_FACES {
            let a = Vec3::from(ICOSAHEDRON_VERTICES[a]);
            let b = Vec3::from(ICOSAHEDRON_VERTICES[b]);
            let c = Vec3::from(ICOSAHEDRON_VERTICES[c]);
            let base = mesh.vertices.len() as u32;
            // row i holds n - i + 1 vertices
            let index = |i: u32, j: u32| base + i * (n + 1) - i * i.saturating_sub(1) / 2 + j;
            for i in 0..=n {
                for j in 0..=n - i {
                    let p = a + (b - a) * (i as f32 / n as f32) + (c - a) * (j as f32 / n as f32);
                    let normal = p.normalize();
                    mesh.vertices.push(Vertex {
                        position: (normal * radius).to_array(),
                        normal: normal.to_array(),
                    });
                }
            }
            for i in 0..n {
                for j in 0..n - i {
                    mesh.indices
                        .extend([index(i, j), index(i + 1, j), index(i, j + 1)]);
                    if j + 1 < n - i {
                        mesh.indices
                            .extend([index(i + 1, j), index(i + 1, j + 1), index(i, j + 1)]);
                    }
                }
            }
        }
        mesh
    }

    /// Grid in the XZ plane facing +Y, centered at the origin.
    pub fn plane(width: f32, depth: f32, segments: u32) -> Self {
        let s = segments.max(1);
        let row = s + 1;
        let mut mesh = Self::default();
        for iz in 0..=s {
            for ix in 0..=s {
                mesh.vertices.push(Vertex {
                    position: [
                        -width / 2.0 + width * ix as f32 / s as f32,
                        0.0,
                        -depth / 2.0 + depth * iz as f32 / s as f32,
                    ],
                    normal: [0.0, 1.0, 0.0],
                });
            }
        }
        for iz in 0..s {
            for ix in 0..s {
                let a = iz * row + ix;
                let b = a + row;
                let c = b + 1;
                let d = a + 1;
                mesh.indices.extend([a, b, c, a, c, d]);
            }
        }
        mesh
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face_normal(m: &MeshData, tri: usize) -> Vec3 {
        let p = |k: usize| Vec3::from(m.vertices[m.indices[tri * 3 + k] as usize].position);
        (p(1) - p(0)).cross(p(2) - p(0))
    }

    #[test]
    fn icosphere_counts() {
        for detail in [0, 1, 4] {
            let m = MeshData::icosphere(1.0, detail);
            let n = (detail + 1) as usize;
            assert_eq!(m.triangle_count(), 20 * n * n);
            assert_eq!(m.vertices.len(), 20 * (n + 1) * (n + 2) / 2);
        }
    }

    #[test]
    fn icosphere_vertices_lie_on_sphere() {
        let m = MeshData::icosphere(5.0, 3);
        for v in &m.vertices {
            assert!((Vec3::from(v.position).length() - 5.0).abs() < 1e-4);
            assert!((Vec3::from(v.normal).length() - 1.0).abs() < 1e-5);
        }
        assert!(m.indices.iter().all(|&i| (i as usize) < m.vertices.len()));
    }

    #[test]
    fn icosphere_faces_point_outward() {
        let m = MeshData::icosphere(1.0, 2);
        for tri in 0..m.triangle_count() {
            let center = Vec3::from(m.vertices[m.indices[tri * 3] as usize].position);
            assert!(face_normal(&m, tri).dot(center) > 0.0, "triangle {tri} is inverted");
        }
    }

    #[test]
    fn plane_grid_faces_up() {
        let m = MeshData::plane(12.0, 12.0, 4);
        assert_eq!(m.vertices.len(), 25);
        assert_eq!(m.triangle_count(), 32);
        assert_eq!(m.vertices[0].position, [-6.0, 0.0, -6.0]);
        assert_eq!(m.vertices[24].position, [6.0, 0.0, 6.0]);
        for tri in 0..m.triangle_count() {
            assert!(face_normal(&m, tri).y > 0.0);
        }
    }

    #[test]
    fn geometry_dispatch() {
        let m = MeshData::from_geometry(&Geometry::Plane {
            width: 1.0,
            depth: 1.0,
            segments: 0,
        });
        assert_eq!(m.triangle_count(), 2);
    }
}
