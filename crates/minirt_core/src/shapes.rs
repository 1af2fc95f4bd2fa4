//! Procedural meshes for scene setup.
//!
//! Shapes are generated rather than transcribed, and every triangle is wound
//! counter-clockwise when seen from outside: `(v1 - v0) x (v2 - v0)` points
//! along the outward normal. That is the side the renderer treats as front.

use minirt_math::{Vec2, Vec3, Vec4};

use crate::error::BufferResult;
use crate::index_buffer::IndexBuffer;
use crate::vertex::Vertex;
use crate::vertex_buffer::VertexBuffer;

/// Golden ratio, the icosahedron's aspect.
const PHI: f32 = 1.618_034;

/// Vertices plus triangle-list indices, before conversion to buffers.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<i32>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<i32>) -> Self {
        Self { vertices, indices }
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Append `other`, offsetting its indices past our vertices.
    pub fn append(&mut self, other: Mesh) {
        let offset = self.vertices.len() as i32;
        self.vertices.extend(other.vertices);
        self.indices.extend(other.indices.into_iter().map(|i| i + offset));
    }

    /// Build the renderer's buffer pair.
    pub fn into_buffers(&self) -> BufferResult<(VertexBuffer, IndexBuffer)> {
        let vertices = VertexBuffer::from_vertices(&self.vertices)?;
        let indices = IndexBuffer::new(&self.indices)?;
        log::info!(
            "Built buffers: {} vertices, {} triangles",
            vertices.len(),
            indices.triangle_count()
        );
        Ok((vertices, indices))
    }
}

/// Regular icosahedron with smooth outward normals.
///
/// The twelve vertices are the cyclic permutations of `(0, ±1, ±φ)`; faces
/// are the triples whose vertices are pairwise one edge apart.
pub fn icosahedron(center: Vec3, radius: f32, color: Vec4) -> Mesh {
    let mut dirs = Vec::with_capacity(12);
    for a in [-1.0, 1.0] {
        for b in [-PHI, PHI] {
            dirs.push(Vec3::new(0.0, a, b));
            dirs.push(Vec3::new(a, b, 0.0));
            dirs.push(Vec3::new(b, 0.0, a));
        }
    }

    // Unnormalized edge length is 2
    let is_edge = |i: usize, j: usize| (dirs[i].distance(dirs[j]) - 2.0).abs() < 1e-3;

    let mut indices = Vec::with_capacity(60);
    for i in 0..12 {
        for j in (i + 1)..12 {
            if !is_edge(i, j) {
                continue;
            }
            for k in (j + 1)..12 {
                if is_edge(i, k) && is_edge(j, k) {
                    let face = [i, j, k];
                    indices.extend(orient(&dirs, face, face_centroid(&dirs, face)));
                }
            }
        }
    }

    let vertices = dirs
        .iter()
        .map(|d| {
            let n = d.normalize();
            Vertex::new(center + n * radius, n, color, Vec2::ZERO)
        })
        .collect();

    Mesh::new(vertices, indices)
}

/// Square in the XZ plane at `height`, facing +Y.
pub fn ground_plane(height: f32, half_extent: f32, color: Vec4) -> Mesh {
    let e = half_extent;
    let corners = [
        (Vec3::new(-e, height, -e), Vec2::new(0.0, 0.0)),
        (Vec3::new(e, height, -e), Vec2::new(1.0, 0.0)),
        (Vec3::new(e, height, e), Vec2::new(1.0, 1.0)),
        (Vec3::new(-e, height, e), Vec2::new(0.0, 1.0)),
    ];
    let vertices = corners
        .iter()
        .map(|&(pos, uv)| Vertex::new(pos, Vec3::Y, color, uv))
        .collect();

    Mesh::new(vertices, vec![0, 2, 1, 0, 3, 2])
}

/// The demo scene: a cyan icosahedron floating over a yellow floor.
pub fn demo_scene() -> Mesh {
    let mut mesh = icosahedron(Vec3::ONE, 2.0, Vec4::new(0.0, 1.0, 1.0, 1.0));
    mesh.append(ground_plane(-2.0, 10.0, Vec4::new(1.0, 1.0, 0.0, 1.0)));
    mesh
}

fn face_centroid(points: &[Vec3], face: [usize; 3]) -> Vec3 {
    (points[face[0]] + points[face[1]] + points[face[2]]) / 3.0
}

/// Order `face` so its winding normal points along `outward`.
fn orient(points: &[Vec3], face: [usize; 3], outward: Vec3) -> [i32; 3] {
    let [a, b, c] = face;
    let n = (points[b] - points[a]).cross(points[c] - points[a]);
    if n.dot(outward) >= 0.0 {
        [a as i32, b as i32, c as i32]
    } else {
        [a as i32, c as i32, b as i32]
    }
}
