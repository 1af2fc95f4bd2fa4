//! Structure-of-arrays vertex storage.
//!
//! Vertices arrive as [`Vertex`] structs but are stored as four planes
//! (positions, normals, colors, uvs) so that the intersection code, which
//! mostly reads positions, scans one contiguous array.

use minirt_math::{Vec2, Vec3, Vec4};

use crate::error::{BufferError, BufferResult};
use crate::vertex::Vertex;

/// Fixed-capacity vertex store, one plane per attribute.
#[derive(Clone, Debug)]
pub struct VertexBuffer {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    colors: Vec<Vec4>,
    uvs: Vec<Vec2>,
}

impl VertexBuffer {
    /// Allocate `capacity` zeroed slots in every plane.
    pub fn new(capacity: usize) -> BufferResult<Self> {
        if capacity == 0 {
            return Err(BufferError::ZeroCapacity);
        }
        Ok(Self {
            positions: vec![Vec3::ZERO; capacity],
            normals: vec![Vec3::ZERO; capacity],
            colors: vec![Vec4::ZERO; capacity],
            uvs: vec![Vec2::ZERO; capacity],
        })
    }

    /// Allocate a buffer sized to `vertices` and fill it.
    pub fn from_vertices(vertices: &[Vertex]) -> BufferResult<Self> {
        let mut buffer = Self::new(vertices.len())?;
        buffer.set_optimized(vertices)?;
        Ok(buffer)
    }

    /// Transpose `vertices` into the attribute planes.
    ///
    /// `vertices` must hold exactly [`VertexBuffer::len`] entries.
    pub fn set_optimized(&mut self, vertices: &[Vertex]) -> BufferResult<()> {
        if vertices.len() != self.len() {
            return Err(BufferError::VertexCountMismatch {
                expected: self.len(),
                actual: vertices.len(),
            });
        }

        for (i, vertex) in vertices.iter().enumerate() {
            self.positions[i] = vertex.pos;
            self.normals[i] = vertex.normal;
            self.colors[i] = vertex.color;
            self.uvs[i] = vertex.uv;
        }

        log::debug!("Vertex buffer filled with {} vertices", vertices.len());
        Ok(())
    }

    /// Number of vertices (the capacity given at construction).
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Always false: construction rejects a zero capacity.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn get_pos(&self, i: usize) -> BufferResult<Vec3> {
        Self::read(&self.positions, i)
    }

    #[inline]
    pub fn get_normal(&self, i: usize) -> BufferResult<Vec3> {
        Self::read(&self.normals, i)
    }

    #[inline]
    pub fn get_color(&self, i: usize) -> BufferResult<Vec4> {
        Self::read(&self.colors, i)
    }

    #[inline]
    pub fn get_uv(&self, i: usize) -> BufferResult<Vec2> {
        Self::read(&self.uvs, i)
    }

    /// The whole position plane.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    #[inline]
    fn read<T: Copy>(plane: &[T], i: usize) -> BufferResult<T> {
        plane.get(i).copied().ok_or(BufferError::IndexOutOfRange {
            index: i as i64,
            len: plane.len(),
        })
    }
}
