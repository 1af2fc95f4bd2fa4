//! Triangle-list index buffer.

use crate::error::{BufferError, BufferResult};

/// Ordered vertex indices, three per triangle.
///
/// Indices are signed to match common asset formats; a negative entry is
/// rejected when the triangle holding it is read through [`IndexBuffer::triangle`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexBuffer {
    indices: Vec<i32>,
}

impl IndexBuffer {
    /// Copy `indices` into a new buffer.
    ///
    /// Fails if the slice is empty or its length is not a multiple of 3.
    pub fn new(indices: &[i32]) -> BufferResult<Self> {
        if indices.is_empty() {
            return Err(BufferError::Empty);
        }
        if indices.len() % 3 != 0 {
            return Err(BufferError::NotTriangleList { len: indices.len() });
        }
        Ok(Self {
            indices: indices.to_vec(),
        })
    }

    pub fn get(&self, i: usize) -> BufferResult<i32> {
        self.indices
            .get(i)
            .copied()
            .ok_or(BufferError::IndexOutOfRange {
                index: i as i64,
                len: self.indices.len(),
            })
    }

    pub fn set(&mut self, i: usize, value: i32) -> BufferResult<()> {
        let len = self.indices.len();
        let slot = self.indices.get_mut(i).ok_or(BufferError::IndexOutOfRange {
            index: i as i64,
            len,
        })?;
        *slot = value;
        Ok(())
    }

    /// Number of indices (three times the triangle count).
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Always false: construction rejects empty input.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// The three vertex indices of triangle `t`.
    pub fn triangle(&self, t: usize) -> BufferResult<[usize; 3]> {
        if t >= self.triangle_count() {
            return Err(BufferError::IndexOutOfRange {
                index: t as i64,
                len: self.triangle_count(),
            });
        }
        let first = t * 3;

        let mut tri = [0usize; 3];
        for (k, slot) in tri.iter_mut().enumerate() {
            let value = self.indices[first + k];
            *slot = usize::try_from(value).map_err(|_| BufferError::NegativeIndex {
                position: first + k,
                value,
            })?;
        }
        Ok(tri)
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.indices
    }
}
