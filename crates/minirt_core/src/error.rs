//! Errors raised by the geometry buffers.
//!
//! Every variant is a caller bug (bad sizes or out-of-range indices).
//! Degenerate geometry is not an error anywhere in miniRT.

use thiserror::Error;

/// Errors that can occur when building or reading geometry buffers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("Buffer must not be empty")]
    Empty,

    #[error("Vertex buffer capacity must be greater than zero")]
    ZeroCapacity,

    #[error("Index buffer length {len} is not a multiple of 3")]
    NotTriangleList { len: usize },

    #[error("Index {index} out of range for buffer of length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("Index buffer entry {position} holds negative vertex index {value}")]
    NegativeIndex { position: usize, value: i32 },

    #[error("Expected {expected} vertices, got {actual}")]
    VertexCountMismatch { expected: usize, actual: usize },
}

/// Result type for buffer operations.
pub type BufferResult<T> = Result<T, BufferError>;
