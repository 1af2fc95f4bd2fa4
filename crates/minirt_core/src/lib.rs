//! miniRT Core - geometry buffers, lights and scene setup.
//!
//! This crate provides:
//!
//! - **Geometry buffers**: `IndexBuffer` and the structure-of-arrays `VertexBuffer`
//! - **Scene value objects**: `Vertex`, `Light`
//! - **Procedural shapes**: icosahedron and ground plane meshes
//! - **Configuration**: `SceneConfig`, loaded from JSON
//!
//! # Example
//!
//! ```ignore
//! use minirt_core::shapes::demo_scene;
//!
//! let (vertices, indices) = demo_scene().into_buffers()?;
//! println!("{} triangles", indices.triangle_count());
//! ```

pub mod error;
pub mod index_buffer;
pub mod light;
pub mod scene;
pub mod shapes;
pub mod vertex;
pub mod vertex_buffer;

// Re-export commonly used types
pub use error::{BufferError, BufferResult};
pub use index_buffer::IndexBuffer;
pub use light::Light;
pub use scene::{CameraConfig, ConfigError, LightConfig, SceneConfig};
pub use shapes::Mesh;
pub use vertex::Vertex;
pub use vertex_buffer::VertexBuffer;
