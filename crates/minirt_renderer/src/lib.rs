//! miniRT Renderer - brute-force CPU ray casting.
//!
//! One primary ray per pixel, nearest-hit depth test, Phong-like shading with
//! a single shadow ray per light. The only acceleration is a per-frame
//! screen-space bounding rectangle for every triangle, computed by two
//! plane sweeps in [`RenderPipeline::begin`].
//!
//! A frame is driven as:
//!
//! ```ignore
//! pipeline.set_camera(camera)?;
//! pipeline.begin()?;
//! pipeline.clear_buffer()?;
//! pipeline.draw_indexed_triangles(0, triangle_count - 1)?;
//! pipeline.present(&mut sink)?;
//! pipeline.end()?;
//! ```

mod display;
mod pipeline;
mod screen_buffer;
mod shading;
mod triangle;

pub use display::{FrameSink, ImageSink, SinkError};
pub use pipeline::{PipelineError, PipelineResult, RenderPipeline, ScreenBounds, ViewRect};
pub use screen_buffer::ScreenBuffer;
pub use shading::{
    light_contribution, pack_rgba, unpack_rgba, SPECULAR_SCALE, SPECULAR_THRESHOLD,
};
pub use triangle::{Barycentric, Determinant, Triangle};

/// Re-export the math and scene types the pipeline API is written in
pub use minirt_core::{IndexBuffer, Light, Vertex, VertexBuffer};
pub use minirt_math::{Camera, Interval, Ray, Vec2, Vec3, Vec4, EPSILON, HUGE};
