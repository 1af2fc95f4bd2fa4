use minirt_math::{Vec2, Vec3, Vec4};

/// One mesh sample as supplied by an asset: position, normal, RGBA color and uv.
///
/// This is the input layout only. [`crate::VertexBuffer::set_optimized`]
/// splits a slice of these into one plane per attribute.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vertex {
    pub pos: Vec3,
    pub normal: Vec3,
    /// RGBA in [0, 1]
    pub color: Vec4,
    pub uv: Vec2,
}

impl Vertex {
    pub fn new(pos: Vec3, normal: Vec3, color: Vec4, uv: Vec2) -> Self {
        Self {
            pos,
            normal,
            color,
            uv,
        }
    }

    /// Vertex with an opaque white color and zero uv.
    pub fn with_normal(pos: Vec3, normal: Vec3) -> Self {
        Self::new(pos, normal, Vec4::ONE, Vec2::ZERO)
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::ZERO, Vec4::ONE, Vec2::ZERO)
    }
}
