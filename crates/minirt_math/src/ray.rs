use crate::Vec3;

/// A ray in 3D space with an origin and a direction.
///
/// Primary rays leave the camera position through a pixel; shadow rays leave
/// a hit point towards a light. Directions are normalized by the renderer so
/// the ray parameter `t` is a distance.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
