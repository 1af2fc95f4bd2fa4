use minirt_math::{Vec3, Vec4};

/// A point light with Phong-style intensity terms.
///
/// The intensities are RGBA-shaped to match vertex colors; only RGB reaches
/// the final pixel.
///
/// `last_hit` remembers the triangle that most recently shadowed some point
/// from this light. The renderer retests that triangle first before scanning
/// the whole mesh, and overwrites it with the first occluder a scan finds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub specular: Vec4,
    pub diffuse: Vec4,
    pub ambient: Vec4,
    last_hit: Option<usize>,
}

impl Light {
    pub fn new(position: Vec3, specular: Vec4, diffuse: Vec4, ambient: Vec4) -> Self {
        Self {
            position,
            specular,
            diffuse,
            ambient,
            last_hit: None,
        }
    }

    /// Default intensities placed at `position`.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Index of the last triangle found to occlude this light.
    pub fn last_hit(&self) -> Option<usize> {
        self.last_hit
    }

    pub fn set_last_hit(&mut self, triangle: usize) {
        self.last_hit = Some(triangle);
    }

    /// Forget the cached occluder (needed when the mesh changes).
    pub fn reset_cache(&mut self) {
        self.last_hit = None;
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::new(
            Vec3::ZERO,
            Vec4::new(1.0, 1.0, 1.0, 0.0),
            Vec4::new(0.5, 0.5, 0.5, 0.0),
            Vec4::new(0.2, 0.2, 0.2, 0.0),
        )
    }
}
