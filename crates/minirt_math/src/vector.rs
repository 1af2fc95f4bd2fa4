use crate::{Mat4, Vec2, Vec3, Vec4};

/// Extra vector operations used by the renderer.
///
/// Normalizing a zero-length vector is not checked: the division by zero is
/// passed through and the result is non-finite. Callers that can produce
/// degenerate input should use glam's `try_normalize` instead.
pub trait VectorExt: Sized + Copy {
    /// Normalize in place and return `self` for chaining.
    fn normalize_in_place(&mut self) -> &mut Self;

    /// Multiply as a row vector by `m` (`v * M`, row-major convention).
    fn transform_row(self, m: &Mat4) -> Self;
}

impl VectorExt for Vec2 {
    #[inline]
    fn normalize_in_place(&mut self) -> &mut Self {
        *self /= self.length();
        self
    }

    /// Treated as a direction in the XY plane (z = 0, w = 0).
    #[inline]
    fn transform_row(self, m: &Mat4) -> Self {
        (m.transpose() * self.extend(0.0).extend(0.0)).truncate().truncate()
    }
}

impl VectorExt for Vec3 {
    #[inline]
    fn normalize_in_place(&mut self) -> &mut Self {
        *self /= self.length();
        self
    }

    /// Treated as a direction (w = 0), so translation is ignored.
    #[inline]
    fn transform_row(self, m: &Mat4) -> Self {
        (m.transpose() * self.extend(0.0)).truncate()
    }
}

impl VectorExt for Vec4 {
    #[inline]
    fn normalize_in_place(&mut self) -> &mut Self {
        *self /= self.length();
        self
    }

    #[inline]
    fn transform_row(self, m: &Mat4) -> Self {
        m.transpose() * self
    }
}
