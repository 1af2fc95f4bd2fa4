//! Ray/triangle intersection against a vertex buffer.
//!
//! Triangles are addressed by their three vertex indices; the only state is
//! the borrowed [`VertexBuffer`]. Every reading operation is bounds-checked
//! and returns a [`BufferError`] for an index past the buffer.
//!
//! Primary rays use a two-stage Möller-Trumbore test: [`Triangle::intersect_det`]
//! computes the part that depends on the direction only, then
//! [`Triangle::intersect_barycentric`] finishes it. Shadow rays use an
//! independent Cramer's-rule solve in [`Triangle::shadow_hit`].

use minirt_core::{BufferResult, VertexBuffer};
use minirt_math::{Interval, Ray, Vec2, Vec3, Vec4, EPSILON};

/// `pvec = direction x edge2` and `det = edge1 . pvec` for one ray/triangle pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Determinant {
    pub pvec: Vec3,
    pub det: f32,
}

/// Ray parameter and barycentric coordinates of a hit.
///
/// The hit point is `(1 - u - v) * v0 + u * v1 + v * v2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Barycentric {
    pub t: f32,
    pub u: f32,
    pub v: f32,
}

impl Barycentric {
    /// Interpolation weights for `(v0, v1, v2)`.
    #[inline]
    pub fn weights(&self) -> Vec3 {
        Vec3::new(1.0 - self.u - self.v, self.u, self.v)
    }
}

/// Intersection routines over a borrowed vertex buffer.
#[derive(Debug, Clone, Copy)]
pub struct Triangle<'a> {
    vertices: &'a VertexBuffer,
}

impl<'a> Triangle<'a> {
    pub fn new(vertices: &'a VertexBuffer) -> Self {
        Self { vertices }
    }

    #[inline]
    fn positions(&self, [a, b, c]: [usize; 3]) -> BufferResult<[Vec3; 3]> {
        Ok([
            self.vertices.get_pos(a)?,
            self.vertices.get_pos(b)?,
            self.vertices.get_pos(c)?,
        ])
    }

    /// True if the triangle crosses or touches the plane through `point` with
    /// normal `normal`.
    ///
    /// A vertex within [`EPSILON`] of the plane counts as touching it. This is
    /// only a screen-space culling test, not a hit test.
    pub fn intersect_plane(
        &self,
        tri: [usize; 3],
        point: Vec3,
        normal: Vec3,
    ) -> BufferResult<bool> {
        let mut below = false;
        let mut above = false;
        for p in self.positions(tri)? {
            let d = (p - point).dot(normal);
            if d.abs() <= EPSILON {
                return Ok(true);
            }
            if d < 0.0 {
                below = true;
            } else {
                above = true;
            }
        }
        Ok(below && above)
    }

    /// Direction-only half of the primary ray test.
    pub fn intersect_det(&self, tri: [usize; 3], ray: &Ray) -> BufferResult<Determinant> {
        let [p0, p1, p2] = self.positions(tri)?;
        let edge1 = p1 - p0;
        let edge2 = p2 - p0;
        let pvec = ray.direction.cross(edge2);
        Ok(Determinant {
            pvec,
            det: edge1.dot(pvec),
        })
    }

    /// Finish the primary ray test started by [`Triangle::intersect_det`].
    ///
    /// Only front faces are hit (`det > EPSILON`); back faces and rays parallel
    /// to the plane give `None`. A hit also needs `t > 0`.
    pub fn intersect_barycentric(
        &self,
        tri: [usize; 3],
        pd: &Determinant,
        ray: &Ray,
    ) -> BufferResult<Option<Barycentric>> {
        let det = pd.det;
        if det <= EPSILON {
            return Ok(None);
        }
        let [p0, p1, p2] = self.positions(tri)?;

        let tvec = ray.origin - p0;
        let u = tvec.dot(pd.pvec);
        if u < -EPSILON || u > det {
            return Ok(None);
        }

        let qvec = tvec.cross(p1 - p0);
        let v = ray.direction.dot(qvec);
        if v < -EPSILON || u + v > det {
            return Ok(None);
        }

        let inv_det = 1.0 / det;
        let t = (p2 - p0).dot(qvec) * inv_det;
        if t <= 0.0 {
            return Ok(None);
        }

        Ok(Some(Barycentric {
            t,
            u: u * inv_det,
            v: v * inv_det,
        }))
    }

    /// Does the ray hit the triangle (either face) with `t` inside `window`?
    ///
    /// Solves the same problem as the primary test through Cramer's rule.
    /// Barycentric coordinates must lie strictly inside the triangle.
    ///
    /// Unlike [`Triangle::intersect_barycentric`] there is no face culling, so
    /// the two tests only agree for rays that see the front face. A back face
    /// still occludes.
    pub fn shadow_hit(
        &self,
        tri: [usize; 3],
        ray: &Ray,
        window: Interval,
    ) -> BufferResult<bool> {
        let [p0, p1, p2] = self.positions(tri)?;

        let abc = p0 - p1;
        let def = p0 - p2;
        let ghi = ray.direction;
        let jkl = p0 - ray.origin;

        let smat = def.cross(ghi);
        let denom = abc.dot(smat);
        if denom == 0.0 {
            return Ok(false);
        }
        let inv_denom = 1.0 / denom;

        let beta = jkl.dot(smat) * inv_denom;
        if beta <= 0.0 || beta >= 1.0 {
            return Ok(false);
        }

        let smat = abc.cross(jkl);
        let gamma = ghi.dot(smat) * inv_denom;
        if gamma <= 0.0 || beta + gamma >= 1.0 {
            return Ok(false);
        }

        let t = -def.dot(smat) * inv_denom;
        Ok(window.contains(t))
    }

    /// Point on `ray` at the hit distance.
    #[inline]
    pub fn intersect_point(&self, hit: &Barycentric, ray: &Ray) -> Vec3 {
        ray.at(hit.t)
    }

    /// Interpolated (unnormalized) vertex normal at the hit.
    pub fn intersect_normal(&self, [a, b, c]: [usize; 3], hit: &Barycentric) -> BufferResult<Vec3> {
        let w = hit.weights();
        Ok(self.vertices.get_normal(a)? * w.x
            + self.vertices.get_normal(b)? * w.y
            + self.vertices.get_normal(c)? * w.z)
    }

    /// Interpolated vertex color at the hit.
    pub fn intersect_col(&self, [a, b, c]: [usize; 3], hit: &Barycentric) -> BufferResult<Vec4> {
        let w = hit.weights();
        Ok(self.vertices.get_color(a)? * w.x
            + self.vertices.get_color(b)? * w.y
            + self.vertices.get_color(c)? * w.z)
    }

    /// Interpolated texture coordinates at the hit.
    pub fn intersect_texmap(&self, [a, b, c]: [usize; 3], hit: &Barycentric) -> BufferResult<Vec2> {
        let w = hit.weights();
        Ok(self.vertices.get_uv(a)? * w.x
            + self.vertices.get_uv(b)? * w.y
            + self.vertices.get_uv(c)? * w.z)
    }
}
