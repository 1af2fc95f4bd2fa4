//! The frame pipeline: bounding sweeps, ray casting, depth test and shading.
//!
//! A [`RenderPipeline`] is either unlocked (configurable) or locked (drawing).
//! [`RenderPipeline::begin`] locks it after computing every triangle's
//! screen-space rectangle; [`RenderPipeline::end`] unlocks it. Calling an
//! operation in the wrong state is an error, never a silent no-op.

use minirt_core::{BufferError, BufferResult, IndexBuffer, Light, VertexBuffer};
use minirt_math::{Camera, Interval, Ray, Vec3, Vec4, EPSILON, HUGE};
use thiserror::Error;

use crate::display::FrameSink;
use crate::screen_buffer::ScreenBuffer;
use crate::shading::{light_contribution, pack_rgba};
use crate::triangle::{Barycentric, Triangle};

/// Errors returned by [`RenderPipeline`] operations.
///
/// All of them are caller bugs. A ray that misses, or a degenerate triangle,
/// is a normal negative result and never shows up here.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Pipeline dimensions and triangle capacity must be non-zero")]
    ZeroSize,

    #[error("Operation not allowed between begin() and end()")]
    Locked,

    #[error("Operation requires begin() first")]
    Unlocked,

    #[error("No vertex buffer set")]
    MissingVertexBuffer,

    #[error("No index buffer set")]
    MissingIndexBuffer,

    #[error("Index buffer holds {count} triangles, pipeline capacity is {max}")]
    TooManyTriangles { count: usize, max: usize },

    #[error("Invalid draw range {first}..={last} for {count} triangles")]
    InvalidRange {
        first: usize,
        last: usize,
        count: usize,
    },

    #[error("Buffer error: {0}")]
    Buffer(#[from] BufferError),

    #[error("Present failed: {0}")]
    Present(#[from] std::io::Error),
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Inclusive pixel rectangle a triangle may cover this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenBounds {
    pub xmin: i32,
    pub ymin: i32,
    pub xmax: i32,
    pub ymax: i32,
}

impl ScreenBounds {
    /// Marker for a triangle no sweep plane touched.
    pub const UNSEEN: ScreenBounds = ScreenBounds {
        xmin: -1,
        ymin: -1,
        xmax: -1,
        ymax: -1,
    };

    /// Both sweeps found the triangle.
    pub fn is_visible(&self) -> bool {
        self.xmin >= 0 && self.ymin >= 0
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.is_visible()
            && (self.xmin..=self.xmax).contains(&x)
            && (self.ymin..=self.ymax).contains(&y)
    }
}

/// Image plane of the camera, one unit in front of it.
///
/// Pixel `(x, y)` looks along `top_left + x * right_step - y * up_step`.
/// Pixels are square; the horizontal extent is `2 * tan(fov)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewRect {
    pub top_left: Vec3,
    pub right_step: Vec3,
    pub up_step: Vec3,
    up: Vec3,
    right: Vec3,
}

impl ViewRect {
    pub fn new(camera: &Camera, width: u32, height: u32) -> Self {
        let view_width = 2.0 * camera.fov().tan();
        let view_height = view_width * (height as f32 / width as f32);
        let step = view_height / height as f32;

        Self {
            top_left: camera.to() + camera.up() * (view_height * 0.5)
                - camera.right() * (view_width * 0.5),
            right_step: camera.right() * step,
            up_step: camera.up() * step,
            up: camera.up(),
            right: camera.right(),
        }
    }

    /// Normalized primary ray direction through pixel `(x, y)`.
    #[inline]
    pub fn direction(&self, x: i32, y: i32) -> Vec3 {
        (self.top_left - self.up_step * y as f32 + self.right_step * x as f32).normalize()
    }

    /// Normal of the plane through the eye holding every ray of column `x`.
    fn column_normal(&self, x: u32) -> Vec3 {
        (self.top_left + self.right_step * x as f32).cross(self.up).normalize()
    }

    /// Normal of the plane through the eye holding every ray of row `y`.
    fn row_normal(&self, y: u32) -> Vec3 {
        (self.top_left - self.up_step * y as f32).cross(self.right).normalize()
    }
}

/// First and last index in `0..n` for which `hit` holds.
fn sweep(
    n: u32,
    mut hit: impl FnMut(u32) -> BufferResult<bool>,
) -> BufferResult<Option<(i32, i32)>> {
    let mut range = None;
    for i in 0..n {
        if hit(i)? {
            let i = i as i32;
            range = Some(match range {
                None => (i, i),
                Some((first, _)) => (first, i),
            });
        }
    }
    Ok(range)
}

/// Brute-force ray caster over one borrowed vertex/index buffer pair.
pub struct RenderPipeline<'a> {
    width: u32,
    height: u32,
    max_triangles: usize,
    camera: Camera,
    vertices: Option<&'a VertexBuffer>,
    indices: Option<&'a IndexBuffer>,
    lights: Vec<Light>,
    bounds: Vec<ScreenBounds>,
    depth: ScreenBuffer<f32>,
    color: ScreenBuffer<u32>,
    view: ViewRect,
    locked: bool,
}

impl<'a> RenderPipeline<'a> {
    /// Allocate buffers for a `width` x `height` image and up to
    /// `max_triangles` triangles.
    pub fn new(width: u32, height: u32, max_triangles: usize) -> PipelineResult<Self> {
        if width == 0 || height == 0 || max_triangles == 0 {
            return Err(PipelineError::ZeroSize);
        }

        log::info!(
            "Render pipeline {}x{}, capacity {} triangles",
            width,
            height,
            max_triangles
        );

        let camera = Camera::default();
        Ok(Self {
            width,
            height,
            max_triangles,
            camera,
            vertices: None,
            indices: None,
            lights: Vec::new(),
            bounds: vec![ScreenBounds::UNSEEN; max_triangles],
            depth: ScreenBuffer::new(width as usize, height as usize, HUGE),
            color: ScreenBuffer::new(width as usize, height as usize, 0),
            view: ViewRect::new(&camera, width, height),
            locked: false,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Image plane computed by the last [`RenderPipeline::begin`].
    pub fn view(&self) -> &ViewRect {
        &self.view
    }

    /// Screen rectangle of triangle `t` from the last [`RenderPipeline::begin`].
    ///
    /// Changing either buffer resets every rectangle to
    /// [`ScreenBounds::UNSEEN`] until the next `begin`.
    pub fn triangle_bounds(&self, t: usize) -> Option<ScreenBounds> {
        let count = self.indices.map_or(0, IndexBuffer::triangle_count);
        (t < count).then(|| self.bounds[t])
    }

    pub fn depth_at(&self, x: u32, y: u32) -> Option<f32> {
        self.depth.get(x as usize, y as usize)
    }

    pub fn color_at(&self, x: u32, y: u32) -> Option<u32> {
        self.color.get(x as usize, y as usize)
    }

    /// Packed `0xAABBGGRR` pixels, row-major, top row first.
    pub fn color_buffer(&self) -> &[u32] {
        self.color.as_slice()
    }

    pub fn depth_buffer(&self) -> &[f32] {
        self.depth.as_slice()
    }

    fn ensure_unlocked(&self) -> PipelineResult<()> {
        if self.locked {
            Err(PipelineError::Locked)
        } else {
            Ok(())
        }
    }

    fn ensure_locked(&self) -> PipelineResult<()> {
        if self.locked {
            Ok(())
        } else {
            Err(PipelineError::Unlocked)
        }
    }

    pub fn set_camera(&mut self, camera: Camera) -> PipelineResult<()> {
        self.ensure_unlocked()?;
        self.camera = camera;
        Ok(())
    }

    pub fn set_vertex_buffer(&mut self, vertices: &'a VertexBuffer) -> PipelineResult<()> {
        self.ensure_unlocked()?;
        self.vertices = Some(vertices);
        self.invalidate_mesh_state();
        Ok(())
    }

    pub fn set_index_buffer(&mut self, indices: &'a IndexBuffer) -> PipelineResult<()> {
        self.ensure_unlocked()?;
        let count = indices.triangle_count();
        if count > self.max_triangles {
            return Err(PipelineError::TooManyTriangles {
                count,
                max: self.max_triangles,
            });
        }
        self.indices = Some(indices);
        self.invalidate_mesh_state();
        Ok(())
    }

    /// Append a light; returns the new light count.
    pub fn add_light(&mut self, light: Light) -> PipelineResult<usize> {
        self.ensure_unlocked()?;
        self.lights.reserve_exact(1);
        self.lights.push(light);
        Ok(self.lights.len())
    }

    /// Cached occluders and bounds index into the old mesh once buffers change.
    fn invalidate_mesh_state(&mut self) {
        for light in &mut self.lights {
            light.reset_cache();
        }
        self.bounds.fill(ScreenBounds::UNSEEN);
    }

    /// Compute every triangle's screen rectangle for the current camera and lock.
    ///
    /// For each triangle, one plane per pixel column (through the eye and the
    /// camera's up axis) and one per row (through the eye and the right axis)
    /// is tested against it; the first and last planes it touches give the
    /// bounds. A triangle missed by either sweep is [`ScreenBounds::UNSEEN`].
    pub fn begin(&mut self) -> PipelineResult<()> {
        self.ensure_unlocked()?;
        let vertices = self.vertices.ok_or(PipelineError::MissingVertexBuffer)?;
        let indices = self.indices.ok_or(PipelineError::MissingIndexBuffer)?;

        self.view = ViewRect::new(&self.camera, self.width, self.height);
        let view = self.view;
        let eye = self.camera.pos();
        let tri = Triangle::new(vertices);

        let count = indices.triangle_count();
        let mut visible = 0;
        for t in 0..count {
            let idx = indices.triangle(t)?;
            let columns = sweep(self.width, |x| {
                tri.intersect_plane(idx, eye, view.column_normal(x))
            })?;
            let rows = sweep(self.height, |y| {
                tri.intersect_plane(idx, eye, view.row_normal(y))
            })?;

            self.bounds[t] = match (columns, rows) {
                (Some((xmin, xmax)), Some((ymin, ymax))) => {
                    visible += 1;
                    ScreenBounds {
                        xmin,
                        ymin,
                        xmax,
                        ymax,
                    }
                }
                _ => ScreenBounds::UNSEEN,
            };
        }

        log::debug!("Bounds computed: {}/{} triangles on screen", visible, count);
        self.locked = true;
        Ok(())
    }

    /// Unlock. There is no partial frame to roll back.
    pub fn end(&mut self) -> PipelineResult<()> {
        self.ensure_locked()?;
        self.locked = false;
        Ok(())
    }

    /// Reset depth to [`HUGE`] and color to the summed ambient of all lights.
    pub fn clear_buffer(&mut self) -> PipelineResult<()> {
        self.ensure_locked()?;
        let ambient: Vec4 = self.lights.iter().map(|l| l.ambient).sum();
        self.depth.clear(HUGE);
        self.color.clear(pack_rgba(ambient));
        Ok(())
    }

    /// Ray cast triangles `first..=last` into the depth and color buffers.
    ///
    /// A hit replaces the stored pixel only if it is strictly nearer, so on
    /// equal depth the earlier-drawn triangle stays.
    pub fn draw_indexed_triangles(&mut self, first: usize, last: usize) -> PipelineResult<()> {
        self.ensure_locked()?;
        let vertices = self.vertices.ok_or(PipelineError::MissingVertexBuffer)?;
        let indices = self.indices.ok_or(PipelineError::MissingIndexBuffer)?;

        let count = indices.triangle_count();
        if first > last || last >= count {
            return Err(PipelineError::InvalidRange { first, last, count });
        }

        let tri = Triangle::new(vertices);
        let eye = self.camera.pos();
        let view = self.view;

        for t in first..=last {
            let bounds = self.bounds[t];
            if !bounds.is_visible() {
                continue;
            }
            let idx = indices.triangle(t)?;

            for y in bounds.ymin..=bounds.ymax {
                for x in bounds.xmin..=bounds.xmax {
                    let ray = Ray::new(eye, view.direction(x, y));
                    let pd = tri.intersect_det(idx, &ray)?;
                    let Some(hit) = tri.intersect_barycentric(idx, &pd, &ray)? else {
                        continue;
                    };
                    if hit.t <= EPSILON {
                        continue;
                    }

                    let (px, py) = (x as usize, y as usize);
                    let stored = self.depth.get(px, py).unwrap_or(HUGE);
                    if stored > hit.t {
                        let pixel = self.phong(&tri, indices, t, &hit, &ray)?;
                        // Bounds come from sweeps over 0..width and 0..height
                        let depth_written = self.depth.set(px, py, hit.t);
                        let color_written = self.color.set(px, py, pixel);
                        debug_assert!(
                            depth_written && color_written,
                            "pixel ({x}, {y}) outside the screen"
                        );
                    }
                }
            }
        }
        Ok(())
    }

    /// Hand the color buffer to `sink`.
    pub fn present<S: FrameSink + ?Sized>(&self, sink: &mut S) -> PipelineResult<()> {
        self.ensure_locked()?;
        sink.show(self.width, self.height, self.color.as_slice())?;
        Ok(())
    }

    /// Shade the hit of `ray` on triangle `t`, summing every light.
    fn phong(
        &mut self,
        tri: &Triangle<'a>,
        indices: &IndexBuffer,
        t: usize,
        hit: &Barycentric,
        ray: &Ray,
    ) -> PipelineResult<u32> {
        let idx = indices.triangle(t)?;
        let normal = tri.intersect_normal(idx, hit)?;
        let surface = tri.intersect_col(idx, hit)?;
        let point = tri.intersect_point(hit, ray);

        let mut color = Vec4::ZERO;
        for light in &mut self.lights {
            let to_light = light.position - point;
            let distance = to_light.length();
            let dir = to_light / distance;
            let n_dot_l = normal.dot(dir);

            // Grazing or back-lit points skip the shadow test
            let lit = n_dot_l >= EPSILON && {
                let shadow_ray = Ray::new(point, dir);
                let window = Interval::new(EPSILON, distance - EPSILON);
                !occluded(light, tri, indices, t, &shadow_ray, window)?
            };

            color += light_contribution(light, surface, n_dot_l, lit);
        }
        Ok(pack_rgba(color))
    }
}

/// Is `light` blocked from the shadow ray's origin on triangle `current`?
///
/// The light's cached occluder is retested first. Failing that, every other
/// triangle is tested in index order and the first one that blocks becomes
/// the new cached occluder.
fn occluded(
    light: &mut Light,
    tri: &Triangle,
    indices: &IndexBuffer,
    current: usize,
    ray: &Ray,
    window: Interval,
) -> BufferResult<bool> {
    let count = indices.triangle_count();
    let cached = light.last_hit().filter(|&k| k < count);

    if let Some(k) = cached {
        if k != current && tri.shadow_hit(indices.triangle(k)?, ray, window)? {
            return Ok(true);
        }
    }

    for k in 0..count {
        if k == current || Some(k) == cached {
            continue;
        }
        if tri.shadow_hit(indices.triangle(k)?, ray, window)? {
            log::trace!("Light occluder changed {:?} -> {}", cached, k);
            light.set_last_hit(k);
            return Ok(true);
        }
    }
    Ok(false)
}
