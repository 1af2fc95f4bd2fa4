use std::f32::consts::FRAC_PI_4;

use glam::{Mat4, Vec3};

use crate::VectorExt;

/// Pinhole camera described by a position and an orthonormal frame.
///
/// `to` is the viewing direction, `up` and `right` span the image plane.
/// The setters store their argument as-is; call [`Camera::fix_perp`] after
/// changing any axis directly to restore orthonormality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    up: Vec3,
    to: Vec3,
    pos: Vec3,
    right: Vec3,
    fov: f32,
}

impl Camera {
    /// Create a camera from an up hint, a viewing direction and a position.
    ///
    /// `fov` is in radians. The frame is orthonormalized immediately.
    pub fn new(up: Vec3, to: Vec3, pos: Vec3, fov: f32) -> Self {
        let mut camera = Self {
            up,
            to,
            pos,
            right: Vec3::X,
            fov,
        };
        camera.fix_perp();
        camera
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn to(&self) -> Vec3 {
        self.to
    }

    pub fn pos(&self) -> Vec3 {
        self.pos
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn set_up(&mut self, up: Vec3) -> &mut Self {
        self.up = up;
        self
    }

    pub fn set_to(&mut self, to: Vec3) -> &mut Self {
        self.to = to;
        self
    }

    pub fn set_pos(&mut self, pos: Vec3) -> &mut Self {
        self.pos = pos;
        self
    }

    pub fn set_right(&mut self, right: Vec3) -> &mut Self {
        self.right = right;
        self
    }

    pub fn set_fov(&mut self, fov: f32) -> &mut Self {
        self.fov = fov;
        self
    }

    /// Rebuild an orthonormal frame from `up` and `to`.
    ///
    /// right = up x to, up = to x right, then all three are normalized.
    /// `to` keeps its direction; `up` is bent into the plane orthogonal to it.
    pub fn fix_perp(&mut self) -> &mut Self {
        self.right = self.up.cross(self.to);
        self.up = self.to.cross(self.right);
        self.to = self.to.normalize();
        self.right = self.right.normalize();
        self.up = self.up.normalize();
        self
    }

    /// Aim at `target`, rolled by `roll` radians around the viewing axis.
    pub fn look_at(&mut self, target: Vec3, roll: f32) -> &mut Self {
        self.up = Vec3::new(roll.sin(), roll.cos(), 0.0);
        self.to = target - self.pos;
        self.fix_perp()
    }

    /// Turn by `yaw` radians around `up`, then by `pitch` radians around `right`.
    pub fn rotate(&mut self, yaw: f32, pitch: f32) -> &mut Self {
        self.rotate_frame(Mat4::from_axis_angle(self.up, yaw));
        self.rotate_frame(Mat4::from_axis_angle(self.right, pitch));
        self.fix_perp()
    }

    /// Move along `right` by `strafe` and along `to` by `forward`.
    pub fn translate(&mut self, strafe: f32, forward: f32) -> &mut Self {
        self.pos += self.right * strafe + self.to * forward;
        self
    }

    fn rotate_frame(&mut self, rot: Mat4) {
        self.right = self.right.transform_row(&rot).normalize();
        self.to = self.to.transform_row(&rot).normalize();
        self.up = self.up.transform_row(&rot);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::Y, Vec3::Z, Vec3::ZERO, FRAC_PI_4)
    }
}
