//! Scene configuration.
//!
//! Everything the driver needs before its render loop starts: output size,
//! the pipeline's triangle capacity, the camera and the lights. Loaded from
//! JSON; any missing field falls back to the demo scene's value.

use std::f32::consts::FRAC_PI_4;
use std::path::Path;

use minirt_math::{Camera, Vec3, Vec4};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::light::Light;

/// Errors that can occur while loading a scene configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Camera placement, vectors as `[x, y, z]`, field of view in radians.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub pos: [f32; 3],
    pub to: [f32; 3],
    pub up: [f32; 3],
    pub fov: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            pos: [0.0, 1.1, -1.75],
            to: [0.0, -0.6, 0.8],
            up: [0.0, 0.8, 0.6],
            fov: FRAC_PI_4,
        }
    }
}

/// A point light, intensities as `[r, g, b, a]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub position: [f32; 3],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
}

impl Default for LightConfig {
    fn default() -> Self {
        let light = Light::default();
        Self {
            position: [3.0, 3.0, -3.0],
            ambient: light.ambient.to_array(),
            diffuse: light.diffuse.to_array(),
            specular: light.specular.to_array(),
        }
    }
}

impl From<&LightConfig> for Light {
    fn from(config: &LightConfig) -> Self {
        Light::new(
            Vec3::from_array(config.position),
            Vec4::from_array(config.specular),
            Vec4::from_array(config.diffuse),
            Vec4::from_array(config.ambient),
        )
    }
}

/// Top-level scene description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Triangle capacity of the render pipeline
    pub max_triangles: usize,
    /// Number of frames the driver renders
    pub frames: u32,
    pub camera: CameraConfig,
    pub lights: Vec<LightConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            max_triangles: 10_000,
            frames: 60,
            camera: CameraConfig::default(),
            lights: vec![LightConfig::default()],
        }
    }
}

impl SceneConfig {
    /// Load a configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&text)?;
        log::info!(
            "Loaded scene config from {}: {}x{}, {} lights",
            path.as_ref().display(),
            config.width,
            config.height,
            config.lights.len()
        );
        Ok(config)
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json(text: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Build the (orthonormalized) camera.
    pub fn camera(&self) -> Camera {
        Camera::new(
            Vec3::from_array(self.camera.up),
            Vec3::from_array(self.camera.to),
            Vec3::from_array(self.camera.pos),
            self.camera.fov,
        )
    }

    pub fn lights(&self) -> Vec<Light> {
        self.lights.iter().map(Light::from).collect()
    }
}
