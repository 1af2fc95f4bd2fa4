//! Local illumination and pixel packing.

use minirt_core::Light;
use minirt_math::Vec4;

/// `n . l` above which a specular highlight is added.
pub const SPECULAR_THRESHOLD: f32 = 0.90;

/// Gain applied to `n . l - SPECULAR_THRESHOLD` for the highlight.
pub const SPECULAR_SCALE: f32 = 10.0;

/// Color one light adds to a surface point.
///
/// `surface` is the interpolated vertex color and modulates the ambient and
/// diffuse terms elementwise; the specular term is added unmodulated.
/// An unlit point (shadowed, or facing away) gets the ambient term only.
pub fn light_contribution(light: &Light, surface: Vec4, n_dot_l: f32, lit: bool) -> Vec4 {
    if !lit {
        return light.ambient * surface;
    }

    let base = (light.ambient + light.diffuse * n_dot_l) * surface;
    if n_dot_l > SPECULAR_THRESHOLD {
        base + light.specular * ((n_dot_l - SPECULAR_THRESHOLD) * SPECULAR_SCALE)
    } else {
        base
    }
}

/// Scale a [0, 1] channel to 8 bits, truncating and clamping.
#[inline]
fn channel(c: f32) -> u32 {
    ((c * 256.0) as i32).clamp(0, 255) as u32
}

/// Pack RGB into `0xAABBGGRR` with an opaque alpha.
///
/// In little-endian memory this is the byte order R, G, B, A.
pub fn pack_rgba(color: Vec4) -> u32 {
    0xFF00_0000 | (channel(color.z) << 16) | (channel(color.y) << 8) | channel(color.x)
}

/// Split a packed pixel into `[r, g, b, a]` bytes.
pub fn unpack_rgba(pixel: u32) -> [u8; 4] {
    pixel.to_le_bytes()
}
