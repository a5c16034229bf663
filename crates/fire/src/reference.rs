//! CPU evaluation of the fire fragment program.
//!
//! Same steps as `fs_fire` in the WGSL source. Used to check the flame's
//! silhouette and alpha without a GPU and to drive the ASCII preview.

use crate::material::{FireMaterial, FireUniforms};
use crate::noise::turbulence;
use crate::params::{MAX_ITERATIONS, MAX_OCTAVES};
use crate::ramp::RampSampler;
use glam::{Vec2, Vec3, Vec3Swizzles, Vec4, Vec4Swizzles};

/// World-space length of one ray-march step per unit of `length(scale)`.
pub const STEP_PER_SCALE: f32 = 0.0288;

/// Ramp contribution of one ray-march sample at flame-local position `p`.
///
/// `p` is already in ramp space: `y` shifted by half a unit and `x`/`z`
/// doubled, so the flame occupies `length(p.xz) < 1`, `0 < p.y < 1`.
pub fn sample_local<S: RampSampler + ?Sized>(
    uniforms: &FireUniforms,
    octaves: u32,
    ramp: &S,
    mut p: Vec3,
) -> Vec4 {
    let mut st = Vec2::new(p.xz().length(), p.y);
    if !inside_open_unit(st.x) || !inside_open_unit(st.y) {
        return Vec4::ZERO;
    }
    let scale = Vec4::from_array(uniforms.noise_scale);
    p.y -= (uniforms.seed + uniforms.time) * scale.w;
    p *= scale.xyz();
    st.y += st.y.sqrt()
        * uniforms.magnitude
        * turbulence(p, octaves, uniforms.lacunarity, uniforms.gain);
    if !inside_open_unit(st.y) {
        return Vec4::ZERO;
    }
    ramp.sample(st)
}

#[inline]
fn inside_open_unit(x: f32) -> bool {
    x > 0.0 && x < 1.0
}

/// Final fragment color for a surface point of the fire mesh at
/// `world_pos`, seen from `camera_pos`.
pub fn shade<S: RampSampler + ?Sized>(
    material: &FireMaterial,
    ramp: &S,
    world_pos: Vec3,
    camera_pos: Vec3,
) -> Vec4 {
    let params = material.params();
    let uniforms = material.uniforms();
    let inv_model = uniforms.inv_model();

    let mut ray_pos = world_pos;
    let ray_dir = (ray_pos - camera_pos).normalize_or_zero();
    let ray_len = STEP_PER_SCALE * Vec3::from_array(uniforms.scale).length();
    let mut col = Vec4::ZERO;
    for _ in 0..params.iterations.clamp(1, MAX_ITERATIONS) {
        ray_pos += ray_dir * ray_len;
        let lp = inv_model.transform_point3(ray_pos);
        let lp = Vec3::new(lp.x * 2.0, lp.y + 0.5, lp.z * 2.0);
        col += sample_local(uniforms, params.octaves.clamp(1, MAX_OCTAVES), ramp, lp);
    }
    let tint = Vec3::from_array(uniforms.color);
    col = (col.xyz() * tint).extend(col.w);
    col.x *= 1.5;
    col.w = col.x;
    col
}
