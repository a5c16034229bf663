//! CPU mirror of the coherent noise in the fire shader.
//!
//! Hash-permutation value noise with smoothstep interpolation. The operation
//! order follows the WGSL program line for line so both produce the same
//! field up to floating-point rounding on the device.

use glam::{Vec2, Vec3, Vec3Swizzles, Vec4, Vec4Swizzles};

#[inline]
fn mod289(x: Vec4) -> Vec4 {
    x - (x * (1.0 / 289.0)).floor() * 289.0
}

#[inline]
fn perm(x: Vec4) -> Vec4 {
    mod289((x * 34.0 + Vec4::ONE) * x)
}

#[inline]
fn fract(x: Vec4) -> Vec4 {
    x - x.floor()
}

/// Smooth pseudo-random value in `[0, 1]` at `p`.
pub fn snoise(p: Vec3) -> f32 {
    let a = p.floor();
    let mut d = p - a;
    d = d * d * (Vec3::splat(3.0) - 2.0 * d);

    let b = a.xxyy() + Vec4::new(0.0, 1.0, 0.0, 1.0);
    let k1 = perm(b.xyxy());
    let k2 = perm(k1.xyxy() + b.zzww());

    let c = k2 + Vec4::splat(a.z);
    let k3 = perm(c);
    let k4 = perm(c + Vec4::ONE);

    let o1 = fract(k3 * (1.0 / 41.0));
    let o2 = fract(k4 * (1.0 / 41.0));

    let o3 = o2 * d.z + o1 * (1.0 - d.z);
    let o4: Vec2 = o3.yw() * d.x + o3.xz() * (1.0 - d.x);

    o4.y * d.y + o4.x * (1.0 - d.y)
}

/// Sum of `octaves` layers of [`snoise`], each at `lacunarity` times the
/// previous frequency and `gain` times the previous amplitude.
pub fn turbulence(p: Vec3, octaves: u32, lacunarity: f32, gain: f32) -> f32 {
    let mut sum = 0.0;
    let mut freq = 1.0;
    let mut amp = 1.0;
    for _ in 0..octaves {
        sum += snoise(p * freq).abs() * amp;
        freq *= lacunarity;
        amp *= gain;
    }
    sum
}
