//! Per-frame smoothing and refraction helpers.
//!
//! Smoothing is a plain linear step toward the goal, applied once per frame.
//! It is frame-rate dependent: a faster display converges faster.

use glam::Vec3;

/// Rate used when a caller has no preference.
pub const DEFAULT_LERP_RATE: f32 = 0.1;

/// Index of refraction of the prism glass.
pub const GLASS_IOR: f32 = 2.5;

/// Index of refraction of air.
pub const AIR_IOR: f32 = 1.000293;

/// Move `value` a fraction `rate` of the way toward `goal`, in place.
///
/// `rate` is expected in `(0, 1]`. A value already at its goal is left
/// bit-for-bit unchanged.
#[inline]
pub fn lerp(value: &mut f32, goal: f32, rate: f32) {
    *value += (goal - *value) * rate;
}

/// Component-wise [`lerp`] of a vector toward a goal given as a plain triple.
#[inline]
pub fn lerp_vec3(value: &mut Vec3, goal: [f32; 3], rate: f32) {
    *value += (Vec3::from_array(goal) - *value) * rate;
}

/// Angle of the refracted ray for a ray entering glass from air.
///
/// Solves Snell's law `air_ior * sin(incident) = glass_ior * sin(theta)` for
/// `theta`. When the sine ratio leaves `[-1, 1]` (or is not finite) there is
/// no refracted ray and the result is `0.0`.
pub fn refraction_angle(incident: f32, glass_ior: f32, air_ior: f32) -> f32 {
    let ratio = air_ior * incident.sin() / glass_ior;
    if ratio.is_finite() && (-1.0..=1.0).contains(&ratio) {
        ratio.asin()
    } else {
        tracing::trace!(incident, glass_ior, air_ior, ratio, "refraction out of domain");
        0.0
    }
}

/// [`refraction_angle`] with the default glass and air indices.
#[inline]
pub fn refraction_angle_default(incident: f32) -> f32 {
    refraction_angle(incident, GLASS_IOR, AIR_IOR)
}
