use crate::config::AnimationConfig;
use crate::scene::{GAMMA_YAW, Scene};
use campfire_common::{lerp, lerp_vec3, refraction_angle};
use glam::{Mat4, Quat, Vec2, Vec3};

/// What the host hands the animator each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// Pointer position: normalized device coordinates scaled to the
    /// viewport's half-extents (world units, origin at screen center).
    pub pointer: Vec2,
    /// Surface normal the pointer ray refracts through.
    pub normal: Option<Vec3>,
    /// Seconds since the scene started.
    pub elapsed: f32,
}

/// Per-frame scene update: steers the spot light through the prism's
/// refraction, breathes the prism glow and the ambient light, spins the
/// gamma, and keeps the fire uniforms in step with its transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animator {
    config: AnimationConfig,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(AnimationConfig::default())
    }
}

impl Animator {
    pub fn new(config: AnimationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    /// Build a frame input using the configured ray normal.
    pub fn frame_input(&self, pointer: Vec2, elapsed: f32) -> FrameInput {
        FrameInput {
            pointer,
            normal: self.config.ray_normal(),
            elapsed,
        }
    }

    /// Run one frame.
    pub fn update(&self, scene: &mut Scene, input: &FrameInput) {
        self.steer_spot(scene, input.pointer, input.normal);

        let c = &self.config;
        lerp(
            &mut scene.prism.material.emissive_intensity,
            c.emissive_target,
            c.emissive_rate,
        );
        lerp(
            &mut scene.ambient.intensity,
            c.ambient_amplitude * input.elapsed.sin(),
            c.ambient_rate,
        );

        scene.gamma.node.transform.rotation = Quat::from_rotation_y(input.elapsed + GAMMA_YAW);
        scene.gamma.node.update_world_matrix(Mat4::IDENTITY);

        scene.campfire.sync(input.elapsed);
        scene.advance_clock(input.elapsed);
    }

    /// Aim angle of the light after refraction through a surface with the
    /// given normal. Looks from the pointer back toward the screen center.
    pub fn aim_angle(&self, pointer: Vec2, normal: Vec3) -> f32 {
        // Subtract instead of negating: a centered pointer must give +0, not
        // -0, so that atan2 yields 0 rather than -pi.
        let to_center = Vec2::ZERO - pointer;
        let mut angle = to_center.y.atan2(to_center.x);
        let normal_angle = normal.y.atan2(normal.x);
        let incident = angle - normal_angle;
        let refraction =
            refraction_angle(incident, self.config.glass_ior, self.config.air_ior)
                * self.config.refraction_gain;
        angle += refraction;
        angle
    }

    fn steer_spot(&self, scene: &mut Scene, pointer: Vec2, normal: Option<Vec3>) {
        let Some(normal) = normal.filter(|n| *n != Vec3::ZERO) else {
            return;
        };
        let angle = self.aim_angle(pointer, normal);
        lerp_vec3(
            &mut scene.spot.target.transform.position,
            [angle.cos(), angle.sin(), 0.0],
            self.config.steer_rate,
        );
        scene.spot.target.update_world_matrix(Mat4::IDENTITY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campfire_fire::{FireMaterial, FireParams};
    use std::f32::consts::PI;

    fn scene() -> Scene {
        Scene::with_fire(FireMaterial::with_seed(FireParams::default(), 1.0))
    }

    fn input(pointer: Vec2, normal: Option<Vec3>, elapsed: f32) -> FrameInput {
        FrameInput {
            pointer,
            normal,
            elapsed,
        }
    }

    #[test]
    fn degenerate_normal_leaves_target_unchanged() {
        let animator = Animator::default();
        let mut s = scene();
        s.spot.target.transform.position = Vec3::new(0.3, -0.2, 0.0);
        s.spot.target.update_world_matrix(Mat4::IDENTITY);
        let before = s.spot.target;

        animator.update(&mut s, &input(Vec2::ZERO, Some(Vec3::ZERO), 0.0));
        assert_eq!(s.spot.target, before);

        animator.update(&mut s, &input(Vec2::new(2.0, 1.0), None, 0.1));
        assert_eq!(s.spot.target, before);
    }

    #[test]
    fn degenerate_normal_still_animates_glow_and_ambient() {
        let animator = Animator::default();
        let mut s = scene();
        animator.update(&mut s, &input(Vec2::ZERO, None, 1.0));
        assert!((s.prism.material.emissive_intensity - 0.25).abs() < 1e-6);
        let expected = 0.1 * 1.0_f32.sin() * 0.125;
        assert!((s.ambient.intensity - expected).abs() < 1e-6);
        assert_eq!(s.campfire.material.uniforms().time, 1.0);
        assert_eq!(s.frame(), 1);
    }

    #[test]
    fn pointer_at_center_aims_along_zero_angle() {
        let animator = Animator::default();
        // atan2(0, 0) == 0 and no incidence, so no refraction either.
        assert_eq!(animator.aim_angle(Vec2::ZERO, Vec3::X), 0.0);
    }

    #[test]
    fn pointer_left_of_center_aims_right() {
        let animator = Animator::default();
        // Pointer at (-1, 0): atan2(0, 1) == 0.
        assert_eq!(animator.aim_angle(Vec2::new(-1.0, 0.0), Vec3::X), 0.0);
    }

    #[test]
    fn aim_angle_adds_exaggerated_refraction() {
        let animator = Animator::default();
        // Pointer below-left of center: angle = atan2(1, 1) = pi/4.
        let angle = animator.aim_angle(Vec2::new(-1.0, -1.0), Vec3::X);
        let refraction = refraction_angle(PI / 4.0, 2.5, 1.000293);
        assert!((angle - (PI / 4.0 + 6.0 * refraction)).abs() < 1e-5);
    }

    #[test]
    fn aim_angle_is_not_wrapped() {
        let animator = Animator::new(AnimationConfig {
            refraction_gain: 100.0,
            ..AnimationConfig::default()
        });
        let angle = animator.aim_angle(Vec2::new(-1.0, -1.0), Vec3::X);
        assert!(angle > PI);
    }

    #[test]
    fn target_steers_toward_aim_direction() {
        let animator = Animator::default();
        let mut s = scene();
        let pointer = Vec2::new(-3.0, -2.0);
        let angle = animator.aim_angle(pointer, Vec3::X);
        let goal = Vec3::new(angle.cos(), angle.sin(), 0.0);

        let start = (s.spot.target.world_position() - goal).length();
        animator.update(&mut s, &input(pointer, Some(Vec3::X), 0.0));
        let after_one = (s.spot.target.world_position() - goal).length();
        assert!(after_one < start);

        // One step at rate 0.05 from the origin.
        assert!((s.spot.target.transform.position - goal * 0.05).length() < 1e-6);

        for i in 0..600 {
            animator.update(&mut s, &input(pointer, Some(Vec3::X), i as f32 / 60.0));
        }
        assert!((s.spot.target.world_position() - goal).length() < 1e-4);
    }

    #[test]
    fn world_matrix_is_updated_in_the_same_frame() {
        let animator = Animator::default();
        let mut s = scene();
        animator.update(&mut s, &input(Vec2::new(1.0, 1.0), Some(Vec3::X), 0.0));
        assert_eq!(
            s.spot.target.world_position(),
            s.spot.target.transform.position
        );
        assert_ne!(s.spot.direction(), Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn glow_converges_to_target() {
        let animator = Animator::default();
        let mut s = scene();
        for _ in 0..300 {
            animator.update(&mut s, &input(Vec2::ZERO, None, 0.0));
        }
        assert!((s.prism.material.emissive_intensity - 2.5).abs() < 1e-4);
        // sin(0) == 0: ambient stays dark.
        assert_eq!(s.ambient.intensity, 0.0);
    }

    #[test]
    fn frame_input_uses_configured_normal() {
        let animator = Animator::default();
        let f = animator.frame_input(Vec2::ONE, 2.0);
        assert_eq!(f.normal, Some(Vec3::X));
        assert_eq!(f.elapsed, 2.0);
    }

    fn gamma_yaw(scene: &Scene) -> f32 {
        let facing = scene.gamma.node.world_matrix().transform_vector3(Vec3::X);
        -facing.z.atan2(facing.x)
    }

    #[test]
    fn gamma_spins_with_elapsed_time() {
        let animator = Animator::default();
        let mut s = scene();
        animator.update(&mut s, &input(Vec2::ZERO, None, 1.0));
        assert!((gamma_yaw(&s) - (1.0 + GAMMA_YAW)).abs() < 1e-5);

        // Rotation is set from the clock, not accumulated per frame.
        animator.update(&mut s, &input(Vec2::ZERO, None, 1.0));
        assert!((gamma_yaw(&s) - (1.0 + GAMMA_YAW)).abs() < 1e-5);

        animator.update(&mut s, &input(Vec2::ZERO, None, 2.5));
        assert!((gamma_yaw(&s) - (2.5 + GAMMA_YAW)).abs() < 1e-5);
        assert_eq!(s.gamma.node.world_position(), Vec3::new(0.0, -0.5, 0.0));
    }
}
