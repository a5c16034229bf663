use crate::params::FireParams;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use rand::Rng;

/// Per-instance seeds are drawn from `[0, SEED_RANGE)`.
pub const SEED_RANGE: f32 = 19.19;

/// GPU-visible uniform block of one fire instance.
///
/// Field order and padding match `FireUniforms` in the WGSL program
/// (uniform address space layout, 144 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct FireUniforms {
    pub time: f32,
    pub seed: f32,
    _pad0: [f32; 2],
    pub inv_model_matrix: [[f32; 4]; 4],
    pub scale: [f32; 3],
    _pad1: f32,
    pub noise_scale: [f32; 4],
    pub magnitude: f32,
    pub lacunarity: f32,
    pub gain: f32,
    _pad2: f32,
    pub color: [f32; 3],
    _pad3: f32,
}

impl FireUniforms {
    fn new(params: &FireParams, seed: f32) -> Self {
        let mut uniforms = Self {
            seed,
            inv_model_matrix: Mat4::IDENTITY.to_cols_array_2d(),
            scale: [1.0; 3],
            ..Self::zeroed()
        };
        uniforms.apply(params);
        uniforms
    }

    fn apply(&mut self, params: &FireParams) {
        self.noise_scale = params.noise_scale;
        self.magnitude = params.magnitude;
        self.lacunarity = params.lacunarity;
        self.gain = params.gain;
        self.color = params.color;
    }

    pub fn inv_model(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.inv_model_matrix)
    }
}

/// A fire instance's material: its parameters plus the uniform block the
/// shader reads. Plain data; the renderer owns the GPU-side copies.
#[derive(Debug, Clone, PartialEq)]
pub struct FireMaterial {
    params: FireParams,
    uniforms: FireUniforms,
}

impl FireMaterial {
    /// New material with a random per-instance seed.
    pub fn new<R: Rng + ?Sized>(params: FireParams, rng: &mut R) -> Self {
        Self::with_seed(params, rng.random_range(0.0..SEED_RANGE))
    }

    pub fn with_seed(params: FireParams, seed: f32) -> Self {
        Self {
            uniforms: FireUniforms::new(&params, seed),
            params,
        }
    }

    pub fn params(&self) -> &FireParams {
        &self.params
    }

    pub fn uniforms(&self) -> &FireUniforms {
        &self.uniforms
    }

    pub fn seed(&self) -> f32 {
        self.uniforms.seed
    }

    /// Replace the tunable parameters. Only uniform-backed fields take
    /// effect without a new pipeline.
    pub fn set_params(&mut self, params: FireParams) {
        self.uniforms.apply(&params);
        self.params = params;
    }

    /// Draw a fresh per-instance seed, shifting the flame's noise phase.
    pub fn reseed<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.uniforms.seed = rng.random_range(0.0..SEED_RANGE);
        tracing::debug!(seed = self.uniforms.seed, "fire reseeded");
    }

    /// Per-frame update from the owning mesh's current world transform.
    ///
    /// Must run every frame before the uniforms are uploaded: the shader
    /// marches in the mesh's local space through `inv_model_matrix`.
    pub fn sync(&mut self, elapsed: f32, world: Mat4, scale: Vec3) {
        self.uniforms.time = elapsed;
        self.uniforms.inv_model_matrix = world.inverse().to_cols_array_2d();
        self.uniforms.scale = scale.to_array();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::mem::offset_of;

    #[test]
    fn uniform_block_layout() {
        assert_eq!(std::mem::size_of::<FireUniforms>(), 144);
        assert_eq!(offset_of!(FireUniforms, time), 0);
        assert_eq!(offset_of!(FireUniforms, seed), 4);
        assert_eq!(offset_of!(FireUniforms, inv_model_matrix), 16);
        assert_eq!(offset_of!(FireUniforms, scale), 80);
        assert_eq!(offset_of!(FireUniforms, noise_scale), 96);
        assert_eq!(offset_of!(FireUniforms, magnitude), 112);
        assert_eq!(offset_of!(FireUniforms, lacunarity), 116);
        assert_eq!(offset_of!(FireUniforms, gain), 120);
        assert_eq!(offset_of!(FireUniforms, color), 128);
    }

    #[test]
    fn new_material_carries_params_and_identity_matrices() {
        let m = FireMaterial::with_seed(FireParams::default(), 3.0);
        let u = m.uniforms();
        assert_eq!(u.seed, 3.0);
        assert_eq!(u.time, 0.0);
        assert_eq!(u.inv_model(), Mat4::IDENTITY);
        assert_eq!(u.scale, [1.0, 1.0, 1.0]);
        assert_eq!(u.noise_scale, [1.0, 2.0, 1.0, 0.3]);
        assert_eq!(u.magnitude, 1.5);
        assert_eq!(u.color, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn random_seed_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let m = FireMaterial::new(FireParams::default(), &mut rng);
            assert!((0.0..SEED_RANGE).contains(&m.seed()));
        }
    }

    #[test]
    fn reseed_changes_seed() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut m = FireMaterial::with_seed(FireParams::default(), -1.0);
        m.reseed(&mut rng);
        assert_ne!(m.seed(), -1.0);
    }

    #[test]
    fn sync_tracks_current_world_transform() {
        let mut m = FireMaterial::with_seed(FireParams::default(), 0.0);
        let world = Mat4::from_scale_rotation_translation(
            Vec3::new(2.0, 15.0, 1.0),
            glam::Quat::IDENTITY,
            Vec3::new(0.0, 3.0, -2.0),
        );
        m.sync(1.5, world, Vec3::new(2.0, 15.0, 1.0));

        let u = m.uniforms();
        assert_eq!(u.time, 1.5);
        assert_eq!(u.scale, [2.0, 15.0, 1.0]);
        let local = u.inv_model().transform_point3(Vec3::new(0.0, 3.0, -2.0));
        assert!(local.length() < 1e-5);

        // Moving the mesh and syncing again replaces the stale inverse.
        let moved = Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0));
        m.sync(1.6, moved, Vec3::ONE);
        let local = m.uniforms().inv_model().transform_point3(Vec3::new(5.0, 0.0, 0.0));
        assert!(local.length() < 1e-5);
    }

    #[test]
    fn set_params_updates_uniforms() {
        let mut m = FireMaterial::with_seed(FireParams::default(), 0.0);
        m.set_params(FireParams {
            magnitude: 0.5,
            gain: 0.25,
            ..FireParams::default()
        });
        assert_eq!(m.uniforms().magnitude, 0.5);
        assert_eq!(m.uniforms().gain, 0.25);
        assert_eq!(m.params().magnitude, 0.5);
    }
}
