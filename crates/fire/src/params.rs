use serde::{Deserialize, Serialize};

/// How the flame is composited over what is already drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FireBlend {
    /// Standard transparency: `src * a + dst * (1 - a)`.
    #[default]
    Alpha,
    /// Glow: `src * a + dst`.
    Additive,
}

/// Upper bound on ray-march steps per fragment.
pub const MAX_ITERATIONS: u32 = 64;
/// Upper bound on turbulence octaves.
pub const MAX_OCTAVES: u32 = 16;

/// Tunable parameters of one fire instance.
///
/// `iterations` and `octaves` are baked into the shader source, so changing
/// them requires a new pipeline. Everything else is a uniform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireParams {
    /// Ray-march steps per fragment.
    pub iterations: u32,
    /// Turbulence octaves.
    pub octaves: u32,
    /// x/z frequency, y frequency, unused, time-scroll speed.
    pub noise_scale: [f32; 4],
    /// Strength of the upward turbulence displacement.
    pub magnitude: f32,
    /// Frequency multiplier between octaves.
    pub lacunarity: f32,
    /// Amplitude multiplier between octaves.
    pub gain: f32,
    /// Tint applied to the accumulated ramp color.
    pub color: [f32; 3],
    pub blend: FireBlend,
}

impl Default for FireParams {
    fn default() -> Self {
        Self {
            iterations: 10,
            octaves: 3,
            noise_scale: [1.0, 2.0, 1.0, 0.3],
            magnitude: 1.5,
            lacunarity: 3.0,
            gain: 0.6,
            color: [1.0, 1.0, 1.0],
            blend: FireBlend::Alpha,
        }
    }
}
