//! Flame color ramp.
//!
//! The ramp maps `(radial distance, height)` inside the flame volume to a
//! color. Row 0 is the base of the flame, the last row its tip; column 0 is
//! the flame axis. Dark texels are transparent because the shader derives
//! alpha from the red channel.

use glam::{Vec2, Vec4};

/// Anything the CPU reference can look a ramp color up in.
pub trait RampSampler {
    /// Color at normalized coordinate `st`, both axes in `[0, 1]`.
    fn sample(&self, st: Vec2) -> Vec4;
}

/// A uniform ramp: every coordinate yields the same color.
impl RampSampler for Vec4 {
    fn sample(&self, _st: Vec2) -> Vec4 {
        *self
    }
}

/// Procedurally generated RGBA8 flame gradient.
#[derive(Debug, Clone, PartialEq)]
pub struct FlameRamp {
    width: u32,
    height: u32,
    texels: Vec<[u8; 4]>,
}

impl FlameRamp {
    pub const DEFAULT_WIDTH: u32 = 64;
    pub const DEFAULT_HEIGHT: u32 = 128;

    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(2);
        let height = height.max(2);
        let mut texels = Vec::with_capacity((width * height) as usize);
        for row in 0..height {
            let v = row as f32 / (height - 1) as f32;
            for col in 0..width {
                let u = col as f32 / (width - 1) as f32;
                texels.push(to_rgba8(flame_color(u, v)));
            }
        }
        Self {
            width,
            height,
            texels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Tightly packed RGBA8 rows, first row first.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texels)
    }

    fn texel(&self, x: u32, y: u32) -> Vec4 {
        let [r, g, b, a] = self.texels[(y * self.width + x) as usize];
        Vec4::new(r as f32, g as f32, b as f32, a as f32) / 255.0
    }
}

impl Default for FlameRamp {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT)
    }
}

/// Bilinear, clamp-to-edge lookup (texel centers at `(i + 0.5) / n`).
impl RampSampler for FlameRamp {
    fn sample(&self, st: Vec2) -> Vec4 {
        let x = (st.x * self.width as f32 - 0.5).clamp(0.0, (self.width - 1) as f32);
        let y = (st.y * self.height as f32 - 0.5).clamp(0.0, (self.height - 1) as f32);
        let x0 = x.floor() as u32;
        let y0 = y.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let fx = x - x0 as f32;
        let fy = y - y0 as f32;

        let top = self.texel(x0, y0).lerp(self.texel(x1, y0), fx);
        let bottom = self.texel(x0, y1).lerp(self.texel(x1, y1), fx);
        top.lerp(bottom, fy)
    }
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Hot white-yellow core at the base, cooling to red and then to black
/// toward the rim and the tip. Kept dim: ray-march steps accumulate.
fn flame_color(u: f32, v: f32) -> Vec4 {
    let core = (1.0 - u).clamp(0.0, 1.0).powf(1.5);
    let fade = (1.0 - v).clamp(0.0, 1.0).powf(1.2) * smoothstep(0.0, 0.08, v);
    let heat = core * fade;
    Vec4::new(
        heat * 0.22,
        heat.powf(1.8) * 0.16,
        heat.powi(4) * 0.08,
        heat,
    )
}

fn to_rgba8(c: Vec4) -> [u8; 4] {
    let q = |x: f32| (x.clamp(0.0, 1.0) * 255.0).round() as u8;
    [q(c.x), q(c.y), q(c.z), q(c.w)]
}
