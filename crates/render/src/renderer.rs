use campfire_fire::reference;
use campfire_fire::FlameRamp;
use campfire_scene::{Scene, Shape};
use glam::{Vec2, Vec3};
use std::fmt::Write;

/// Camera/view configuration for rendering.
///
/// The scene is viewed through a fixed orthographic camera on the +Z axis
/// looking toward the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Visible region in world units.
    pub viewport: Vec2,
}

impl RenderView {
    /// Pixels per world unit.
    pub const ZOOM: f32 = 70.0;

    /// View for a window of the given pixel size.
    pub fn for_window(width: u32, height: u32) -> Self {
        Self {
            viewport: Vec2::new(width.max(1) as f32, height.max(1) as f32) / Self::ZOOM,
            ..Self::default()
        }
    }
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 100.0),
            viewport: Vec2::new(1280.0, 720.0) / Self::ZOOM,
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads scene state and a view configuration, then produces
/// output. It never mutates the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given scene state and view.
    fn render(&self, scene: &Scene, view: &RenderView) -> Self::Output;
}

/// Human-readable dump of the animated scene state.
///
/// Useful for CLI output, logging, and testing the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, view: &RenderView) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "=== Campfire (frame={}, t={:.3}s) ===",
            scene.frame(),
            scene.elapsed()
        );
        let _ = writeln!(
            out,
            "View: eye=({:.1}, {:.1}, {:.1}) viewport={:.2}x{:.2}",
            view.eye.x, view.eye.y, view.eye.z, view.viewport.x, view.viewport.y
        );
        let _ = writeln!(out, "Ambient: intensity={:.4}", scene.ambient.intensity);
        let t = scene.spot.target.world_position();
        let d = scene.spot.direction();
        let _ = writeln!(
            out,
            "Spot: target=({:.3}, {:.3}, {:.3}) dir=({:.3}, {:.3}, {:.3})",
            t.x, t.y, t.z, d.x, d.y, d.z
        );
        let _ = writeln!(
            out,
            "Prism: emissive_intensity={:.4}",
            scene.prism.material.emissive_intensity
        );
        let u = scene.campfire.material.uniforms();
        let _ = writeln!(
            out,
            "Fire: seed={:.3} time={:.3} scale=({:.1}, {:.1}, {:.1}) magnitude={:.2}",
            u.seed, u.time, u.scale[0], u.scale[1], u.scale[2], u.magnitude
        );
        let _ = writeln!(out, "Props: {}", scene.opaque_props().count());
        for prop in scene.opaque_props() {
            let p = prop.node.world_position();
            let shape = match prop.shape {
                Shape::Cube => "cube",
                Shape::Cylinder { .. } => "cylinder",
                Shape::Quad => "quad",
            };
            let _ = writeln!(
                out,
                "  [{}] {} pos=({:.2}, {:.2}, {:.2})",
                prop.name, shape, p.x, p.y, p.z
            );
        }
        out
    }
}

/// ASCII preview of the campfire, shaded on the CPU.
///
/// Samples the front face of the fire volume on a `columns x rows` grid and
/// maps fragment alpha to a character ramp.
#[derive(Debug)]
pub struct AsciiFireRenderer {
    columns: usize,
    rows: usize,
    ramp: FlameRamp,
}

impl AsciiFireRenderer {
    const PALETTE: &'static [u8] = b" .:-=+*#%@";

    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns: columns.max(1),
            rows: rows.max(1),
            ramp: FlameRamp::default(),
        }
    }

    fn glyph(alpha: f32) -> char {
        let last = Self::PALETTE.len() - 1;
        let idx = (alpha.clamp(0.0, 1.0) * last as f32).round() as usize;
        Self::PALETTE[idx.min(last)] as char
    }
}

impl Default for AsciiFireRenderer {
    fn default() -> Self {
        Self::new(32, 48)
    }
}

impl Renderer for AsciiFireRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, view: &RenderView) -> String {
        let fire = &scene.campfire;
        let center = fire.node.world_position();
        let scale = fire.node.transform.scale;
        let front_z = center.z + scale.z * 0.5;

        let mut out = String::with_capacity((self.columns + 1) * self.rows);
        for row in 0..self.rows {
            // Top row first.
            let v = 1.0 - (row as f32 + 0.5) / self.rows as f32;
            for col in 0..self.columns {
                let u = (col as f32 + 0.5) / self.columns as f32;
                let world = Vec3::new(
                    center.x + (u - 0.5) * scale.x,
                    center.y + (v - 0.5) * scale.y,
                    front_z,
                );
                let c = reference::shade(&fire.material, &self.ramp, world, view.eye);
                out.push(Self::glyph(c.w));
            }
            out.push('\n');
        }
        out
    }
}
