use glam::Vec2;

/// Size of the visible scene region in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width, self.height) / 2.0
    }
}

/// Pointer position in normalized device coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pointer {
    ndc: Vec2,
}

impl Pointer {
    /// A pointer at the given NDC position, clamped to `[-1, 1]`.
    pub fn from_ndc(ndc: Vec2) -> Self {
        Self {
            ndc: ndc.clamp(Vec2::NEG_ONE, Vec2::ONE),
        }
    }

    /// Convert a window cursor position (pixels, origin top-left, +Y down)
    /// into NDC (origin at center, +Y up). A zero-sized window maps
    /// everything to the center.
    pub fn from_cursor(x: f64, y: f64, width: u32, height: u32) -> Self {
        if width == 0 || height == 0 {
            tracing::trace!(width, height, "cursor on empty surface");
            return Self::default();
        }
        let nx = (x / width as f64) * 2.0 - 1.0;
        let ny = 1.0 - (y / height as f64) * 2.0;
        Self::from_ndc(Vec2::new(nx as f32, ny as f32))
    }

    pub fn ndc(&self) -> Vec2 {
        self.ndc
    }

    /// NDC scaled to the viewport's half-extents: world units from the
    /// screen center.
    pub fn in_viewport(&self, viewport: &Viewport) -> Vec2 {
        self.ndc * viewport.half_extents()
    }
}
