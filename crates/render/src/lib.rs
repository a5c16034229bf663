//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers never mutate the scene; the animator owns per-frame changes.
//! - Render state derives from scene state and view.
//!
//! The GPU backend lives in `campfire-render-wgpu`. The renderers here need
//! no device: a text dump of scene state and an ASCII preview of the fire
//! computed with the CPU reference shader.

mod renderer;

pub use renderer::{AsciiFireRenderer, DebugTextRenderer, RenderView, Renderer};

pub fn crate_info() -> &'static str {
    "campfire-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
