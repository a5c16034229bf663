//! wgpu render backend for the campfire scene.
//!
//! Draws the opaque props lit by the ambient and spot lights, then the
//! ray-marched fire volume on top of them.
//!
//! # Invariants
//! - Renderer never mutates scene state.
//! - The fire is drawn after all opaque geometry, depth-tested against it,
//!   and never writes depth.
//! - The fire pipeline is rebuilt whenever the iteration count, octave
//!   count, or blend mode of the campfire material changes.

mod camera;
mod error;
mod gpu;
mod mesh;
mod shaders;
mod texture;

pub use camera::OrthoCamera;
pub use error::RenderError;
pub use gpu::{CampfireRenderer, GpuContext};
