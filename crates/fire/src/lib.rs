//! Procedural fire: a volumetric-looking flame ray-marched through a 3D noise
//! field inside a unit cube, colored by a vertical ramp texture.
//!
//! The GPU program lives in [`shader`]; [`reference`] evaluates the same
//! fragment math on the CPU so the flame can be checked without a device.
//!
//! # Invariants
//! - The inverse model matrix uniform is refreshed every frame by
//!   [`FireMaterial::sync`] before the uniforms are uploaded.
//! - A ray-march step whose ramp coordinate leaves the open unit square
//!   contributes exactly zero.
//! - Each material owns its uniforms; nothing is shared between instances.

pub mod material;
pub mod noise;
pub mod params;
pub mod ramp;
pub mod reference;
pub mod shader;

pub use material::{FireMaterial, FireUniforms, SEED_RANGE};
pub use params::{FireBlend, FireParams, MAX_ITERATIONS, MAX_OCTAVES};
pub use ramp::{FlameRamp, RampSampler};
pub use shader::fire_shader_source;
