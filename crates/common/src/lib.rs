//! Shared types and math for the campfire scene.
//!
//! # Invariants
//! - Math helpers are pure or mutate only the value handed to them.
//! - No global scratch state.

pub mod math;
pub mod types;

pub use math::{
    AIR_IOR, DEFAULT_LERP_RATE, GLASS_IOR, lerp, lerp_vec3, refraction_angle,
    refraction_angle_default,
};
pub use types::{Node, Transform};
