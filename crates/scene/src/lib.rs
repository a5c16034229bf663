//! Campfire scene: retained scene graph, per-frame animation, configuration.
//!
//! # Invariants
//! - The scene is assembled once; per-frame mutation flows only through
//!   [`Animator::update`].
//! - The fire's inverse model matrix is re-derived from its node every frame.
//! - Aim angles are never wrapped into a bounded range.

pub mod animator;
pub mod config;
pub mod scene;

pub use animator::{Animator, FrameInput};
pub use config::{AnimationConfig, ConfigError, SceneConfig};
pub use scene::{AmbientLight, FireNode, GAMMA_YAW, Material, Prop, Scene, Shape, SpotLight};
