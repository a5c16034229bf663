//! Input mapping: window cursor to scene pointer, keys to actions.
//!
//! # Invariants
//! - Pointer coordinates are normalized to `[-1, 1]` per axis, +Y up.
//! - The scene consumes actions and pointer values, never raw window events.

pub mod action;
pub mod pointer;

pub use action::Action;
pub use pointer::{Pointer, Viewport};
