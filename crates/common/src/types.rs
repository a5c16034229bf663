use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Rotation given as XYZ Euler angles in radians, applied X first.
    pub fn with_euler(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Quat::from_euler(EulerRot::XYZ, x, y, z);
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Local-to-parent matrix (scale, then rotate, then translate).
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// A scene-graph node: a local transform plus its cached world matrix.
///
/// The cached matrix is only refreshed by [`Node::update_world_matrix`];
/// callers that mutate `transform` must propagate before reading
/// [`Node::world_matrix`] in the same frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub transform: Transform,
    world: Mat4,
}

impl Default for Node {
    fn default() -> Self {
        Self::new(Transform::default())
    }
}

impl Node {
    /// Create a node whose world matrix is its local matrix (root parent).
    pub fn new(transform: Transform) -> Self {
        Self {
            world: transform.matrix(),
            transform,
        }
    }

    /// Recompute the world matrix from the parent's world matrix.
    pub fn update_world_matrix(&mut self, parent: Mat4) {
        self.world = parent * self.transform.matrix();
    }

    pub fn world_matrix(&self) -> Mat4 {
        self.world
    }

    pub fn world_position(&self) -> Vec3 {
        self.world.w_axis.truncate()
    }
}
