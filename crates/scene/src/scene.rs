use campfire_common::{Node, Transform};
use campfire_fire::{FireMaterial, FireParams};
use glam::{Mat4, Vec3};
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_6, PI};

/// Fixed yaw of the gamma glyph on top of its spin.
pub const GAMMA_YAW: f32 = 0.1;

/// Primitive geometry of a prop. Cylinders stand along the local Y axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Unit cube centered on the origin.
    Cube,
    Cylinder {
        radius: f32,
        height: f32,
        segments: u32,
    },
    /// Unit quad in the XY plane facing +Z.
    Quad,
}

/// Surface description of an opaque prop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub base_color: Vec3,
    pub emissive: Vec3,
    pub emissive_intensity: f32,
}

impl Material {
    pub fn solid(base_color: Vec3) -> Self {
        Self {
            base_color,
            emissive: Vec3::ZERO,
            emissive_intensity: 0.0,
        }
    }

    /// Emitted radiance (emissive color scaled by intensity).
    pub fn emission(&self) -> Vec3 {
        self.emissive * self.emissive_intensity
    }
}

/// A static piece of opaque scene geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Prop {
    pub name: String,
    pub shape: Shape,
    pub node: Node,
    pub material: Material,
}

impl Prop {
    pub fn new(name: impl Into<String>, shape: Shape, transform: Transform, material: Material) -> Self {
        Self {
            name: name.into(),
            shape,
            node: Node::new(transform),
            material,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Vec3,
    pub intensity: f32,
}

/// A cone light aimed at a separate target node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    pub node: Node,
    pub target: Node,
    pub color: Vec3,
    pub intensity: f32,
    /// Range beyond which the light contributes nothing.
    pub distance: f32,
    /// Half-angle of the cone, radians.
    pub angle: f32,
    /// Fraction of the cone over which the edge softens, `[0, 1]`.
    pub penumbra: f32,
}

impl SpotLight {
    /// World-space aim direction from the light to its target. Reflects the
    /// target as of its last world-matrix update.
    pub fn direction(&self) -> Vec3 {
        (self.target.world_position() - self.node.world_position()).normalize_or_zero()
    }
}

/// The campfire's flame volume: a unit cube node plus its fire material.
#[derive(Debug, Clone, PartialEq)]
pub struct FireNode {
    pub node: Node,
    pub material: FireMaterial,
}

impl FireNode {
    /// Propagate the node's transform and push it into the material
    /// uniforms for this frame.
    pub fn sync(&mut self, elapsed: f32) {
        self.node.update_world_matrix(Mat4::IDENTITY);
        self.material
            .sync(elapsed, self.node.world_matrix(), self.node.transform.scale);
    }
}

/// The retained scene graph. All nodes hang directly off the root.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub ambient: AmbientLight,
    pub spot: SpotLight,
    /// The glass prism whose glow the animator drives.
    pub prism: Prop,
    /// Slab standing in for the gamma glyph; spins about Y with scene time.
    pub gamma: Prop,
    pub campfire: FireNode,
    pub props: Vec<Prop>,
    elapsed: f32,
    frame: u64,
}

impl Scene {
    /// The stock campground: backdrop, pedestal, three logs, glowing prism,
    /// the spinning gamma, and the campfire above them.
    pub fn campground<R: Rng + ?Sized>(fire: FireParams, rng: &mut R) -> Self {
        Self::with_fire(FireMaterial::new(fire, rng))
    }

    /// The stock campground with a caller-built fire material.
    pub fn with_fire(material: FireMaterial) -> Self {
        let wood = Material::solid(Vec3::new(0.42, 0.27, 0.16));
        let log = Shape::Cylinder {
            radius: 0.3,
            height: 4.0,
            segments: 30,
        };

        let props = vec![
            Prop::new(
                "backdrop",
                Shape::Quad,
                Transform::from_position(Vec3::new(0.0, 0.0, -10.0))
                    .with_scale(Vec3::new(20.0, 15.0, 1.0)),
                Material::solid(Vec3::new(0.08, 0.09, 0.14)),
            ),
            Prop::new(
                "pedestal",
                Shape::Cube,
                Transform::from_position(Vec3::new(0.0, -2.0, 0.0)),
                Material::solid(Vec3::new(0.55, 0.55, 0.6)),
            ),
            Prop::new(
                "log_right",
                log,
                Transform::from_position(Vec3::new(0.5, -3.0, 2.0)).with_euler(1.0, 0.0, FRAC_PI_6),
                wood,
            ),
            Prop::new(
                "log_left",
                log,
                Transform::from_position(Vec3::new(-0.5, -3.0, 2.0))
                    .with_euler(1.0, 0.0, -FRAC_PI_6),
                wood,
            ),
            Prop::new(
                "log_back",
                log,
                Transform::from_position(Vec3::new(0.0, -3.0, -2.0)).with_euler(-1.0, 0.0, PI),
                wood,
            ),
        ];

        let prism = Prop::new(
            "prism",
            Shape::Cylinder {
                radius: 0.25,
                height: 0.1,
                segments: 32,
            },
            Transform::from_position(Vec3::new(0.0, -2.0, 0.0)).with_euler(0.0, 0.0, FRAC_PI_2),
            Material {
                base_color: Vec3::splat(0.9),
                emissive: Vec3::new(1.0, 0.85, 0.6),
                emissive_intensity: 0.0,
            },
        );

        let gamma = Prop::new(
            "gamma",
            Shape::Cube,
            Transform::from_position(Vec3::new(0.0, -0.5, 0.0))
                .with_euler(0.0, GAMMA_YAW, 0.0)
                .with_scale(Vec3::new(0.8, 1.2, 0.2)),
            Material::solid(Vec3::new(0.85, 0.8, 0.7)),
        );

        let mut scene = Self {
            ambient: AmbientLight {
                color: Vec3::ONE,
                intensity: 0.0,
            },
            spot: SpotLight {
                node: Node::new(Transform::from_position(Vec3::new(0.0, 0.0, 1.0))),
                target: Node::default(),
                color: Vec3::ONE,
                intensity: 1.0,
                distance: 7.0,
                angle: 1.0,
                penumbra: 1.0,
            },
            prism,
            gamma,
            campfire: FireNode {
                node: Node::new(
                    Transform::from_position(Vec3::new(0.0, 3.0, -2.0))
                        .with_scale(Vec3::new(2.0, 15.0, 1.0)),
                ),
                material,
            },
            props,
            elapsed: 0.0,
            frame: 0,
        };
        scene.update_world_matrices();
        scene.campfire.sync(0.0);
        scene
    }

    /// Propagate every node's local transform into its world matrix.
    pub fn update_world_matrices(&mut self) {
        let root = Mat4::IDENTITY;
        self.spot.node.update_world_matrix(root);
        self.spot.target.update_world_matrix(root);
        self.prism.node.update_world_matrix(root);
        self.gamma.node.update_world_matrix(root);
        self.campfire.node.update_world_matrix(root);
        for prop in &mut self.props {
            prop.node.update_world_matrix(root);
        }
    }

    /// Opaque geometry, prism and gamma included.
    pub fn opaque_props(&self) -> impl Iterator<Item = &Prop> {
        self.props
            .iter()
            .chain([&self.prism, &self.gamma])
    }

    pub fn find_prop(&self, name: &str) -> Option<&Prop> {
        self.opaque_props().find(|p| p.name == name)
    }

    /// Seconds of scene time as of the last animated frame.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Number of animated frames.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub(crate) fn advance_clock(&mut self, elapsed: f32) {
        self.elapsed = elapsed;
        self.frame += 1;
    }
}
