//! Scene configuration.
//!
//! Every field has a default, so an empty YAML document (or no file at all)
//! yields the stock campfire. Example:
//!
//! ```yaml
//! fire:
//!   magnitude: 1.2
//!   blend: additive
//! animation:
//!   steer_rate: 0.08
//!   ray_normal: [1.0, 0.0, 0.0]
//! ```

use campfire_common::{AIR_IOR, GLASS_IOR};
use campfire_fire::{FireParams, MAX_ITERATIONS, MAX_OCTAVES};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a scene configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tuning of the per-frame animator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub glass_ior: f32,
    pub air_ior: f32,
    /// Artistic exaggeration applied to the refraction angle.
    pub refraction_gain: f32,
    /// Rate at which the spot light target follows the aim direction.
    pub steer_rate: f32,
    pub emissive_target: f32,
    pub emissive_rate: f32,
    /// Ambient intensity swings between `-amplitude` and `amplitude`.
    pub ambient_amplitude: f32,
    pub ambient_rate: f32,
    /// Surface normal the pointer ray refracts through. `None` or a zero
    /// vector disables steering.
    pub ray_normal: Option<[f32; 3]>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            glass_ior: GLASS_IOR,
            air_ior: AIR_IOR,
            refraction_gain: 6.0,
            steer_rate: 0.05,
            emissive_target: 2.5,
            emissive_rate: 0.1,
            ambient_amplitude: 0.1,
            ambient_rate: 0.125,
            ray_normal: Some([1.0, 0.0, 0.0]),
        }
    }
}

impl AnimationConfig {
    pub fn ray_normal(&self) -> Option<Vec3> {
        self.ray_normal.map(Vec3::from_array)
    }
}

/// Top-level scene configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub fire: FireParams,
    pub animation: AnimationConfig,
}

impl SceneConfig {
    /// Load and validate a YAML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        tracing::debug!(path = %path.display(), "scene config loaded");
        Ok(config)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = if text.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(text)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.animation;
        positive("animation.glass_ior", a.glass_ior)?;
        positive("animation.air_ior", a.air_ior)?;
        rate("animation.steer_rate", a.steer_rate)?;
        rate("animation.emissive_rate", a.emissive_rate)?;
        rate("animation.ambient_rate", a.ambient_rate)?;
        finite("animation.refraction_gain", a.refraction_gain)?;
        finite("animation.emissive_target", a.emissive_target)?;
        finite("animation.ambient_amplitude", a.ambient_amplitude)?;
        if let Some(n) = a.ray_normal {
            if n.iter().any(|c| !c.is_finite()) {
                return Err(invalid("animation.ray_normal", "components must be finite"));
            }
        }

        let f = &self.fire;
        count("fire.iterations", f.iterations, MAX_ITERATIONS)?;
        count("fire.octaves", f.octaves, MAX_OCTAVES)?;
        for (field, v) in [
            ("fire.magnitude", f.magnitude),
            ("fire.lacunarity", f.lacunarity),
            ("fire.gain", f.gain),
        ] {
            finite(field, v)?;
        }
        if f.noise_scale.iter().chain(f.color.iter()).any(|c| !c.is_finite()) {
            return Err(invalid("fire", "noise_scale and color must be finite"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn finite(field: &'static str, v: f32) -> Result<(), ConfigError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("{v} is not finite")))
    }
}

fn positive(field: &'static str, v: f32) -> Result<(), ConfigError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{v} must be > 0")))
    }
}

fn count(field: &'static str, v: u32, max: u32) -> Result<(), ConfigError> {
    if (1..=max).contains(&v) {
        Ok(())
    } else {
        Err(invalid(field, format!("{v} must be in 1..={max}")))
    }
}

fn rate(field: &'static str, v: f32) -> Result<(), ConfigError> {
    if v > 0.0 && v <= 1.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{v} must be in (0, 1]")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campfire_fire::FireBlend;
    use std::io::Write;

    #[test]
    fn empty_document_is_default() {
        let config = SceneConfig::from_yaml_str("").unwrap();
        assert_eq!(config, SceneConfig::default());
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = SceneConfig::from_yaml_str(
            "fire:\n  magnitude: 0.75\n  blend: additive\nanimation:\n  steer_rate: 0.2\n",
        )
        .unwrap();
        assert_eq!(config.fire.magnitude, 0.75);
        assert_eq!(config.fire.blend, FireBlend::Additive);
        assert_eq!(config.fire.lacunarity, 3.0);
        assert_eq!(config.animation.steer_rate, 0.2);
        assert_eq!(config.animation.glass_ior, GLASS_IOR);
    }

    #[test]
    fn null_normal_disables_steering() {
        let config = SceneConfig::from_yaml_str("animation:\n  ray_normal: null\n").unwrap();
        assert_eq!(config.animation.ray_normal(), None);
    }

    #[test]
    fn rejects_non_positive_ior() {
        let err = SceneConfig::from_yaml_str("animation:\n  glass_ior: 0.0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "animation.glass_ior",
                ..
            }
        ));
    }

    #[test]
    fn rejects_rate_out_of_range() {
        let err = SceneConfig::from_yaml_str("animation:\n  ambient_rate: 1.5\n").unwrap_err();
        assert!(err.to_string().contains("ambient_rate"));
    }

    #[test]
    fn rejects_zero_iterations() {
        let err = SceneConfig::from_yaml_str("fire:\n  iterations: 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "fire.iterations",
                ..
            }
        ));
    }

    #[test]
    fn rejects_excessive_iterations() {
        let err = SceneConfig::from_yaml_str("fire:\n  iterations: 3000000000\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "fire.iterations",
                ..
            }
        ));
        let err = SceneConfig::from_yaml_str("fire:\n  iterations: 65\n").unwrap_err();
        assert!(err.to_string().contains("1..=64"));
        assert!(SceneConfig::from_yaml_str("fire:\n  iterations: 64\n").is_ok());
    }

    #[test]
    fn rejects_excessive_octaves() {
        let err = SceneConfig::from_yaml_str("fire:\n  octaves: 17\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "fire.octaves",
                ..
            }
        ));
        assert!(SceneConfig::from_yaml_str("fire:\n  octaves: 16\n").is_ok());
    }

    #[test]
    fn malformed_yaml_is_reported() {
        let err = SceneConfig::from_yaml_str("fire: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn yaml_roundtrip_preserves_config() {
        let mut config = SceneConfig::default();
        config.fire.gain = 0.5;
        config.animation.ray_normal = None;
        let text = config.to_yaml_string().unwrap();
        assert_eq!(SceneConfig::from_yaml_str(&text).unwrap(), config);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fire:\n  octaves: 4").unwrap();
        let config = SceneConfig::load(file.path()).unwrap();
        assert_eq!(config.fire.octaves, 4);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SceneConfig::load(dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
