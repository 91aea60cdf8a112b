//! Tunable simulation constants, loadable from YAML.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Hard upper bound on concurrently live dynamic bodies.
pub const MAX_DYNAMIC_BODIES: usize = 5;

/// Errors from loading or validating a [`SimConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Largest delta a single frame may advance, in seconds.
    pub max_delta: f64,
    pub spawn: SpawnConfig,
    pub player: PlayerConfig,
    pub jump: JumpConfig,
    pub camera: CameraConfig,
    pub terrain: TerrainConfig,
    /// Static obstacles placed at startup.
    pub props: Vec<PropConfig>,
}

impl Default for SimConfig {
    fn default() -> Self {
        let tree = |x, z| PropConfig {
            position: Vec3::new(x, 20.0, z),
            half_extents: Vec3::new(4.0, 16.0, 4.0),
        };
        Self {
            max_delta: 0.1,
            spawn: SpawnConfig::default(),
            player: PlayerConfig::default(),
            jump: JumpConfig::default(),
            camera: CameraConfig::default(),
            terrain: TerrainConfig::default(),
            props: vec![
                tree(132.0, -190.0),
                tree(216.0, 80.0),
                tree(-82.0, 222.0),
                tree(13.0, -125.0),
                tree(-100.0, 31.0),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Simulation seconds between scheduled spawns.
    pub interval: f64,
    pub max_live: usize,
    pub point: Vec3,
    pub mass: f32,
    /// Bodies that fall below this height are removed.
    pub despawn_below: Option<f32>,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            interval: 3.0,
            max_live: MAX_DYNAMIC_BODIES,
            point: Vec3::new(0.0, 100.0, 0.0),
            mass: 10.0,
            despawn_below: None,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub start: Vec3,
    pub half_extents: Vec3,
    pub mass: f32,
    /// Units per second.
    pub walk_speed: f32,
    /// Planar distance under which a click target counts as reached.
    pub arrival_threshold: f32,
    /// Where the secondary avatar stands, when it loads.
    pub avatar_start: Vec3,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start: Vec3::new(0.0, 20.0, 0.0),
            half_extents: Vec3::new(3.0, 9.0, 3.0),
            mass: 50.0,
            walk_speed: 20.0,
            arrival_threshold: 3.0,
            avatar_start: Vec3::new(0.0, 20.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    /// Minimum seconds between jumps, and between a jump and re-grounding.
    pub cooldown: f64,
    /// Upward impulse applied on a jump.
    pub impulse: f32,
    /// Constant downward force applied to the player every frame.
    pub gravity_bias: f32,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            cooldown: 3.0,
            impulse: 8000.0,
            gravity_bias: 3000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub gameplay_eye: Vec3,
    pub gameplay_look_at: Vec3,
    pub debug_eye: Vec3,
    pub debug_look_at: Vec3,
    pub debug_far: f32,
    /// Maximum planar distance between gameplay camera and player.
    pub follow_distance: f32,
    /// Height above the player the gameplay camera aims at.
    pub look_height: f32,
    pub fov_y_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            gameplay_eye: Vec3::new(0.0, 50.0, -150.0),
            gameplay_look_at: Vec3::ZERO,
            debug_eye: Vec3::new(100.0, 200.0, 200.0),
            debug_look_at: Vec3::ZERO,
            debug_far: 4000.0,
            follow_distance: 100.0,
            look_height: 10.0,
            fov_y_degrees: 45.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub height: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self { height: 0.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropConfig {
    pub position: Vec3,
    pub half_extents: Vec3,
}

impl SimConfig {
    /// Parse a YAML document. Missing fields take their defaults.
    pub fn from_yaml_str(src: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_delta > 0.0) {
            return Err(ConfigError::Invalid("max_delta must be positive".into()));
        }
        if !(self.spawn.interval > 0.0) {
            return Err(ConfigError::Invalid("spawn.interval must be positive".into()));
        }
        if self.spawn.max_live > MAX_DYNAMIC_BODIES {
            return Err(ConfigError::Invalid(format!(
                "spawn.max_live {} exceeds {MAX_DYNAMIC_BODIES}",
                self.spawn.max_live
            )));
        }
        if !(self.spawn.mass > 0.0) || !(self.player.mass > 0.0) {
            return Err(ConfigError::Invalid("body masses must be positive".into()));
        }
        if !self.spawn.mass.is_finite() || !self.player.mass.is_finite() {
            return Err(ConfigError::Invalid("body masses must be finite".into()));
        }
        if !(self.jump.cooldown >= 0.0) || !self.jump.cooldown.is_finite() {
            return Err(ConfigError::Invalid("jump.cooldown must not be negative".into()));
        }
        if !self.jump.impulse.is_finite() || !self.jump.gravity_bias.is_finite() {
            return Err(ConfigError::Invalid("jump forces must be finite".into()));
        }
        if !(self.camera.follow_distance > 0.0) || !self.camera.follow_distance.is_finite() {
            return Err(ConfigError::Invalid(
                "camera.follow_distance must be positive".into(),
            ));
        }
        let points = [
            self.spawn.point,
            self.player.start,
            self.player.avatar_start,
            self.player.half_extents,
        ];
        if points.iter().any(|p| !p.is_finite()) || !self.terrain.height.is_finite() {
            return Err(ConfigError::Invalid("positions must be finite".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SimConfig::default();
        config.validate().unwrap();
        assert_eq!(config.spawn.interval, 3.0);
        assert_eq!(config.spawn.max_live, 5);
        assert_eq!(config.jump.cooldown, 3.0);
        assert_eq!(config.camera.follow_distance, 100.0);
        assert_eq!(config.props.len(), 5);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config = SimConfig::from_yaml_str("spawn:\n  interval: 1.5\n  seed: 9\n").unwrap();
        assert_eq!(config.spawn.interval, 1.5);
        assert_eq!(config.spawn.seed, Some(9));
        assert_eq!(config.spawn.max_live, MAX_DYNAMIC_BODIES);
        assert_eq!(config.player, PlayerConfig::default());
    }

    #[test]
    fn rejects_capacity_above_limit() {
        let err = SimConfig::from_yaml_str("spawn:\n  max_live: 6\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_nan_fields() {
        for src in [
            "spawn:\n  mass: .nan\n",
            "player:\n  mass: .nan\n",
            "jump:\n  cooldown: .nan\n",
            "camera:\n  follow_distance: .nan\n",
            "spawn:\n  mass: .inf\n",
            "spawn:\n  point: [0.0, .nan, 0.0]\n",
        ] {
            let err = SimConfig::from_yaml_str(src).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{src:?} accepted");
        }
    }

    #[test]
    fn rejects_malformed_yaml() {
        let err = SimConfig::from_yaml_str("spawn: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }
}
