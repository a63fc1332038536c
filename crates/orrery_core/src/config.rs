use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::constants::*;
use crate::error::{ConfigResult, check_range};

/// How accumulated red-dot collisions turn into a split
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SplitPolicy {
    /// Split as soon as the total reaches `threshold`
    Deterministic { threshold: u32 },
    /// Once at `threshold`, each further qualifying collision splits with `chance`
    Probabilistic { threshold: u32, chance: f64 },
}

impl Default for SplitPolicy {
    fn default() -> Self {
        Self::Probabilistic {
            threshold: PROBABILISTIC_SPLIT_THRESHOLD,
            chance: PROBABILISTIC_SPLIT_CHANCE,
        }
    }
}

impl SplitPolicy {
    pub fn threshold(&self) -> u32 {
        match *self {
            Self::Deterministic { threshold } | Self::Probabilistic { threshold, .. } => threshold,
        }
    }
}

/// Simulation configuration
///
/// Every field has a default, so a TOML file only needs the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Gravitational constant G
    pub gravity_constant: f32,
    /// Constant downward acceleration (px/s^2)
    pub downward_gravity: f32,
    /// Mass of every green star
    pub green_mass: f32,
    /// Trail length in samples (consumed by renderers only)
    pub trail_length: u32,
    /// Audio volume 0..=10; 0 mutes every sound cue
    pub audio_volume: u32,
    /// Impulse multiplier k used by the collision resolver
    pub restitution: f32,
    pub split_policy: SplitPolicy,
    pub blue_antigravity_threshold: u32,
    pub green_antigravity_threshold: u32,
    /// Blue-green collisions needed per spawned cloud
    pub cloud_spawn_collisions: u32,
    pub max_clouds: usize,
    /// Speed floor enforced after a cloud-entry kick
    pub cloud_dwell_min_speed: f32,
    /// Continuous dwell time that activates antigravity
    pub cloud_dwell_trigger: f32,
    /// Dwell also spawns a yellow crescent and two red dots, and reshapes the cloud
    pub cloud_dwell_spawns: bool,
    /// Hard speed cap applied to every body after collisions
    pub speed_cap: f32,
    pub red_decay_mean: f32,
    pub comet_spawn_mean: f32,
    pub cloud_half_life: f32,
    pub orange_half_life: f32,
    pub spontaneous_cloud_mean: f32,
    pub spontaneous_comet_mean: f32,
    /// Inclusive range of red dots seeded on reset
    pub initial_red_dots: [u32; 2],
    /// Random seed; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravity_constant: INITIAL_G,
            downward_gravity: DOWNWARD_GRAVITY,
            green_mass: GREEN_MASS,
            trail_length: 150,
            audio_volume: 1,
            restitution: RESTITUTION,
            split_policy: SplitPolicy::default(),
            blue_antigravity_threshold: BLUE_ANTIGRAVITY_THRESHOLD,
            green_antigravity_threshold: GREEN_ANTIGRAVITY_THRESHOLD,
            cloud_spawn_collisions: CLOUD_SPAWN_COLLISIONS,
            max_clouds: MAX_CLOUDS,
            cloud_dwell_min_speed: CLOUD_DWELL_MIN_SPEED,
            cloud_dwell_trigger: CLOUD_DWELL_TRIGGER,
            cloud_dwell_spawns: true,
            speed_cap: SPEED_CAP,
            red_decay_mean: RED_DECAY_MEAN,
            comet_spawn_mean: COMET_SPAWN_MEAN,
            cloud_half_life: CLOUD_HALF_LIFE,
            orange_half_life: ORANGE_HALF_LIFE,
            spontaneous_cloud_mean: SPONTANEOUS_CLOUD_MEAN,
            spontaneous_comet_mean: SPONTANEOUS_COMET_MEAN,
            initial_red_dots: [2, 8],
            seed: None,
        }
    }
}

impl SimConfig {
    /// Parse a TOML document and validate the result
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: SimConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML config file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check every tunable against its safe operating range
    pub fn validate(&self) -> ConfigResult<()> {
        check_range("gravity_constant", self.gravity_constant as f64, 0.0, 1.0e6, "[0, 1e6]")?;
        check_range("downward_gravity", self.downward_gravity as f64, -1.0e4, 1.0e4, "[-1e4, 1e4]")?;
        check_range("green_mass", self.green_mass as f64, 1.0e-3, 1.0e6, "[0.001, 1e6]")?;
        check_range("audio_volume", self.audio_volume as f64, 0.0, MAX_AUDIO_VOLUME as f64, "[0, 10]")?;
        check_range("restitution", self.restitution as f64, 1.0e-3, 2.0, "(0, 2]")?;
        match self.split_policy {
            SplitPolicy::Deterministic { threshold } => {
                check_range("split_policy.threshold", threshold as f64, 1.0, 1.0e6, "[1, 1e6]")?;
            }
            SplitPolicy::Probabilistic { threshold, chance } => {
                check_range("split_policy.threshold", threshold as f64, 1.0, 1.0e6, "[1, 1e6]")?;
                check_range("split_policy.chance", chance, 0.0, 1.0, "[0, 1]")?;
            }
        }
        check_range(
            "blue_antigravity_threshold",
            self.blue_antigravity_threshold as f64,
            1.0,
            1.0e6,
            "[1, 1e6]",
        )?;
        check_range(
            "green_antigravity_threshold",
            self.green_antigravity_threshold as f64,
            1.0,
            1.0e6,
            "[1, 1e6]",
        )?;
        check_range(
            "cloud_spawn_collisions",
            self.cloud_spawn_collisions as f64,
            1.0,
            1.0e6,
            "[1, 1e6]",
        )?;
        check_range("cloud_dwell_min_speed", self.cloud_dwell_min_speed as f64, 0.0, 1.0e3, "[0, 1e3]")?;
        check_range("cloud_dwell_trigger", self.cloud_dwell_trigger as f64, 1.0e-3, 1.0e4, "(0, 1e4]")?;
        check_range("speed_cap", self.speed_cap as f64, 1.0, 1.0e5, "[1, 1e5]")?;
        for (name, mean) in [
            ("red_decay_mean", self.red_decay_mean),
            ("comet_spawn_mean", self.comet_spawn_mean),
            ("cloud_half_life", self.cloud_half_life),
            ("orange_half_life", self.orange_half_life),
            ("spontaneous_cloud_mean", self.spontaneous_cloud_mean),
            ("spontaneous_comet_mean", self.spontaneous_comet_mean),
        ] {
            check_range(name, mean as f64, 1.0e-3, 1.0e5, "(0, 1e5]")?;
        }
        let [lo, hi] = self.initial_red_dots;
        check_range("initial_red_dots[1]", hi as f64, lo as f64, 999.0, "[initial_red_dots[0], 999]")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_defaults_are_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SimConfig::from_toml_str("gravity_constant = 250.0\nseed = 7\n").unwrap();
        assert_eq!(config.gravity_constant, 250.0);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.green_mass, GREEN_MASS);
        assert_eq!(config.split_policy, SplitPolicy::default());
    }

    #[test]
    fn test_split_policy_from_toml() {
        let text = "[split_policy]\nkind = \"deterministic\"\nthreshold = 50\n";
        let config = SimConfig::from_toml_str(text).unwrap();
        assert_eq!(config.split_policy, SplitPolicy::Deterministic { threshold: 50 });
        assert_eq!(config.split_policy.threshold(), 50);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let err = SimConfig::from_toml_str("restitution = 3.0\n").unwrap_err();
        match err {
            ConfigError::OutOfRange { name, .. } => assert_eq!(name, "restitution"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_inverted_red_range_rejected() {
        let config = SimConfig {
            initial_red_dots: [5, 2],
            ..SimConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_garbage_is_parse_error() {
        assert!(matches!(
            SimConfig::from_toml_str("gravity_constant = \"lots\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
