use serde::{Deserialize, Serialize};

use crate::physics::PlayerPhysicsConfig;

/// Seconds on the level clock when the level starts.
pub const STARTING_TIME: u32 = 401;
/// Milliseconds per clock tick during normal play.
pub const COUNT_DOWN_INTERVAL_MS: u64 = 400;
/// How long the death sequence runs before the level hands off.
pub const DEATH_SEQUENCE_MS: u64 = 3000;
/// How long the castle flag and fireworks show before the level hands off.
pub const FIREWORKS_MS: u64 = 2000;

/// Top-level level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Level1Config {
    pub physics: PlayerPhysicsConfig,
    pub starting_time: u32,
    pub count_down_interval_ms: u64,
    pub death_sequence_ms: u64,
    pub fireworks_ms: u64,
}

impl Default for Level1Config {
    fn default() -> Self {
        Self {
            physics: PlayerPhysicsConfig::default(),
            starting_time: STARTING_TIME,
            count_down_interval_ms: COUNT_DOWN_INTERVAL_MS,
            death_sequence_ms: DEATH_SEQUENCE_MS,
            fireworks_ms: FIREWORKS_MS,
        }
    }
}

impl Level1Config {
    /// Load config from a TOML file. Falls back to defaults if the file is missing
    /// or unparseable.
    pub fn load() -> Self {
        let path = std::env::var("SIDESCROLL_LEVEL1_CONFIG")
            .unwrap_or_else(|_| "config/level1.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_toml_or_default(&content, &path),
            Err(_) => Level1Config::default(),
        }
    }

    fn from_toml_or_default(content: &str, path: &str) -> Self {
        match toml::from_str::<Level1Config>(content) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!("Failed to parse {path}: {e}, using defaults");
                Level1Config::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg = Level1Config::from_toml_or_default(
            "starting_time = 300\n[physics]\njump_vel = -12.0\n",
            "inline",
        );
        assert_eq!(cfg.starting_time, 300);
        assert_eq!(cfg.physics.jump_vel, -12.0);
        assert_eq!(cfg.physics.gravity, crate::physics::GRAVITY);
        assert_eq!(cfg.count_down_interval_ms, COUNT_DOWN_INTERVAL_MS);
    }

    #[test]
    fn garbage_toml_falls_back_to_defaults() {
        let cfg = Level1Config::from_toml_or_default("starting_time = \"soon\"", "inline");
        assert_eq!(cfg, Level1Config::default());
    }

    #[test]
    fn missing_file_gives_defaults() {
        // SAFETY: test-only env mutation; no other test reads this variable.
        unsafe {
            std::env::set_var(
                "SIDESCROLL_LEVEL1_CONFIG",
                "/nonexistent/sidescroll/level1.toml",
            );
        }
        assert_eq!(Level1Config::load(), Level1Config::default());
    }
}
