use std::{fs, path::Path, path::PathBuf};

use anyhow::{Context, Result};
use bomb_maze_core::{FPS, PICKUP_DROP_CHANCE, STARTING_BOMBS, TILE_SIZE, TPS};
use bomb_maze_system_pacing::{Pacing, PacingError};
use bomb_maze_world::{Level, WorldConfig};
use serde::Deserialize;
use thiserror::Error;

/// Game settings read from an optional TOML file and refined by flags.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    /// Frames per second.
    pub fps: u32,
    /// Automaton ticks per second.
    pub tps: u32,
    /// Tile edge length in pixels.
    pub tile_size: u32,
    /// Bombs held at spawn.
    pub starting_bombs: u32,
    /// Probability that a blasted stone drops an extra bomb.
    pub pickup_chance: f64,
    /// Seed for pickup drops; drawn at random when absent.
    pub seed: Option<u64>,
    /// Layout file; the reference layout is used when absent.
    pub level: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fps: FPS,
            tps: TPS,
            tile_size: TILE_SIZE,
            starting_bombs: STARTING_BOMBS,
            pickup_chance: PICKUP_DROP_CHANCE,
            seed: None,
            level: None,
        }
    }
}

/// Reasons a configuration cannot start a game.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error(transparent)]
    Pacing(#[from] PacingError),
    #[error("pickup_chance {0} must lie within 0.0..=1.0")]
    PickupChance(f64),
    #[error("tile_size must be positive")]
    TileSize,
}

impl GameConfig {
    /// Reads a configuration file, falling back to defaults for missing keys.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub(crate) fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("invalid game configuration toml")
    }

    /// Checks the settings for consistency and derives the frame pacing.
    pub(crate) fn validate(&self) -> Result<Pacing, ConfigError> {
        let pacing = Pacing::new(self.fps, self.tps)?;
        if !(0.0..=1.0).contains(&self.pickup_chance) {
            return Err(ConfigError::PickupChance(self.pickup_chance));
        }
        if self.tile_size == 0 {
            return Err(ConfigError::TileSize);
        }
        Ok(pacing)
    }

    pub(crate) fn world_config(&self, seed: u64) -> WorldConfig {
        WorldConfig {
            starting_bombs: self.starting_bombs,
            pickup_chance: self.pickup_chance,
            seed,
        }
    }

    /// Loads the configured layout, or the reference layout.
    pub(crate) fn load_level(&self) -> Result<Level> {
        let Some(path) = &self.level else {
            return Ok(Level::reference());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read level file {}", path.display()))?;
        Level::parse(&text).with_context(|| format!("invalid level file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = GameConfig::from_toml("").expect("empty toml is valid");
        assert_eq!(config, GameConfig::default());
        let pacing = config.validate().expect("defaults are valid");
        assert_eq!(pacing.frames_per_tick(), 15);
    }

    #[test]
    fn partial_file_overrides_named_keys() {
        let config = GameConfig::from_toml("tps = 3\nseed = 42\nlevel = \"maps/a.txt\"\n")
            .expect("valid toml");

        assert_eq!(config.tps, 3);
        assert_eq!(config.fps, FPS);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.level, Some(PathBuf::from("maps/a.txt")));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(GameConfig::from_toml("speed = 3\n").is_err());
    }

    #[test]
    fn validation_reports_each_problem() {
        let config = GameConfig {
            tps: 0,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Pacing(PacingError::ZeroTickRate))
        ));

        let config = GameConfig {
            fps: 1,
            tps: 2,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Pacing(PacingError::TickRateAboveFrameRate { .. }))
        ));

        let config = GameConfig {
            pickup_chance: -0.5,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PickupChance(_))
        ));

        let config = GameConfig {
            tile_size: 0,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::TileSize)));
    }

    #[test]
    fn missing_level_uses_reference_layout() {
        let level = GameConfig::default().load_level().expect("reference level");
        assert_eq!(level.grid().columns(), 9);
        assert_eq!(level.grid().rows(), 9);
    }
}
