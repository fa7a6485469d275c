//! Battle tuning loaded from an optional TOML file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default location of the tuning file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "battle.toml";

/// Errors that can occur when loading [`BattleConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Battle-wide tuning. Every field falls back to its default when absent from the file.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Resource)]
#[serde(default)]
pub struct BattleConfig {
    /// Enemy surrender threshold is the starting enemy count divided by this.
    pub enemy_surrender_divisor: usize,
    /// Friendlies needed for a surrender offer: starting friendly count divided by this.
    pub friendly_surrender_divisor: usize,
    /// World units per second.
    pub projectile_speed: f32,
    pub projectile_max_distance: f32,
    /// How close a projectile's path must pass to a unit's centre to hit it.
    pub projectile_hit_radius: f32,
    /// Write surviving friendlies to the inventory file when the battle ends.
    pub auto_save_inventory: bool,
    /// Inventory file location.
    pub inventory_path: PathBuf,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            enemy_surrender_divisor: 3,
            friendly_surrender_divisor: 2,
            projectile_speed: 10.0,
            projectile_max_distance: 50.0,
            projectile_hit_radius: 0.5,
            auto_save_inventory: true,
            inventory_path: PathBuf::from("character_inventory.json"),
        }
    }
}

impl BattleConfig {
    /// Reads `path`. A missing file yields the defaults; unreadable or malformed files are errors.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match fs::read_to_string(path.as_ref()) {
            Ok(contents) => Self::from_toml(&contents),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }
}

/// Where [`BattleConfig`] is read from at startup. Insert before adding the plugin to override.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct ConfigPath(pub PathBuf);

impl Default for ConfigPath {
    fn default() -> Self {
        Self(PathBuf::from(DEFAULT_CONFIG_PATH))
    }
}

fn load_config(mut commands: Commands, path: Res<ConfigPath>) {
    let config = match BattleConfig::load(&path.0) {
        Ok(config) => config,
        Err(err) => {
            warn!("Using default battle config: {err}");
            BattleConfig::default()
        }
    };
    commands.insert_resource(config);
}

pub(super) fn plugin(app: &mut App) {
    app.register_type::<BattleConfig>();
    app.init_resource::<BattleConfig>();
    app.init_resource::<ConfigPath>();
    app.add_systems(PreStartup, load_config);
}
