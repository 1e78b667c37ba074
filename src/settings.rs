//! Player settings, layered from defaults, an optional TOML file and
//! `GIFT_HUNT__*` environment variables.
//!
//! ```toml
//! enabled = true
//! gift_seed = ""
//!
//! [hotkeys]
//! copy_seed = "RightShift"
//!
//! [gift]
//! cooldown_ms = 1000
//!
//! [[levels]]
//! id = "CUSTOM_LEVEL"
//! token = "Custom"
//! ```
//!
//! Nested keys use a double underscore in the environment, e.g.
//! `GIFT_HUNT__GIFT__COOLDOWN_MS=500`.

use crate::level::{LevelEntry, LevelTableError, StaticLevelTable};
use crate::types::GiftConfig;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub const ENV_PREFIX: &str = "GIFT_HUNT";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Levels(#[from] LevelTableError),
}

/// Host key names; binding them is up to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hotkeys {
    pub copy_seed: String,
    pub load_seed: String,
    pub clear_gift: String,
}

impl Default for Hotkeys {
    fn default() -> Self {
        Self {
            copy_seed: "RightShift".into(),
            load_seed: "Backslash".into(),
            clear_gift: "Delete".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GiftHuntSettings {
    pub enabled: bool,
    /// Seed entry; applied at startup and whenever it changes.
    pub gift_seed: String,
    pub hotkeys: Hotkeys,
    pub gift: GiftConfig,
    /// Extra levels on top of the builtin table.
    pub levels: Vec<LevelEntry>,
}

impl Default for GiftHuntSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            gift_seed: String::new(),
            hotkeys: Hotkeys::default(),
            gift: GiftConfig::default(),
            levels: Vec::new(),
        }
    }
}

impl GiftHuntSettings {
    /// Load from `path` (optional file) and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }
        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Parse settings from a TOML string, without environment overrides.
    pub fn from_toml_str(toml: &str) -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Builtin level table extended with `levels`.
    pub fn level_table(&self) -> Result<StaticLevelTable, SettingsError> {
        let mut table = StaticLevelTable::builtin();
        for entry in &self.levels {
            table.insert(entry.clone())?;
        }
        Ok(table)
    }
}

/// A single observed setting changing value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingChange {
    Enabled(bool),
    GiftSeed(String),
}
