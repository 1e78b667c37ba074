//! Error taxonomy for seed handling, gating and capture.
//!
//! The `Display` text of every variant is the message shown to the player,
//! so callers can hand `err.to_string()` straight to the notifier.

use crate::types::MenuState;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GiftError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GiftError {
    #[error("Invalid gift seed.")]
    Malformed,
    #[error("Invalid level `{0}`.")]
    InvalidLevel(String),
    #[error("Invalid gift seed position.")]
    InvalidPosition,
    #[error("Position is out of range.")]
    PositionOutOfRange,
    #[error("Not available in level rush.")]
    RestrictedMode,
    #[error("Level has not been unlocked.")]
    NotUnlocked,
    #[error("Gift seed cooldown active.")]
    CooldownActive,
    #[error("Gift seed is empty.")]
    EmptySeed,
    #[error("Gift hunt is disabled.")]
    Disabled,
    #[error("Cannot load level from menu '{0}'.")]
    MenuState(MenuState),
    #[error("Cannot load level from current menu.")]
    MenuUnavailable,
    #[error("Current level is unknown.")]
    NoCurrentLevel,
    #[error("Player not found.")]
    PlayerNotFound,
    #[error("Player spawn not found.")]
    SpawnNotFound,
    #[error("Too close to spawn!")]
    TooCloseToSpawn,
}

impl GiftError {
    /// Silent rejections are not surfaced to the player.
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            GiftError::CooldownActive | GiftError::EmptySeed | GiftError::Disabled
        )
    }
}
