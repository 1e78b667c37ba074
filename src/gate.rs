//! ApplyGate – decides when a pasted seed may become active and when a
//! level transition may start.
//!
//! Activation order:
//!
//! 1. restricted mode → reported refusal
//! 2. within cooldown of the last success → silent no-op
//! 3. blank text → silent (the caller clears its gift)
//! 4. decode failure → reported
//! 5. success → cooldown restarts

use crate::error::{GiftError, Result};
use crate::host::LevelLoader;
use crate::level::LevelTokenMap;
use crate::seed::{DecodedSeed, SeedCodec};
use crate::types::{LevelId, LoadMode};
use log::debug;
use std::time::{Duration, Instant};

pub struct ApplyGate {
    cooldown: Duration,
    last_activation: Option<Instant>,
}

impl ApplyGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_activation: None,
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn last_activation(&self) -> Option<Instant> {
        self.last_activation
    }

    pub fn in_cooldown(&self, now: Instant) -> bool {
        self.last_activation
            .is_some_and(|last| now.saturating_duration_since(last) < self.cooldown)
    }

    pub fn try_activate(
        &mut self,
        text: &str,
        now: Instant,
        restricted: bool,
        codec: &SeedCodec,
    ) -> Result<DecodedSeed> {
        if restricted {
            return Err(GiftError::RestrictedMode);
        }
        if self.in_cooldown(now) {
            debug!("Seed ignored: cooldown active");
            return Err(GiftError::CooldownActive);
        }
        if text.trim().is_empty() {
            return Err(GiftError::EmptySeed);
        }

        let seed = codec.decode(text)?;
        self.last_activation = Some(now);
        Ok(seed)
    }

    /// Check whether `target` may be loaded right now and how.
    pub fn check_level_load(
        &self,
        target: &LevelId,
        current: Option<&LevelId>,
        restricted: bool,
        loader: &dyn LevelLoader,
        levels: &dyn LevelTokenMap,
    ) -> Result<LoadMode> {
        if restricted {
            return Err(GiftError::RestrictedMode);
        }

        match loader.menu_state() {
            Some(state) if state.is_loadable() => {}
            Some(state) => return Err(GiftError::MenuState(state)),
            None => return Err(GiftError::MenuUnavailable),
        }

        if !loader.knows_level(target) {
            return Err(GiftError::InvalidLevel(target.to_string()));
        }
        if !loader.is_level_unlocked(target) {
            return Err(GiftError::NotUnlocked);
        }
        if levels.requires_campaign(target) && !loader.is_campaign_complete() {
            return Err(GiftError::NotUnlocked);
        }

        let current = current.ok_or(GiftError::NoCurrentLevel)?;
        Ok(if current == target {
            LoadMode::Restart
        } else {
            LoadMode::Fresh
        })
    }
}

impl Default for ApplyGate {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}
