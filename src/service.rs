//! GiftHuntService – owns every piece of gift state and routes host events.

use crate::capture::{self, CapturedSeed};
use crate::error::{GiftError, Result};
use crate::gate::ApplyGate;
use crate::host::{FeedbackSlot, LevelLoader, Notifier, WorldActuator};
use crate::level::LevelTokenMap;
use crate::lifecycle::{ActiveGift, GiftLifecycle, PickupOutcome};
use crate::protocol::{messages, TimeFeedback};
use crate::seed::SeedCodec;
use crate::settings::SettingChange;
use crate::types::{GiftConfig, GiftStats, LoadMode, MarkerHandle};
use log::{info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Instant;

/// The gift core, constructed once and driven by the host's callbacks.
///
/// `H` is the game (world + level loading), `N` the on-screen notifier.
/// All methods are non-blocking and must be called from one thread, or
/// through [`GiftHuntAgent`](crate::agent::GiftHuntAgent).
pub struct GiftHuntService<H, N> {
    config: GiftConfig,
    codec: SeedCodec,
    gate: ApplyGate,
    lifecycle: GiftLifecycle,
    host: H,
    notifier: N,
    rng: SmallRng,
    enabled: bool,
    last_created_seed: Option<String>,
    activations: u64,
}

impl<H, N> GiftHuntService<H, N>
where
    H: WorldActuator + LevelLoader,
    N: Notifier,
{
    pub fn new(config: GiftConfig, levels: Arc<dyn LevelTokenMap>, host: H, notifier: N) -> Self {
        Self::with_rng(config, levels, host, notifier, SmallRng::from_entropy())
    }

    /// Deterministic variant for tests and replays.
    pub fn with_rng(
        config: GiftConfig,
        levels: Arc<dyn LevelTokenMap>,
        host: H,
        notifier: N,
        mut rng: SmallRng,
    ) -> Self {
        let lifecycle_rng =
            SmallRng::from_rng(&mut rng).unwrap_or_else(|_| SmallRng::seed_from_u64(0));
        Self {
            codec: SeedCodec::new(levels, config.aux_cap_ms),
            gate: ApplyGate::new(config.cooldown()),
            lifecycle: GiftLifecycle::with_rng(config.clone(), lifecycle_rng),
            config,
            host,
            notifier,
            rng,
            enabled: false,
            last_created_seed: None,
            activations: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn codec(&self) -> &SeedCodec {
        &self.codec
    }

    pub fn lifecycle(&self) -> &GiftLifecycle {
        &self.lifecycle
    }

    pub fn active_gift(&self) -> Option<&ActiveGift> {
        self.lifecycle.active()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn last_created_seed(&self) -> Option<&str> {
        self.last_created_seed.as_deref()
    }

    pub fn stats(&self) -> GiftStats {
        GiftStats {
            state: self.lifecycle.state(),
            activations: self.activations,
            spawns: self.lifecycle.spawn_count(),
            collections: self.lifecycle.collection_count(),
            personal_best_ms: self
                .lifecycle
                .active()
                .map(|g| g.personal_best_ms)
                .unwrap_or(0),
        }
    }

    // -----------------------------------------------------------------------
    // Startup & settings
    // -----------------------------------------------------------------------

    /// Call once the game has finished initializing.
    pub fn initialize(&mut self, enabled: bool, stored_seed: &str, now: Instant) {
        self.lifecycle.ensure_pool(&self.host);
        self.set_enabled(enabled);
        if self.enabled && !stored_seed.trim().is_empty() {
            // Arm the stored seed without forcing a level load at boot.
            let restricted = self.host.is_restricted_mode();
            match self.gate.try_activate(stored_seed, now, restricted, &self.codec) {
                Ok(seed) => {
                    self.activations += 1;
                    self.lifecycle.arm(&mut self.host, ActiveGift::from(seed));
                }
                Err(e) => warn!("Stored gift seed ignored: {}", e),
            }
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        if enabled {
            info!("Gift hunt enabled");
        } else {
            self.lifecycle.teardown(&mut self.host);
            info!("Gift hunt disabled");
        }
    }

    pub fn on_setting_changed(&mut self, change: SettingChange, now: Instant) {
        match change {
            SettingChange::Enabled(enabled) => self.set_enabled(enabled),
            SettingChange::GiftSeed(seed) => {
                let _ = self.apply_seed(&seed, now);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Seed application
    // -----------------------------------------------------------------------

    /// Activate `text` and load its level. Errors are already reported to
    /// the notifier when this returns.
    pub fn apply_seed(&mut self, text: &str, now: Instant) -> Result<LoadMode> {
        if !self.enabled {
            return Err(GiftError::Disabled);
        }
        let result = self.try_apply_seed(text, now);
        if let Err(e) = &result {
            self.report(e);
        }
        result
    }

    fn try_apply_seed(&mut self, text: &str, now: Instant) -> Result<LoadMode> {
        let restricted = self.host.is_restricted_mode();
        let seed = match self.gate.try_activate(text, now, restricted, &self.codec) {
            Ok(seed) => seed,
            Err(GiftError::EmptySeed) => {
                self.lifecycle.clear(&mut self.host);
                return Err(GiftError::EmptySeed);
            }
            Err(
                e @ (GiftError::Malformed | GiftError::InvalidLevel(_) | GiftError::InvalidPosition),
            ) => {
                self.lifecycle.clear(&mut self.host);
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        self.activations += 1;
        let target = seed.level.clone();
        self.lifecycle.arm(&mut self.host, ActiveGift::from(seed));

        let current = self.host.current_level_id();
        let mode = self.gate.check_level_load(
            &target,
            current.as_ref(),
            restricted,
            &self.host,
            self.codec.levels().as_ref(),
        )?;

        info!("Loading level {} ({:?})", target, mode);
        self.host.play_level(&target, mode);
        self.notifier
            .show_transient(messages::SEED_LOADED, self.config.message_ttl());
        Ok(mode)
    }

    pub fn clear_gift(&mut self) {
        if !self.enabled {
            return;
        }
        self.lifecycle.clear(&mut self.host);
        self.notifier
            .show_transient(messages::GIFT_CLEARED, self.config.message_ttl());
    }

    // -----------------------------------------------------------------------
    // Seed capture
    // -----------------------------------------------------------------------

    /// Capture a seed at the player's position. The caller puts the
    /// returned text on the clipboard.
    pub fn capture_seed(&mut self) -> Result<CapturedSeed> {
        if !self.enabled {
            return Err(GiftError::Disabled);
        }
        match capture::capture(&self.host, &self.codec, &self.config, &mut self.rng) {
            Ok(captured) => {
                self.last_created_seed = Some(captured.seed.clone());
                self.notifier
                    .show_transient(messages::SEED_COPIED, self.config.message_ttl());
                Ok(captured)
            }
            Err(e) => {
                self.report(&e);
                Err(e)
            }
        }
    }

    /// Rewrite the reference time of the last captured seed.
    pub fn update_last_seed_aux(&mut self, aux_ms: u32) -> Result<String> {
        if !self.enabled {
            return Err(GiftError::Disabled);
        }
        let Some(last) = self.last_created_seed.as_deref() else {
            self.notifier
                .show_transient(messages::NO_LAST_SEED, self.config.message_ttl());
            return Err(GiftError::Malformed);
        };
        match self.codec.update_aux(last, aux_ms) {
            Ok(updated) => {
                self.last_created_seed = Some(updated.clone());
                self.notifier
                    .show_transient(messages::SEED_UPDATED, self.config.message_ttl());
                Ok(updated)
            }
            Err(e) => {
                self.report(&e);
                Err(e)
            }
        }
    }

    // -----------------------------------------------------------------------
    // World events
    // -----------------------------------------------------------------------

    pub fn on_level_load_complete(&mut self) -> Option<MarkerHandle> {
        if !self.enabled {
            return None;
        }
        self.notifier.fade_out(self.config.feedback_fade());
        self.lifecycle.on_level_load_complete(&mut self.host)
    }

    /// Returns `true` when `marker` is ours and the host must skip its own
    /// pickup handling.
    pub fn on_pickup_attempt(&mut self, marker: MarkerHandle) -> bool {
        if !self.enabled {
            return false;
        }
        let outcome = self.lifecycle.on_pickup(&mut self.host, marker);
        if let PickupOutcome::Collected(Some(collection)) = &outcome {
            let feedback = TimeFeedback::from_collection(collection);
            self.show_feedback(&feedback);
        }
        outcome.is_ours()
    }

    // -----------------------------------------------------------------------
    // Feedback
    // -----------------------------------------------------------------------

    fn show_feedback(&mut self, feedback: &TimeFeedback) {
        self.notifier.show_persistent(FeedbackSlot::Time, &feedback.time);
        if let Some(diff) = &feedback.diff {
            self.notifier.show_persistent(FeedbackSlot::Diff, &diff.text);
        }
        self.notifier
            .show_persistent(FeedbackSlot::Reference, &feedback.reference);
    }

    fn report(&mut self, error: &GiftError) {
        if error.is_silent() {
            return;
        }
        warn!("Gift hunt: {}", error);
        self.notifier
            .show_transient(&error.to_string(), self.config.message_ttl());
    }
}
