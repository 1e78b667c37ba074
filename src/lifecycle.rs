//! GiftLifecycle – the single active gift, its marker and pickup handling.
//!
//! ```text
//!   Empty ──arm──▶ Armed ──level load (matching)──▶ Spawned
//!     ▲              ▲ ◀────────pickup / level load──────┘
//!     └────clear─────┘
//! ```
//!
//! Every level load destroys the previous marker first, so a restart of
//! the same level respawns a fresh one while the gift stays armed. Arming a
//! new gift destroys the old gift's marker: a marker only ever belongs to
//! the gift that is active now.
//!
//! A collected marker's handle is remembered until the next spawn, so a
//! repeated pickup notification for the same collision is still recognised
//! as ours.

use crate::host::WorldActuator;
use crate::pool::ActorPool;
use crate::seed::DecodedSeed;
use crate::types::{GiftConfig, LevelId, LifecycleState, MarkerHandle, Position};
use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;

// ---------------------------------------------------------------------------
// Active gift
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveGift {
    pub position: Position,
    pub target_level: LevelId,
    pub aux_ms: Option<u32>,
    /// Best collection time so far; 0 means unset.
    pub personal_best_ms: u64,
    pub seed: String,
}

impl From<DecodedSeed> for ActiveGift {
    fn from(seed: DecodedSeed) -> Self {
        Self {
            position: seed.position,
            target_level: seed.level,
            aux_ms: seed.aux_ms,
            personal_best_ms: 0,
            seed: seed.text,
        }
    }
}

// ---------------------------------------------------------------------------
// Pickup result
// ---------------------------------------------------------------------------

/// Timing of one accepted collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collection {
    pub elapsed_ms: u64,
    /// Personal best before this collection; 0 when unset.
    pub previous_best_ms: u64,
    pub aux_ms: Option<u32>,
}

impl Collection {
    pub fn is_personal_best(&self) -> bool {
        self.previous_best_ms == 0 || self.elapsed_ms <= self.previous_best_ms
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupOutcome {
    /// Not our marker; the host handles it as usual.
    Foreign,
    /// Our marker, already collected.
    Duplicate,
    /// Our marker was collected. `None` when the elapsed time was noise.
    Collected(Option<Collection>),
}

impl PickupOutcome {
    /// Whether the host must skip its own pickup handling.
    pub fn is_ours(&self) -> bool {
        !matches!(self, PickupOutcome::Foreign)
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

pub struct GiftLifecycle {
    config: GiftConfig,
    active: Option<ActiveGift>,
    marker: Option<MarkerHandle>,
    /// Handle of the marker most recently collected, until the next spawn.
    collected: Option<MarkerHandle>,
    pool: ActorPool,
    rng: SmallRng,
    spawns: u64,
    collections: u64,
}

impl GiftLifecycle {
    pub fn new(config: GiftConfig) -> Self {
        Self::with_rng(config, SmallRng::from_entropy())
    }

    pub fn with_rng(config: GiftConfig, rng: SmallRng) -> Self {
        let pool = ActorPool::new(config.actor_variants.clone());
        Self {
            config,
            active: None,
            marker: None,
            collected: None,
            pool,
            rng,
            spawns: 0,
            collections: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn state(&self) -> LifecycleState {
        match (&self.active, self.marker) {
            (_, Some(_)) => LifecycleState::Spawned,
            (Some(_), None) => LifecycleState::Armed,
            (None, None) => LifecycleState::Empty,
        }
    }

    pub fn active(&self) -> Option<&ActiveGift> {
        self.active.as_ref()
    }

    pub fn marker(&self) -> Option<MarkerHandle> {
        self.marker
    }

    pub fn pool(&self) -> &ActorPool {
        &self.pool
    }

    pub fn spawn_count(&self) -> u64 {
        self.spawns
    }

    pub fn collection_count(&self) -> u64 {
        self.collections
    }

    // -----------------------------------------------------------------------
    // Gift slot
    // -----------------------------------------------------------------------

    /// Replace the active gift wholesale. The previous gift's marker, if
    /// any, is destroyed with it.
    pub fn arm(&mut self, world: &mut dyn WorldActuator, gift: ActiveGift) {
        self.forget_marker(world);
        info!(
            "Armed gift for level {} at {}",
            gift.target_level, gift.position
        );
        self.active = Some(gift);
    }

    /// Drop the active gift and its marker.
    pub fn clear(&mut self, world: &mut dyn WorldActuator) {
        if self.active.take().is_some() {
            debug!("Cleared active gift");
        }
        self.forget_marker(world);
    }

    /// Destroy the marker but keep the gift armed.
    pub fn teardown(&mut self, world: &mut dyn WorldActuator) {
        self.forget_marker(world);
    }

    /// Lazily fill the actor pool from the engine's loaded resources.
    pub fn ensure_pool(&mut self, world: &dyn WorldActuator) -> usize {
        let added = self.pool.populate(|| world.available_actors());
        if added > 0 {
            debug!("Cached {} gift actor variants", added);
        }
        added
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    /// Handle a finished level load. Returns the new marker, if one spawned.
    pub fn on_level_load_complete(&mut self, world: &mut dyn WorldActuator) -> Option<MarkerHandle> {
        self.forget_marker(world);
        self.ensure_pool(world);

        if !self.can_spawn(world) {
            return None;
        }
        let gift = self.active.as_ref()?;
        let variant = self.pool.choose(&mut self.rng)?.clone();

        match world.spawn_marker(&variant, gift.position, self.config.marker_orientation()) {
            Some(marker) => {
                debug!(
                    "Spawned {} as {} at {}",
                    marker, variant.name, gift.position
                );
                self.marker = Some(marker);
                self.spawns += 1;
                Some(marker)
            }
            None => {
                warn!("Host refused to spawn gift marker at {}", gift.position);
                None
            }
        }
    }

    /// Handle a pickup attempt on `marker`.
    pub fn on_pickup(&mut self, world: &mut dyn WorldActuator, marker: MarkerHandle) -> PickupOutcome {
        if self.collected == Some(marker) {
            return PickupOutcome::Duplicate;
        }
        if self.marker != Some(marker) {
            return PickupOutcome::Foreign;
        }
        self.destroy_marker(world);
        self.collected = Some(marker);
        self.collections += 1;

        let elapsed_ms = world.elapsed_level_time_ms();
        if elapsed_ms <= self.config.noise_threshold_ms {
            debug!("Ignoring collection time {}ms (noise)", elapsed_ms);
            return PickupOutcome::Collected(None);
        }

        let Some(gift) = self.active.as_mut() else {
            return PickupOutcome::Collected(None);
        };

        let previous_best_ms = gift.personal_best_ms;
        if previous_best_ms == 0 || elapsed_ms < previous_best_ms {
            gift.personal_best_ms = elapsed_ms;
        }

        info!(
            "Gift collected in {}ms (previous best {}ms)",
            elapsed_ms, previous_best_ms
        );
        PickupOutcome::Collected(Some(Collection {
            elapsed_ms,
            previous_best_ms,
            aux_ms: gift.aux_ms,
        }))
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn can_spawn(&self, world: &dyn WorldActuator) -> bool {
        let Some(gift) = self.active.as_ref() else {
            return false;
        };
        world.current_level_id().as_ref() == Some(&gift.target_level)
            && !self.pool.is_empty()
            && !world.is_restricted_mode()
    }

    /// Destroy the marker and drop the collected handle.
    fn forget_marker(&mut self, world: &mut dyn WorldActuator) {
        self.collected = None;
        self.destroy_marker(world);
    }

    fn destroy_marker(&mut self, world: &mut dyn WorldActuator) {
        if let Some(marker) = self.marker.take() {
            debug!("Destroying {}", marker);
            world.destroy(marker);
        }
    }
}
