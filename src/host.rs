//! Capabilities the host game provides to the gift core.
//!
//! The core never touches engine objects directly. Everything it needs from
//! the running game goes through these three traits, and the host delivers
//! its own events by calling into [`GiftHuntService`](crate::service::GiftHuntService)
//! (or by sending [`HostEvent`](crate::protocol::HostEvent)s to the agent).

use crate::types::{
    ActorVariant, LevelId, LoadMode, MarkerHandle, MenuState, Orientation, PlayerSnapshot,
    Position,
};
use std::time::Duration;

/// The in-level world: markers, timers, player state.
pub trait WorldActuator {
    /// Spawn a collectible marker. `None` if the engine refused.
    fn spawn_marker(
        &mut self,
        variant: &ActorVariant,
        position: Position,
        orientation: Orientation,
    ) -> Option<MarkerHandle>;

    fn destroy(&mut self, marker: MarkerHandle);

    fn current_level_id(&self) -> Option<LevelId>;

    /// True inside modes where seeds must not be applied (e.g. level rush).
    fn is_restricted_mode(&self) -> bool;

    fn elapsed_level_time_ms(&self) -> u64;

    /// Actor resources currently loaded by the engine.
    fn available_actors(&self) -> Vec<ActorVariant>;

    fn player_snapshot(&self) -> Option<PlayerSnapshot>;
}

/// Menu/progress queries plus the level transition itself.
pub trait LevelLoader {
    /// `None` while the menu system is not up yet.
    fn menu_state(&self) -> Option<MenuState>;

    /// Whether game data knows this level at all.
    fn knows_level(&self, level: &LevelId) -> bool;

    fn is_level_unlocked(&self, level: &LevelId) -> bool;

    fn is_campaign_complete(&self) -> bool;

    fn play_level(&mut self, level: &LevelId, mode: LoadMode);
}

/// Persistent feedback lines shown after a collection.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum FeedbackSlot {
    Time,
    Diff,
    Reference,
}

/// On-screen text.
pub trait Notifier {
    /// Short message that fades on its own after `ttl`.
    fn show_transient(&mut self, text: &str, ttl: Duration);

    /// Message that stays until replaced or faded.
    fn show_persistent(&mut self, slot: FeedbackSlot, text: &str);

    /// Fade every persistent line out.
    fn fade_out(&mut self, _fade: Duration) {}
}
