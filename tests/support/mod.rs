//! Recording fakes for the host capabilities.

#![allow(dead_code)]

use gift_hunt::host::{FeedbackSlot, LevelLoader, Notifier, WorldActuator};
use gift_hunt::types::{
    ActorVariant, LevelId, LoadMode, MarkerHandle, MenuState, Orientation, PlayerSnapshot,
    Position,
};
use std::collections::HashSet;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct MockHost {
    pub level: Option<LevelId>,
    pub restricted: bool,
    pub elapsed_ms: u64,
    pub actors: Vec<ActorVariant>,
    pub player: Option<PlayerSnapshot>,
    pub menu: Option<MenuState>,
    pub unknown_levels: HashSet<LevelId>,
    pub locked_levels: HashSet<LevelId>,
    pub campaign_complete: bool,
    pub refuse_spawn: bool,

    pub next_handle: u64,
    pub live: Vec<MarkerHandle>,
    pub spawned: Vec<(MarkerHandle, ActorVariant, Position, Orientation)>,
    pub destroyed: Vec<MarkerHandle>,
    pub played: Vec<(LevelId, LoadMode)>,
}

impl MockHost {
    pub fn in_level(level: &str) -> Self {
        Self {
            level: Some(LevelId::new(level)),
            restricted: false,
            elapsed_ms: 0,
            actors: vec![
                ActorVariant::new("Actor_Yellow"),
                ActorVariant::new("Actor_Red"),
                ActorVariant::new("Actor_Unrelated"),
            ],
            player: None,
            menu: Some(MenuState::Level),
            unknown_levels: HashSet::new(),
            locked_levels: HashSet::new(),
            campaign_complete: false,
            refuse_spawn: false,
            next_handle: 1,
            live: Vec::new(),
            spawned: Vec::new(),
            destroyed: Vec::new(),
            played: Vec::new(),
        }
    }

    /// Simulate the engine finishing a transition into `level`.
    pub fn enter(&mut self, level: &str) {
        self.level = Some(LevelId::new(level));
    }

    pub fn with_player(mut self, position: Position, spawn: Option<Position>) -> Self {
        self.player = Some(PlayerSnapshot {
            position,
            spawn_point: spawn,
            velocity: Position::zero(),
            level_timer_us: 12_345_000,
        });
        self
    }
}

impl WorldActuator for MockHost {
    fn spawn_marker(
        &mut self,
        variant: &ActorVariant,
        position: Position,
        orientation: Orientation,
    ) -> Option<MarkerHandle> {
        if self.refuse_spawn {
            return None;
        }
        let handle = MarkerHandle(self.next_handle);
        self.next_handle += 1;
        self.live.push(handle);
        self.spawned
            .push((handle, variant.clone(), position, orientation));
        Some(handle)
    }

    fn destroy(&mut self, marker: MarkerHandle) {
        self.live.retain(|m| *m != marker);
        self.destroyed.push(marker);
    }

    fn current_level_id(&self) -> Option<LevelId> {
        self.level.clone()
    }

    fn is_restricted_mode(&self) -> bool {
        self.restricted
    }

    fn elapsed_level_time_ms(&self) -> u64 {
        self.elapsed_ms
    }

    fn available_actors(&self) -> Vec<ActorVariant> {
        self.actors.clone()
    }

    fn player_snapshot(&self) -> Option<PlayerSnapshot> {
        self.player
    }
}

impl LevelLoader for MockHost {
    fn menu_state(&self) -> Option<MenuState> {
        self.menu
    }

    fn knows_level(&self, level: &LevelId) -> bool {
        !self.unknown_levels.contains(level)
    }

    fn is_level_unlocked(&self, level: &LevelId) -> bool {
        !self.locked_levels.contains(level)
    }

    fn is_campaign_complete(&self) -> bool {
        self.campaign_complete
    }

    fn play_level(&mut self, level: &LevelId, mode: LoadMode) {
        self.played.push((level.clone(), mode));
    }
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MockNotifier {
    pub transient: Vec<String>,
    pub persistent: Vec<(FeedbackSlot, String)>,
    pub fades: usize,
}

impl MockNotifier {
    pub fn persistent_in(&self, slot: FeedbackSlot) -> Option<&str> {
        self.persistent
            .iter()
            .rev()
            .find(|(s, _)| *s == slot)
            .map(|(_, text)| text.as_str())
    }
}

impl Notifier for MockNotifier {
    fn show_transient(&mut self, text: &str, _ttl: Duration) {
        self.transient.push(text.to_string());
    }

    fn show_persistent(&mut self, slot: FeedbackSlot, text: &str) {
        self.persistent.push((slot, text.to_string()));
    }

    fn fade_out(&mut self, _fade: Duration) {
        self.fades += 1;
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Half a 0.1 grid step plus float slack.
pub const POSITION_TOLERANCE: f32 = 0.0501;

pub fn assert_close(actual: Position, expected: Position) {
    for (a, e, axis) in [
        (actual.x, expected.x, "x"),
        (actual.y, expected.y, "y"),
        (actual.z, expected.z, "z"),
    ] {
        assert!(
            (a - e).abs() <= POSITION_TOLERANCE,
            "{} axis: decoded {} vs expected {}",
            axis,
            a,
            e
        );
    }
}
