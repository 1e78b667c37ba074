//! Core gift types shared across all modules.

use serde::{Deserialize, Serialize};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Basic math
// ---------------------------------------------------------------------------

/// A world-space point. Also used for velocities reported by the host.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn distance(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

/// Marker rotation. Only yaw matters for a pickup standing upright.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Orientation {
    pub yaw_degrees: f32,
}

impl Orientation {
    pub fn from_yaw(yaw_degrees: f32) -> Self {
        Self { yaw_degrees }
    }
}

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Stable internal level identifier (e.g. `SIDEQUEST_GREEN_MEMORY`).
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelId(pub String);

impl LevelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LevelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque handle to an object the host spawned for us.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct MarkerHandle(pub u64);

impl std::fmt::Display for MarkerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "marker#{}", self.0)
    }
}

/// A cosmetic actor resource the marker can be dressed as.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActorVariant {
    pub name: String,
}

impl ActorVariant {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

// ---------------------------------------------------------------------------
// Host state
// ---------------------------------------------------------------------------

/// Menu/UI state the host reports when a level load is requested.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuState {
    None,
    Map,
    Location,
    Level,
    Mission,
    Staging,
    Pause,
    Title,
    Options,
    Cutscene,
    Dialogue,
    Loading,
    Results,
}

impl MenuState {
    /// States from which a level transition is safe.
    pub const LOADABLE: [MenuState; 7] = [
        MenuState::None,
        MenuState::Map,
        MenuState::Location,
        MenuState::Level,
        MenuState::Mission,
        MenuState::Staging,
        MenuState::Pause,
    ];

    pub fn is_loadable(self) -> bool {
        Self::LOADABLE.contains(&self)
    }
}

impl std::fmt::Display for MenuState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// How the host should transition into the target level.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    /// Tear down and load a different level.
    Fresh,
    /// Target equals the loaded level: reinitialize it in place.
    Restart,
}

/// What the host knows about the player when a seed is captured.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PlayerSnapshot {
    pub position: Position,
    /// Level start teleport, if the level has one.
    pub spawn_point: Option<Position>,
    pub velocity: Position,
    pub level_timer_us: u64,
}

// ---------------------------------------------------------------------------
// Stats & config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Empty,
    Armed,
    Spawned,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GiftStats {
    pub state: LifecycleState,
    pub activations: u64,
    pub spawns: u64,
    pub collections: u64,
    pub personal_best_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GiftConfig {
    /// Minimum time between two successful seed activations, in milliseconds.
    pub cooldown_ms: u64,
    /// Collection times at or below this are treated as spurious.
    pub noise_threshold_ms: u64,
    /// Largest aux (reference time) value a seed may carry.
    pub aux_cap_ms: u32,
    /// Seeds may not be captured this close to the level's start point.
    pub min_spawn_distance: f32,
    /// Yaw applied to every spawned marker.
    pub marker_yaw_degrees: f32,
    /// Lifetime of transient notifier messages, in milliseconds.
    pub message_ttl_ms: u64,
    /// Fade applied to stale time feedback on level load, in milliseconds.
    pub feedback_fade_ms: u64,
    /// Actor resources eligible to dress the marker.
    pub actor_variants: Vec<String>,
}

impl GiftConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn message_ttl(&self) -> Duration {
        Duration::from_millis(self.message_ttl_ms)
    }

    pub fn feedback_fade(&self) -> Duration {
        Duration::from_millis(self.feedback_fade_ms)
    }

    pub fn marker_orientation(&self) -> Orientation {
        Orientation::from_yaw(self.marker_yaw_degrees)
    }
}

impl Default for GiftConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 1_000,
            noise_threshold_ms: 17,
            aux_cap_ms: 600_000,
            min_spawn_distance: 6.0,
            marker_yaw_degrees: 344.686,
            message_ttl_ms: 1_500,
            feedback_fade_ms: 500,
            actor_variants: vec![
                "Actor_Yellow".into(),
                "Actor_Red".into(),
                "Actor_Violet".into(),
                "Actor_Mikey".into(),
                "Actor_Raz".into(),
            ],
        }
    }
}
