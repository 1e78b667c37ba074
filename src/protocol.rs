//! Host event and feedback protocol.
//!
//! This module owns **every message that crosses the host boundary** between
//! the gift core and the game it runs inside.
//!
//! ## Directions
//!
//! | Type            | Direction      | Carried by                         |
//! |-----------------|----------------|------------------------------------|
//! | [`HostEvent`]   | host → core    | agent inbox / direct service calls |
//! | [`TimeFeedback`]| core → host    | `Notifier::show_persistent`        |
//! | [`messages`]    | core → host    | `Notifier::show_transient`         |
//!
//! ## Design rules
//!
//! 1. Every struct is `Serialize + Deserialize` with snake_case JSON.
//! 2. No engine types leak in; markers are opaque [`MarkerHandle`]s.
//! 3. Times cross the boundary as whole milliseconds.

use crate::lifecycle::Collection;
use crate::types::MarkerHandle;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Inbound events
// ---------------------------------------------------------------------------

/// Everything the host can tell the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// The game finished initializing; actor resources are available.
    Initialized,
    /// The player edited the seed setting.
    SeedEntryChanged { seed: String },
    /// Load hotkey pressed; `seed` is the clipboard content.
    LoadFromClipboard { seed: String },
    /// Copy hotkey pressed.
    CaptureSeed,
    /// Clear hotkey pressed.
    ClearGift,
    /// Enabled setting toggled.
    SetEnabled { enabled: bool },
    /// Rewrite the reference time of the last captured seed.
    UpdateLastSeedAux { aux_ms: u32 },
    LevelLoadComplete,
    /// The engine is about to run pickup logic for `marker`.
    PickupAttempt { marker: MarkerHandle },
}

impl HostEvent {
    /// Stable snake_case name, matching the serialized `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            HostEvent::Initialized => "initialized",
            HostEvent::SeedEntryChanged { .. } => "seed_entry_changed",
            HostEvent::LoadFromClipboard { .. } => "load_from_clipboard",
            HostEvent::CaptureSeed => "capture_seed",
            HostEvent::ClearGift => "clear_gift",
            HostEvent::SetEnabled { .. } => "set_enabled",
            HostEvent::UpdateLastSeedAux { .. } => "update_last_seed_aux",
            HostEvent::LevelLoadComplete => "level_load_complete",
            HostEvent::PickupAttempt { .. } => "pickup_attempt",
        }
    }
}

// ---------------------------------------------------------------------------
// Time feedback  (persistent lines after a collection)
// ---------------------------------------------------------------------------

/// Rendered text for the three persistent feedback lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeFeedback {
    pub time: String,
    /// Present only when a previous personal best existed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<DiffLine>,
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    pub text: String,
    /// Tied or beat the previous best.
    pub improved: bool,
}

impl TimeFeedback {
    pub fn from_collection(c: &Collection) -> Self {
        let time = format!("Gift found in {}", format_time(c.elapsed_ms));

        let diff = (c.previous_best_ms > 0).then(|| {
            let improved = c.elapsed_ms <= c.previous_best_ms;
            let delta = c.elapsed_ms.abs_diff(c.previous_best_ms);
            DiffLine {
                text: format!("{}{}", if improved { "-" } else { "+" }, format_time(delta)),
                improved,
            }
        });

        let reference = match c.aux_ms.filter(|&ms| ms > 0) {
            None => messages::NO_REFERENCE_TIME.to_string(),
            Some(aux) => {
                let aux = u64::from(aux);
                let beat = c.elapsed_ms <= aux
                    || (c.previous_best_ms > 0 && c.previous_best_ms <= aux);
                if beat {
                    format!("Dev time: {}", format_time(aux))
                } else {
                    messages::TRY_AGAIN.to_string()
                }
            }
        };

        Self {
            time,
            diff,
            reference,
        }
    }
}

/// `mm:ss.fff`
pub fn format_time(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;
    format!("{:02}:{:02}.{:03}", minutes, seconds, millis)
}

// ---------------------------------------------------------------------------
// Transient messages
// ---------------------------------------------------------------------------

/// Fixed player-facing strings, as constants.
pub mod messages {
    pub const SEED_LOADED: &str = "Gift Seed Loaded from Clipboard!";
    pub const SEED_COPIED: &str = "Gift Seed Copied to Clipboard!";
    pub const SEED_UPDATED: &str = "Gift Seed Dev Time Updated!";
    pub const GIFT_CLEARED: &str = "Gift Cleared.";
    pub const NO_LAST_SEED: &str = "No gift seed has been created yet.";

    pub const NO_REFERENCE_TIME: &str = "No dev time recorded.";
    pub const TRY_AGAIN: &str = "Try again for dev time!";
}
