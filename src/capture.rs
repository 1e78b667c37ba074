//! Seed capture from the player's current position.

use crate::error::{GiftError, Result};
use crate::host::WorldActuator;
use crate::seed::SeedCodec;
use crate::types::{GiftConfig, LevelId, PlayerSnapshot, Position};
use log::info;
use rand::Rng;

const FRAME_MS: f32 = 1000.0 / 60.0;
/// Marker collision radius (3.0 at the 0.75 marker scale).
const MARKER_RADIUS: f32 = 3.0 * 0.75;
/// Lateral speed above which touching the marker's edge saves time.
const LATERAL_THRESHOLD: f32 = 18.75;

#[derive(Debug, Clone, PartialEq)]
pub struct CapturedSeed {
    pub seed: String,
    pub level: LevelId,
    pub position: Position,
    pub aux_ms: Option<u32>,
}

/// Build a seed for where the player stands right now.
pub fn capture<R: Rng + ?Sized>(
    world: &dyn WorldActuator,
    codec: &SeedCodec,
    config: &GiftConfig,
    rng: &mut R,
) -> Result<CapturedSeed> {
    if world.is_restricted_mode() {
        return Err(GiftError::RestrictedMode);
    }

    let level = world.current_level_id().ok_or(GiftError::NoCurrentLevel)?;
    if codec.levels().token_for(&level).is_none() {
        return Err(GiftError::InvalidLevel(level.to_string()));
    }

    let player = world.player_snapshot().ok_or(GiftError::PlayerNotFound)?;
    let spawn = player.spawn_point.ok_or(GiftError::SpawnNotFound)?;
    if player.position.distance(&spawn) <= config.min_spawn_distance {
        return Err(GiftError::TooCloseToSpawn);
    }

    let aux_ms = Some(estimate_reference_ms(&player, codec.aux_cap_ms())).filter(|&ms| ms > 0);
    let seed = codec.encode(player.position, &level, aux_ms, rng)?;

    info!("Generated gift seed for level '{}' at {}: {}", level, player.position, seed);
    Ok(CapturedSeed {
        seed,
        level,
        position: player.position,
        aux_ms,
    })
}

/// Reference time for a seed captured from `player`.
///
/// The level timer, minus the whole frames a runner moving this fast
/// would save by clipping the edge of the marker instead of its centre.
pub fn estimate_reference_ms(player: &PlayerSnapshot, cap_ms: u32) -> u32 {
    let timer_ms = player.level_timer_us as f32 / 1000.0;
    let lateral = player.velocity.x.hypot(player.velocity.z);

    let offset_ms = if lateral < LATERAL_THRESHOLD {
        0.0
    } else {
        let raw = MARKER_RADIUS / lateral * 1000.0;
        (raw / FRAME_MS).floor() * FRAME_MS
    };

    (timer_ms - offset_ms).clamp(0.0, cap_ms as f32) as u32
}
