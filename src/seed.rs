//! Seed text: `<levelToken>:<positionB64>[:<auxB64>]`.

use crate::codec::{decode_segment, encode_segment, pack_aux, pack_position, unpack_aux, unpack_position};
use crate::error::{GiftError, Result};
use crate::level::LevelTokenMap;
use crate::types::{LevelId, Position};
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const SEPARATOR: char = ':';

/// A successfully parsed seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedSeed {
    pub level: LevelId,
    pub position: Position,
    /// Reference time in milliseconds, if the seed carries a usable one.
    pub aux_ms: Option<u32>,
    /// The trimmed source text.
    pub text: String,
}

/// Encodes and decodes seed text against a level table.
#[derive(Clone)]
pub struct SeedCodec {
    levels: Arc<dyn LevelTokenMap>,
    aux_cap_ms: u32,
}

impl SeedCodec {
    pub fn new(levels: Arc<dyn LevelTokenMap>, aux_cap_ms: u32) -> Self {
        Self { levels, aux_cap_ms }
    }

    pub fn levels(&self) -> &Arc<dyn LevelTokenMap> {
        &self.levels
    }

    pub fn aux_cap_ms(&self) -> u32 {
        self.aux_cap_ms
    }

    /// Build seed text. `aux_ms` is clamped to the cap.
    pub fn encode<R: Rng + ?Sized>(
        &self,
        position: Position,
        level: &LevelId,
        aux_ms: Option<u32>,
        rng: &mut R,
    ) -> Result<String> {
        let token = self
            .levels
            .token_for(level)
            .ok_or_else(|| GiftError::InvalidLevel(level.to_string()))?;

        let mut seed = format!(
            "{}{}{}",
            token,
            SEPARATOR,
            encode_segment(&pack_position(position, rng)?)
        );
        if let Some(aux) = aux_ms {
            seed.push(SEPARATOR);
            seed.push_str(&encode_segment(&pack_aux(aux.min(self.aux_cap_ms))));
        }
        Ok(seed)
    }

    pub fn decode(&self, text: &str) -> Result<DecodedSeed> {
        let text = text.trim();
        let parts: Vec<&str> = text.split(SEPARATOR).collect();
        if !(2..=3).contains(&parts.len()) || parts[..2].iter().any(|p| p.is_empty()) {
            return Err(GiftError::Malformed);
        }

        let level = self
            .levels
            .level_id_for(parts[0])
            .ok_or_else(|| GiftError::InvalidLevel(parts[0].to_string()))?;

        let position_bytes = decode_segment(parts[1]).ok_or(GiftError::InvalidPosition)?;
        let position = unpack_position(&position_bytes)?;

        let aux_ms = match parts.get(2).map(|s| s.trim()) {
            Some(segment) if !segment.is_empty() => self.decode_aux(segment),
            _ => None,
        };

        Ok(DecodedSeed {
            level,
            position,
            aux_ms,
            text: text.to_string(),
        })
    }

    /// Replace the aux segment of a seed that already has one.
    pub fn update_aux(&self, text: &str, aux_ms: u32) -> Result<String> {
        let text = text.trim();
        let mut parts: Vec<String> = text.split(SEPARATOR).map(str::to_string).collect();
        if parts.len() != 3 || parts.iter().any(|p| p.trim().is_empty()) {
            return Err(GiftError::Malformed);
        }

        parts[2] = encode_segment(&pack_aux(aux_ms.min(self.aux_cap_ms)));
        Ok(parts.join(&SEPARATOR.to_string()))
    }

    // An unusable aux segment never rejects the seed; it is dropped.
    fn decode_aux(&self, segment: &str) -> Option<u32> {
        let value = decode_segment(segment).and_then(|bytes| unpack_aux(&bytes).ok());
        match value {
            Some(v) if v <= self.aux_cap_ms => Some(v),
            Some(v) => {
                debug!("Dropping aux value {} above cap {}", v, self.aux_cap_ms);
                None
            }
            None => {
                debug!("Dropping undecodable aux segment '{}'", segment);
                None
            }
        }
    }
}

impl std::fmt::Debug for SeedCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedCodec")
            .field("aux_cap_ms", &self.aux_cap_ms)
            .finish_non_exhaustive()
    }
}
