//! Level identifiers ↔ the short tokens players see inside a seed.

use crate::types::LevelId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::{fs, io};
use thiserror::Error;

pub const BUILTIN_LEVELS: &str = include_str!("data/levels.json");

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Bidirectional lookup between level ids and seed tokens.
///
/// Tokens are case-sensitive and never contain `:`.
pub trait LevelTokenMap: Send + Sync {
    fn token_for(&self, level: &LevelId) -> Option<&str>;
    fn level_id_for(&self, token: &str) -> Option<LevelId>;

    /// Levels that may only be loaded once the campaign is complete.
    fn requires_campaign(&self, _level: &LevelId) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// Static table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelEntry {
    pub id: LevelId,
    pub token: String,
    #[serde(default)]
    pub campaign_gated: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LevelTableFile {
    pub levels: Vec<LevelEntry>,
}

#[derive(Debug, Error)]
pub enum LevelTableError {
    #[error("failed to parse level table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read level table from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("duplicate level id `{0}`")]
    DuplicateId(LevelId),
    #[error("duplicate level token `{0}`")]
    DuplicateToken(String),
    #[error("level token `{0}` is empty or contains ':'")]
    InvalidToken(String),
}

/// In-memory level table, usually the builtin one.
#[derive(Debug, Clone, Default)]
pub struct StaticLevelTable {
    tokens: HashMap<LevelId, String>,
    ids: HashMap<String, LevelId>,
    campaign_gated: HashSet<LevelId>,
}

impl StaticLevelTable {
    pub fn builtin() -> Self {
        Self::from_json_str(BUILTIN_LEVELS).expect("builtin level table should parse")
    }

    pub fn from_json_str(json: &str) -> Result<Self, LevelTableError> {
        let parsed: LevelTableFile = serde_json::from_str(json)?;
        Self::from_entries(parsed.levels)
    }

    pub fn from_file(path: &Path) -> Result<Self, LevelTableError> {
        let contents = fs::read_to_string(path).map_err(|source| LevelTableError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn from_entries(
        entries: impl IntoIterator<Item = LevelEntry>,
    ) -> Result<Self, LevelTableError> {
        let mut table = Self::default();
        for entry in entries {
            table.insert(entry)?;
        }
        Ok(table)
    }

    pub fn insert(&mut self, entry: LevelEntry) -> Result<(), LevelTableError> {
        if entry.token.trim().is_empty() || entry.token.contains(':') {
            return Err(LevelTableError::InvalidToken(entry.token));
        }
        if self.tokens.contains_key(&entry.id) {
            return Err(LevelTableError::DuplicateId(entry.id));
        }
        if self.ids.contains_key(&entry.token) {
            return Err(LevelTableError::DuplicateToken(entry.token));
        }

        if entry.campaign_gated {
            self.campaign_gated.insert(entry.id.clone());
        }
        self.ids.insert(entry.token.clone(), entry.id.clone());
        self.tokens.insert(entry.id, entry.token);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Entries sorted by token, for listing.
    pub fn entries(&self) -> Vec<LevelEntry> {
        let mut entries: Vec<_> = self
            .tokens
            .iter()
            .map(|(id, token)| LevelEntry {
                id: id.clone(),
                token: token.clone(),
                campaign_gated: self.campaign_gated.contains(id),
            })
            .collect();
        entries.sort_by(|a, b| a.token.cmp(&b.token));
        entries
    }
}

impl LevelTokenMap for StaticLevelTable {
    fn token_for(&self, level: &LevelId) -> Option<&str> {
        self.tokens.get(level).map(String::as_str)
    }

    fn level_id_for(&self, token: &str) -> Option<LevelId> {
        self.ids.get(token).cloned()
    }

    fn requires_campaign(&self, level: &LevelId) -> bool {
        self.campaign_gated.contains(level)
    }
}
