//! Actor pool: the cosmetic variants a spawned marker may wear.

use crate::types::ActorVariant;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

// ---------------------------------------------------------------------------
// Pool
// ---------------------------------------------------------------------------

/// Variants eligible for marker spawns.
///
/// Populated once, lazily, from whatever actors the engine has loaded.
/// Later populate calls are no-ops while the pool is non-empty.
#[derive(Debug, Clone)]
pub struct ActorPool {
    allowed: HashSet<String>,
    variants: Vec<ActorVariant>,
}

impl ActorPool {
    pub fn new(allowed: impl IntoIterator<Item = String>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
            variants: Vec::new(),
        }
    }

    /// Fill the pool from `source` unless it is already populated.
    /// Returns how many variants were added.
    pub fn populate<F>(&mut self, source: F) -> usize
    where
        F: FnOnce() -> Vec<ActorVariant>,
    {
        if !self.variants.is_empty() {
            return 0;
        }

        let mut seen = HashSet::new();
        self.variants = source()
            .into_iter()
            .filter(|actor| self.allowed.contains(&actor.name))
            .filter(|actor| seen.insert(actor.name.clone()))
            .collect();
        self.variants.len()
    }

    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&ActorVariant> {
        self.variants.choose(rng)
    }

    pub fn variants(&self) -> &[ActorVariant] {
        &self.variants
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

impl Default for ActorPool {
    fn default() -> Self {
        Self::new(crate::types::GiftConfig::default().actor_variants)
    }
}
