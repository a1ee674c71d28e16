//! Statistics calculation engine.
//!
//! Pure reductions over attack-record sequences:
//! - Guild totals and per-player rankings
//! - Leader and squad matchup rates
//! - Defensive footprint reconciliation
//! - Single-player lookups
//!
//! Every function accepts an empty slice and returns a zeroed or empty result.

mod defense;
mod guild;
mod matchups;
mod players;

pub use defense::*;
pub use guild::*;
pub use matchups::*;
pub use players::*;

use std::collections::HashMap;
use std::hash::Hash;

/// Percentage of `part` in `total` (0-100).
pub fn calculate_rate(part: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Mean of a sum over `count` items.
pub fn calculate_mean(sum: f64, count: u32) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Group-by accumulator that remembers first-seen key order.
#[derive(Debug)]
pub(crate) struct OrderedGroups<K, V> {
    index: HashMap<K, usize>,
    entries: Vec<(K, V)>,
}

impl<K: Hash + Eq + Clone, V: Default> OrderedGroups<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub(crate) fn entry(&mut self, key: K) -> &mut V {
        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                self.entries.push((key.clone(), V::default()));
                self.index.insert(key, self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|&idx| &self.entries[idx].1)
    }

    pub(crate) fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    pub(crate) fn into_entries(self) -> Vec<(K, V)> {
        self.entries
    }
}
