//! Core data types for brc

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::fmt;

/// A one-decimal value scaled by 10 (`-3.5` is stored as `-35`)
pub type ScaledValue = i32;

/// Running statistics for a single key
///
/// `sum` is the exact sum of every scaled observation, so the mean can be
/// rounded with integer arithmetic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyStats {
    pub min: ScaledValue,
    pub max: ScaledValue,
    pub sum: i64,
    pub count: u64,
}

impl KeyStats {
    /// Create statistics from a first observation
    pub fn new(value: ScaledValue) -> Self {
        Self {
            min: value,
            max: value,
            sum: i64::from(value),
            count: 1,
        }
    }

    /// Fold another observation in
    #[inline]
    pub fn observe(&mut self, value: ScaledValue) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += i64::from(value);
        self.count += 1;
    }

    /// Combine with statistics gathered elsewhere.
    ///
    /// Commutative and associative, so the result does not depend on how
    /// observations were partitioned or in what order partitions arrive.
    pub fn merge(&mut self, other: &KeyStats) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.sum += other.sum;
        self.count += other.count;
    }

    /// Mean in tenths, rounded half away from zero
    pub fn mean(&self) -> i64 {
        // count is never zero for a constructed KeyStats
        div_round_half_away(self.sum, self.count as i64)
    }
}

/// Integer division rounding half away from zero (`-225 / 10` gives `-23`).
///
/// A zero result is always plain `0`, never a negative zero.
pub fn div_round_half_away(numerator: i64, denominator: i64) -> i64 {
    debug_assert!(denominator > 0);
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if remainder.unsigned_abs() * 2 >= denominator.unsigned_abs() {
        quotient + numerator.signum()
    } else {
        quotient
    }
}

/// Displays a tenths value with exactly one fractional digit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tenths(pub i64);

impl fmt::Display for Tenths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abs = self.0.unsigned_abs();
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{}", sign, abs / 10, abs % 10)
    }
}

/// Key to statistics mapping
///
/// Used both as a worker's private partial table and as the merged global
/// table. Keys are raw record bytes and compare byte-wise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsTable {
    entries: FxHashMap<Vec<u8>, KeyStats>,
}

impl StatsTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table sized for `capacity` distinct keys
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Record one observation for `key`.
    ///
    /// The key is only copied the first time it is seen.
    #[inline]
    pub fn record(&mut self, key: &[u8], value: ScaledValue) {
        match self.entries.get_mut(key) {
            Some(stats) => stats.observe(value),
            None => {
                self.entries.insert(key.to_vec(), KeyStats::new(value));
            }
        }
    }

    /// Merge statistics for one key
    pub fn merge_stats(&mut self, key: Vec<u8>, stats: KeyStats) {
        match self.entries.entry(key) {
            Entry::Occupied(mut entry) => entry.get_mut().merge(&stats),
            Entry::Vacant(entry) => {
                entry.insert(stats);
            }
        }
    }

    /// Fold another table into this one, consuming it
    pub fn merge(&mut self, other: StatsTable) {
        if self.entries.is_empty() {
            self.entries = other.entries;
            return;
        }
        for (key, stats) in other.entries {
            self.merge_stats(key, stats);
        }
    }

    /// Get statistics for a key
    pub fn get(&self, key: &[u8]) -> Option<&KeyStats> {
        self.entries.get(key)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no observation has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total observations across all keys
    pub fn observation_count(&self) -> u64 {
        self.entries.values().map(|s| s.count).sum()
    }

    /// Iterate entries in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &KeyStats)> {
        self.entries.iter().map(|(k, v)| (k.as_slice(), v))
    }

    /// Entries in ascending byte-wise key order
    pub fn sorted(&self) -> Vec<(&[u8], &KeyStats)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl<K: AsRef<[u8]>> FromIterator<(K, ScaledValue)> for StatsTable {
    fn from_iter<I: IntoIterator<Item = (K, ScaledValue)>>(iter: I) -> Self {
        let mut table = StatsTable::new();
        for (key, value) in iter {
            table.record(key.as_ref(), value);
        }
        table
    }
}
