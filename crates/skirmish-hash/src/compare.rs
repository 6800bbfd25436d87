//! Per-tick fingerprint history and cross-replica comparison.
//!
//! Each replica records its fingerprint after every tick. Once a peer's
//! fingerprints arrive (transport is the caller's business), the two
//! logs are compared tick by tick to find where they first disagree.

use std::collections::BTreeMap;
use std::fmt;

use skirmish_core::GameTime;

use crate::hash::GameHash;

/// Fingerprints recorded by one replica, keyed by tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HashLog {
    entries: BTreeMap<GameTime, GameHash>,
}

impl HashLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the fingerprint for `time`, returning any value it replaces.
    pub fn record(&mut self, time: GameTime, hash: GameHash) -> Option<GameHash> {
        self.entries.insert(time, hash)
    }

    /// The fingerprint recorded for `time`.
    pub fn get(&self, time: GameTime) -> Option<GameHash> {
        self.entries.get(&time).copied()
    }

    /// The most recent entry.
    pub fn latest(&self) -> Option<(GameTime, GameHash)> {
        self.entries.iter().next_back().map(|(t, h)| (*t, *h))
    }

    /// Number of recorded ticks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in tick order.
    pub fn iter(&self) -> impl Iterator<Item = (GameTime, GameHash)> + '_ {
        self.entries.iter().map(|(t, h)| (*t, *h))
    }

    /// Drop every entry older than `time`.
    ///
    /// Long-running games only need the window peers have not yet
    /// confirmed.
    pub fn discard_before(&mut self, time: GameTime) {
        self.entries = self.entries.split_off(&time);
    }
}

/// The first tick at which two replicas disagree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Divergence {
    /// The tick.
    pub time: GameTime,
    /// This replica's fingerprint.
    pub local: GameHash,
    /// The peer's fingerprint.
    pub remote: GameHash,
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "desync at tick {}: local {} != remote {}",
            self.time, self.local, self.remote
        )
    }
}

/// Find the earliest tick present in both logs whose fingerprints differ.
///
/// Ticks recorded by only one side are skipped. Returns `None` if the
/// logs agree on every shared tick.
pub fn first_divergence(local: &HashLog, remote: &HashLog) -> Option<Divergence> {
    local.iter().find_map(|(time, local_hash)| {
        let remote_hash = remote.get(time)?;
        (remote_hash != local_hash).then_some(Divergence {
            time,
            local: local_hash,
            remote: remote_hash,
        })
    })
}
