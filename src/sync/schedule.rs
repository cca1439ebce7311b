//! Cancellable scheduled tasks
//!
//! Every task has a key, and at most one task per key is pending. Scheduling
//! a key that is already pending supersedes the older task, which gives
//! trailing-edge debouncing for free: a burst of requests fires once, after
//! the last one, with the state the last one saw.

use crate::ViewId;
use rustc_hash::FxHashMap;

/// Trailing-edge debounce window for structural signals
pub const STRUCTURAL_DEBOUNCE_MS: u64 = 500;

/// Delay after a view activation or document open, letting the host's own
/// layout settle before heights are measured
pub const SETTLE_DELAY_MS: u64 = 200;

/// What a scheduled task will do when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskKey {
    /// Recompute every view
    RefreshAll,
    /// Recompute one view once its layout settled
    Settle(ViewId),
}

/// Pending tasks keyed by what they do
#[derive(Debug, Default)]
pub struct TaskQueue {
    pending: FxHashMap<TaskKey, u64>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `key` to fire at `due_ms`, replacing any pending task with
    /// the same key. Returns true if an older task was superseded.
    pub fn schedule(&mut self, key: TaskKey, due_ms: u64) -> bool {
        self.pending.insert(key, due_ms).is_some()
    }

    /// Drop a pending task. Returns true if one was pending.
    pub fn cancel(&mut self, key: TaskKey) -> bool {
        self.pending.remove(&key).is_some()
    }

    pub fn is_pending(&self, key: TaskKey) -> bool {
        self.pending.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest time any pending task is due
    pub fn next_due(&self) -> Option<u64> {
        self.pending.values().copied().min()
    }

    /// Remove and return every task due at or before `now_ms`, earliest
    /// first
    pub fn take_due(&mut self, now_ms: u64) -> Vec<TaskKey> {
        let mut due: Vec<(u64, TaskKey)> = self
            .pending
            .iter()
            .filter(|&(_, &at)| at <= now_ms)
            .map(|(key, &at)| (at, *key))
            .collect();
        due.sort();

        for (_, key) in &due {
            self.pending.remove(key);
        }

        due.into_iter().map(|(_, key)| key).collect()
    }
}
