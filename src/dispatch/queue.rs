//! # Mutation queue: deferred index changes during a broadcast.
//!
//! While a broadcast is in flight the engine must not touch its indices,
//! so every add/remove/clear request arriving from inside a callback is
//! recorded here as a [`Mutation`] and replayed in FIFO order once the
//! outermost broadcast unwinds.
//!
//! ## Rules
//! - Entries are consumed exactly once, in the order they were queued.
//! - A queued [`Mutation::ClearAll`] supersedes everything: entries queued
//!   before it are discarded on the spot, entries queued after it are
//!   rejected back to the caller. The drain then reduces to a single
//!   clear-everything step.
//! - Rejected and discarded `Add` entries still carry their pooled record;
//!   the engine recycles those records, the queue never drops them silently.

use std::collections::VecDeque;
use std::rc::Rc;

use crate::events::Target;
use crate::listeners::{ListenerId, Registration};

/// One deferred index change.
pub(crate) enum Mutation {
    Add(Registration),
    RemoveById(ListenerId),
    RemoveByName(Rc<str>),
    RemoveByTarget(Target),
    RemoveByNameAndTarget(Rc<str>, Target),
    ClearAll,
}

/// Everything the queue held when the outermost broadcast finished.
pub(crate) struct Drained {
    /// True if a ClearAll superseded the queue; `entries` is then empty.
    pub(crate) cleared: bool,
    pub(crate) entries: VecDeque<Mutation>,
}

/// FIFO buffer of mutations deferred until the outermost broadcast unwinds.
pub(crate) struct MutationQueue {
    entries: VecDeque<Mutation>,
    cleared: bool,
}

impl MutationQueue {
    pub(crate) fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            cleared: false,
        }
    }

    /// Queues one mutation, returning every entry the push displaced.
    ///
    /// - Normal push: returns an empty list.
    /// - Push of `ClearAll`: flips the queue into cleared state and returns
    ///   all previously queued entries (now discarded).
    /// - Push after `ClearAll`: the new entry itself is rejected and
    ///   returned.
    ///
    /// The caller recycles the records of any returned `Add` entries.
    pub(crate) fn push(&mut self, mutation: Mutation) -> Vec<Mutation> {
        if self.cleared {
            return vec![mutation];
        }
        if matches!(mutation, Mutation::ClearAll) {
            self.cleared = true;
            return self.entries.drain(..).collect();
        }
        self.entries.push_back(mutation);
        Vec::new()
    }

    /// Takes the whole queue, resetting it to empty and not-cleared.
    pub(crate) fn take(&mut self) -> Drained {
        Drained {
            cleared: std::mem::take(&mut self.cleared),
            entries: std::mem::take(&mut self.entries),
        }
    }

    /// Drops all pending state. Used when the engine is wiped directly.
    pub(crate) fn reset(&mut self) {
        self.entries.clear();
        self.cleared = false;
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
