//! # Record pool.
//!
//! [`RecordPool`] recycles [`Registration`] slots so that heavy
//! add/remove churn does not translate into allocation churn. The pool
//! grows without bound but its size is bounded in practice by the peak
//! number of live registrations.
//!
//! ## Rules
//! - A record is cleared on [`recycle`](RecordPool::recycle), never on
//!   [`allocate`](RecordPool::allocate): the free list holds no callback
//!   or target references.
//! - The pool is owned by exactly one engine instance; it is never shared.

use crate::listeners::record::Registration;

/// Free list of cleared registration records.
pub(crate) struct RecordPool {
    free: Vec<Registration>,
}

impl RecordPool {
    /// Creates a pool pre-warmed with `reserve` cleared records.
    pub(crate) fn with_reserve(reserve: usize) -> Self {
        let mut free = Vec::with_capacity(reserve);
        free.resize_with(reserve, Registration::empty);
        Self { free }
    }

    /// Returns a recycled record, or a fresh one if the free list is empty.
    ///
    /// Fields are already cleared; the caller overwrites them via
    /// [`Registration::assign`].
    pub(crate) fn allocate(&mut self) -> Registration {
        self.free.pop().unwrap_or_else(Registration::empty)
    }

    /// Clears the record's fields and returns it to the free list.
    pub(crate) fn recycle(&mut self, mut record: Registration) {
        record.clear();
        self.free.push(record);
    }

    /// Number of records currently sitting in the free list.
    #[cfg(test)]
    pub(crate) fn idle(&self) -> usize {
        self.free.len()
    }
}
