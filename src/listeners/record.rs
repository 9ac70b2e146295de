//! # Registration record.
//!
//! One [`Registration`] represents one registered listener: a unique id,
//! the event name, an optional owning [`Target`], a once-flag and the
//! callback itself.
//!
//! Records are pooled (see [`RecordPool`](crate::listeners::RecordPool)):
//! the same memory slot is reused across registrations, but the
//! [`ListenerId`] minted for each registration is never reused, so a stale
//! id held by a caller can never match a later record that happens to
//! occupy the same slot.

use std::rc::Rc;

use crate::events::{Args, Target};

/// Callback invoked for every matched broadcast.
///
/// `Rc` so the engine can snapshot callbacks before a fan-out pass without
/// borrowing the indices while user code runs.
pub type Callback = Rc<dyn Fn(&Args)>;

/// Unique identity of one registration.
///
/// Monotonically increasing per dispatcher, never reused even after the
/// underlying record is recycled. Callers keep it for later removal via
/// [`Dispatcher::remove_by_id`](crate::Dispatcher::remove_by_id).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Placeholder id carried by cleared records in the pool.
    pub(crate) const NIL: ListenerId = ListenerId(0);

    #[inline]
    pub(crate) const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

/// One registered listener, exclusively owned by the engine while indexed.
pub(crate) struct Registration {
    pub(crate) id: ListenerId,
    pub(crate) name: Option<Rc<str>>,
    pub(crate) target: Option<Target>,
    pub(crate) once: bool,
    pub(crate) callback: Option<Callback>,
}

impl Registration {
    /// Creates an empty record, ready for [`assign`](Self::assign).
    pub(crate) fn empty() -> Self {
        Self {
            id: ListenerId::NIL,
            name: None,
            target: None,
            once: false,
            callback: None,
        }
    }

    /// Fills the record for a fresh registration.
    pub(crate) fn assign(
        &mut self,
        id: ListenerId,
        name: Rc<str>,
        target: Option<Target>,
        callback: Callback,
        once: bool,
    ) {
        self.id = id;
        self.name = Some(name);
        self.target = target;
        self.callback = Some(callback);
        self.once = once;
    }

    /// Clears every field, dropping the callback and target references.
    pub(crate) fn clear(&mut self) {
        self.id = ListenerId::NIL;
        self.name = None;
        self.target = None;
        self.callback = None;
        self.once = false;
    }
}
