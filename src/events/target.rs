//! # Target identity.
//!
//! A [`Target`] scopes a registration to a logical owner: listeners can be
//! registered under a target, removed per-target in one call, and broadcasts
//! can be narrowed to a single target.
//!
//! The dispatcher treats a target purely as an identity key. It never
//! dereferences or owns the thing the key stands for.

/// Opaque identity key for the logical owner of a registration.
///
/// Any stable `u64` works: an entity id, a slotmap key, a hash. For
/// heap-allocated owners [`Target::of`] derives the key from the referent's
/// address.
///
/// # Example
/// ```
/// use signalcast::Target;
///
/// let ui = Target::new(7);
/// assert_eq!(ui.raw(), 7);
/// assert_eq!(ui, Target::from(7));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Target(u64);

impl Target {
    /// Creates a target from a caller-chosen identity value.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identity value.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Derives a target from the address of a heap-allocated owner.
    ///
    /// Only meaningful while the referent stays at a stable address (e.g.
    /// behind an `Rc`/`Box` that outlives the registrations keyed on it).
    ///
    /// # Example
    /// ```
    /// use std::rc::Rc;
    /// use signalcast::Target;
    ///
    /// let owner = Rc::new(String::from("panel"));
    /// assert_eq!(Target::of(&*owner), Target::of(&*owner));
    /// ```
    #[inline]
    pub fn of<T: ?Sized>(owner: &T) -> Self {
        Self(owner as *const T as *const () as usize as u64)
    }
}

impl From<u64> for Target {
    #[inline]
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}
