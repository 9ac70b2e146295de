//! # Dispatch engine: registration, removal and synchronous fan-out.
//!
//! [`Dispatcher`] owns the listener indices and the record pool and is the
//! only type with public mutating surface. Delivery is fully synchronous:
//! `send` snapshots the matching listeners, runs them in registration
//! order, and returns.
//!
//! ## Reentrancy
//! A callback may freely call `register`/`remove_*`/`send`/`clear_all` on
//! the dispatcher that is currently delivering to it. Nested `send` calls
//! recurse (bounded by [`DispatcherConfig::max_depth`]); mutations are
//! diverted to the [`MutationQueue`] and replayed once the outermost
//! broadcast unwinds. A broadcast already in flight is never affected by
//! mutations made during it.
//!
//! ```text
//! send(name, target, args)
//!   ├─ depth guard (refuse at max_depth, report via tracing)
//!   ├─ snapshot: by_name[name] filtered by target ─► [cb1, cb2, ...]
//!   ├─ depth += 1
//!   ├─ cb1(args) ──► may register/remove (queued) or send (recurse)
//!   ├─ cb2(args)    (a panicking callback is caught and logged,
//!   │                siblings still run)
//!   ├─ depth -= 1
//!   └─ depth == 0?  remove fired once-listeners,
//!                   then drain queued mutations FIFO
//!                   (a queued clear-all supersedes everything else)
//! ```
//!
//! ## Rules
//! - Listeners for one `send` run in snapshot order (insertion order of
//!   the name bucket), unaffected by nested mutation.
//! - A listener registered during a broadcast of its own name first fires
//!   on the next `send` for that name.
//! - Removal of anything that does not exist is a silent no-op.
//! - The engine is single-threaded by design (`!Send`/`!Sync`); share it
//!   within a thread via `Rc`.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use indexmap::IndexSet;
use tracing::{error, warn};

use crate::config::DispatcherConfig;
use crate::dispatch::queue::{Mutation, MutationQueue};
use crate::error::DispatchError;
use crate::events::{Args, Target};
use crate::listeners::{Callback, ListenerId, RecordPool, Registration};

/// Index state. Mutated only while no broadcast is in flight; the mutation
/// queue guards every other path.
struct Indices {
    /// Master table: every live registration, keyed by id.
    records: HashMap<ListenerId, Registration>,
    /// Event name → ids sharing that name, in insertion order.
    by_name: HashMap<Rc<str>, IndexSet<ListenerId>>,
    /// Target identity → ids scoped to it (unscoped listeners are absent).
    by_target: HashMap<Target, IndexSet<ListenerId>>,
}

/// One snapshotted listener for an in-flight broadcast.
struct Match {
    id: ListenerId,
    callback: Callback,
}

/// Synchronous in-process pub/sub dispatcher.
///
/// # Example
/// ```
/// use std::rc::Rc;
/// use std::cell::Cell;
/// use signalcast::{Args, Dispatcher};
///
/// let hub = Dispatcher::new();
/// let hits = Rc::new(Cell::new(0u32));
///
/// let seen = Rc::clone(&hits);
/// hub.register("damage", None, move |args: &Args| {
///     seen.set(seen.get() + args.get::<u32>(0).copied().unwrap_or(0));
/// }).unwrap();
///
/// hub.send("damage", None, &Args::new().with(25u32));
/// assert_eq!(hits.get(), 25);
/// ```
pub struct Dispatcher {
    config: DispatcherConfig,
    /// Next id to mint; ids start at 1 and never repeat (0 is the nil id).
    next_id: Cell<u64>,
    /// Number of broadcasts currently nested on the call stack.
    depth: Cell<usize>,
    indices: RefCell<Indices>,
    pool: RefCell<RecordPool>,
    queue: RefCell<MutationQueue>,
    /// Ids of once-listeners that matched during the in-flight broadcast
    /// tree; removed when the outermost broadcast unwinds.
    fired_once: RefCell<Vec<ListenerId>>,
}

impl Dispatcher {
    /// Creates a dispatcher with [`DispatcherConfig::default`].
    pub fn new() -> Self {
        Self::with_config(DispatcherConfig::default())
    }

    /// Creates a dispatcher with the given configuration.
    ///
    /// `max_depth` is clamped to a minimum of 1.
    pub fn with_config(config: DispatcherConfig) -> Self {
        let config = DispatcherConfig {
            max_depth: config.max_depth.max(1),
            ..config
        };
        Self {
            next_id: Cell::new(1),
            depth: Cell::new(0),
            indices: RefCell::new(Indices {
                records: HashMap::new(),
                by_name: HashMap::new(),
                by_target: HashMap::new(),
            }),
            pool: RefCell::new(RecordPool::with_reserve(config.pool_reserve)),
            queue: RefCell::new(MutationQueue::new()),
            fired_once: RefCell::new(Vec::new()),
            config,
        }
    }

    // ---------------------------
    // Registration
    // ---------------------------

    /// Registers a listener for `name`, optionally scoped to `target`.
    ///
    /// Returns the id to use for [`remove_by_id`](Self::remove_by_id).
    /// If a broadcast is in flight the listener becomes visible starting
    /// with the next top-level `send`, never the one currently running.
    ///
    /// # Errors
    /// [`DispatchError::EmptyName`] if `name` is empty.
    pub fn register<F>(
        &self,
        name: &str,
        target: Option<Target>,
        callback: F,
    ) -> Result<ListenerId, DispatchError>
    where
        F: Fn(&Args) + 'static,
    {
        self.register_record(name, target, Rc::new(callback), false)
    }

    /// Like [`register`](Self::register), but the listener is removed
    /// automatically after the first broadcast that matches it.
    ///
    /// # Errors
    /// [`DispatchError::EmptyName`] if `name` is empty.
    pub fn register_once<F>(
        &self,
        name: &str,
        target: Option<Target>,
        callback: F,
    ) -> Result<ListenerId, DispatchError>
    where
        F: Fn(&Args) + 'static,
    {
        self.register_record(name, target, Rc::new(callback), true)
    }

    fn register_record(
        &self,
        name: &str,
        target: Option<Target>,
        callback: Callback,
        once: bool,
    ) -> Result<ListenerId, DispatchError> {
        if name.is_empty() {
            return Err(DispatchError::EmptyName);
        }

        let id = self.mint_id();
        let mut record = self.pool.borrow_mut().allocate();
        record.assign(id, Rc::from(name), target, callback, once);

        if self.depth.get() > 0 {
            let displaced = self.queue.borrow_mut().push(Mutation::Add(record));
            self.recycle_displaced(displaced);
        } else {
            self.index_record(record);
        }
        Ok(id)
    }

    // ---------------------------
    // Broadcast
    // ---------------------------

    /// Broadcasts `name` synchronously to every matching listener.
    ///
    /// With `target = None` every listener of `name` matches; with a
    /// target only listeners registered under that exact target match.
    /// A refusal by the recursion guard is logged, not returned; use
    /// [`try_send`](Self::try_send) when the caller wants to observe it.
    pub fn send(&self, name: &str, target: Option<Target>, args: &Args) {
        if let Err(err) = self.try_send(name, target, args) {
            warn!(
                label = err.as_label(),
                "broadcast refused: {}",
                err.as_message()
            );
        }
    }

    /// Broadcasts like [`send`](Self::send), surfacing a recursion-guard
    /// refusal to the caller.
    ///
    /// # Errors
    /// [`DispatchError::RecursionLimit`] if the nesting depth already
    /// reached the configured maximum. No callbacks run in that case; the
    /// engine stays fully usable.
    pub fn try_send(
        &self,
        name: &str,
        target: Option<Target>,
        args: &Args,
    ) -> Result<(), DispatchError> {
        let depth = self.depth.get();
        if depth >= self.config.max_depth {
            return Err(DispatchError::RecursionLimit {
                name: name.to_string(),
                depth,
                max: self.config.max_depth,
            });
        }

        let matched = self.snapshot(name, target);
        if matched.is_empty() {
            return Ok(());
        }

        self.depth.set(depth + 1);
        for entry in &matched {
            self.invoke(entry, name, args);
        }
        self.depth.set(depth);

        if depth == 0 {
            self.finish_outermost();
        }
        Ok(())
    }

    /// Snapshots the listeners of `name` matching `target`, in bucket
    /// (insertion) order. Marks matched once-listeners for removal and
    /// prunes ids that lost their record (stale entries are cleanup, not
    /// an error).
    fn snapshot(&self, name: &str, target: Option<Target>) -> Vec<Match> {
        let mut indices = self.indices.borrow_mut();
        let indices = &mut *indices;

        let Some(bucket) = indices.by_name.get(name) else {
            return Vec::new();
        };

        let mut matched = Vec::with_capacity(bucket.len());
        let mut once = Vec::new();
        let mut stale = Vec::new();
        for &id in bucket.iter() {
            let Some(record) = indices.records.get(&id) else {
                stale.push(id);
                continue;
            };
            if target.is_some() && record.target != target {
                continue;
            }
            if let Some(callback) = record.callback.clone() {
                matched.push(Match { id, callback });
                if record.once {
                    once.push(id);
                }
            }
        }

        if !stale.is_empty() {
            if let Some(bucket) = indices.by_name.get_mut(name) {
                for id in &stale {
                    bucket.shift_remove(id);
                }
                if bucket.is_empty() {
                    indices.by_name.remove(name);
                }
            }
        }
        if !once.is_empty() {
            self.fired_once.borrow_mut().extend(once);
        }
        matched
    }

    /// Runs one snapshotted callback with panic isolation: a panicking
    /// listener is reported and its siblings still run.
    fn invoke(&self, entry: &Match, name: &str, args: &Args) {
        let result = catch_unwind(AssertUnwindSafe(|| (entry.callback)(args)));
        if let Err(payload) = result {
            error!(
                event = name,
                listener = entry.id.as_u64(),
                "listener panicked: {}; remaining listeners still run",
                panic_message(&payload),
            );
        }
    }

    /// Settles everything deferred while the broadcast tree was in flight:
    /// once-removals first, then the mutation queue in FIFO order.
    fn finish_outermost(&self) {
        let fired = std::mem::take(&mut *self.fired_once.borrow_mut());
        for id in fired {
            self.remove_by_id_now(id);
        }

        let drained = self.queue.borrow_mut().take();
        if drained.cleared {
            self.clear_all_now();
            return;
        }
        for mutation in drained.entries {
            self.apply(mutation);
        }
    }

    fn apply(&self, mutation: Mutation) {
        match mutation {
            Mutation::Add(record) => self.index_record(record),
            Mutation::RemoveById(id) => self.remove_by_id_now(id),
            Mutation::RemoveByName(name) => self.remove_by_name_now(&name),
            Mutation::RemoveByTarget(target) => self.remove_by_target_now(target),
            Mutation::RemoveByNameAndTarget(name, target) => {
                self.remove_by_name_and_target_now(&name, target);
            }
            Mutation::ClearAll => self.clear_all_now(),
        }
    }

    // ---------------------------
    // Removal
    // ---------------------------

    /// Removes the registration with `id`. No-op if it does not exist.
    pub fn remove_by_id(&self, id: ListenerId) {
        if self.defer(Mutation::RemoveById(id)) {
            return;
        }
        self.remove_by_id_now(id);
    }

    /// Removes every registration for `name`. No-op on an unknown name.
    pub fn remove_by_name(&self, name: &str) {
        if self.defer(Mutation::RemoveByName(Rc::from(name))) {
            return;
        }
        self.remove_by_name_now(name);
    }

    /// Removes every registration scoped to `target`. No-op on an unknown
    /// target.
    pub fn remove_by_target(&self, target: Target) {
        if self.defer(Mutation::RemoveByTarget(target)) {
            return;
        }
        self.remove_by_target_now(target);
    }

    /// Removes every registration matching both `name` and `target`.
    /// No-op when either bucket is absent.
    pub fn remove_by_name_and_target(&self, name: &str, target: Target) {
        if self.defer(Mutation::RemoveByNameAndTarget(Rc::from(name), target)) {
            return;
        }
        self.remove_by_name_and_target_now(name, target);
    }

    /// Removes every registration and resets the engine.
    ///
    /// Mid-broadcast this is deferred like any other mutation, and once
    /// queued it supersedes every other queued mutation, before or after
    /// it. Applied directly it recycles all records, clears the indices
    /// and the queue, and resets the nesting depth.
    pub fn clear_all(&self) {
        if self.defer(Mutation::ClearAll) {
            return;
        }
        self.clear_all_now();
    }

    /// Diverts `mutation` to the queue when a broadcast is in flight.
    /// Returns false (and queues nothing) at depth 0.
    fn defer(&self, mutation: Mutation) -> bool {
        if self.depth.get() == 0 {
            return false;
        }
        let displaced = self.queue.borrow_mut().push(mutation);
        self.recycle_displaced(displaced);
        true
    }

    /// Recycles the records carried by mutations a queued clear-all threw
    /// away, so pooled slots are not lost.
    fn recycle_displaced(&self, displaced: Vec<Mutation>) {
        if displaced.is_empty() {
            return;
        }
        let mut pool = self.pool.borrow_mut();
        for mutation in displaced {
            if let Mutation::Add(record) = mutation {
                pool.recycle(record);
            }
        }
    }

    fn index_record(&self, record: Registration) {
        let Some(name) = record.name.clone() else {
            // cleared record, nothing to index
            self.pool.borrow_mut().recycle(record);
            return;
        };
        let mut indices = self.indices.borrow_mut();
        indices.by_name.entry(name).or_default().insert(record.id);
        if let Some(target) = record.target {
            indices.by_target.entry(target).or_default().insert(record.id);
        }
        indices.records.insert(record.id, record);
    }

    fn remove_by_id_now(&self, id: ListenerId) {
        let record = {
            let mut indices = self.indices.borrow_mut();
            let Some(record) = indices.records.remove(&id) else {
                return;
            };
            unlink(&mut indices, &record);
            record
        };
        self.pool.borrow_mut().recycle(record);
    }

    fn remove_by_name_now(&self, name: &str) {
        let removed = {
            let mut indices = self.indices.borrow_mut();
            let Some(bucket) = indices.by_name.remove(name) else {
                return;
            };
            let mut removed = Vec::with_capacity(bucket.len());
            for id in bucket {
                let Some(record) = indices.records.remove(&id) else {
                    continue;
                };
                if let Some(target) = record.target {
                    unlink_target(&mut indices, target, id);
                }
                removed.push(record);
            }
            removed
        };
        let mut pool = self.pool.borrow_mut();
        for record in removed {
            pool.recycle(record);
        }
    }

    fn remove_by_target_now(&self, target: Target) {
        let removed = {
            let mut indices = self.indices.borrow_mut();
            let Some(bucket) = indices.by_target.remove(&target) else {
                return;
            };
            let mut removed = Vec::with_capacity(bucket.len());
            for id in bucket {
                let Some(record) = indices.records.remove(&id) else {
                    continue;
                };
                unlink_name(&mut indices, record.name.as_deref(), id);
                removed.push(record);
            }
            removed
        };
        let mut pool = self.pool.borrow_mut();
        for record in removed {
            pool.recycle(record);
        }
    }

    fn remove_by_name_and_target_now(&self, name: &str, target: Target) {
        // Drive the intersection from the smaller bucket. Either bucket
        // may be absent; that is a normal no-op.
        let ids: Vec<ListenerId> = {
            let indices = self.indices.borrow();
            let Some(named) = indices.by_name.get(name) else {
                return;
            };
            let Some(targeted) = indices.by_target.get(&target) else {
                return;
            };
            if named.len() <= targeted.len() {
                named.iter().copied().filter(|id| targeted.contains(id)).collect()
            } else {
                targeted.iter().copied().filter(|id| named.contains(id)).collect()
            }
        };
        for id in ids {
            self.remove_by_id_now(id);
        }
    }

    fn clear_all_now(&self) {
        let records: Vec<Registration> = {
            let mut indices = self.indices.borrow_mut();
            indices.by_name.clear();
            indices.by_target.clear();
            indices.records.drain().map(|(_, record)| record).collect()
        };
        {
            let mut pool = self.pool.borrow_mut();
            for record in records {
                pool.recycle(record);
            }
        }
        self.queue.borrow_mut().reset();
        self.fired_once.borrow_mut().clear();
        self.depth.set(0);
    }

    // ---------------------------
    // Introspection
    // ---------------------------

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        self.indices.borrow().records.len()
    }

    /// True if no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.indices.borrow().records.is_empty()
    }

    /// True if at least one listener is registered for `name`.
    pub fn has_listeners(&self, name: &str) -> bool {
        self.indices.borrow().by_name.contains_key(name)
    }

    /// Current broadcast nesting depth (0 = no broadcast in flight).
    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    fn mint_id(&self) -> ListenerId {
        let raw = self.next_id.get();
        self.next_id.set(raw + 1);
        ListenerId::from_raw(raw)
    }

    #[cfg(test)]
    fn pool_idle(&self) -> usize {
        self.pool.borrow().idle()
    }

    #[cfg(test)]
    fn queued(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn unlink(indices: &mut Indices, record: &Registration) {
    unlink_name(indices, record.name.as_deref(), record.id);
    if let Some(target) = record.target {
        unlink_target(indices, target, record.id);
    }
}

fn unlink_name(indices: &mut Indices, name: Option<&str>, id: ListenerId) {
    let Some(name) = name else { return };
    if let Some(bucket) = indices.by_name.get_mut(name) {
        bucket.shift_remove(&id);
        if bucket.is_empty() {
            indices.by_name.remove(name);
        }
    }
}

fn unlink_target(indices: &mut Indices, target: Target, id: ListenerId) {
    if let Some(bucket) = indices.by_target.get_mut(&target) {
        bucket.shift_remove(&id);
        if bucket.is_empty() {
            indices.by_target.remove(&target);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;

    fn hub() -> Rc<Dispatcher> {
        Rc::new(Dispatcher::new())
    }

    fn marker_log() -> Rc<RefCell<Vec<&'static str>>> {
        Rc::new(RefCell::new(Vec::new()))
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let hub = hub();
        let err = hub.register("", None, |_| {}).unwrap_err();
        assert_eq!(err, DispatchError::EmptyName);
        assert_eq!(err.as_label(), "empty_name");
        let err = hub.register_once("", None, |_| {}).unwrap_err();
        assert_eq!(err, DispatchError::EmptyName);
    }

    #[test]
    fn test_ids_strictly_increase_and_never_reused() {
        let hub = hub();
        let a = hub.register_once("boom", None, |_| {}).unwrap();
        hub.send("boom", None, &Args::new()); // consumes and recycles a

        let b = hub.register("boom", None, |_| {}).unwrap();
        assert!(b > a, "recycled slot must not resurrect an old id");

        // removing the dead id must not disturb b
        hub.remove_by_id(a);
        assert_eq!(hub.len(), 1);
    }

    #[test]
    fn test_send_without_listeners_is_noop() {
        let hub = hub();
        hub.send("nobody-home", None, &Args::new());
        assert!(hub.is_empty());
        assert_eq!(hub.depth(), 0);
    }

    #[test]
    fn test_once_listener_fires_exactly_once() {
        let hub = hub();
        let count = Rc::new(Cell::new(0u32));
        let seen = Rc::clone(&count);
        hub.register_once("spawn", None, move |_| seen.set(seen.get() + 1))
            .unwrap();

        hub.send("spawn", None, &Args::new());
        hub.send("spawn", None, &Args::new());
        hub.send("spawn", None, &Args::new());

        assert_eq!(count.get(), 1);
        assert!(hub.is_empty());
    }

    #[test]
    fn test_listeners_fire_in_registration_order() {
        let hub = hub();
        let log = marker_log();
        for marker in ["first", "second", "third"] {
            let log = Rc::clone(&log);
            hub.register("tick", None, move |_| log.borrow_mut().push(marker))
                .unwrap();
        }

        hub.send("tick", None, &Args::new());
        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_args_are_forwarded_unchanged() {
        let hub = hub();
        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        hub.register("damage", None, move |args: &Args| {
            *sink.borrow_mut() = args.get::<u32>(0).copied();
        })
        .unwrap();

        hub.send("damage", None, &Args::new().with(42u32).with("crit"));
        assert_eq!(*seen.borrow(), Some(42));
    }

    #[test]
    fn test_nested_send_completes_before_outer_callback_resumes() {
        let hub = hub();
        let log = marker_log();

        {
            let hub = Rc::clone(&hub);
            let log_outer = Rc::clone(&log);
            hub.clone()
                .register("outer", None, move |_| {
                    log_outer.borrow_mut().push("outer1-pre");
                    hub.send("inner", None, &Args::new());
                    log_outer.borrow_mut().push("outer1-post");
                })
                .unwrap();
        }
        {
            let log = Rc::clone(&log);
            hub.register("outer", None, move |_| log.borrow_mut().push("outer2"))
                .unwrap();
        }
        {
            let log = Rc::clone(&log);
            hub.register("inner", None, move |_| log.borrow_mut().push("inner"))
                .unwrap();
        }

        hub.send("outer", None, &Args::new());
        assert_eq!(
            *log.borrow(),
            vec!["outer1-pre", "inner", "outer1-post", "outer2"]
        );
    }

    #[test]
    fn test_listener_added_mid_broadcast_fires_next_send() {
        let hub = hub();
        let late_hits = Rc::new(Cell::new(0u32));
        let registered = Rc::new(Cell::new(false));

        {
            let hub2 = Rc::clone(&hub);
            let late_hits = Rc::clone(&late_hits);
            let registered = Rc::clone(&registered);
            hub.register("tick", None, move |_| {
                if !registered.get() {
                    registered.set(true);
                    let late_hits = Rc::clone(&late_hits);
                    hub2.register("tick", None, move |_| late_hits.set(late_hits.get() + 1))
                        .unwrap();
                }
            })
            .unwrap();
        }

        hub.send("tick", None, &Args::new());
        assert_eq!(late_hits.get(), 0, "new listener must not see the in-flight send");

        hub.send("tick", None, &Args::new());
        assert_eq!(late_hits.get(), 1);
    }

    #[test]
    fn test_removal_mid_broadcast_does_not_affect_inflight_send() {
        let hub = hub();
        let log = marker_log();
        let second_id = Rc::new(Cell::new(None));

        {
            let hub2 = Rc::clone(&hub);
            let log = Rc::clone(&log);
            let second_id = Rc::clone(&second_id);
            hub.register("tick", None, move |_| {
                log.borrow_mut().push("first");
                if let Some(id) = second_id.get() {
                    hub2.remove_by_id(id);
                }
            })
            .unwrap();
        }
        {
            let log = Rc::clone(&log);
            let id = hub
                .register("tick", None, move |_| log.borrow_mut().push("second"))
                .unwrap();
            second_id.set(Some(id));
        }

        hub.send("tick", None, &Args::new());
        assert_eq!(*log.borrow(), vec!["first", "second"], "snapshot runs in full");

        hub.send("tick", None, &Args::new());
        assert_eq!(
            *log.borrow(),
            vec!["first", "second", "first"],
            "deferred removal applied after the broadcast"
        );
    }

    #[test]
    fn test_recursion_guard_halts_self_resending_listener() {
        let hub = Rc::new(Dispatcher::with_config(DispatcherConfig {
            max_depth: 5,
            ..DispatcherConfig::default()
        }));
        let count = Rc::new(Cell::new(0u32));

        {
            let hub2 = Rc::clone(&hub);
            let count = Rc::clone(&count);
            hub.register("loop", None, move |_| {
                count.set(count.get() + 1);
                hub2.send("loop", None, &Args::new());
            })
            .unwrap();
        }

        hub.send("loop", None, &Args::new());
        assert_eq!(count.get(), 5);
        assert_eq!(hub.depth(), 0, "depth unwinds fully after the refusal");
    }

    #[test]
    fn test_try_send_reports_recursion_limit() {
        let hub = Rc::new(Dispatcher::with_config(DispatcherConfig {
            max_depth: 1,
            ..DispatcherConfig::default()
        }));
        let inner = Rc::new(RefCell::new(None));

        {
            let hub2 = Rc::clone(&hub);
            let inner = Rc::clone(&inner);
            hub.register("loop", None, move |_| {
                *inner.borrow_mut() = Some(hub2.try_send("loop", None, &Args::new()));
            })
            .unwrap();
        }

        assert!(hub.try_send("loop", None, &Args::new()).is_ok());
        let refusal = inner.borrow_mut().take();
        match refusal {
            Some(Err(DispatchError::RecursionLimit { depth, max, .. })) => {
                assert_eq!(depth, 1);
                assert_eq!(max, 1);
            }
            other => panic!("expected a recursion-limit refusal, got {other:?}"),
        }
    }

    #[test]
    fn test_targeted_send_filters_by_target() {
        let hub = hub();
        let log = marker_log();
        let player = Target::new(1);
        let enemy = Target::new(2);

        for (marker, target) in [
            ("player", Some(player)),
            ("enemy", Some(enemy)),
            ("unscoped", None),
        ] {
            let log = Rc::clone(&log);
            hub.register("hit", target, move |_| log.borrow_mut().push(marker))
                .unwrap();
        }

        hub.send("hit", Some(player), &Args::new());
        assert_eq!(*log.borrow(), vec!["player"]);

        log.borrow_mut().clear();
        hub.send("hit", None, &Args::new());
        assert_eq!(*log.borrow(), vec!["player", "enemy", "unscoped"]);
    }

    #[test]
    fn test_remove_by_name_and_target_unknown_target_is_noop() {
        let hub = hub();
        hub.register("hit", Some(Target::new(1)), |_| {}).unwrap();

        hub.remove_by_name_and_target("hit", Target::new(99));
        hub.remove_by_name_and_target("absent", Target::new(1));
        assert_eq!(hub.len(), 1);
    }

    #[test]
    fn test_remove_by_name_and_target_removes_only_intersection() {
        let hub = hub();
        let t1 = Target::new(1);
        let t2 = Target::new(2);
        hub.register("hit", Some(t1), |_| {}).unwrap();
        hub.register("hit", Some(t2), |_| {}).unwrap();
        hub.register("miss", Some(t1), |_| {}).unwrap();

        hub.remove_by_name_and_target("hit", t1);
        assert_eq!(hub.len(), 2);
        assert!(hub.has_listeners("hit"));
        assert!(hub.has_listeners("miss"));
    }

    #[test]
    fn test_remove_by_name_removes_all_with_that_name() {
        let hub = hub();
        hub.register("a", None, |_| {}).unwrap();
        hub.register("a", Some(Target::new(7)), |_| {}).unwrap();
        hub.register("b", None, |_| {}).unwrap();

        hub.remove_by_name("a");
        assert_eq!(hub.len(), 1);
        assert!(!hub.has_listeners("a"));
        assert!(hub.has_listeners("b"));
    }

    #[test]
    fn test_remove_by_target_removes_across_names() {
        let hub = hub();
        let owner = Target::new(3);
        hub.register("a", Some(owner), |_| {}).unwrap();
        hub.register("b", Some(owner), |_| {}).unwrap();
        hub.register("a", None, |_| {}).unwrap();

        hub.remove_by_target(owner);
        assert_eq!(hub.len(), 1);
        assert!(hub.has_listeners("a"));
        assert!(!hub.has_listeners("b"));
    }

    #[test]
    fn test_removals_of_unknown_things_are_noops() {
        let hub = hub();
        hub.remove_by_id(ListenerId::from_raw(12345));
        hub.remove_by_name("ghost");
        hub.remove_by_target(Target::new(9000));
        hub.remove_by_name_and_target("ghost", Target::new(9000));
        assert!(hub.is_empty());
    }

    #[test]
    fn test_clear_all_mid_broadcast_supersedes_queued_mutations() {
        let hub = hub();
        let survivors = Rc::new(Cell::new(0u32));

        {
            let hub2 = Rc::clone(&hub);
            let survivors = Rc::clone(&survivors);
            hub.register("wipe", None, move |_| {
                // queued before the clear: discarded
                let s1 = Rc::clone(&survivors);
                hub2.register("wipe", None, move |_| s1.set(s1.get() + 1)).unwrap();
                hub2.clear_all();
                // queued after the clear: rejected
                let s2 = Rc::clone(&survivors);
                hub2.register("wipe", None, move |_| s2.set(s2.get() + 1)).unwrap();
                assert_eq!(hub2.len(), 1, "clear takes effect only after unwind");
            })
            .unwrap();
        }

        hub.send("wipe", None, &Args::new());
        assert!(hub.is_empty(), "everything gone once the broadcast unwound");
        assert_eq!(hub.queued(), 0);
        // Two records cycled through: the original listener plus the
        // discarded/rejected adds, which shared one recycled slot.
        assert_eq!(hub.pool_idle(), 2, "discarded queued adds returned to the pool");

        hub.send("wipe", None, &Args::new());
        assert_eq!(survivors.get(), 0, "queued adds around the clear were discarded");
    }

    #[test]
    fn test_clear_all_outside_broadcast_resets_engine() {
        let hub = hub();
        hub.register("a", None, |_| {}).unwrap();
        hub.register("b", Some(Target::new(1)), |_| {}).unwrap();

        hub.clear_all();
        assert!(hub.is_empty());
        assert_eq!(hub.pool_idle(), 2, "records returned to the pool");
        hub.send("a", None, &Args::new()); // still a plain no-op
    }

    #[test]
    fn test_panicking_listener_does_not_abort_siblings() {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(|_| {}));

        let hub = hub();
        let log = marker_log();
        hub.register("risky", None, |_| panic!("listener blew up"))
            .unwrap();
        {
            let log = Rc::clone(&log);
            hub.register("risky", None, move |_| log.borrow_mut().push("sibling"))
                .unwrap();
        }

        hub.send("risky", None, &Args::new());
        assert_eq!(*log.borrow(), vec!["sibling"]);
        assert_eq!(hub.depth(), 0);

        // engine still usable after the panic
        hub.send("risky", None, &Args::new());
        std::panic::set_hook(previous);
        assert_eq!(*log.borrow(), vec!["sibling", "sibling"]);
    }

    #[test]
    fn test_pool_recycles_removed_records() {
        let hub = hub();
        assert_eq!(hub.pool_idle(), 0);

        let id = hub.register("churn", None, |_| {}).unwrap();
        hub.remove_by_id(id);
        assert_eq!(hub.pool_idle(), 1);

        let id2 = hub.register("churn", None, |_| {}).unwrap();
        assert_eq!(hub.pool_idle(), 0, "slot reused");
        assert!(id2 > id, "reused slot minted a fresh id");
    }

    #[test]
    fn test_once_listener_registered_mid_broadcast_behaves_like_once() {
        let hub = hub();
        let count = Rc::new(Cell::new(0u32));
        let armed = Rc::new(Cell::new(false));

        {
            let hub2 = Rc::clone(&hub);
            let count = Rc::clone(&count);
            let armed = Rc::clone(&armed);
            hub.register("tick", None, move |_| {
                if !armed.get() {
                    armed.set(true);
                    let count = Rc::clone(&count);
                    hub2.register_once("tick", None, move |_| count.set(count.get() + 1))
                        .unwrap();
                }
            })
            .unwrap();
        }

        hub.send("tick", None, &Args::new());
        hub.send("tick", None, &Args::new());
        hub.send("tick", None, &Args::new());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_targeted_once_listener_survives_nonmatching_send() {
        let hub = hub();
        let count = Rc::new(Cell::new(0u32));
        let owner = Target::new(5);

        {
            let count = Rc::clone(&count);
            hub.register_once("hit", Some(owner), move |_| count.set(count.get() + 1))
                .unwrap();
        }

        hub.send("hit", Some(Target::new(6)), &Args::new());
        assert_eq!(count.get(), 0);
        assert_eq!(hub.len(), 1, "non-matching send must not consume the once-listener");

        hub.send("hit", Some(owner), &Args::new());
        assert_eq!(count.get(), 1);
        assert!(hub.is_empty());
    }
}
