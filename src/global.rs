//! # Per-thread global dispatcher.
//!
//! Static-style entry points over one lazily-initialized [`Dispatcher`]
//! per thread. Every function forwards 1:1 to the engine; this module has
//! no logic of its own.
//!
//! The engine is single-threaded by design, so "process-wide" here means
//! one instance per thread: code on the same thread shares it, other
//! threads get their own. Callbacks registered through this module may
//! re-enter it (e.g. call [`send`] from inside a listener); reentrancy is
//! handled by the engine exactly as for an owned instance.
//!
//! ## Example
//! ```
//! use signalcast::{global, Args};
//!
//! let id = global::register("level-up", None, |args: &Args| {
//!     let _level = args.get::<u32>(0);
//! }).unwrap();
//!
//! global::send("level-up", None, &Args::new().with(3u32));
//! global::remove_by_id(id);
//! ```

use crate::dispatch::Dispatcher;
use crate::error::DispatchError;
use crate::events::{Args, Target};
use crate::listeners::ListenerId;

thread_local! {
    static GLOBAL: Dispatcher = Dispatcher::new();
}

/// Runs `f` with this thread's dispatcher, for anything the forwarding
/// functions below do not cover.
pub fn with<R>(f: impl FnOnce(&Dispatcher) -> R) -> R {
    GLOBAL.with(f)
}

/// Forwards to [`Dispatcher::register`].
///
/// # Errors
/// [`DispatchError::EmptyName`] if `name` is empty.
pub fn register<F>(
    name: &str,
    target: Option<Target>,
    callback: F,
) -> Result<ListenerId, DispatchError>
where
    F: Fn(&Args) + 'static,
{
    GLOBAL.with(|hub| hub.register(name, target, callback))
}

/// Forwards to [`Dispatcher::register_once`].
///
/// # Errors
/// [`DispatchError::EmptyName`] if `name` is empty.
pub fn register_once<F>(
    name: &str,
    target: Option<Target>,
    callback: F,
) -> Result<ListenerId, DispatchError>
where
    F: Fn(&Args) + 'static,
{
    GLOBAL.with(|hub| hub.register_once(name, target, callback))
}

/// Forwards to [`Dispatcher::send`].
pub fn send(name: &str, target: Option<Target>, args: &Args) {
    GLOBAL.with(|hub| hub.send(name, target, args));
}

/// Forwards to [`Dispatcher::try_send`].
///
/// # Errors
/// [`DispatchError::RecursionLimit`] if the nesting depth already reached
/// the configured maximum.
pub fn try_send(name: &str, target: Option<Target>, args: &Args) -> Result<(), DispatchError> {
    GLOBAL.with(|hub| hub.try_send(name, target, args))
}

/// Forwards to [`Dispatcher::remove_by_id`].
pub fn remove_by_id(id: ListenerId) {
    GLOBAL.with(|hub| hub.remove_by_id(id));
}

/// Forwards to [`Dispatcher::remove_by_name`].
pub fn remove_by_name(name: &str) {
    GLOBAL.with(|hub| hub.remove_by_name(name));
}

/// Forwards to [`Dispatcher::remove_by_target`].
pub fn remove_by_target(target: Target) {
    GLOBAL.with(|hub| hub.remove_by_target(target));
}

/// Forwards to [`Dispatcher::remove_by_name_and_target`].
pub fn remove_by_name_and_target(name: &str, target: Target) {
    GLOBAL.with(|hub| hub.remove_by_name_and_target(name, target));
}

/// Forwards to [`Dispatcher::clear_all`].
pub fn clear_all() {
    GLOBAL.with(Dispatcher::clear_all);
}
