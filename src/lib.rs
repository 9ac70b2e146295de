//! # signalcast
//!
//! **Signalcast** is a synchronous in-process publish/subscribe dispatcher.
//!
//! Callers register named callbacks, optionally scoped to an owning
//! [`Target`], and other callers broadcast named events with type-erased
//! [`Args`] to every matching registration. Delivery is synchronous within
//! the calling context: when `send` returns, every matched listener has run.
//!
//! ## Architecture
//! ```text
//!  register(name, target?, cb)          send(name, target?, args)
//!            │                                    │
//!            ▼                                    ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Dispatcher (engine)                                            │
//! │  - records: id → Registration   (master table)                  │
//! │  - by_name: name → {ids}        (insertion-ordered)             │
//! │  - by_target: target → {ids}                                    │
//! │  - depth: nested broadcasts currently on the stack              │
//! └───────┬──────────────────────────────────┬──────────────────────┘
//!         │ depth == 0                       │ depth > 0
//!         ▼                                  ▼
//!   mutate indices directly          MutationQueue (FIFO)
//!   allocate/recycle via             replayed after the outermost
//!   RecordPool                       broadcast unwinds
//! ```
//!
//! ## Guarantees
//! - Listeners of one `send` run in registration order.
//! - A broadcast in flight is never affected by mutations made during it:
//!   adds, removals and clears requested from inside a callback apply only
//!   after the outermost broadcast unwinds.
//! - Nested `send` calls from inside a callback run to completion before
//!   the callback resumes, bounded by a recursion guard
//!   ([`DispatcherConfig::max_depth`], default 20).
//! - A panicking listener is caught and reported; its siblings still run.
//! - Registration ids grow monotonically and are never reused, even
//!   though the records behind them are pooled and recycled.
//!
//! ## Features
//! | Area             | Description                                          | Key types                         |
//! |------------------|------------------------------------------------------|-----------------------------------|
//! | **Dispatch**     | Register, remove, broadcast with reentrancy support. | [`Dispatcher`], [`ListenerId`]    |
//! | **Payloads**     | Type-erased argument lists, opaque target identities.| [`Args`], [`Target`]              |
//! | **Errors**       | Typed errors for registration and refused sends.     | [`DispatchError`]                 |
//! | **Configuration**| Recursion limit and pool pre-allocation.             | [`DispatcherConfig`]              |
//!
//! ## Optional features
//! - `global`: exports [`global`], static-style entry points over one
//!   lazily-initialized dispatcher per thread.
//!
//! ## Example
//! ```rust
//! use std::rc::Rc;
//! use std::cell::RefCell;
//! use signalcast::{Args, Dispatcher, Target};
//!
//! let hub = Rc::new(Dispatcher::new());
//! let log = Rc::new(RefCell::new(Vec::new()));
//!
//! // Unscoped listener: hears every "explosion".
//! let sink = Rc::clone(&log);
//! hub.register("explosion", None, move |args: &Args| {
//!     let power = args.get::<u32>(0).copied().unwrap_or(0);
//!     sink.borrow_mut().push(format!("boom x{power}"));
//! })?;
//!
//! // Scoped listener: only hears broadcasts aimed at its owner.
//! let player = Target::new(1);
//! let sink = Rc::clone(&log);
//! hub.register_once("explosion", Some(player), move |_| {
//!     sink.borrow_mut().push("player hit".to_string());
//! })?;
//!
//! hub.send("explosion", Some(player), &Args::new().with(3u32));
//! hub.send("explosion", None, &Args::new().with(1u32));
//!
//! assert_eq!(*log.borrow(), vec!["player hit", "boom x1"]);
//! # Ok::<(), signalcast::DispatchError>(())
//! ```
//!
//! The dispatcher is single-threaded by design: there is no parallelism
//! inside it, and "concurrency" means reentrancy (a listener calling back
//! into the engine that is currently delivering to it). Share an instance
//! within a thread via `Rc`; it is deliberately neither `Send` nor `Sync`.

mod config;
mod dispatch;
mod error;
mod events;
mod listeners;

// ---- Public re-exports ----

pub use config::DispatcherConfig;
pub use dispatch::Dispatcher;
pub use error::DispatchError;
pub use events::{Args, Target};
pub use listeners::{Callback, ListenerId};

// Optional: static-style entry points over a per-thread dispatcher.
// Enable with: `--features global`
#[cfg(feature = "global")]
pub mod global;
