//! Dispatch core: the engine and its deferred-mutation queue.
//!
//! The only public API from this module is [`Dispatcher`], which owns the
//! listener indices, the record pool and the mutation queue.
//!
//! Internal modules:
//! - [`engine`]: registration, removal and synchronous broadcast;
//! - [`queue`]: FIFO buffer for mutations deferred during a broadcast.

mod engine;
mod queue;

pub use engine::Dispatcher;
