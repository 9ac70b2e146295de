//! Listener registrations: records, ids and the recycling pool.
//!
//! Internal modules:
//! - [`record`]: the per-listener value object and its public [`ListenerId`];
//! - [`pool`]: free-list recycling of registration records.

mod pool;
mod record;

pub use record::{Callback, ListenerId};

pub(crate) use pool::RecordPool;
pub(crate) use record::Registration;
