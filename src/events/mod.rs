//! Event data model: broadcast payloads and target identities.
//!
//! This module groups the two value types a broadcast carries besides its
//! name:
//!
//! - [`Args`] type-erased argument list forwarded to every matched listener
//! - [`Target`] opaque identity key scoping registrations to an owner

mod args;
mod target;

pub use args::Args;
pub use target::Target;
