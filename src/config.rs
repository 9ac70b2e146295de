//! # Global dispatcher configuration.
//!
//! [`DispatcherConfig`] defines the engine's behavior: the broadcast
//! nesting limit and the number of registration records pre-warmed into
//! the record pool.
//!
//! # Example
//! ```
//! use signalcast::{Dispatcher, DispatcherConfig};
//!
//! let mut cfg = DispatcherConfig::default();
//! cfg.max_depth = 8;
//! cfg.pool_reserve = 64;
//!
//! let hub = Dispatcher::with_config(cfg);
//! assert!(hub.is_empty());
//! ```

/// Configuration for a [`Dispatcher`](crate::Dispatcher) instance.
///
/// Controls the reentrancy guard and record-pool pre-allocation.
#[derive(Clone, Copy, Debug)]
pub struct DispatcherConfig {
    /// Maximum number of nested broadcasts allowed on the call stack.
    ///
    /// A `send` issued while the dispatcher is already this deep is
    /// refused (reported, not fatal). Must be at least 1.
    pub max_depth: usize,
    /// Number of registration records to pre-allocate in the pool.
    pub pool_reserve: usize,
}

impl Default for DispatcherConfig {
    /// Provides a default configuration:
    /// - `max_depth = 20`
    /// - `pool_reserve = 0` (grow on demand)
    fn default() -> Self {
        Self {
            max_depth: 20,
            pool_reserve: 0,
        }
    }
}
