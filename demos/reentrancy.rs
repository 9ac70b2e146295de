//! # Example: reentrancy
//!
//! Listeners that call back into the dispatcher mid-broadcast.
//!
//! Demonstrates how to:
//! - Send a nested event from inside a listener (runs to completion
//!   before the outer listener resumes).
//! - Register a listener during a broadcast (first fires on the *next*
//!   send, never the in-flight one).
//! - Observe the recursion guard stopping an unconditionally
//!   self-resending listener (warning logged via `tracing`).
//!
//! ## Flow
//! ```text
//! send("combo")
//!   ├─► combo listener ──► send("sfx")   (nested, completes inline)
//!   │                 └──► register("combo", ...)   (deferred)
//!   └─► unwind: deferred add applied, next send sees it
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=signalcast=warn cargo run --example reentrancy
//! ```

use std::rc::Rc;

use signalcast::{Args, Dispatcher, DispatcherConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let hub = Rc::new(Dispatcher::with_config(DispatcherConfig {
        max_depth: 5,
        ..DispatcherConfig::default()
    }));

    // 1. Nested send plus a mid-broadcast registration
    {
        let hub2 = Rc::clone(&hub);
        hub.register("combo", None, move |_| {
            println!("[combo] start");
            hub2.send("sfx", None, &Args::new());
            hub2.register("combo", None, |_| println!("[combo] late joiner"))
                .expect("name is non-empty");
            println!("[combo] end");
        })?;
    }
    hub.register("sfx", None, |_| println!("[sfx] ka-ching"))?;

    println!("-- first combo (no late joiner yet) --");
    hub.send("combo", None, &Args::new());

    // 2. Every send queues one more "late joiner", so the bucket grows
    println!("-- second combo (late joiner fires) --");
    hub.send("combo", None, &Args::new());
    hub.remove_by_name("combo");

    // 3. Recursion guard: the loop stops at max_depth, with a warning
    {
        let hub2 = Rc::clone(&hub);
        hub.register("loop", None, move |_| {
            println!("[loop] depth {}", hub2.depth());
            hub2.send("loop", None, &Args::new());
        })?;
    }
    println!("-- self-resending listener, capped at depth 5 --");
    hub.send("loop", None, &Args::new());

    Ok(())
}
