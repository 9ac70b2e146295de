//! # Example: global
//!
//! Static-style access through the per-thread global dispatcher.
//!
//! Demonstrates how to:
//! - Register and broadcast without owning a [`Dispatcher`] instance.
//! - Reach the underlying engine with [`global::with`] when needed.
//!
//! ## Run
//! ```bash
//! cargo run --example global --features global
//! ```

use signalcast::{global, Args, Dispatcher};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Registration from anywhere on this thread, no handle to pass around
    global::register("quest-complete", None, |args: &Args| {
        let name = args.get::<String>(0).map(String::as_str).unwrap_or("?");
        println!("[quest] '{name}' complete");
    })?;

    global::register_once("quest-complete", None, |_| {
        println!("[achievement] first quest!");
    })?;

    // 2. Broadcast through the same entry points
    global::send(
        "quest-complete",
        None,
        &Args::new().with(String::from("tutorial")),
    );
    global::send(
        "quest-complete",
        None,
        &Args::new().with(String::from("catacombs")),
    );

    // 3. Direct access for anything the forwarders do not cover
    let live = global::with(Dispatcher::len);
    println!("live listeners: {live}");

    global::clear_all();
    Ok(())
}
