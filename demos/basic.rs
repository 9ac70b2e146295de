//! # Example: basic
//!
//! Minimal register/send/remove round trip on an owned dispatcher.
//!
//! Demonstrates how to:
//! - Register listeners with [`Dispatcher::register`] and [`Dispatcher::register_once`].
//! - Broadcast with typed arguments via [`Args`].
//! - Remove a listener by its [`ListenerId`].
//!
//! ## Run
//! ```bash
//! cargo run --example basic
//! ```

use signalcast::{Args, Dispatcher};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let hub = Dispatcher::new();

    // 1. A persistent listener: fires on every "score" broadcast
    let id = hub.register("score", None, |args: &Args| {
        let points = args.get::<u32>(0).copied().unwrap_or(0);
        let who = args.get::<String>(1).map(String::as_str).unwrap_or("?");
        println!("[score] {who} earned {points}");
    })?;

    // 2. A once-listener: removed automatically after its first match
    hub.register_once("score", None, |_| {
        println!("[score] first blood!");
    })?;

    // 3. Broadcast twice; the once-listener only hears the first
    hub.send(
        "score",
        None,
        &Args::new().with(100u32).with(String::from("alice")),
    );
    hub.send(
        "score",
        None,
        &Args::new().with(250u32).with(String::from("bob")),
    );

    // 4. Remove the persistent listener; further sends are no-ops
    hub.remove_by_id(id);
    hub.send("score", None, &Args::new().with(999u32));

    println!("listeners left: {}", hub.len());
    Ok(())
}
