//! # Example: targets
//!
//! Scoping listeners to owners and cleaning them up per-owner.
//!
//! Demonstrates how to:
//! - Register listeners under a [`Target`] identity.
//! - Narrow a broadcast to one target, or hit everyone with `None`.
//! - Drop all of an owner's listeners in one call with
//!   [`Dispatcher::remove_by_target`].
//!
//! ## Run
//! ```bash
//! cargo run --example targets
//! ```

use signalcast::{Args, Dispatcher, Target};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let hub = Dispatcher::new();

    let player = Target::new(1);
    let boss = Target::new(2);

    // 1. Each owner scopes its listeners to its own identity
    hub.register("hit", Some(player), |args: &Args| {
        let dmg = args.get::<i32>(0).copied().unwrap_or(0);
        println!("[player] ouch, -{dmg} hp");
    })?;
    hub.register("hit", Some(boss), |args: &Args| {
        let dmg = args.get::<i32>(0).copied().unwrap_or(0);
        println!("[boss] barely felt that, -{dmg} hp");
    })?;
    hub.register("hit", None, |_| {
        println!("[camera] shake!");
    })?;

    // 2. Targeted broadcast: only the matching owner hears it
    println!("-- fireball at the boss --");
    hub.send("hit", Some(boss), &Args::new().with(42i32));

    // 3. Untargeted broadcast: every "hit" listener hears it
    println!("-- earthquake hits everyone --");
    hub.send("hit", None, &Args::new().with(7i32));

    // 4. The player despawns: one call removes all of its listeners
    hub.remove_by_target(player);
    println!("-- player gone, another earthquake --");
    hub.send("hit", None, &Args::new().with(7i32));

    Ok(())
}
