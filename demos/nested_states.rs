//! Nested States
//!
//! This example demonstrates hierarchical states and callback ordering.
//!
//! Key concepts:
//! - Implied parent states from slash-delimited paths
//! - Exit callbacks run leaf first, enter callbacks root first
//! - Guards that veto a transition
//! - Requests issued from inside a callback are queued
//!
//! Run with: RUST_LOG=hfsm=trace cargo run --example nested_states

use hfsm::{Args, Builder};
use std::error::Error;
use tracing_subscriber::prelude::*;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Nested States ===\n");

    let paths = [
        "offline",
        "online/idle",
        "online/busy/uploading",
        "online/busy/downloading",
    ];
    let mut builder = Builder::from_paths(paths)?;
    for state in ["offline", "online", "online/idle", "online/busy", "online/busy/uploading"] {
        builder = builder
            .on_enter_fn(state, move || println!("  enter {state}"))?
            .on_exit_fn(state, move || println!("  exit  {state}"))?;
    }

    let machine = builder
        .on_enter("online/busy/downloading", |event| {
            println!("  enter online/busy/downloading");
            if event.arg_as::<bool>("then_upload").unwrap_or(false) {
                // Queued until this change completes.
                let _ = event.machine().trigger("upload");
            }
        })?
        .transition("connect", ["offline"], "online/idle")?
        .build()
        .transition("download", ["online/idle"], "online/busy/downloading")?
        .build()
        .transition("upload", ["online/idle", "online/busy/downloading"], "online/busy/uploading")?
        .before(|event| {
            let allowed = event.arg_as::<bool>("blocked") != Some(true);
            if !allowed {
                println!("  upload blocked");
            }
            allowed
        })
        .build()
        .transition("disconnect", ["online/idle", "online/busy/uploading"], "offline")?
        .build()
        .ignore_invalid_triggers_in(["offline"])?
        .build("offline")?;

    println!("trigger(connect):");
    machine.trigger("connect")?;

    println!("\ntrigger(upload) with blocked=true:");
    let mut blocked = Args::new();
    blocked.insert("blocked".to_string(), true.into());
    let accepted = machine.trigger_with("upload", blocked)?;
    println!("  accepted: {accepted}, state: {}", machine.state());

    println!("\ntrigger(download) with then_upload=true:");
    let mut chained = Args::new();
    chained.insert("then_upload".to_string(), true.into());
    machine.trigger_with("download", chained)?;
    println!("  state: {}, in online/busy: {}", machine.state(), machine.is_in("online/busy")?);

    println!("\ntrigger(disconnect):");
    machine.trigger("disconnect")?;

    println!("\ntrigger(download) while offline is ignored:");
    println!("  accepted: {}", machine.trigger("download")?);

    println!("\n=== Example Complete ===");
    Ok(())
}
