//! Phases of Matter
//!
//! This example demonstrates a flat string-keyed machine.
//!
//! Key concepts:
//! - Declaring states by name
//! - Enter and exit callbacks
//! - Triggered and forced state changes
//! - Invalid triggers
//!
//! Run with: RUST_LOG=hfsm=debug cargo run --example matter

use hfsm::{Builder, StringMachine};
use std::error::Error;
use tracing_subscriber::prelude::*;

fn phases() -> Result<StringMachine<&'static str>, Box<dyn Error>> {
    let mut builder = Builder::from_paths(["solid", "liquid", "gas"])?;
    for phase in ["solid", "liquid", "gas"] {
        builder = builder
            .on_enter_fn(phase, move || println!("  entered {phase}"))?
            .on_exit_fn(phase, move || println!("  left {phase}"))?;
    }

    let machine = builder
        .transition("melt", ["solid"], "liquid")?
        .build()
        .transition("evaporate", ["liquid"], "gas")?
        .build()
        .transition("condense", ["gas"], "liquid")?
        .build()
        .transition("freeze", ["liquid"], "solid")?
        .build()
        .after_all(|event| {
            println!(
                "  {} -> {}",
                event.source().full_name(),
                event.destination().full_name()
            )
        })
        .build("solid")?;
    Ok(machine)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Phases of Matter ===\n");

    let machine = phases()?;
    println!("Initial state: {}\n", machine.state());

    for trigger in ["melt", "evaporate"] {
        println!("trigger({trigger}):");
        machine.trigger(trigger)?;
    }

    println!("force_to(solid):");
    machine.force_to("solid")?;

    println!("\ntrigger(evaporate) while solid:");
    match machine.trigger("evaporate") {
        Ok(_) => println!("  unexpectedly accepted"),
        Err(err) => println!("  rejected: {err}"),
    }

    println!("\nFinal state: {}", machine.state());
    println!("\n=== Example Complete ===");
    Ok(())
}
