//! State model and callback chains.
//!
//! This module contains the static half of a machine:
//! - Path handling for hierarchical string states
//! - The two state backends behind the `StateMap` trait
//! - The arena of state nodes and the `StateRef` view over it
//! - Guard (abortable) and action (fire-and-forget) callback chains
//!
//! Nothing here changes after a machine is built.

mod action;
mod graph;
mod guard;
mod map;
pub mod path;
mod state;

pub use action::{Action, Actions};
pub use graph::{full_name, in_lineage, StateId, StateRef};
pub(crate) use graph::{StateGraph, StateSpec};
pub use guard::{Guard, Guards};
pub use map::{EnumStates, StateMap, StringStates};
pub use path::{PathError, SEPARATOR};
pub use state::State;
