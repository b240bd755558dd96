//! hfsm: a hierarchical finite state machine
//!
//! States form a tree. Declaring `"running/steady"` implies a parent state
//! `"running"`, and a machine in `"running/steady"` is also in `"running"`.
//! Changing state runs exit callbacks from the old state outward to its root,
//! then enter callbacks from the new state's root inward.
//!
//! # Core Concepts
//!
//! - **Builder**: declares states, transitions and callbacks, validating each
//!   declaration as it is made
//! - **Machine**: the built, immutable structure plus a current state
//! - **Trigger**: a token that selects the transition to fire
//! - **Guards**: callbacks that can veto a triggered change
//!
//! States are declared either as slash-delimited paths ([`StringStates`]) or
//! as variants of an enum implementing [`State`] ([`EnumStates`]).
//!
//! # Example
//!
//! ```rust
//! use hfsm::Builder;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let log = Rc::new(RefCell::new(Vec::new()));
//! let on_exit = Rc::clone(&log);
//! let on_enter = Rc::clone(&log);
//!
//! let machine = Builder::from_paths(["solid", "liquid", "gas"])?
//!     .on_exit("solid", move |_| on_exit.borrow_mut().push("exit solid"))?
//!     .on_enter("liquid", move |_| on_enter.borrow_mut().push("enter liquid"))?
//!     .transition("melt", ["solid"], "liquid")?
//!     .build()
//!     .transition("evaporate", ["liquid"], "gas")?
//!     .build()
//!     .build("solid")?;
//!
//! assert!(machine.trigger("melt")?);
//! assert_eq!(machine.state(), "liquid");
//! assert_eq!(*log.borrow(), vec!["exit solid", "enter liquid"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod core;
pub mod machine;

// Re-export commonly used types
pub use builder::{BuildError, Builder, TransitionBuilder};
pub use core::{
    full_name, in_lineage, Action, EnumStates, Guard, State, StateId, StateMap, StateRef,
    StringStates, SEPARATOR,
};
pub use machine::{Args, Event, Machine, MachineError, Transition, TransitionKind, Trigger};

/// Machine whose states are slash-delimited paths.
pub type StringMachine<T> = Machine<StringStates, T>;

/// Machine whose states are the variants of `E`.
pub type EnumMachine<E, T> = Machine<EnumStates<E>, T>;
