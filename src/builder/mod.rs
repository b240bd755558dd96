//! Builder API for state machine construction.
//!
//! This module provides the fluent builders and the `state_enum!` macro.
//! Declarations are validated eagerly; `Builder::build` freezes the result
//! into a [`Machine`](crate::machine::Machine).

pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;

pub use error::BuildError;
pub use machine::Builder;
pub use transition::TransitionBuilder;
