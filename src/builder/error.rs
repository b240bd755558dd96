//! Build errors for machine and transition builders.

use crate::core::PathError;
use thiserror::Error;

/// Errors that can occur while declaring states, transitions and callbacks.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("No states declared. Pass at least one state path or enum variant")]
    NoStates,

    #[error("Invalid state paths: {}", list(.0))]
    InvalidPaths(Vec<PathError>),

    #[error("Invalid state name '{0}': names must be non-empty and contain no separator")]
    InvalidStateName(String),

    #[error("State '{0}' is declared more than once")]
    DuplicateState(String),

    #[error("Parent chain of state '{0}' loops back on itself")]
    ParentCycle(String),

    #[error("State '{0}' does not belong to this builder")]
    UnknownState(String),

    #[error("State '{0}' is not accessible and cannot be used here")]
    InaccessibleState(String),

    #[error("Transition has no source states")]
    EmptySources,
}

fn list(errors: &[PathError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
