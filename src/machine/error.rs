//! Errors raised while driving a built machine.

use thiserror::Error;

/// Errors returned by `trigger`, `force_to` and state lookups.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error("cannot use trigger '{trigger}' in state '{state}'")]
    InvalidTrigger { trigger: String, state: String },

    #[error("state '{0}' does not belong to this machine")]
    UnknownState(String),

    #[error("cannot enter inaccessible state '{0}'")]
    InaccessibleState(String),
}
