//! Abortable callbacks.
//!
//! A guard runs before a state change and votes on whether it may proceed.
//! Guards registered on the same hook form a [`Guards`] chain that
//! short-circuits on the first `false`.

use super::map::StateMap;
use crate::machine::{Event, Trigger};

/// Callback that may veto a state change by returning `false`.
///
/// # Example
///
/// ```rust
/// use hfsm::StringStates;
/// use hfsm::core::Guard;
///
/// let only_when_armed: Guard<StringStates, &str> =
///     Guard::new(|event| event.arg("armed").and_then(|v| v.as_bool()).unwrap_or(false));
/// ```
pub struct Guard<M: StateMap, T: Trigger> {
    predicate: Box<dyn Fn(&mut Event<'_, M, T>) -> bool>,
}

impl<M: StateMap, T: Trigger> Guard<M, T> {
    /// Guard whose return value is its vote.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&mut Event<'_, M, T>) -> bool + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// Guard that inspects the event but always lets the change proceed.
    pub fn observe<F>(callback: F) -> Self
    where
        F: Fn(&mut Event<'_, M, T>) + 'static,
    {
        Self::new(move |event| {
            callback(event);
            true
        })
    }

    /// Guard that ignores the event and always lets the change proceed.
    pub fn from_fn<F>(callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self::new(move |_| {
            callback();
            true
        })
    }

    pub fn check(&self, event: &mut Event<'_, M, T>) -> bool {
        (self.predicate)(event)
    }
}

/// Ordered guards; later guards run only if every earlier one approved.
pub struct Guards<M: StateMap, T: Trigger> {
    guards: Vec<Guard<M, T>>,
}

impl<M: StateMap, T: Trigger> Guards<M, T> {
    pub fn new() -> Self {
        Self { guards: Vec::new() }
    }

    pub fn push(&mut self, guard: Guard<M, T>) {
        self.guards.push(guard);
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    /// Run guards in registration order, stopping at the first veto.
    /// An empty chain approves.
    pub fn check_all(&self, event: &mut Event<'_, M, T>) -> bool {
        self.guards.iter().all(|guard| guard.check(event))
    }
}

impl<M: StateMap, T: Trigger> Default for Guards<M, T> {
    fn default() -> Self {
        Self::new()
    }
}
