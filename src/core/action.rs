//! Fire-and-forget callbacks for `after`, `after_all`, `on_enter` and
//! `on_exit` hooks.

use super::map::StateMap;
use crate::machine::{Event, Trigger};

/// Callback run for its side effects during a state change.
pub struct Action<M: StateMap, T: Trigger> {
    callback: Box<dyn Fn(&mut Event<'_, M, T>)>,
}

impl<M: StateMap, T: Trigger> Action<M, T> {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&mut Event<'_, M, T>) + 'static,
    {
        Action {
            callback: Box::new(callback),
        }
    }

    /// Action that ignores the event.
    pub fn from_fn<F>(callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self::new(move |_| callback())
    }

    pub fn run(&self, event: &mut Event<'_, M, T>) {
        (self.callback)(event)
    }
}

/// Ordered actions, all run unconditionally in registration order.
pub struct Actions<M: StateMap, T: Trigger> {
    actions: Vec<Action<M, T>>,
}

impl<M: StateMap, T: Trigger> Actions<M, T> {
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    pub fn push(&mut self, action: Action<M, T>) {
        self.actions.push(action);
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn run_all(&self, event: &mut Event<'_, M, T>) {
        for action in &self.actions {
            action.run(event);
        }
    }
}

impl<M: StateMap, T: Trigger> Default for Actions<M, T> {
    fn default() -> Self {
        Self::new()
    }
}
