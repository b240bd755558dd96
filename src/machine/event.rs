//! Per-state-change context handed to every callback.

use super::transition::{Transition, Trigger};
use super::Machine;
use crate::core::{StateId, StateMap, StateRef};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Free-form arguments shared by every callback of one state change.
pub type Args = serde_json::Map<String, Value>;

/// Context of a single state change.
///
/// One event is created per `trigger` or `force_to` and passed, by mutable
/// reference, to every callback that change runs, so callbacks can hand data
/// to each other through [`args_mut`](Event::args_mut).
pub struct Event<'a, M: StateMap, T: Trigger> {
    machine: &'a Machine<M, T>,
    source: StateId,
    destination: StateId,
    transition: Option<&'a Transition<M, T>>,
    trigger: Option<T>,
    args: Args,
    timestamp: DateTime<Utc>,
}

impl<'a, M: StateMap, T: Trigger> Event<'a, M, T> {
    pub(crate) fn new(
        machine: &'a Machine<M, T>,
        source: StateId,
        destination: StateId,
        transition: Option<&'a Transition<M, T>>,
        trigger: Option<T>,
        args: Args,
    ) -> Self {
        Self {
            machine,
            source,
            destination,
            transition,
            trigger,
            args,
            timestamp: Utc::now(),
        }
    }

    /// The machine undergoing the change. Calling `trigger` or `force_to`
    /// on it from a callback queues the request.
    pub fn machine(&self) -> &'a Machine<M, T> {
        self.machine
    }

    pub fn source(&self) -> StateRef<'a, M, T> {
        self.machine.graph().get(self.source)
    }

    pub fn destination(&self) -> StateRef<'a, M, T> {
        self.machine.graph().get(self.destination)
    }

    /// `None` for forced state changes.
    pub fn transition(&self) -> Option<&'a Transition<M, T>> {
        self.transition
    }

    /// `None` for forced state changes.
    pub fn trigger(&self) -> Option<&T> {
        self.trigger.as_ref()
    }

    pub fn is_forced(&self) -> bool {
        self.transition.is_none()
    }

    /// When the state change began.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn args(&self) -> &Args {
        &self.args
    }

    pub fn args_mut(&mut self) -> &mut Args {
        &mut self.args
    }

    pub fn arg(&self, key: &str) -> Option<&Value> {
        self.args.get(key)
    }

    /// Deserialize an argument, returning `None` if it is missing or has the
    /// wrong shape.
    pub fn arg_as<V: DeserializeOwned>(&self, key: &str) -> Option<V> {
        self.args
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn insert_arg(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.args.insert(key.into(), value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        speed: u32,
    }

    #[test]
    fn event_exposes_endpoints() {
        let machine: Machine<_, &'static str> =
            Builder::from_paths(["A/B", "X"]).unwrap().build("A/B").unwrap();
        let b = machine.lookup("A/B").unwrap().id();
        let x = machine.lookup("X").unwrap().id();

        let event = Event::new(&machine, b, x, None, None, Args::new());

        assert_eq!(event.source().full_name(), "A/B");
        assert_eq!(event.destination().full_name(), "X");
        assert!(event.is_forced());
        assert!(event.trigger().is_none());
        assert!(event.timestamp() <= Utc::now());
    }

    #[test]
    fn arguments_are_typed_on_read() {
        let machine: Machine<_, &'static str> =
            Builder::from_paths(["A"]).unwrap().build("A").unwrap();
        let a = machine.lookup("A").unwrap().id();

        let mut args = Args::new();
        args.insert("payload".to_string(), json!({ "speed": 7 }));
        let mut event = Event::new(&machine, a, a, None, Some("go"), args);
        event.insert_arg("label", "fast");

        assert_eq!(event.arg_as::<Payload>("payload"), Some(Payload { speed: 7 }));
        assert_eq!(event.arg_as::<String>("label"), Some("fast".to_string()));
        assert_eq!(event.arg_as::<u32>("label"), None);
        assert_eq!(event.arg("missing"), None);
        assert_eq!(event.trigger(), Some(&"go"));
    }
}
