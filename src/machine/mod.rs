//! Machine runtime.
//!
//! A [`Machine`] owns its frozen definition and one mutable cell: the current
//! state. `trigger` and `force_to` run the callback protocol:
//!
//! 1. `before_all` guards, then the transition's `before` guards (a veto
//!    aborts a triggered change; forced changes ignore votes)
//! 2. `on_exit` from the current state outward to its root ancestor
//! 3. the current state is reassigned
//! 4. `on_enter` from the root ancestor inward to the new state
//! 5. the transition's `after` actions, then `after_all`
//!
//! Internal transitions skip steps 2 to 4. Requests made while a change is in
//! progress are queued and run, in order, once it completes. A queued request
//! finishes its own queued requests before the next one starts.

mod error;
mod event;
mod queue;
mod transition;

pub use error::MachineError;
pub use event::{Args, Event};
pub use transition::{Transition, TransitionKind, Trigger};

use crate::core::{Actions, Guards, StateGraph, StateId, StateMap, StateRef};
use queue::{Request, RequestQueue};
use std::cell::Cell;
use std::fmt;
use tracing::{debug, trace, warn};
use uuid::Uuid;

/// Everything the builder accumulates; frozen once handed to a machine.
pub(crate) struct Definition<M: StateMap, T: Trigger> {
    pub graph: StateGraph<M, T>,
    pub transitions: Vec<Transition<M, T>>,
    pub ignore_invalid_triggers: bool,
    pub before_all: Guards<M, T>,
    pub after_all: Actions<M, T>,
}

impl<M: StateMap, T: Trigger> Definition<M, T> {
    pub fn new(graph: StateGraph<M, T>) -> Self {
        Self {
            graph,
            transitions: Vec::new(),
            ignore_invalid_triggers: false,
            before_all: Guards::new(),
            after_all: Actions::new(),
        }
    }
}

/// A built state machine.
///
/// Not thread-safe: callers sharing a machine across threads must serialize
/// every call themselves.
pub struct Machine<M: StateMap, T: Trigger> {
    id: Uuid,
    definition: Definition<M, T>,
    current: Cell<StateId>,
    queue: RequestQueue<T>,
}

impl<M: StateMap, T: Trigger> Machine<M, T> {
    pub(crate) fn new(definition: Definition<M, T>, initial: StateId) -> Self {
        let machine = Self {
            id: Uuid::new_v4(),
            definition,
            current: Cell::new(initial),
            queue: RequestQueue::new(),
        };
        debug!(
            machine = %machine.id,
            states = machine.definition.graph.nodes.len(),
            transitions = machine.definition.transitions.len(),
            initial = %machine.definition.graph.full_name(initial),
            "state machine built"
        );
        machine
    }

    pub(crate) fn graph(&self) -> &StateGraph<M, T> {
        &self.definition.graph
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Identifier of the current state.
    pub fn state(&self) -> M::Owned {
        self.state_ref().key()
    }

    /// The current state object.
    pub fn state_ref(&self) -> StateRef<'_, M, T> {
        self.definition.graph.get(self.current.get())
    }

    /// True if `state` is the current state or one of its ancestors.
    pub fn is_in(&self, state: impl std::borrow::Borrow<M::Key>) -> Result<bool, MachineError> {
        let ancestor = self.resolve(state.borrow())?;
        Ok(self
            .definition
            .graph
            .in_lineage(self.current.get(), ancestor))
    }

    /// Look up any state of this machine, accessible or not.
    pub fn lookup(&self, state: impl std::borrow::Borrow<M::Key>) -> Result<StateRef<'_, M, T>, MachineError> {
        let id = self.resolve(state.borrow())?;
        Ok(self.definition.graph.get(id))
    }

    /// Every state of this machine, ancestors before their descendants.
    pub fn states(&self) -> impl Iterator<Item = StateRef<'_, M, T>> + '_ {
        self.definition
            .graph
            .ids()
            .map(move |id| self.definition.graph.get(id))
    }

    pub fn transitions(&self) -> &[Transition<M, T>] {
        &self.definition.transitions
    }

    /// Machine-wide invalid-trigger setting.
    pub fn ignores_invalid_triggers(&self) -> bool {
        self.definition.ignore_invalid_triggers
    }

    /// True while a state change is running its callbacks.
    pub fn is_busy(&self) -> bool {
        self.queue.is_busy()
    }

    /// Move to `state` without consulting any transition.
    ///
    /// Does nothing if the machine is already in `state`. An unknown or
    /// inaccessible `state` is reported by this call even when it is made from
    /// a callback and the move itself is queued; callbacks should propagate or
    /// handle that error rather than discard it.
    pub fn force_to(&self, state: impl std::borrow::Borrow<M::Key>) -> Result<(), MachineError> {
        self.force_to_with(state, Args::new())
    }

    pub fn force_to_with(
        &self,
        state: impl std::borrow::Borrow<M::Key>,
        args: Args,
    ) -> Result<(), MachineError> {
        let target = self.resolve(state.borrow())?;
        if !self.definition.graph.node(target).accessible {
            return Err(MachineError::InaccessibleState(
                self.definition.graph.full_name(target),
            ));
        }
        self.dispatch(Request::ForceTo {
            state: target,
            args,
        })?;
        Ok(())
    }

    /// Fire the transition registered for `trigger` in the current state.
    ///
    /// Returns `Ok(false)` if a guard vetoed the change or if no transition
    /// matched and invalid triggers are ignored. Returns `Ok(true)` without
    /// running anything when called from inside a callback; the request is
    /// queued instead.
    pub fn trigger(&self, trigger: T) -> Result<bool, MachineError> {
        self.trigger_with(trigger, Args::new())
    }

    pub fn trigger_with(&self, trigger: T, args: Args) -> Result<bool, MachineError> {
        self.dispatch(Request::Trigger { trigger, args })
    }

    fn resolve(&self, key: &M::Key) -> Result<StateId, MachineError> {
        self.definition
            .graph
            .map
            .resolve(key)
            .ok_or_else(|| MachineError::UnknownState(M::describe(key)))
    }

    fn dispatch(&self, request: Request<T>) -> Result<bool, MachineError> {
        let Some(_busy) = self.queue.acquire() else {
            self.queue.enqueue(request);
            trace!(
                machine = %self.id,
                pending = self.queue.len(),
                "state change in progress, request queued"
            );
            return Ok(true);
        };

        self.run(request)
    }

    /// Execute `request`, then every request its callbacks queued, each of
    /// those draining its own queued requests before the next one starts.
    fn run(&self, request: Request<T>) -> Result<bool, MachineError> {
        self.queue.open_frame();
        let outcome = self.execute(request);
        let queued = self.queue.close_frame();

        let mut queued = queued.into_iter();
        let result = outcome.and_then(|outcome| {
            for next in queued.by_ref() {
                self.run(next)?;
            }
            Ok(outcome)
        });

        if let Err(err) = &result {
            let discarded = queued.len();
            if discarded > 0 {
                warn!(
                    machine = %self.id,
                    discarded,
                    error = %err,
                    "request failed, discarding requests it queued"
                );
            }
        }
        result
    }

    fn execute(&self, request: Request<T>) -> Result<bool, MachineError> {
        match request {
            Request::Trigger { trigger, args } => self.run_trigger(trigger, args),
            Request::ForceTo { state, args } => {
                self.run_forced(state, args);
                Ok(true)
            }
        }
    }

    fn run_trigger(&self, trigger: T, args: Args) -> Result<bool, MachineError> {
        let current = self.current.get();
        let node = self.definition.graph.node(current);

        let Some(&index) = node.transitions.get(&trigger) else {
            if self.definition.ignore_invalid_triggers || node.ignore_invalid_triggers {
                debug!(
                    machine = %self.id,
                    trigger = ?trigger,
                    state = %self.definition.graph.full_name(current),
                    "ignoring invalid trigger"
                );
                return Ok(false);
            }
            return Err(MachineError::InvalidTrigger {
                trigger: format!("{trigger:?}"),
                state: self.definition.graph.full_name(current),
            });
        };

        let transition = &self.definition.transitions[index];
        debug_assert!(transition.can_execute(&trigger, current));
        let destination = transition.destination_from(current);
        debug!(
            machine = %self.id,
            trigger = ?trigger,
            kind = ?transition.kind,
            from = %self.definition.graph.full_name(current),
            to = %self.definition.graph.full_name(destination),
            "running transition"
        );

        let mut event = Event::new(
            self,
            current,
            destination,
            Some(transition),
            Some(trigger),
            args,
        );

        if !self.definition.before_all.check_all(&mut event) {
            debug!(machine = %self.id, "transition vetoed by before_all");
            return Ok(false);
        }
        if !transition.before.check_all(&mut event) {
            debug!(machine = %self.id, "transition vetoed by before");
            return Ok(false);
        }

        if !transition.is_internal() {
            self.exit_from(current, &mut event);
            self.current.set(destination);
            self.enter_into(destination, &mut event);
        }

        transition.after.run_all(&mut event);
        self.definition.after_all.run_all(&mut event);
        Ok(true)
    }

    fn run_forced(&self, target: StateId, args: Args) {
        let current = self.current.get();
        if target == current {
            trace!(machine = %self.id, "already in forced state");
            return;
        }
        debug!(
            machine = %self.id,
            from = %self.definition.graph.full_name(current),
            to = %self.definition.graph.full_name(target),
            "forcing state change"
        );

        let mut event = Event::new(self, current, target, None, None, args);

        if !self.definition.before_all.check_all(&mut event) {
            debug!(machine = %self.id, "before_all veto ignored for forced change");
        }
        self.exit_from(current, &mut event);
        self.current.set(target);
        self.enter_into(target, &mut event);
        self.definition.after_all.run_all(&mut event);
    }

    /// Run `on_exit` from `state` up to its root ancestor.
    fn exit_from(&self, state: StateId, event: &mut Event<'_, M, T>) {
        let graph = &self.definition.graph;
        for id in graph.lineage(state) {
            graph.node(id).on_exit.run_all(event);
        }
    }

    /// Run `on_enter` from the root ancestor down to `state`.
    fn enter_into(&self, state: StateId, event: &mut Event<'_, M, T>) {
        let graph = &self.definition.graph;
        let mut lineage: Vec<StateId> = graph.lineage(state).collect();
        lineage.reverse();
        for id in lineage {
            graph.node(id).on_enter.run_all(event);
        }
    }
}

impl<M: StateMap, T: Trigger> fmt::Debug for Machine<M, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("id", &self.id)
            .field("state", &self.state_ref().full_name())
            .field("busy", &self.is_busy())
            .finish()
    }
}
