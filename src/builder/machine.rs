//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::builder::transition::TransitionBuilder;
use crate::core::{
    Action, EnumStates, Guard, State, StateGraph, StateId, StateMap, StringStates,
};
use crate::machine::{Definition, Event, Machine, Transition, TransitionKind, Trigger};

/// Builder for constructing state machines with a fluent API.
///
/// Every declaration is checked as it is made, so a bad state reference is
/// reported by the call that introduced it. `build` consumes the builder:
/// a built machine's structure can never change afterwards.
///
/// # Example
///
/// ```
/// use hfsm::Builder;
///
/// let machine = Builder::from_paths(["idle", "running/warmup", "running/steady"])?
///     .transition("start", ["idle"], "running/warmup")?
///     .build()
///     .transition("settle", ["running/warmup"], "running/steady")?
///     .build()
///     .build("idle")?;
///
/// machine.trigger("start")?;
/// assert!(machine.is_in("running")?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Builder<M: StateMap, T: Trigger> {
    definition: Definition<M, T>,
}

impl<T: Trigger> Builder<StringStates, T> {
    /// Declare states by slash-delimited path.
    ///
    /// Ancestors implied by a path, but never declared themselves, exist as
    /// inaccessible states. Every malformed or repeated path is reported in a
    /// single [`BuildError::InvalidPaths`].
    pub fn from_paths<I, P>(paths: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let (map, specs) = StringStates::from_paths(paths)?;
        Ok(Self::with_graph(StateGraph::new(map, specs)))
    }

    /// Append a callback to the enter chain of `state`.
    pub fn on_enter<F>(mut self, state: impl std::borrow::Borrow<str>, callback: F) -> Result<Self, BuildError>
    where
        F: Fn(&mut Event<'_, StringStates, T>) + 'static,
    {
        let id = self.resolve(state.borrow())?;
        self.definition
            .graph
            .node_mut(id)
            .on_enter
            .push(Action::new(callback));
        Ok(self)
    }

    pub fn on_enter_fn<F>(self, state: impl std::borrow::Borrow<str>, callback: F) -> Result<Self, BuildError>
    where
        F: Fn() + 'static,
    {
        self.on_enter(state, move |_| callback())
    }

    /// Append a callback to the exit chain of `state`.
    pub fn on_exit<F>(mut self, state: impl std::borrow::Borrow<str>, callback: F) -> Result<Self, BuildError>
    where
        F: Fn(&mut Event<'_, StringStates, T>) + 'static,
    {
        let id = self.resolve(state.borrow())?;
        self.definition
            .graph
            .node_mut(id)
            .on_exit
            .push(Action::new(callback));
        Ok(self)
    }

    pub fn on_exit_fn<F>(self, state: impl std::borrow::Borrow<str>, callback: F) -> Result<Self, BuildError>
    where
        F: Fn() + 'static,
    {
        self.on_exit(state, move |_| callback())
    }
}

impl<E: State, T: Trigger> Builder<EnumStates<E>, T> {
    /// Declare one state per variant of `E`.
    ///
    /// Parents, accessibility and ignore flags come from the [`State`] impl,
    /// and its `on_enter`/`on_exit` methods head each state's callback chains.
    pub fn from_enum() -> Result<Self, BuildError> {
        let (map, specs) = EnumStates::<E>::from_variants()?;
        let mut graph = StateGraph::new(map, specs);

        for &variant in E::variants() {
            let Some(id) = graph.map.resolve(&variant) else {
                continue;
            };
            let node = graph.node_mut(id);
            node.on_enter
                .push(Action::new(move |event| variant.on_enter(event)));
            node.on_exit
                .push(Action::new(move |event| variant.on_exit(event)));
        }

        Ok(Self::with_graph(graph))
    }
}

impl<M: StateMap, T: Trigger> Builder<M, T> {
    fn with_graph(graph: StateGraph<M, T>) -> Self {
        Self {
            definition: Definition::new(graph),
        }
    }

    /// Return `false` from `trigger` instead of failing when no transition
    /// matches, whatever the current state.
    pub fn ignore_invalid_triggers(mut self) -> Self {
        self.definition.ignore_invalid_triggers = true;
        self
    }

    /// Ignore invalid triggers only while the machine is in one of `states`.
    pub fn ignore_invalid_triggers_in<I, K>(mut self, states: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = K>,
        K: std::borrow::Borrow<M::Key>,
    {
        for state in states {
            let id = self.resolve(state.borrow())?;
            self.definition.graph.node_mut(id).ignore_invalid_triggers = true;
        }
        Ok(self)
    }

    /// Add a guard run before every triggered change. Returning `false`
    /// cancels the change; forced changes run it but ignore the result.
    pub fn before_all<F>(mut self, guard: F) -> Self
    where
        F: Fn(&mut Event<'_, M, T>) -> bool + 'static,
    {
        self.definition.before_all.push(Guard::new(guard));
        self
    }

    /// Add a callback to the `before_all` chain that never cancels.
    pub fn before_all_run<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut Event<'_, M, T>) + 'static,
    {
        self.definition.before_all.push(Guard::observe(callback));
        self
    }

    pub fn before_all_fn<F>(mut self, callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.definition.before_all.push(Guard::from_fn(callback));
        self
    }

    /// Add a callback run after every completed change.
    pub fn after_all<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut Event<'_, M, T>) + 'static,
    {
        self.definition.after_all.push(Action::new(callback));
        self
    }

    pub fn after_all_fn<F>(mut self, callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.definition.after_all.push(Action::from_fn(callback));
        self
    }

    /// Declare a transition from each of `sources` to `destination`.
    ///
    /// All states must be accessible. Finish with
    /// [`TransitionBuilder::build`] to register it.
    pub fn transition<I, K>(
        self,
        trigger: T,
        sources: I,
        destination: impl std::borrow::Borrow<M::Key>,
    ) -> Result<TransitionBuilder<M, T>, BuildError>
    where
        I: IntoIterator<Item = K>,
        K: std::borrow::Borrow<M::Key>,
    {
        let sources = self.resolve_sources(sources)?;
        let destination = self.resolve_accessible(destination.borrow())?;
        Ok(TransitionBuilder::new(
            self,
            Transition::new(trigger, sources, Some(destination), TransitionKind::Normal),
        ))
    }

    /// Declare a transition that runs its callbacks without leaving the
    /// current state.
    pub fn internal_transition<I, K>(
        self,
        trigger: T,
        sources: I,
    ) -> Result<TransitionBuilder<M, T>, BuildError>
    where
        I: IntoIterator<Item = K>,
        K: std::borrow::Borrow<M::Key>,
    {
        let sources = self.resolve_sources(sources)?;
        Ok(TransitionBuilder::new(
            self,
            Transition::new(trigger, sources, None, TransitionKind::Internal),
        ))
    }

    /// Declare a transition that exits and re-enters the current state.
    pub fn reflexive_transition<I, K>(
        self,
        trigger: T,
        sources: I,
    ) -> Result<TransitionBuilder<M, T>, BuildError>
    where
        I: IntoIterator<Item = K>,
        K: std::borrow::Borrow<M::Key>,
    {
        let sources = self.resolve_sources(sources)?;
        Ok(TransitionBuilder::new(
            self,
            Transition::new(trigger, sources, None, TransitionKind::Reflexive),
        ))
    }

    /// Freeze the configuration into a machine sitting in `initial`.
    ///
    /// No callbacks run: the machine starts out in `initial` rather than
    /// entering it.
    pub fn build(self, initial: impl std::borrow::Borrow<M::Key>) -> Result<Machine<M, T>, BuildError> {
        let initial = self.resolve_accessible(initial.borrow())?;
        Ok(Machine::new(self.definition, initial))
    }

    /// Store a finished transition and index it under each source state.
    /// A (state, trigger) pair keeps the first transition registered for it.
    pub(crate) fn register(mut self, transition: Transition<M, T>) -> Self {
        let index = self.definition.transitions.len();
        for &source in &transition.sources {
            self.definition
                .graph
                .node_mut(source)
                .transitions
                .entry(transition.trigger.clone())
                .or_insert(index);
        }
        self.definition.transitions.push(transition);
        self
    }

    fn resolve(&self, key: &M::Key) -> Result<StateId, BuildError> {
        self.definition
            .graph
            .map
            .resolve(key)
            .ok_or_else(|| BuildError::UnknownState(M::describe(key)))
    }

    fn resolve_accessible(&self, key: &M::Key) -> Result<StateId, BuildError> {
        let id = self.resolve(key)?;
        if !self.definition.graph.node(id).accessible {
            return Err(BuildError::InaccessibleState(
                self.definition.graph.full_name(id),
            ));
        }
        Ok(id)
    }

    fn resolve_sources<I, K>(&self, sources: I) -> Result<Vec<StateId>, BuildError>
    where
        I: IntoIterator<Item = K>,
        K: std::borrow::Borrow<M::Key>,
    {
        let sources = sources
            .into_iter()
            .map(|source| self.resolve_accessible(source.borrow()))
            .collect::<Result<Vec<_>, _>>()?;
        if sources.is_empty() {
            return Err(BuildError::EmptySources);
        }
        Ok(sources)
    }
}
