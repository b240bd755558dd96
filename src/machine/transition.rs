//! Transitions between states.

use crate::core::{Actions, Guards, StateId, StateMap};
use std::fmt::{self, Debug};
use std::hash::Hash;

/// Token that selects a transition from the current state.
///
/// Any equatable, hashable, cloneable value qualifies: string slices, owned
/// strings and plain enums are the usual choices.
pub trait Trigger: Eq + Hash + Clone + Debug + 'static {}

impl<T: Eq + Hash + Clone + Debug + 'static> Trigger for T {}

/// How a transition affects the current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// Leaves the source state and enters the destination.
    Normal,

    /// No state change; enter and exit callbacks do not run.
    Internal,

    /// Leaves and re-enters the source state, running its exit and enter
    /// callbacks.
    Reflexive,
}

/// An edge from a set of source states, with its own callback chains.
///
/// Transitions are created through the builder and never change afterwards.
pub struct Transition<M: StateMap, T: Trigger> {
    pub(crate) trigger: T,
    pub(crate) sources: Vec<StateId>,
    pub(crate) destination: Option<StateId>,
    pub(crate) kind: TransitionKind,
    pub(crate) before: Guards<M, T>,
    pub(crate) after: Actions<M, T>,
}

impl<M: StateMap, T: Trigger> Transition<M, T> {
    pub(crate) fn new(
        trigger: T,
        sources: Vec<StateId>,
        destination: Option<StateId>,
        kind: TransitionKind,
    ) -> Self {
        Self {
            trigger,
            sources,
            destination,
            kind,
            before: Guards::new(),
            after: Actions::new(),
        }
    }

    pub fn trigger(&self) -> &T {
        &self.trigger
    }

    pub fn kind(&self) -> TransitionKind {
        self.kind
    }

    pub fn is_internal(&self) -> bool {
        self.kind == TransitionKind::Internal
    }

    pub fn is_reflexive(&self) -> bool {
        self.kind == TransitionKind::Reflexive
    }

    pub fn sources(&self) -> &[StateId] {
        &self.sources
    }

    /// Declared destination; `None` for internal and reflexive transitions.
    pub fn destination(&self) -> Option<StateId> {
        self.destination
    }

    /// Where the machine ends up when this transition fires from `current`.
    pub fn destination_from(&self, current: StateId) -> StateId {
        self.destination.unwrap_or(current)
    }

    /// Check whether this transition answers `trigger` from `current`.
    pub fn can_execute(&self, trigger: &T, current: StateId) -> bool {
        self.trigger == *trigger && self.sources.contains(&current)
    }
}

impl<M: StateMap, T: Trigger> Debug for Transition<M, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("trigger", &self.trigger)
            .field("kind", &self.kind)
            .field("sources", &self.sources)
            .field("destination", &self.destination)
            .field("before", &self.before.len())
            .field("after", &self.after.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StringStates;

    fn transition(
        sources: &[usize],
        destination: Option<usize>,
        kind: TransitionKind,
    ) -> Transition<StringStates, &'static str> {
        Transition::new(
            "go",
            sources.iter().map(|&i| StateId(i)).collect(),
            destination.map(StateId),
            kind,
        )
    }

    #[test]
    fn can_execute_matches_trigger_and_source() {
        let t = transition(&[0, 1], Some(2), TransitionKind::Normal);

        assert!(t.can_execute(&"go", StateId(0)));
        assert!(t.can_execute(&"go", StateId(1)));
        assert!(!t.can_execute(&"go", StateId(2)));
        assert!(!t.can_execute(&"stop", StateId(0)));
    }

    #[test]
    fn normal_transition_moves_to_destination() {
        let t = transition(&[0], Some(2), TransitionKind::Normal);
        assert_eq!(t.destination_from(StateId(0)), StateId(2));
        assert!(!t.is_internal());
        assert!(!t.is_reflexive());
    }

    #[test]
    fn internal_and_reflexive_stay_in_source() {
        let internal = transition(&[0, 1], None, TransitionKind::Internal);
        let reflexive = transition(&[0, 1], None, TransitionKind::Reflexive);

        assert_eq!(internal.destination_from(StateId(1)), StateId(1));
        assert_eq!(reflexive.destination_from(StateId(0)), StateId(0));
        assert!(internal.is_internal());
        assert!(reflexive.is_reflexive());
        assert_eq!(internal.destination(), None);
    }
}
