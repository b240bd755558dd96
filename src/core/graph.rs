//! Arena of state nodes.
//!
//! States form a tree through parent links only. Every traversal the machine
//! needs (exit chains, enter chains, lineage checks, full names) walks upward,
//! so nodes never point at their children.

use super::action::Actions;
use super::map::StateMap;
use super::path;
use crate::machine::Trigger;
use std::collections::HashMap;
use std::fmt;

/// Index of a state inside its machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub(crate) usize);

impl StateId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Shape of a state as produced by a state backend, before any callbacks
/// are attached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct StateSpec {
    pub name: String,
    pub parent: Option<StateId>,
    pub accessible: bool,
    pub ignore_invalid_triggers: bool,
}

pub(crate) struct StateNode<M: StateMap, T: Trigger> {
    pub name: String,
    pub parent: Option<StateId>,
    pub accessible: bool,
    pub ignore_invalid_triggers: bool,
    pub on_enter: Actions<M, T>,
    pub on_exit: Actions<M, T>,
    /// Trigger to index into the machine's transition list. First insert wins.
    pub transitions: HashMap<T, usize>,
}

impl<M: StateMap, T: Trigger> StateNode<M, T> {
    fn from_spec(spec: StateSpec) -> Self {
        Self {
            name: spec.name,
            parent: spec.parent,
            accessible: spec.accessible,
            ignore_invalid_triggers: spec.ignore_invalid_triggers,
            on_enter: Actions::new(),
            on_exit: Actions::new(),
            transitions: HashMap::new(),
        }
    }
}

pub(crate) struct StateGraph<M: StateMap, T: Trigger> {
    pub map: M,
    pub nodes: Vec<StateNode<M, T>>,
}

impl<M: StateMap, T: Trigger> StateGraph<M, T> {
    pub fn new(map: M, specs: Vec<StateSpec>) -> Self {
        Self {
            map,
            nodes: specs.into_iter().map(StateNode::from_spec).collect(),
        }
    }

    pub fn node(&self, id: StateId) -> &StateNode<M, T> {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: StateId) -> &mut StateNode<M, T> {
        &mut self.nodes[id.0]
    }

    pub fn get(&self, id: StateId) -> StateRef<'_, M, T> {
        StateRef { graph: self, id }
    }

    /// Walk from `id` up to its root ancestor, `id` first.
    pub fn lineage(&self, id: StateId) -> Lineage<'_, M, T> {
        Lineage {
            graph: self,
            next: Some(id),
        }
    }

    pub fn in_lineage(&self, child: StateId, ancestor: StateId) -> bool {
        self.lineage(child).any(|id| id == ancestor)
    }

    pub fn full_name(&self, id: StateId) -> String {
        let mut names: Vec<&str> = self
            .lineage(id)
            .map(|id| self.node(id).name.as_str())
            .collect();
        names.reverse();
        path::join(names)
    }

    pub fn ids(&self) -> impl Iterator<Item = StateId> {
        (0..self.nodes.len()).map(StateId)
    }
}

pub(crate) struct Lineage<'a, M: StateMap, T: Trigger> {
    graph: &'a StateGraph<M, T>,
    next: Option<StateId>,
}

impl<M: StateMap, T: Trigger> Iterator for Lineage<'_, M, T> {
    type Item = StateId;

    fn next(&mut self) -> Option<StateId> {
        let current = self.next?;
        self.next = self.graph.node(current).parent;
        Some(current)
    }
}

/// Read-only view of one state of a machine.
pub struct StateRef<'a, M: StateMap, T: Trigger> {
    graph: &'a StateGraph<M, T>,
    id: StateId,
}

impl<'a, M: StateMap, T: Trigger> StateRef<'a, M, T> {
    pub fn id(&self) -> StateId {
        self.id
    }

    /// Leaf name, without any ancestor names.
    pub fn name(&self) -> &'a str {
        &self.graph.node(self.id).name
    }

    pub fn parent(&self) -> Option<StateRef<'a, M, T>> {
        self.graph
            .node(self.id)
            .parent
            .map(|id| self.graph.get(id))
    }

    /// Whether the machine may enter this state directly.
    pub fn is_accessible(&self) -> bool {
        self.graph.node(self.id).accessible
    }

    /// Per-state flag; OR-ed with the machine-wide setting on a miss.
    pub fn ignores_invalid_triggers(&self) -> bool {
        self.graph.node(self.id).ignore_invalid_triggers
    }

    pub fn full_name(&self) -> String {
        self.graph.full_name(self.id)
    }

    /// The caller-facing identifier for this state.
    pub fn key(&self) -> M::Owned {
        self.graph.map.key_of(self.id)
    }

    /// True if `ancestor` is this state or one of its ancestors.
    pub fn is_in(&self, ancestor: &StateRef<'_, M, T>) -> bool {
        in_lineage(self, ancestor)
    }
}

impl<M: StateMap, T: Trigger> Clone for StateRef<'_, M, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: StateMap, T: Trigger> Copy for StateRef<'_, M, T> {}

impl<M: StateMap, T: Trigger> PartialEq for StateRef<'_, M, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.graph, other.graph) && self.id == other.id
    }
}

impl<M: StateMap, T: Trigger> Eq for StateRef<'_, M, T> {}

impl<M: StateMap, T: Trigger> fmt::Debug for StateRef<'_, M, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateRef")
            .field("id", &self.id)
            .field("full_name", &self.full_name())
            .field("accessible", &self.is_accessible())
            .finish()
    }
}

impl<M: StateMap, T: Trigger> fmt::Display for StateRef<'_, M, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

/// Names from the outermost ancestor down to `state`, joined by
/// [`SEPARATOR`](super::path::SEPARATOR).
pub fn full_name<M: StateMap, T: Trigger>(state: &StateRef<'_, M, T>) -> String {
    state.full_name()
}

/// Walk parents upward from `child`; true once `ancestor` is reached.
///
/// A state is in its own lineage. States of different machines never are.
pub fn in_lineage<M: StateMap, T: Trigger>(
    child: &StateRef<'_, M, T>,
    ancestor: &StateRef<'_, M, T>,
) -> bool {
    std::ptr::eq(child.graph, ancestor.graph) && child.graph.in_lineage(child.id, ancestor.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::map::StringStates;

    fn graph(paths: &[&str]) -> StateGraph<StringStates, &'static str> {
        let (map, specs) = StringStates::from_paths(paths.iter().copied()).unwrap();
        StateGraph::new(map, specs)
    }

    fn id(graph: &StateGraph<StringStates, &'static str>, path: &str) -> StateId {
        graph.map.resolve(path).unwrap()
    }

    #[test]
    fn lineage_walks_leaf_to_root() {
        let g = graph(&["A/B/C"]);
        let names: Vec<&str> = g
            .lineage(id(&g, "A/B/C"))
            .map(|id| g.node(id).name.as_str())
            .collect();
        assert_eq!(names, vec!["C", "B", "A"]);
    }

    #[test]
    fn full_name_joins_root_to_leaf() {
        let g = graph(&["A/B/C", "X"]);
        assert_eq!(g.full_name(id(&g, "A/B/C")), "A/B/C");
        assert_eq!(g.full_name(id(&g, "A/B")), "A/B");
        assert_eq!(g.full_name(id(&g, "X")), "X");
    }

    #[test]
    fn state_is_in_own_lineage() {
        let g = graph(&["A/B"]);
        let b = g.get(id(&g, "A/B"));
        assert!(in_lineage(&b, &b));
    }

    #[test]
    fn lineage_reaches_distant_ancestors_only() {
        let g = graph(&["A/B/C", "A/D"]);
        let c = g.get(id(&g, "A/B/C"));
        let a = g.get(id(&g, "A"));
        let d = g.get(id(&g, "A/D"));

        assert!(c.is_in(&a));
        assert!(!a.is_in(&c));
        assert!(!c.is_in(&d));
    }

    #[test]
    fn implied_ancestors_are_inaccessible() {
        let g = graph(&["A/B"]);
        let b = g.get(id(&g, "A/B"));
        let a = b.parent().unwrap();

        assert_eq!(a.name(), "A");
        assert!(!a.is_accessible());
        assert!(b.is_accessible());
        assert!(a.parent().is_none());
    }

    #[test]
    fn state_ref_displays_full_name() {
        let g = graph(&["A/B"]);
        assert_eq!(g.get(id(&g, "A/B")).to_string(), "A/B");
    }
}
