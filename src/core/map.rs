//! Mapping between caller-facing state identifiers and arena indices.
//!
//! Two backends exist: [`StringStates`] resolves slash-delimited paths through a
//! hash map, and [`EnumStates`] maps each constant of a closed enumeration to
//! its own state.

use super::graph::{StateId, StateSpec};
use super::path::{self, PathError, SEPARATOR};
use super::state::State;
use crate::builder::BuildError;
use std::collections::HashMap;
use std::fmt::Debug;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

mod sealed {
    pub trait Sealed {}
}

/// Translates state identifiers to and from the machine's internal indices.
///
/// Implemented only by [`StringStates`] and [`EnumStates`].
pub trait StateMap: sealed::Sealed + Sized + 'static {
    /// Identifier accepted by lookups (`str` for paths, the enum itself otherwise).
    type Key: ?Sized;

    /// Identifier handed back to callers.
    type Owned: Clone + Debug + PartialEq;

    fn resolve(&self, key: &Self::Key) -> Option<StateId>;

    fn key_of(&self, id: StateId) -> Self::Owned;

    /// Human-readable form of a key for error messages.
    fn describe(key: &Self::Key) -> String;
}

/// States declared as slash-delimited paths.
#[derive(Debug, Clone)]
pub struct StringStates {
    by_path: HashMap<String, StateId>,
    paths: Vec<String>,
}

impl StringStates {
    /// Decompose `paths` into a state tree.
    ///
    /// Every implied ancestor becomes an inaccessible state unless it is also
    /// declared on its own. All malformed and duplicate paths are reported
    /// together.
    pub(crate) fn from_paths<I, P>(paths: I) -> Result<(Self, Vec<StateSpec>), BuildError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let mut states = StringStates {
            by_path: HashMap::new(),
            paths: Vec::new(),
        };
        let mut specs = Vec::new();
        let mut checks: Vec<Validation<(), NonEmptyVec<PathError>>> = Vec::new();

        for declared in paths {
            let check = match states.declare(declared.as_ref(), &mut specs) {
                Ok(()) => Validation::success(()),
                Err(err) => Validation::fail(err),
            };
            checks.push(check);
        }

        if checks.is_empty() {
            return Err(BuildError::NoStates);
        }

        match Validation::all_vec(checks) {
            Validation::Success(_) => Ok((states, specs)),
            Validation::Failure(errors) => {
                Err(BuildError::InvalidPaths(errors.iter().cloned().collect()))
            }
        }
    }

    fn declare(&mut self, full: &str, specs: &mut Vec<StateSpec>) -> Result<(), PathError> {
        path::validate(full)?;

        let mut last = None;
        for prefix in path::lineage(full) {
            let id = match self.by_path.get(prefix) {
                Some(&id) => id,
                None => {
                    let id = StateId(specs.len());
                    specs.push(StateSpec {
                        name: path::leaf(prefix).to_string(),
                        parent: last,
                        accessible: false,
                        ignore_invalid_triggers: false,
                    });
                    self.by_path.insert(prefix.to_string(), id);
                    self.paths.push(prefix.to_string());
                    id
                }
            };
            last = Some(id);
        }

        let Some(leaf) = last else {
            return Err(PathError::Empty);
        };
        let spec = &mut specs[leaf.0];
        if spec.accessible {
            return Err(PathError::Duplicate {
                path: full.to_string(),
            });
        }
        spec.accessible = true;
        Ok(())
    }
}

impl sealed::Sealed for StringStates {}

impl StateMap for StringStates {
    type Key = str;
    type Owned = String;

    fn resolve(&self, key: &str) -> Option<StateId> {
        self.by_path.get(key).copied()
    }

    fn key_of(&self, id: StateId) -> String {
        self.paths[id.0].clone()
    }

    fn describe(key: &str) -> String {
        key.to_string()
    }
}

/// States drawn one-to-one from an enum implementing [`State`].
#[derive(Debug, Clone)]
pub struct EnumStates<E: State> {
    ids: HashMap<E, StateId>,
    variants: Vec<E>,
}

impl<E: State> EnumStates<E> {
    pub(crate) fn from_variants() -> Result<(Self, Vec<StateSpec>), BuildError> {
        let variants = E::variants().to_vec();
        if variants.is_empty() {
            return Err(BuildError::NoStates);
        }

        let mut ids = HashMap::with_capacity(variants.len());
        for (index, variant) in variants.iter().enumerate() {
            let name = variant.name();
            if name.is_empty() || name.contains(SEPARATOR) {
                return Err(BuildError::InvalidStateName(name.to_string()));
            }
            if ids.insert(*variant, StateId(index)).is_some() {
                return Err(BuildError::DuplicateState(format!("{variant:?}")));
            }
        }

        let mut specs = Vec::with_capacity(variants.len());
        for variant in &variants {
            let parent = match variant.parent() {
                Some(parent) => Some(
                    *ids.get(&parent)
                        .ok_or_else(|| BuildError::UnknownState(format!("{parent:?}")))?,
                ),
                None => None,
            };
            specs.push(StateSpec {
                name: variant.name().to_string(),
                parent,
                accessible: variant.is_accessible(),
                ignore_invalid_triggers: variant.ignore_invalid_triggers(),
            });
        }

        // A parent chain longer than the number of states must revisit one.
        for (index, variant) in variants.iter().enumerate() {
            let mut next = specs[index].parent;
            let mut steps = 0;
            while let Some(id) = next {
                steps += 1;
                if steps > variants.len() {
                    return Err(BuildError::ParentCycle(format!("{variant:?}")));
                }
                next = specs[id.0].parent;
            }
        }

        Ok((EnumStates { ids, variants }, specs))
    }
}

impl<E: State> sealed::Sealed for EnumStates<E> {}

impl<E: State> StateMap for EnumStates<E> {
    type Key = E;
    type Owned = E;

    fn resolve(&self, key: &E) -> Option<StateId> {
        self.ids.get(key).copied()
    }

    fn key_of(&self, id: StateId) -> E {
        self.variants[id.0]
    }

    fn describe(key: &E) -> String {
        format!("{key:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_create_implied_ancestors() {
        let (states, specs) = StringStates::from_paths(["A/B/C", "X"]).unwrap();

        assert_eq!(specs.len(), 4);
        for path in ["A", "A/B", "A/B/C", "X"] {
            assert!(states.resolve(path).is_some(), "missing {path}");
        }

        let a = states.resolve("A").unwrap();
        let b = states.resolve("A/B").unwrap();
        let c = states.resolve("A/B/C").unwrap();
        assert!(!specs[a.0].accessible);
        assert!(!specs[b.0].accessible);
        assert!(specs[c.0].accessible);
        assert_eq!(specs[c.0].parent, Some(b));
        assert_eq!(specs[b.0].parent, Some(a));
        assert_eq!(specs[a.0].parent, None);
    }

    #[test]
    fn declaring_an_ancestor_makes_it_accessible() {
        let (states, specs) = StringStates::from_paths(["A/B", "A"]).unwrap();
        let a = states.resolve("A").unwrap();
        assert!(specs[a.0].accessible);
        assert_eq!(specs.len(), 2);
    }

    #[test]
    fn ancestor_declared_first_is_reused() {
        let (states, specs) = StringStates::from_paths(["A", "A/B"]).unwrap();
        let a = states.resolve("A").unwrap();
        let b = states.resolve("A/B").unwrap();
        assert_eq!(specs[b.0].parent, Some(a));
        assert!(specs[a.0].accessible);
    }

    #[test]
    fn duplicates_are_rejected() {
        let result = StringStates::from_paths(["A", "B", "A"]);
        match result {
            Err(BuildError::InvalidPaths(errors)) => {
                assert_eq!(
                    errors,
                    vec![PathError::Duplicate {
                        path: "A".to_string()
                    }]
                );
            }
            other => panic!("expected duplicate error, got {other:?}"),
        }
    }

    #[test]
    fn all_bad_paths_are_reported() {
        let result = StringStates::from_paths(["A//B", "C", "C", ""]);
        match result {
            Err(BuildError::InvalidPaths(errors)) => {
                assert_eq!(errors.len(), 3);
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, PathError::EmptySegment { .. })));
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, PathError::Duplicate { .. })));
                assert!(errors.iter().any(|e| matches!(e, PathError::Empty)));
            }
            other => panic!("expected path errors, got {other:?}"),
        }
    }

    #[test]
    fn no_paths_is_an_error() {
        let result = StringStates::from_paths(Vec::<String>::new());
        assert!(matches!(result, Err(BuildError::NoStates)));
    }

    #[test]
    fn key_of_returns_full_path() {
        let (states, _) = StringStates::from_paths(["A/B"]).unwrap();
        let b = states.resolve("A/B").unwrap();
        assert_eq!(states.key_of(b), "A/B");
    }

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum Nested {
        Outer,
        Inner,
    }

    impl State for Nested {
        fn variants() -> &'static [Self] {
            &[Self::Outer, Self::Inner]
        }

        fn name(&self) -> &str {
            match self {
                Self::Outer => "Outer",
                Self::Inner => "Inner",
            }
        }

        fn parent(&self) -> Option<Self> {
            match self {
                Self::Inner => Some(Self::Outer),
                Self::Outer => None,
            }
        }

        fn is_accessible(&self) -> bool {
            matches!(self, Self::Inner)
        }
    }

    #[test]
    fn enum_variants_become_states() {
        let (states, specs) = EnumStates::<Nested>::from_variants().unwrap();
        let outer = states.resolve(&Nested::Outer).unwrap();
        let inner = states.resolve(&Nested::Inner).unwrap();

        assert_eq!(specs[inner.0].parent, Some(outer));
        assert!(!specs[outer.0].accessible);
        assert!(specs[inner.0].accessible);
        assert_eq!(states.key_of(inner), Nested::Inner);
    }

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum Looped {
        Ping,
        Pong,
    }

    impl State for Looped {
        fn variants() -> &'static [Self] {
            &[Self::Ping, Self::Pong]
        }

        fn name(&self) -> &str {
            match self {
                Self::Ping => "Ping",
                Self::Pong => "Pong",
            }
        }

        fn parent(&self) -> Option<Self> {
            match self {
                Self::Ping => Some(Self::Pong),
                Self::Pong => Some(Self::Ping),
            }
        }
    }

    #[test]
    fn enum_parent_cycles_are_rejected() {
        let result = EnumStates::<Looped>::from_variants();
        assert!(matches!(result, Err(BuildError::ParentCycle(_))));
    }

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum Empty {}

    impl State for Empty {
        fn variants() -> &'static [Self] {
            &[]
        }

        fn name(&self) -> &str {
            match *self {}
        }
    }

    #[test]
    fn empty_enum_is_rejected() {
        let result = EnumStates::<Empty>::from_variants();
        assert!(matches!(result, Err(BuildError::NoStates)));
    }

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum Slashed {
        Bad,
    }

    impl State for Slashed {
        fn variants() -> &'static [Self] {
            &[Self::Bad]
        }

        fn name(&self) -> &str {
            "A/B"
        }
    }

    #[test]
    fn enum_names_cannot_contain_separator() {
        let result = EnumStates::<Slashed>::from_variants();
        assert!(matches!(result, Err(BuildError::InvalidStateName(_))));
    }
}
