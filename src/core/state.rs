//! State capability for enum-backed machines.
//!
//! A closed enumeration implements [`State`] and each constant becomes one
//! state of the machine. Parents, accessibility and the invalid-trigger flag
//! are fixed by the enum's own method bodies.

use super::map::EnumStates;
use crate::machine::{Event, Trigger};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for enum-backed states.
///
/// # Required Traits
///
/// - `Copy` + `Eq` + `Hash`: constants double as lookup keys
/// - `Debug`: constants appear in error messages
///
/// # Example
///
/// ```rust
/// use hfsm::core::State;
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum Door {
///     Closed,
///     Open,
///     Locked,
/// }
///
/// impl State for Door {
///     fn variants() -> &'static [Self] {
///         &[Self::Closed, Self::Open, Self::Locked]
///     }
///
///     fn name(&self) -> &str {
///         match self {
///             Self::Closed => "Closed",
///             Self::Open => "Open",
///             Self::Locked => "Locked",
///         }
///     }
///
///     fn parent(&self) -> Option<Self> {
///         match self {
///             Self::Locked => Some(Self::Closed),
///             _ => None,
///         }
///     }
/// }
///
/// assert_eq!(Door::Locked.parent(), Some(Door::Closed));
/// assert!(Door::Open.is_accessible());
/// ```
pub trait State: Copy + Eq + Hash + Debug + 'static {
    /// Every constant of the enumeration, in declaration order.
    fn variants() -> &'static [Self];

    /// Leaf name. Must not contain the path separator.
    fn name(&self) -> &str;

    /// Enclosing state, if any. Parent chains must not loop.
    fn parent(&self) -> Option<Self> {
        None
    }

    /// Whether the machine may enter this state directly.
    ///
    /// Default implementation returns `true`.
    fn is_accessible(&self) -> bool {
        true
    }

    /// Return `false` from `trigger` instead of failing when no transition
    /// matches while in this state.
    ///
    /// Default implementation returns `false`.
    fn ignore_invalid_triggers(&self) -> bool {
        false
    }

    /// Called when this state, or any state nested in it, is entered.
    fn on_enter<T: Trigger>(&self, _event: &mut Event<'_, EnumStates<Self>, T>) {}

    /// Called when this state, or any state nested in it, is exited.
    fn on_exit<T: Trigger>(&self, _event: &mut Event<'_, EnumStates<Self>, T>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum TestState {
        Root,
        Idle,
        Running,
        Hidden,
    }

    impl State for TestState {
        fn variants() -> &'static [Self] {
            &[Self::Root, Self::Idle, Self::Running, Self::Hidden]
        }

        fn name(&self) -> &str {
            match self {
                Self::Root => "Root",
                Self::Idle => "Idle",
                Self::Running => "Running",
                Self::Hidden => "Hidden",
            }
        }

        fn parent(&self) -> Option<Self> {
            match self {
                Self::Idle | Self::Running => Some(Self::Root),
                _ => None,
            }
        }

        fn is_accessible(&self) -> bool {
            !matches!(self, Self::Root | Self::Hidden)
        }

        fn ignore_invalid_triggers(&self) -> bool {
            matches!(self, Self::Idle)
        }
    }

    #[test]
    fn state_name_returns_correct_value() {
        assert_eq!(TestState::Root.name(), "Root");
        assert_eq!(TestState::Idle.name(), "Idle");
        assert_eq!(TestState::Running.name(), "Running");
    }

    #[test]
    fn parent_describes_nesting() {
        assert_eq!(TestState::Idle.parent(), Some(TestState::Root));
        assert_eq!(TestState::Running.parent(), Some(TestState::Root));
        assert_eq!(TestState::Root.parent(), None);
    }

    #[test]
    fn accessibility_is_per_variant() {
        assert!(!TestState::Root.is_accessible());
        assert!(!TestState::Hidden.is_accessible());
        assert!(TestState::Idle.is_accessible());
    }

    #[test]
    fn ignore_flag_defaults_to_false() {
        assert!(TestState::Idle.ignore_invalid_triggers());
        assert!(!TestState::Running.ignore_invalid_triggers());
    }

    #[test]
    fn variants_lists_every_constant() {
        assert_eq!(TestState::variants().len(), 4);
    }
}
