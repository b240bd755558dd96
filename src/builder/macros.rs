//! Macros for ergonomic state machine construction.

/// Generate a [`State`](crate::core::State) implementation for a plain enum.
///
/// Variants become states named after themselves. Optional sections set
/// parents, mark variants inaccessible and turn on the per-state
/// invalid-trigger flag.
///
/// # Example
///
/// ```
/// use hfsm::core::State;
/// use hfsm::state_enum;
///
/// state_enum! {
///     pub enum Player {
///         Stopped,
///         Active,
///         Playing,
///         Paused,
///     }
///     parents: [Playing => Active, Paused => Active]
///     inaccessible: [Active]
///     ignore_invalid_triggers: [Stopped]
/// }
///
/// assert_eq!(Player::Paused.parent(), Some(Player::Active));
/// assert!(!Player::Active.is_accessible());
/// assert!(Player::Stopped.ignore_invalid_triggers());
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(parents: [$($child:ident => $parent:ident),* $(,)?])?
        $(inaccessible: [$($hidden:ident),* $(,)?])?
        $(ignore_invalid_triggers: [$($lenient:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn variants() -> &'static [Self] {
                &[$(Self::$variant),*]
            }

            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            #[allow(unreachable_patterns)]
            fn parent(&self) -> Option<Self> {
                match self {
                    $($(Self::$child => Some(Self::$parent),)*)?
                    _ => None,
                }
            }

            #[allow(unreachable_patterns)]
            fn is_accessible(&self) -> bool {
                match self {
                    $($(Self::$hidden => false,)*)?
                    _ => true,
                }
            }

            #[allow(unreachable_patterns)]
            fn ignore_invalid_triggers(&self) -> bool {
                match self {
                    $($(Self::$lenient => true,)*)?
                    _ => false,
                }
            }
        }
    };
}
