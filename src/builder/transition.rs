//! Builder for attaching callbacks to a declared transition.

use crate::builder::machine::Builder;
use crate::core::{Action, Guard, StateMap};
use crate::machine::{Event, Transition, Trigger};

/// Builder returned by [`Builder::transition`] and its siblings.
///
/// Holds the parent builder until [`build`](TransitionBuilder::build)
/// registers the transition and hands it back.
pub struct TransitionBuilder<M: StateMap, T: Trigger> {
    builder: Builder<M, T>,
    transition: Transition<M, T>,
}

impl<M: StateMap, T: Trigger> TransitionBuilder<M, T> {
    pub(crate) fn new(builder: Builder<M, T>, transition: Transition<M, T>) -> Self {
        Self {
            builder,
            transition,
        }
    }

    /// Add a guard predicate. Returning `false` cancels the transition.
    pub fn before<F>(mut self, guard: F) -> Self
    where
        F: Fn(&mut Event<'_, M, T>) -> bool + 'static,
    {
        self.transition.before.push(Guard::new(guard));
        self
    }

    /// Add a `before` callback that never cancels.
    pub fn before_run<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut Event<'_, M, T>) + 'static,
    {
        self.transition.before.push(Guard::observe(callback));
        self
    }

    pub fn before_fn<F>(mut self, callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.transition.before.push(Guard::from_fn(callback));
        self
    }

    /// Add a callback run once the state change has completed.
    pub fn after<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut Event<'_, M, T>) + 'static,
    {
        self.transition.after.push(Action::new(callback));
        self
    }

    pub fn after_fn<F>(mut self, callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.transition.after.push(Action::from_fn(callback));
        self
    }

    /// Register the transition under every source state.
    pub fn build(self) -> Builder<M, T> {
        self.builder.register(self.transition)
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::Builder;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn before_chain_stops_at_first_veto() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (a, b, c) = (Rc::clone(&log), Rc::clone(&log), Rc::clone(&log));

        let machine = Builder::from_paths(["A", "B"])
            .unwrap()
            .transition("go", ["A"], "B")
            .unwrap()
            .before_fn(move || a.borrow_mut().push("observe"))
            .before(move |_| {
                b.borrow_mut().push("veto");
                false
            })
            .before(move |_| {
                c.borrow_mut().push("unreached");
                true
            })
            .build()
            .build("A")
            .unwrap();

        assert_eq!(machine.trigger("go"), Ok(false));
        assert_eq!(*log.borrow(), vec!["observe", "veto"]);
        assert_eq!(machine.state(), "A");
    }

    #[test]
    fn after_callbacks_run_in_declaration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (a, b) = (Rc::clone(&log), Rc::clone(&log));

        let machine = Builder::from_paths(["A", "B"])
            .unwrap()
            .transition("go", ["A"], "B")
            .unwrap()
            .after(move |event| {
                a.borrow_mut()
                    .push(format!("after({})", event.destination().full_name()))
            })
            .after_fn(move || b.borrow_mut().push("done".to_string()))
            .build()
            .build("A")
            .unwrap();

        assert_eq!(machine.trigger("go"), Ok(true));
        assert_eq!(*log.borrow(), vec!["after(B)", "done"]);
    }

    #[test]
    fn one_transition_serves_every_source() {
        let machine = Builder::from_paths(["A", "B", "C"])
            .unwrap()
            .transition("reset", ["B", "C"], "A")
            .unwrap()
            .build()
            .build("C")
            .unwrap();

        assert_eq!(machine.trigger("reset"), Ok(true));
        assert_eq!(machine.state(), "A");
        machine.force_to("B").unwrap();
        assert_eq!(machine.trigger("reset"), Ok(true));
        assert_eq!(machine.state(), "A");
    }
}
