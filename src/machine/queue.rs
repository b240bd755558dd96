//! Deferred requests issued while a state change is in progress.
//!
//! Each executing request owns a frame. Requests made from its callbacks land
//! in that frame and run, in order, once it completes; each of those drains
//! its own frame before the next one starts.

use super::event::Args;
use crate::core::StateId;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

pub(crate) enum Request<T> {
    Trigger { trigger: T, args: Args },
    ForceTo { state: StateId, args: Args },
}

/// Busy flag plus a stack of FIFO frames, one per executing request.
pub(crate) struct RequestQueue<T> {
    busy: Cell<bool>,
    frames: RefCell<Vec<VecDeque<Request<T>>>>,
}

impl<T> RequestQueue<T> {
    pub fn new() -> Self {
        Self {
            busy: Cell::new(false),
            frames: RefCell::new(Vec::new()),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    /// Requests waiting in every open frame.
    pub fn len(&self) -> usize {
        self.frames.borrow().iter().map(VecDeque::len).sum()
    }

    /// Queue `request` behind the others issued by the executing request.
    pub fn enqueue(&self, request: Request<T>) {
        let mut frames = self.frames.borrow_mut();
        match frames.last_mut() {
            Some(frame) => frame.push_back(request),
            None => frames.push(VecDeque::from([request])),
        }
    }

    /// Start collecting the requests of a request about to execute.
    pub fn open_frame(&self) {
        self.frames.borrow_mut().push(VecDeque::new());
    }

    /// Take the requests collected since the matching `open_frame`.
    pub fn close_frame(&self) -> VecDeque<Request<T>> {
        self.frames.borrow_mut().pop().unwrap_or_default()
    }

    /// Mark the machine busy, or return `None` if it already is.
    pub fn acquire(&self) -> Option<BusyGuard<'_, T>> {
        if self.busy.replace(true) {
            return None;
        }
        Some(BusyGuard { queue: self })
    }
}

/// Clears the busy flag and any leftover requests when dropped, including
/// when a callback panics.
pub(crate) struct BusyGuard<'a, T> {
    queue: &'a RequestQueue<T>,
}

impl<T> Drop for BusyGuard<'_, T> {
    fn drop(&mut self) {
        self.queue.frames.borrow_mut().clear();
        self.queue.busy.set(false);
    }
}
