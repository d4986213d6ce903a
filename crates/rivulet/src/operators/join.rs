//! Shared bookkeeping behind `combine_latest` and `fork_join`.
//!
//! Every input writes into its own typed [`Slot`]; the [`Join`] only tracks
//! which inputs have produced a value and which are still running, and asks
//! a snapshot closure to assemble the composite value from the slots.

use core::cell::RefCell;
use std::rc::Rc;

use crate::{Observable, Observer, StreamError, Subscriber, Subscription, Teardown};

/// The latest value an input produced.
pub(crate) struct Slot<T>(Rc<RefCell<Option<T>>>);

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> Slot<T> {
    pub(crate) fn new() -> Self {
        Self(Rc::new(RefCell::new(None)))
    }

    fn set(&self, value: T) {
        *self.0.borrow_mut() = Some(value);
    }

    pub(crate) fn take(&self) -> Option<T> {
        self.0.borrow_mut().take()
    }
}

impl<T: Clone> Slot<T> {
    pub(crate) fn get(&self) -> Option<T> {
        self.0.borrow().clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum JoinMode {
    /// Emit on every input value once all inputs have one.
    Latest,
    /// Emit once, after every input completed.
    Final,
}

struct JoinState {
    seen: Vec<bool>,
    /// Inputs that have not produced a value yet.
    missing: usize,
    /// Inputs that have not completed yet.
    active: usize,
    subscriptions: Vec<Subscription>,
    done: bool,
}

pub(crate) struct Join<Out> {
    mode: JoinMode,
    downstream: Subscriber<Out>,
    snapshot: Box<dyn Fn() -> Option<Out>>,
    state: RefCell<JoinState>,
}

impl<Out: 'static> Join<Out> {
    pub(crate) fn new(
        mode: JoinMode,
        inputs: usize,
        downstream: Subscriber<Out>,
        snapshot: impl Fn() -> Option<Out> + 'static,
    ) -> Rc<Self> {
        Rc::new(Self {
            mode,
            downstream,
            snapshot: Box::new(snapshot),
            state: RefCell::new(JoinState {
                seen: vec![false; inputs],
                missing: inputs,
                active: inputs,
                subscriptions: Vec::with_capacity(inputs),
                done: false,
            }),
        })
    }

    /// Subscribes input `index`. Inputs after a synchronous failure are never
    /// subscribed.
    pub(crate) fn attach<T: 'static>(
        self: &Rc<Self>,
        index: usize,
        source: &Observable<T>,
        slot: Slot<T>,
    ) {
        if self.state.borrow().done {
            return;
        }
        let subscription = source.subscribe(JoinObserver {
            index,
            slot,
            join: Rc::clone(self),
        });
        let mut state = self.state.borrow_mut();
        if state.done {
            drop(state);
            subscription.unsubscribe();
        } else {
            state.subscriptions.push(subscription);
        }
    }

    /// Settles the zero-input case and hands back the cleanup that cancels
    /// every input.
    pub(crate) fn start(self: &Rc<Self>) -> Teardown {
        self.try_finish();
        let join = Rc::clone(self);
        Teardown::new(move || join.cancel())
    }

    fn on_next(&self, index: usize) {
        let emit = {
            let mut state = self.state.borrow_mut();
            if state.done {
                return;
            }
            if !state.seen[index] {
                state.seen[index] = true;
                state.missing -= 1;
            }
            self.mode == JoinMode::Latest && state.missing == 0
        };
        if emit {
            if let Some(out) = (self.snapshot)() {
                self.downstream.next(out);
            }
        }
    }

    fn on_complete(&self) {
        {
            let mut state = self.state.borrow_mut();
            if state.done {
                return;
            }
            state.active -= 1;
        }
        self.try_finish();
    }

    fn on_error(&self, err: StreamError) {
        let siblings = {
            let mut state = self.state.borrow_mut();
            if state.done {
                return;
            }
            state.done = true;
            core::mem::take(&mut state.subscriptions)
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(%err, siblings = siblings.len(), "join input failed");
        for sibling in siblings {
            sibling.unsubscribe();
        }
        self.downstream.error(err);
    }

    fn try_finish(&self) {
        let ready = {
            let mut state = self.state.borrow_mut();
            let ready = !state.done
                && state.active == 0
                && (self.mode == JoinMode::Final || state.missing == 0);
            if ready {
                state.done = true;
            }
            ready
        };
        if !ready {
            return;
        }
        if self.mode == JoinMode::Final {
            if let Some(out) = (self.snapshot)() {
                self.downstream.next(out);
            }
        }
        self.downstream.complete();
    }

    fn cancel(&self) {
        let subscriptions = {
            let mut state = self.state.borrow_mut();
            state.done = true;
            core::mem::take(&mut state.subscriptions)
        };
        for subscription in subscriptions {
            subscription.unsubscribe();
        }
    }
}

struct JoinObserver<T, Out> {
    index: usize,
    slot: Slot<T>,
    join: Rc<Join<Out>>,
}

impl<T, Out: 'static> Observer<T> for JoinObserver<T, Out> {
    fn next(&mut self, value: T) {
        self.slot.set(value);
        self.join.on_next(self.index);
    }

    fn error(&mut self, err: StreamError) {
        self.join.on_error(err);
    }

    fn complete(&mut self) {
        self.join.on_complete();
    }
}
