use core::{
    cell::{Cell, RefCell},
    fmt,
};
use std::{collections::VecDeque, rc::Rc};

use crate::{
    Observer, StreamError,
    observable::subscription::{Dispose, Subscription, Teardown},
};

enum Event<T> {
    Next(T),
    Error(StreamError),
    Complete,
}

impl<T> Event<T> {
    fn is_terminal(&self) -> bool {
        !matches!(self, Self::Next(_))
    }
}

struct Shared<T> {
    /// Set once a terminal event was accepted or the subscription was
    /// cancelled. Nothing is accepted afterwards.
    stopped: Cell<bool>,
    /// Set once the teardowns ran.
    disposed: Cell<bool>,
    /// Set while the destination observer is being called.
    delivering: Cell<bool>,
    pending: RefCell<VecDeque<Event<T>>>,
    destination: RefCell<Option<Box<dyn Observer<T>>>>,
    teardowns: RefCell<Vec<Teardown>>,
}

impl<T> Shared<T> {
    fn push(&self, event: Event<T>) {
        if self.stopped.get() {
            return;
        }
        if event.is_terminal() {
            self.stopped.set(true);
        }
        self.pending.borrow_mut().push_back(event);

        // Reentrant emissions are queued behind the one being delivered.
        if self.delivering.replace(true) {
            return;
        }
        self.drain();
        self.delivering.set(false);

        if self.disposed.get() {
            drop(self.destination.borrow_mut().take());
        }
    }

    fn drain(&self) {
        loop {
            if self.disposed.get() {
                self.pending.borrow_mut().clear();
                return;
            }
            let Some(event) = self.pending.borrow_mut().pop_front() else {
                return;
            };
            let terminal = event.is_terminal();
            if let Some(observer) = self.destination.borrow_mut().as_mut() {
                match event {
                    Event::Next(value) => observer.next(value),
                    Event::Error(err) => observer.error(err),
                    Event::Complete => observer.complete(),
                }
            }
            if terminal {
                self.release();
                return;
            }
        }
    }

    fn add(&self, teardown: Teardown) {
        if teardown.is_none() {
            return;
        }
        if self.disposed.get() {
            teardown.run();
        } else {
            self.teardowns.borrow_mut().push(teardown);
        }
    }

    fn release(&self) {
        if self.disposed.replace(true) {
            return;
        }
        self.stopped.set(true);
        self.pending.borrow_mut().clear();

        let teardowns = core::mem::take(&mut *self.teardowns.borrow_mut());
        for teardown in teardowns {
            teardown.run();
        }

        // While delivering, the running `push` drops the observer on its way
        // out.
        if !self.delivering.get() {
            drop(self.destination.borrow_mut().take());
        }
    }
}

impl<T> Dispose for Shared<T> {
    fn dispose(&self) {
        self.release();
    }

    fn is_disposed(&self) -> bool {
        self.disposed.get()
    }
}

/// The producer-side handle of one subscription.
///
/// A producer receives a [`Subscriber`] and pushes values through it. The
/// subscriber guarantees the observer contract regardless of what the
/// producer does:
///
/// - nothing is delivered after the first `error` or `complete`
/// - nothing is delivered after the subscription was cancelled
/// - an emission made while the observer is still handling a previous one is
///   queued and delivered, in order, right after that callback returns
///
/// Once a terminal event has been delivered, or the subscription is
/// cancelled, every registered [`Teardown`] runs exactly once.
pub struct Subscriber<T> {
    shared: Rc<Shared<T>>,
}

impl<T> Clone for Subscriber<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T> Subscriber<T> {
    pub(crate) fn new(destination: Box<dyn Observer<T>>) -> Self {
        Self {
            shared: Rc::new(Shared {
                stopped: Cell::new(false),
                disposed: Cell::new(false),
                delivering: Cell::new(false),
                pending: RefCell::new(VecDeque::new()),
                destination: RefCell::new(Some(destination)),
                teardowns: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Delivers a value unless the subscription already stopped.
    pub fn next(&self, value: T) {
        self.shared.push(Event::Next(value));
    }

    /// Delivers the terminal failure unless the subscription already stopped.
    pub fn error(&self, err: StreamError) {
        self.shared.push(Event::Error(err));
    }

    /// Delivers completion unless the subscription already stopped.
    pub fn complete(&self) {
        self.shared.push(Event::Complete);
    }

    /// Whether further emissions will be ignored.
    ///
    /// Producers that loop or reschedule themselves should check this to stop
    /// early once the consumer is gone.
    pub fn is_closed(&self) -> bool {
        self.shared.stopped.get()
    }

    /// Registers cleanup to run when this subscription ends. Runs it
    /// immediately if the subscription has already ended.
    pub fn add(&self, teardown: Teardown) {
        self.shared.add(teardown);
    }
}

impl<T: 'static> Subscriber<T> {
    /// A cancellation handle for this subscription.
    pub fn subscription(&self) -> Subscription {
        let target: Rc<dyn Dispose> = self.shared.clone();
        Subscription::new(target)
    }
}

impl<T> Observer<T> for Subscriber<T> {
    fn next(&mut self, value: T) {
        Subscriber::next(self, value);
    }

    fn error(&mut self, err: StreamError) {
        Subscriber::error(self, err);
    }

    fn complete(&mut self) {
        Subscriber::complete(self);
    }
}

impl<T> fmt::Debug for Subscriber<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("closed", &self.is_closed())
            .field("disposed", &self.shared.disposed.get())
            .finish()
    }
}
