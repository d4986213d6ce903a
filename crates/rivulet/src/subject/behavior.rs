use core::{
    cell::{Cell, RefCell},
    fmt,
};
use std::rc::Rc;

use crate::{Observable, Subscriber, Teardown};

struct SubjectInner<T> {
    value: RefCell<T>,
    observers: RefCell<Vec<(u64, Subscriber<T>)>>,
    next_id: Cell<u64>,
    completed: Cell<bool>,
}

/// A multicast holder of a current value.
///
/// Every subscriber immediately receives the current value, then every value
/// passed to [`BehaviorSubject::next`] while it stays subscribed. The subject
/// never completes on its own; [`BehaviorSubject::complete`] ends it
/// explicitly for present and future subscribers.
///
/// Broadcasts iterate over a snapshot of the subscribers registered when the
/// broadcast started, so subscribing or unsubscribing from inside a callback
/// is safe.
///
/// Clones share the same value and subscriber set.
///
/// # Example
///
/// ```
/// use rivulet::{BehaviorSubject, Recorder};
///
/// let tenant = BehaviorSubject::new(String::from("my-initial-id"));
/// let early = Recorder::new();
/// tenant.as_observable().subscribe(early.clone());
///
/// tenant.next(String::from("my-new-tenant-id"));
///
/// let late = Recorder::new();
/// tenant.as_observable().subscribe(late.clone());
///
/// assert_eq!(early.values(), ["my-initial-id", "my-new-tenant-id"]);
/// assert_eq!(late.values(), ["my-new-tenant-id"]);
/// ```
pub struct BehaviorSubject<T> {
    inner: Rc<SubjectInner<T>>,
}

impl<T> Clone for BehaviorSubject<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + 'static> BehaviorSubject<T> {
    /// Creates a subject holding `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            inner: Rc::new(SubjectInner {
                value: RefCell::new(initial),
                observers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                completed: Cell::new(false),
            }),
        }
    }

    /// A copy of the current value.
    pub fn value(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Number of live subscribers.
    pub fn observer_count(&self) -> usize {
        self.inner.observers.borrow().len()
    }

    /// Whether [`BehaviorSubject::complete`] was called.
    pub fn is_completed(&self) -> bool {
        self.inner.completed.get()
    }

    /// Replaces the current value and pushes it to every subscriber.
    ///
    /// Ignored after completion.
    pub fn next(&self, value: T) {
        if self.inner.completed.get() {
            return;
        }
        *self.inner.value.borrow_mut() = value.clone();
        #[cfg(feature = "tracing")]
        tracing::trace!(observers = self.observer_count(), "subject broadcast");
        for subscriber in self.snapshot() {
            subscriber.next(value.clone());
        }
    }

    /// Completes every present subscriber. Later subscribers complete
    /// immediately without receiving a value.
    pub fn complete(&self) {
        if self.inner.completed.replace(true) {
            return;
        }
        for subscriber in self.snapshot() {
            subscriber.complete();
        }
        self.inner.observers.borrow_mut().clear();
    }

    /// A stream view of this subject.
    pub fn as_observable(&self) -> Observable<T> {
        let inner = Rc::clone(&self.inner);
        Observable::new(move |subscriber| {
            if inner.completed.get() {
                subscriber.complete();
                return Teardown::none();
            }
            let id = inner.next_id.get();
            inner.next_id.set(id + 1);
            inner.observers.borrow_mut().push((id, subscriber.clone()));

            let current = inner.value.borrow().clone();
            subscriber.next(current);

            let inner = Rc::downgrade(&inner);
            Teardown::new(move || {
                if let Some(inner) = inner.upgrade() {
                    inner.observers.borrow_mut().retain(|(other, _)| *other != id);
                }
            })
        })
    }

    fn snapshot(&self) -> Vec<Subscriber<T>> {
        self.inner
            .observers
            .borrow()
            .iter()
            .map(|(_, subscriber)| subscriber.clone())
            .collect()
    }
}

impl<T: fmt::Debug> fmt::Debug for BehaviorSubject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorSubject")
            .field("value", &*self.inner.value.borrow())
            .field("observers", &self.inner.observers.borrow().len())
            .field("completed", &self.inner.completed.get())
            .finish()
    }
}
