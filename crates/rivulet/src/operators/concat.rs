use core::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::{Observable, Observer, StreamError, Subscriber, Subscription, Teardown};

struct ConcatRun<T> {
    sources: Rc<[Observable<T>]>,
    downstream: Subscriber<T>,
    index: Cell<usize>,
    current: RefCell<Option<Subscription>>,
}

impl<T: 'static> ConcatRun<T> {
    fn subscribe_at(self: &Rc<Self>, index: usize) {
        if self.downstream.is_closed() {
            return;
        }
        let Some(source) = self.sources.get(index) else {
            self.downstream.complete();
            return;
        };
        self.index.set(index);
        let subscription = source.subscribe(ConcatObserver {
            index,
            run: Rc::clone(self),
        });
        // A source that completed synchronously has already moved us on.
        if self.index.get() == index && !subscription.is_closed() {
            *self.current.borrow_mut() = Some(subscription);
        }
    }

    fn on_complete(self: &Rc<Self>, index: usize) {
        if index != self.index.get() {
            return;
        }
        self.current.borrow_mut().take();
        self.subscribe_at(index + 1);
    }

    fn cancel(&self) {
        let current = self.current.borrow_mut().take();
        if let Some(current) = current {
            current.unsubscribe();
        }
    }
}

struct ConcatObserver<T> {
    index: usize,
    run: Rc<ConcatRun<T>>,
}

impl<T: 'static> Observer<T> for ConcatObserver<T> {
    fn next(&mut self, value: T) {
        self.run.downstream.next(value);
    }

    fn error(&mut self, err: StreamError) {
        self.run.downstream.error(err);
    }

    fn complete(&mut self) {
        self.run.on_complete(self.index);
    }
}

/// Subscribes to `sources` one after another.
///
/// Only once the active source completes is the next one subscribed, so a
/// side-effecting stream can be sequenced before a fetch that must observe its
/// effect. Every value of the active source is forwarded in order. The result
/// completes when the last source completes (immediately, for an empty list)
/// and fails, without subscribing the remaining sources, as soon as any
/// source fails.
///
/// # Example
///
/// ```
/// use std::{cell::RefCell, rc::Rc};
/// use rivulet::{Observable, Recorder, Teardown, concat, of};
///
/// let store = Rc::new(RefCell::new(vec!["Downtown"]));
/// let update = {
///     let store = Rc::clone(&store);
///     Observable::<Vec<&str>>::new(move |subscriber| {
///         store.borrow_mut().push("Uptown");
///         subscriber.complete();
///         Teardown::none()
///     })
/// };
/// let fetch = {
///     let store = Rc::clone(&store);
///     Observable::new(move |subscriber| {
///         subscriber.next(store.borrow().clone());
///         subscriber.complete();
///         Teardown::none()
///     })
/// };
///
/// let recorder = Recorder::new();
/// concat(vec![update, fetch, of([])]).subscribe(recorder.clone());
/// assert_eq!(recorder.values(), [vec!["Downtown", "Uptown"]]);
/// assert!(recorder.is_completed());
/// ```
pub fn concat<T: 'static>(sources: Vec<Observable<T>>) -> Observable<T> {
    let sources: Rc<[Observable<T>]> = sources.into();
    Observable::new(move |downstream| {
        let run = Rc::new(ConcatRun {
            sources: Rc::clone(&sources),
            downstream,
            index: Cell::new(0),
            current: RefCell::new(None),
        });
        run.subscribe_at(0);
        Teardown::new(move || run.cancel())
    })
}
