use core::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::{Observable, Observer, StreamError, Subscriber, Subscription, Teardown};

struct SwitchRun<S, T> {
    project: Rc<dyn Fn(S) -> Observable<T>>,
    downstream: Subscriber<T>,
    /// Bumped for every source value; only the inner stream of the current
    /// generation may reach `downstream`.
    generation: Cell<u64>,
    inner: RefCell<Option<Subscription>>,
    inner_active: Cell<bool>,
    source_done: Cell<bool>,
    outer: RefCell<Option<Subscription>>,
}

impl<S: 'static, T: 'static> SwitchRun<S, T> {
    fn on_source_next(self: &Rc<Self>, value: S) {
        // Cancel before projecting so the stale inner cannot emit in between.
        let stale = self.inner.borrow_mut().take();
        if let Some(stale) = stale {
            #[cfg(feature = "tracing")]
            tracing::debug!(generation = self.generation.get(), "cancelling superseded inner stream");
            stale.unsubscribe();
        }

        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        self.inner_active.set(true);

        let inner = (self.project)(value);
        let subscription = inner.subscribe(SwitchInner {
            generation,
            run: Rc::clone(self),
        });
        // A synchronously finished inner, or a newer one started while this
        // one was subscribing, must not be stored.
        if self.generation.get() == generation && self.inner_active.get() {
            *self.inner.borrow_mut() = Some(subscription);
        }
    }

    fn on_source_complete(&self) {
        self.source_done.set(true);
        if !self.inner_active.get() {
            self.downstream.complete();
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.get() == generation
    }

    fn on_inner_complete(&self, generation: u64) {
        if !self.is_current(generation) {
            return;
        }
        self.inner_active.set(false);
        self.inner.borrow_mut().take();
        if self.source_done.get() {
            self.downstream.complete();
        }
    }

    fn cancel(&self) {
        let outer = self.outer.borrow_mut().take();
        let inner = self.inner.borrow_mut().take();
        for subscription in outer.into_iter().chain(inner) {
            subscription.unsubscribe();
        }
    }
}

struct SwitchSource<S, T> {
    run: Rc<SwitchRun<S, T>>,
}

impl<S: 'static, T: 'static> Observer<S> for SwitchSource<S, T> {
    fn next(&mut self, value: S) {
        self.run.on_source_next(value);
    }

    fn error(&mut self, err: StreamError) {
        self.run.downstream.error(err);
    }

    fn complete(&mut self) {
        self.run.on_source_complete();
    }
}

struct SwitchInner<S, T> {
    generation: u64,
    run: Rc<SwitchRun<S, T>>,
}

impl<S: 'static, T: 'static> Observer<T> for SwitchInner<S, T> {
    fn next(&mut self, value: T) {
        if self.run.is_current(self.generation) {
            self.run.downstream.next(value);
        }
    }

    fn error(&mut self, err: StreamError) {
        // A superseded inner stream is silent, failures included.
        if self.run.is_current(self.generation) {
            self.run.downstream.error(err);
        }
    }

    fn complete(&mut self) {
        self.run.on_inner_complete(self.generation);
    }
}

/// Maps every source value to an inner stream and mirrors only the latest.
///
/// When a new source value arrives, the inner stream of the previous value is
/// unsubscribed synchronously, before `project` runs for the new one, so a
/// superseded inner stream never emits into the result. The result completes
/// once the source has completed and the current inner stream (if any) has
/// completed. A failure of the source or of the current inner stream is
/// forwarded.
///
/// # Example
///
/// ```
/// use rivulet::{BehaviorSubject, Recorder, VirtualClock, switch_map, timer};
///
/// let clock = VirtualClock::new();
/// let query = BehaviorSubject::new("H");
///
/// let lookups = {
///     let clock = clock.clone();
///     switch_map(query.as_observable(), move |q| timer(250, &clock).map(move |_| q.len()))
/// };
/// let recorder = Recorder::new();
/// lookups.subscribe(recorder.clone());
///
/// clock.advance_millis(200);
/// query.next("He");
/// clock.advance_millis(200);
/// assert_eq!(recorder.next_count(), 0);
///
/// clock.advance_millis(50);
/// assert_eq!(recorder.values(), [2]);
/// ```
pub fn switch_map<S, T>(
    source: Observable<S>,
    project: impl Fn(S) -> Observable<T> + 'static,
) -> Observable<T>
where
    S: 'static,
    T: 'static,
{
    let project: Rc<dyn Fn(S) -> Observable<T>> = Rc::new(project);
    Observable::new(move |downstream| {
        let run = Rc::new(SwitchRun {
            project: Rc::clone(&project),
            downstream,
            generation: Cell::new(0),
            inner: RefCell::new(None),
            inner_active: Cell::new(false),
            source_done: Cell::new(false),
            outer: RefCell::new(None),
        });
        let outer = source.subscribe(SwitchSource {
            run: Rc::clone(&run),
        });
        if run.downstream.is_closed() {
            outer.unsubscribe();
        } else {
            *run.outer.borrow_mut() = Some(outer);
        }
        Teardown::new(move || run.cancel())
    })
}
