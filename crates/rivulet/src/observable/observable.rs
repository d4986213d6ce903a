use core::fmt;
use std::rc::Rc;

use crate::{FnObserver, Observer, StreamError, Subscriber, Subscription, Teardown};

type Producer<T> = dyn Fn(Subscriber<T>) -> Teardown;

/// A lazy, push-based stream of `T`.
///
/// An [`Observable`] only describes how to produce values. Each call to
/// [`Observable::subscribe`] runs the producer from scratch against a fresh
/// [`Subscriber`]; nothing is shared between subscriptions unless the
/// producer itself closes over shared state (see [`BehaviorSubject`] for a
/// multicast source).
///
/// Cloning is cheap: clones share the producer, not any running execution.
///
/// # Example
///
/// ```
/// use rivulet::{Observable, Recorder, Teardown};
///
/// let observable = Observable::new(|subscriber| {
///     subscriber.next("first");
///     subscriber.next("second");
///     subscriber.complete();
///     // Ignored: the stream already completed.
///     subscriber.next("late");
///     Teardown::none()
/// });
///
/// let recorder = Recorder::new();
/// observable.subscribe(recorder.clone());
/// assert_eq!(recorder.values(), ["first", "second"]);
/// assert!(recorder.is_completed());
/// ```
///
/// [`BehaviorSubject`]: crate::BehaviorSubject
pub struct Observable<T> {
    producer: Rc<Producer<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            producer: Rc::clone(&self.producer),
        }
    }
}

impl<T: 'static> Observable<T> {
    /// Creates a stream from a producer function.
    ///
    /// The producer runs once per subscription. It may emit synchronously,
    /// schedule deferred work on a [`Scheduler`], or both, and returns the
    /// cleanup to run when the subscription ends.
    ///
    /// [`Scheduler`]: crate::Scheduler
    pub fn new(producer: impl Fn(Subscriber<T>) -> Teardown + 'static) -> Self {
        Self {
            producer: Rc::new(producer),
        }
    }

    /// Runs the producer for a new subscription delivering into `observer`.
    pub fn subscribe(&self, observer: impl Observer<T> + 'static) -> Subscription {
        let subscriber = Subscriber::new(Box::new(observer));
        let teardown = (self.producer)(subscriber.clone());
        subscriber.add(teardown);
        subscriber.subscription()
    }

    /// Subscribes with only a value callback.
    ///
    /// Completion is ignored. A failure is dropped as well, after being logged
    /// when the `tracing` feature is enabled.
    pub fn subscribe_next(&self, next: impl FnMut(T) + 'static) -> Subscription {
        self.subscribe(FnObserver::new(
            next,
            |_err: StreamError| {
                #[cfg(feature = "tracing")]
                tracing::warn!(%_err, "unhandled stream error");
            },
            || {},
        ))
    }

    /// Subscribes with separate value, failure, and completion callbacks.
    pub fn subscribe_with(
        &self,
        next: impl FnMut(T) + 'static,
        error: impl FnMut(StreamError) + 'static,
        complete: impl FnMut() + 'static,
    ) -> Subscription {
        self.subscribe(FnObserver::new(next, error, complete))
    }

    /// Transforms every value with `f`. See [`map`](crate::map).
    pub fn map<U: 'static>(self, f: impl Fn(T) -> U + 'static) -> Observable<U> {
        crate::map(self, f)
    }

    /// Emits `value` before anything from this stream. See
    /// [`start_with`](crate::start_with).
    pub fn start_with(self, value: T) -> Self
    where
        T: Clone,
    {
        crate::start_with(self, value)
    }

    /// Maps each value to an inner stream and mirrors only the latest one.
    /// See [`switch_map`](crate::switch_map).
    pub fn switch_map<U: 'static>(
        self,
        project: impl Fn(T) -> Observable<U> + 'static,
    ) -> Observable<U> {
        crate::switch_map(self, project)
    }

    /// Subscribes to `next` once this stream completes. See
    /// [`concat`](crate::concat).
    pub fn concat_with(self, next: Observable<T>) -> Self {
        crate::concat(vec![self, next])
    }
}

impl<T> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable").finish_non_exhaustive()
    }
}
