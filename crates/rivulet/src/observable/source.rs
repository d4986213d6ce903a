use crate::{Observable, Scheduler, StreamError, Teardown};

/// Emits every item of `values` in order, then completes.
///
/// The items are collected up front and cloned for each subscription, so the
/// stream can be subscribed any number of times. `of([])` completes without
/// emitting.
pub fn of<T, I>(values: I) -> Observable<T>
where
    T: Clone + 'static,
    I: IntoIterator<Item = T>,
{
    let values: Vec<T> = values.into_iter().collect();
    Observable::new(move |subscriber| {
        for value in &values {
            if subscriber.is_closed() {
                break;
            }
            subscriber.next(value.clone());
        }
        subscriber.complete();
        Teardown::none()
    })
}

/// Emits a single value, then completes.
pub fn just<T: Clone + 'static>(value: T) -> Observable<T> {
    of([value])
}

/// Completes immediately without emitting ("empty-complete").
pub fn empty<T: 'static>() -> Observable<T> {
    Observable::new(|subscriber| {
        subscriber.complete();
        Teardown::none()
    })
}

/// Never emits and never terminates ("never-terminating").
pub fn never<T: 'static>() -> Observable<T> {
    Observable::new(|_| Teardown::none())
}

/// Fails immediately with `err`.
pub fn throw_error<T: 'static>(err: impl Into<StreamError>) -> Observable<T> {
    let err = err.into();
    Observable::new(move |subscriber| {
        subscriber.error(err.clone());
        Teardown::none()
    })
}

/// Emits `0` once `delay_ms` milliseconds have passed on `scheduler`, then
/// completes.
///
/// Unsubscribing before the deadline cancels the underlying timer, so the
/// emission never happens.
///
/// # Example
///
/// ```
/// use rivulet::{Recorder, VirtualClock, timer};
///
/// let clock = VirtualClock::new();
/// let recorder = Recorder::new();
/// timer(10, &clock).subscribe(recorder.clone());
///
/// clock.advance_millis(9);
/// assert_eq!(recorder.next_count(), 0);
/// clock.advance_millis(1);
/// assert_eq!(recorder.values(), [0]);
/// assert!(recorder.is_completed());
/// ```
pub fn timer<S>(delay_ms: u64, scheduler: &S) -> Observable<u64>
where
    S: Scheduler + Clone + 'static,
{
    let scheduler = scheduler.clone();
    Observable::new(move |subscriber| {
        let id = scheduler.schedule(
            delay_ms,
            Box::new(move || {
                subscriber.next(0);
                subscriber.complete();
            }),
        );
        let scheduler = scheduler.clone();
        Teardown::new(move || {
            scheduler.cancel(id);
        })
    })
}
