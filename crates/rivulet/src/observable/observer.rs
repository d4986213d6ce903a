use crate::StreamError;

/// The consumer side of a stream: one `next` per value, then at most one
/// terminal call.
///
/// Callers never see `next` after `error` or `complete`, and never see both
/// terminal calls; [`Subscriber`] enforces that before anything reaches an
/// observer.
///
/// [`Subscriber`]: crate::Subscriber
pub trait Observer<T> {
    /// Receives the next value.
    fn next(&mut self, value: T);

    /// Receives the terminal failure.
    fn error(&mut self, err: StreamError);

    /// Receives the terminal completion.
    fn complete(&mut self);
}

impl<T, O> Observer<T> for Box<O>
where
    O: Observer<T> + ?Sized,
{
    fn next(&mut self, value: T) {
        (**self).next(value);
    }

    fn error(&mut self, err: StreamError) {
        (**self).error(err);
    }

    fn complete(&mut self) {
        (**self).complete();
    }
}

/// An [`Observer`] assembled from three closures.
///
/// # Example
///
/// ```
/// use std::{cell::Cell, rc::Rc};
/// use rivulet::{FnObserver, of};
///
/// let sum = Rc::new(Cell::new(0));
/// let done = Rc::new(Cell::new(false));
/// let (s, d) = (Rc::clone(&sum), Rc::clone(&done));
///
/// of([1, 2, 3]).subscribe(FnObserver::new(
///     move |v: i32| s.set(s.get() + v),
///     |_| {},
///     move || d.set(true),
/// ));
///
/// assert_eq!(sum.get(), 6);
/// assert!(done.get());
/// ```
pub struct FnObserver<N, E, C> {
    next: N,
    error: E,
    complete: C,
}

impl<N, E, C> FnObserver<N, E, C> {
    /// Creates an observer from `next`, `error`, and `complete` callbacks.
    pub fn new<T>(next: N, error: E, complete: C) -> Self
    where
        N: FnMut(T),
        E: FnMut(StreamError),
        C: FnMut(),
    {
        Self {
            next,
            error,
            complete,
        }
    }
}

impl<T, N, E, C> Observer<T> for FnObserver<N, E, C>
where
    N: FnMut(T),
    E: FnMut(StreamError),
    C: FnMut(),
{
    fn next(&mut self, value: T) {
        (self.next)(value);
    }

    fn error(&mut self, err: StreamError) {
        (self.error)(err);
    }

    fn complete(&mut self) {
        (self.complete)();
    }
}
