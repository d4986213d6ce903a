use std::rc::Rc;

use crate::{Observable, Observer, StreamError, Subscriber, Teardown};

struct MapObserver<T, U> {
    f: Rc<dyn Fn(T) -> U>,
    downstream: Subscriber<U>,
}

impl<T, U> Observer<T> for MapObserver<T, U> {
    fn next(&mut self, value: T) {
        self.downstream.next((self.f)(value));
    }

    fn error(&mut self, err: StreamError) {
        self.downstream.error(err);
    }

    fn complete(&mut self) {
        self.downstream.complete();
    }
}

/// Transforms every value of `source` with `f`.
///
/// Failures and completion pass through unchanged.
pub fn map<T, U>(source: Observable<T>, f: impl Fn(T) -> U + 'static) -> Observable<U>
where
    T: 'static,
    U: 'static,
{
    let f: Rc<dyn Fn(T) -> U> = Rc::new(f);
    Observable::new(move |downstream| {
        source
            .subscribe(MapObserver {
                f: Rc::clone(&f),
                downstream,
            })
            .into()
    })
}

/// Emits `value` synchronously on subscribe, then mirrors `source`.
///
/// This turns an empty-complete stream into one that emits exactly once,
/// which is what a fork-join needs to see a value from it.
pub fn start_with<T>(source: Observable<T>, value: T) -> Observable<T>
where
    T: Clone + 'static,
{
    Observable::new(move |downstream| {
        downstream.next(value.clone());
        if downstream.is_closed() {
            return Teardown::none();
        }
        source.subscribe(downstream).into()
    })
}
