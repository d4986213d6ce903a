use core::cell::Cell;
use std::rc::Rc;

use anyhow::ensure;
use rivulet::{Observable, Recorder, Teardown, timer};

use crate::harness::{drills::expect_callbacks, fixture::Fixture};

pub fn custom_observable(_fx: &Fixture) -> anyhow::Result<()> {
    let observable = Observable::new(|subscriber| {
        subscriber.next("first");
        subscriber.next("second");
        subscriber.next("third");
        subscriber.complete();
        Teardown::none()
    });

    let recorder = Recorder::new();
    observable.subscribe(recorder.clone());

    let values = recorder.values();
    ensure!(
        values == ["first", "second", "third"],
        "unexpected values {values:?}"
    );
    expect_callbacks(&recorder, true, true, false)
}

pub fn teardown(_fx: &Fixture) -> anyhow::Result<()> {
    let did_unsubscribe = Rc::new(Cell::new(false));
    let observable = {
        let did_unsubscribe = Rc::clone(&did_unsubscribe);
        Observable::new(move |subscriber| {
            subscriber.next("value");
            subscriber.complete();
            let did_unsubscribe = Rc::clone(&did_unsubscribe);
            Teardown::new(move || did_unsubscribe.set(true))
        })
    };

    observable.subscribe_next(|_| {});
    ensure!(did_unsubscribe.get(), "teardown did not run after completion");
    Ok(())
}

pub fn unsubscribe(fx: &Fixture) -> anyhow::Result<()> {
    let recorder = Recorder::new();
    let subscription = timer(fx.locations.latency_ms(), &fx.clock).subscribe(recorder.clone());
    ensure!(fx.clock.pending() == 1, "timer was not scheduled");

    subscription.unsubscribe();
    ensure!(fx.clock.pending() == 0, "unsubscribing left the timer pending");

    fx.settle();
    expect_callbacks(&recorder, false, false, false)
}
