use rivulet::{Observable, Recorder, empty, fork_join, just, never, of};

use crate::harness::{drills::expect_callbacks, fixture::Fixture};

/// Subscribes, lets the clock settle, and hands back what was observed.
fn run_callbacks<T: Clone + 'static>(fx: &Fixture, observable: Observable<T>) -> Recorder<T> {
    let recorder = Recorder::new();
    observable.subscribe(recorder.clone());
    fx.settle();
    recorder
}

pub fn empty_completes(fx: &Fixture) -> anyhow::Result<()> {
    expect_callbacks(&run_callbacks(fx, empty::<()>()), false, true, false)
}

pub fn never_stays_silent(fx: &Fixture) -> anyhow::Result<()> {
    expect_callbacks(&run_callbacks(fx, never::<()>()), false, false, false)
}

pub fn of_nothing(fx: &Fixture) -> anyhow::Result<()> {
    expect_callbacks(&run_callbacks(fx, of(Vec::<()>::new())), false, true, false)
}

pub fn of_value(fx: &Fixture) -> anyhow::Result<()> {
    expect_callbacks(&run_callbacks(fx, just(())), true, true, false)
}

pub fn started_empty_fork_join(fx: &Fixture) -> anyhow::Result<()> {
    let observable = fork_join(vec![empty().start_with(String::new())]);
    expect_callbacks(&run_callbacks(fx, observable), true, true, false)
}
