use crate::{
    BehaviorSubject, Notification, Observable, Recorder, StreamError, Teardown, VirtualClock,
    combine_latest, combine_latest2, concat, empty, fork_join, fork_join2, fork_join_map, just,
    never, of, start_with, switch_map, throw_error, timer,
};
use core::cell::{Cell, RefCell};
use std::{collections::BTreeMap, rc::Rc};

/// A value that arrives after `delay` milliseconds, then completes.
fn delayed<T: Clone + 'static>(clock: &VirtualClock, delay: u64, value: T) -> Observable<T> {
    timer(delay, clock).map(move |_| value.clone())
}

/// Completes after `delay` milliseconds without emitting.
fn delayed_void(clock: &VirtualClock, delay: u64) -> Observable<()> {
    timer(delay, clock).switch_map(|_| empty())
}

/// Never terminates; counts how often it was subscribed and torn down.
fn tracked_never<T: 'static>(subscribed: &Rc<Cell<u32>>, torn_down: &Rc<Cell<u32>>) -> Observable<T> {
    let subscribed = Rc::clone(subscribed);
    let torn_down = Rc::clone(torn_down);
    Observable::new(move |_| {
        subscribed.set(subscribed.get() + 1);
        let torn_down = Rc::clone(&torn_down);
        Teardown::new(move || torn_down.set(torn_down.get() + 1))
    })
}

fn counters() -> (Rc<Cell<u32>>, Rc<Cell<u32>>) {
    (Rc::new(Cell::new(0)), Rc::new(Cell::new(0)))
}

// combine_latest

#[test]
fn combine_latest_emits_once_both_inputs_have_values() {
    let clock = VirtualClock::new();
    let locations = delayed(&clock, 10, vec!["Downtown", "Westside", "Eastside"]);
    let groups = delayed(&clock, 10, vec!["Bern", "Matte"]);

    let recorder = Recorder::new();
    combine_latest2(locations, groups).subscribe(recorder.clone());
    assert_eq!(recorder.next_count(), 0);

    clock.advance_millis(100);
    let values = recorder.values();
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].0.len(), 3);
    assert_eq!(values[0].1.len(), 2);
    assert!(recorder.is_completed());
}

#[test]
fn combine_latest_re_emits_on_every_input_value() {
    let a = BehaviorSubject::new(1);
    let b = BehaviorSubject::new(10);

    let recorder = Recorder::new();
    combine_latest(vec![a.as_observable(), b.as_observable()]).subscribe(recorder.clone());
    a.next(2);
    b.next(20);

    assert_eq!(recorder.values(), [vec![1, 10], vec![2, 10], vec![2, 20]]);
    assert!(!recorder.is_completed());
}

#[test]
fn combine_latest_with_void_input_never_emits() {
    let clock = VirtualClock::new();
    let update = delayed_void(&clock, 10);
    let groups = delayed(&clock, 10, vec!["Bern", "Matte"]);

    let recorder = Recorder::new();
    combine_latest2(update, groups).subscribe(recorder.clone());

    for _ in 0..5 {
        clock.advance_millis(100);
        assert_eq!(recorder.next_count(), 0);
    }
    assert!(!recorder.is_terminated());
}

#[test]
fn combine_latest_without_inputs_completes_silently() {
    let recorder = Recorder::new();
    combine_latest(Vec::<Observable<u8>>::new()).subscribe(recorder.clone());
    assert_eq!(recorder.notifications(), [Notification::Complete]);
}

#[test]
fn combine_latest_failure_cancels_siblings() {
    let clock = VirtualClock::new();
    let (subscribed, torn_down) = counters();
    let failing = timer(10, &clock).switch_map(|_| throw_error::<u8>("lookup failed"));

    let recorder = Recorder::new();
    combine_latest(vec![tracked_never(&subscribed, &torn_down), failing])
        .subscribe(recorder.clone());
    assert_eq!(subscribed.get(), 1);

    clock.advance_millis(10);
    assert_eq!(torn_down.get(), 1);
    assert_eq!(recorder.error(), Some(StreamError::new("lookup failed")));
    assert_eq!(recorder.next_count(), 0);
}

#[test]
fn combine_latest_does_not_subscribe_after_synchronous_failure() {
    let (subscribed, torn_down) = counters();
    let recorder = Recorder::new();
    combine_latest(vec![
        throw_error::<u8>("early"),
        tracked_never(&subscribed, &torn_down),
    ])
    .subscribe(recorder.clone());

    assert_eq!(subscribed.get(), 0);
    assert!(recorder.error().is_some());
}

#[test]
fn unsubscribing_combine_latest_cancels_inputs() {
    let (subscribed, torn_down) = counters();
    let subscription = combine_latest(vec![
        tracked_never::<u8>(&subscribed, &torn_down),
        tracked_never(&subscribed, &torn_down),
    ])
    .subscribe_next(|_| {});

    assert_eq!(subscribed.get(), 2);
    subscription.unsubscribe();
    assert_eq!(torn_down.get(), 2);
}

// fork_join

#[test]
fn fork_join_emits_last_values_once_all_complete() {
    let clock = VirtualClock::new();
    let recorder = Recorder::new();
    fork_join2(
        concat(vec![delayed(&clock, 5, 1), delayed(&clock, 5, 2)]),
        delayed(&clock, 30, "slow"),
    )
    .subscribe(recorder.clone());

    clock.advance_millis(20);
    assert_eq!(recorder.next_count(), 0);

    clock.advance_millis(10);
    assert_eq!(
        recorder.notifications(),
        [
            Notification::Next((Some(2), Some("slow"))),
            Notification::Complete
        ]
    );
}

#[test]
fn fork_join_tolerates_void_inputs() {
    let clock = VirtualClock::new();
    let recorder = Recorder::new();
    fork_join2(delayed_void(&clock, 10), delayed(&clock, 10, vec!["Bern", "Matte"]))
        .subscribe(recorder.clone());

    clock.advance_millis(100);
    assert_eq!(recorder.values(), [(None, Some(vec!["Bern", "Matte"]))]);
    assert!(recorder.is_completed());
}

#[test]
fn fork_join_of_started_empty_emits() {
    let recorder = Recorder::new();
    fork_join(vec![start_with(empty(), "")]).subscribe(recorder.clone());

    assert_eq!(recorder.values(), [vec![Some("")]]);
    assert!(recorder.is_completed());
}

#[test]
fn fork_join_without_inputs_emits_empty() {
    let recorder = Recorder::new();
    fork_join(Vec::<Observable<u8>>::new()).subscribe(recorder.clone());
    assert_eq!(
        recorder.notifications(),
        [Notification::Next(vec![]), Notification::Complete]
    );
}

#[test]
fn fork_join_failure_cancels_siblings_without_emitting() {
    let clock = VirtualClock::new();
    let (subscribed, torn_down) = counters();
    let recorder = Recorder::new();
    fork_join(vec![
        tracked_never(&subscribed, &torn_down),
        delayed(&clock, 5, 1),
        timer(10, &clock).switch_map(|_| throw_error("update rejected")),
    ])
    .subscribe(recorder.clone());

    clock.advance_millis(10);
    assert_eq!(torn_down.get(), 1);
    assert_eq!(
        recorder.notifications(),
        [Notification::Error(StreamError::new("update rejected"))]
    );
}

#[test]
fn fork_join_map_keys_each_last_value() {
    let clock = VirtualClock::new();
    let mut sources = BTreeMap::new();
    sources.insert("groups", delayed(&clock, 10, 2));
    sources.insert("locations", delayed(&clock, 10, 3));
    sources.insert("update", delayed_void(&clock, 10).map(|()| 0));

    let recorder = Recorder::new();
    fork_join_map(sources).subscribe(recorder.clone());
    clock.advance_millis(100);

    let result = recorder.last().unwrap_or_default();
    assert_eq!(result.get("locations"), Some(&Some(3)));
    assert_eq!(result.get("groups"), Some(&Some(2)));
    assert_eq!(result.get("update"), Some(&None));
    assert!(recorder.is_completed());
}

// concat

#[test]
fn concat_subscribes_each_source_after_the_previous_completes() {
    let clock = VirtualClock::new();
    let (subscribed, _) = counters();
    let second = {
        let subscribed = Rc::clone(&subscribed);
        Observable::new(move |subscriber| {
            subscribed.set(subscribed.get() + 1);
            subscriber.next("second");
            subscriber.complete();
            Teardown::none()
        })
    };

    let recorder = Recorder::new();
    concat(vec![delayed(&clock, 10, "first"), second]).subscribe(recorder.clone());
    assert_eq!(subscribed.get(), 0);

    clock.advance_millis(10);
    assert_eq!(subscribed.get(), 1);
    assert_eq!(recorder.values(), ["first", "second"]);
    assert!(recorder.is_completed());
}

#[test]
fn concat_after_void_forwards_only_the_fetch() {
    let clock = VirtualClock::new();
    let recorder = Recorder::new();
    delayed_void(&clock, 10)
        .map(|()| Vec::new())
        .concat_with(delayed(&clock, 10, vec!["Bern", "Matte"]))
        .subscribe(recorder.clone());

    clock.advance_millis(100);
    assert_eq!(recorder.values(), [vec!["Bern", "Matte"]]);
    assert!(recorder.is_completed());
}

#[test]
fn concat_stops_at_the_first_failure() {
    let (subscribed, torn_down) = counters();
    let recorder = Recorder::new();
    concat(vec![
        of([1, 2]),
        throw_error("halt"),
        tracked_never(&subscribed, &torn_down),
    ])
    .subscribe(recorder.clone());

    assert_eq!(subscribed.get(), 0);
    assert_eq!(
        recorder.notifications(),
        [
            Notification::Next(1),
            Notification::Next(2),
            Notification::Error(StreamError::new("halt"))
        ]
    );
}

#[test]
fn concat_of_nothing_completes() {
    let recorder = Recorder::new();
    concat(Vec::<Observable<u8>>::new()).subscribe(recorder.clone());
    assert!(recorder.is_completed());
}

#[test]
fn unsubscribing_concat_cancels_the_active_source() {
    let (subscribed, torn_down) = counters();
    let subscription = concat(vec![just(1), tracked_never(&subscribed, &torn_down)])
        .subscribe_next(|_| {});

    assert_eq!(subscribed.get(), 1);
    subscription.unsubscribe();
    assert_eq!(torn_down.get(), 1);
}

// switch_map

#[test]
fn switch_map_cancels_each_superseded_inner_stream() {
    let clock = VirtualClock::new();
    let cancelled = Rc::new(RefCell::new(Vec::new()));

    let keystrokes = {
        let clock = clock.clone();
        Observable::new(move |subscriber| {
            for (i, text) in ["H", "He", "Hel", "Hell"].into_iter().enumerate() {
                let subscriber = subscriber.clone();
                clock.schedule(200 * (i as u64 + 1), move || subscriber.next(text));
            }
            Teardown::none()
        })
    };
    let lookup = {
        let clock = clock.clone();
        let cancelled = Rc::clone(&cancelled);
        move |query: &'static str| {
            let cancelled = Rc::clone(&cancelled);
            let clock = clock.clone();
            Observable::new(move |subscriber| {
                let id = clock.schedule(250, {
                    let subscriber = subscriber.clone();
                    move || {
                        subscriber.next(vec![query; 3]);
                        subscriber.complete();
                    }
                });
                let cancelled = Rc::clone(&cancelled);
                let clock = clock.clone();
                Teardown::new(move || {
                    if clock.cancel(id) {
                        cancelled.borrow_mut().push(query);
                    }
                })
            })
        }
    };

    let recorder = Recorder::new();
    switch_map(keystrokes, lookup).subscribe(recorder.clone());

    for expected in 0..4 {
        clock.advance_millis(201);
        assert_eq!(cancelled.borrow().len(), expected);
    }
    assert_eq!(recorder.next_count(), 0);

    clock.advance_millis(300);
    assert_eq!(*cancelled.borrow(), ["H", "He", "Hel"]);
    assert_eq!(recorder.values(), [vec!["Hell"; 3]]);
    assert!(!recorder.is_completed());
}

#[test]
fn switch_map_completes_after_source_and_current_inner() {
    let clock = VirtualClock::new();
    let recorder = Recorder::new();
    let inner_clock = clock.clone();
    of([1, 2])
        .switch_map(move |v| delayed(&inner_clock, 10, v * 10))
        .subscribe(recorder.clone());

    assert!(!recorder.is_completed());
    clock.advance_millis(10);
    assert_eq!(
        recorder.notifications(),
        [Notification::Next(20), Notification::Complete]
    );
}

#[test]
fn switch_map_with_synchronous_inners_forwards_everything() {
    let recorder = Recorder::new();
    of([1, 2, 3])
        .switch_map(|v| of([v, v]))
        .subscribe(recorder.clone());
    assert_eq!(recorder.values(), [1, 1, 2, 2, 3, 3]);
    assert!(recorder.is_completed());
}

#[test]
fn switch_map_forwards_current_inner_failure() {
    let recorder = Recorder::new();
    just(())
        .switch_map(|()| throw_error::<u8>("inner failed"))
        .subscribe(recorder.clone());
    assert_eq!(recorder.error(), Some(StreamError::new("inner failed")));
}

#[test]
fn switch_map_on_multicast_refetches_every_change() {
    let clock = VirtualClock::new();
    let tenant = BehaviorSubject::new("my-initial-id");
    let fetch_clock = clock.clone();

    let recorder = Recorder::new();
    tenant
        .as_observable()
        .switch_map(move |id| delayed(&fetch_clock, 10, id))
        .subscribe(recorder.clone());

    clock.advance_millis(100);
    assert_eq!(recorder.next_count(), 1);

    tenant.next("my-new-tenant-id");
    clock.advance_millis(100);
    assert_eq!(recorder.values(), ["my-initial-id", "my-new-tenant-id"]);
}

#[test]
fn unsubscribing_switch_map_cancels_source_and_inner() {
    let (subscribed, torn_down) = counters();
    let subject = BehaviorSubject::new(0);
    let inner_subscribed = Rc::clone(&subscribed);
    let inner_torn_down = Rc::clone(&torn_down);
    let subscription = subject
        .as_observable()
        .switch_map(move |_| tracked_never::<u8>(&inner_subscribed, &inner_torn_down))
        .subscribe_next(|_| {});

    assert_eq!(subject.observer_count(), 1);
    assert_eq!(subscribed.get(), 1);
    subscription.unsubscribe();
    assert_eq!(subject.observer_count(), 0);
    assert_eq!(torn_down.get(), 1);
}

// map / start_with

#[test]
fn map_and_start_with_compose() {
    let recorder = Recorder::new();
    of([1, 2])
        .map(|v| v * 2)
        .start_with(0)
        .subscribe(recorder.clone());
    assert_eq!(recorder.values(), [0, 2, 4]);
    assert!(recorder.is_completed());
}

#[test]
fn map_passes_failures_through() {
    let recorder = Recorder::new();
    throw_error::<u8>("bad")
        .map(u16::from)
        .subscribe(recorder.clone());
    assert_eq!(recorder.error(), Some(StreamError::new("bad")));
}

#[test]
fn never_keeps_fork_join_open() {
    let recorder = Recorder::new();
    fork_join2(just(1), never::<u8>()).subscribe(recorder.clone());
    assert!(!recorder.is_terminated());
}
