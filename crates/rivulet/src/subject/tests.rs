use crate::{BehaviorSubject, Notification, Recorder, Subscription};
use core::cell::{Cell, RefCell};
use std::rc::Rc;

#[test]
fn new_subscriber_receives_the_current_value() {
    let subject = BehaviorSubject::new(1);
    subject.next(2);

    let recorder = Recorder::new();
    subject.as_observable().subscribe(recorder.clone());
    assert_eq!(recorder.values(), [2]);
    assert!(!recorder.is_completed());
    assert_eq!(subject.value(), 2);
}

#[test]
fn next_reaches_every_subscriber() {
    let subject = BehaviorSubject::new("a");
    let first = Recorder::new();
    let second = Recorder::new();
    subject.as_observable().subscribe(first.clone());
    subject.as_observable().subscribe(second.clone());
    assert_eq!(subject.observer_count(), 2);

    subject.next("b");
    assert_eq!(first.values(), ["a", "b"]);
    assert_eq!(second.values(), ["a", "b"]);
}

#[test]
fn unsubscribed_observer_is_removed() {
    let subject = BehaviorSubject::new(0);
    let recorder = Recorder::new();
    let subscription = subject.as_observable().subscribe(recorder.clone());

    subscription.unsubscribe();
    assert_eq!(subject.observer_count(), 0);

    subject.next(1);
    assert_eq!(recorder.values(), [0]);
}

#[test]
fn complete_ends_present_and_future_subscribers() {
    let subject = BehaviorSubject::new(0);
    let present = Recorder::new();
    subject.as_observable().subscribe(present.clone());

    subject.complete();
    subject.next(1);
    assert!(subject.is_completed());
    assert_eq!(subject.observer_count(), 0);
    assert_eq!(
        present.notifications(),
        [Notification::Next(0), Notification::Complete]
    );

    let future = Recorder::new();
    subject.as_observable().subscribe(future.clone());
    assert_eq!(future.notifications(), [Notification::Complete]);
}

#[test]
fn clones_share_state() {
    let subject = BehaviorSubject::new(String::from("my-initial-id"));
    let handle = subject.clone();
    let recorder = Recorder::new();
    subject.as_observable().subscribe(recorder.clone());

    handle.next(String::from("my-new-tenant-id"));
    assert_eq!(subject.value(), "my-new-tenant-id");
    assert_eq!(recorder.values(), ["my-initial-id", "my-new-tenant-id"]);
}

#[test]
fn subscribing_during_a_broadcast_waits_for_the_next_one() {
    let subject = BehaviorSubject::new(0);
    let late = Recorder::new();

    {
        let subject_in_callback = subject.clone();
        let late = late.clone();
        let subscribed = Cell::new(false);
        subject.as_observable().subscribe_next(move |v| {
            if v == 1 && !subscribed.replace(true) {
                subject_in_callback.as_observable().subscribe(late.clone());
            }
        });
    }

    subject.next(1);
    assert_eq!(subject.observer_count(), 2);
    assert_eq!(late.values(), [1]);

    subject.next(2);
    assert_eq!(late.values(), [1, 2]);
}

#[test]
fn unsubscribing_a_sibling_during_a_broadcast_is_safe() {
    let subject = BehaviorSubject::new(0);
    let handle: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
    let victim = Recorder::new();

    {
        let handle = Rc::clone(&handle);
        subject.as_observable().subscribe_next(move |v| {
            if v == 1 {
                if let Some(subscription) = handle.borrow_mut().take() {
                    subscription.unsubscribe();
                }
            }
        });
    }
    *handle.borrow_mut() = Some(subject.as_observable().subscribe(victim.clone()));

    subject.next(1);
    assert_eq!(victim.values(), [0]);
    assert_eq!(subject.observer_count(), 1);
}
