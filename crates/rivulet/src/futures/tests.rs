use crate::{BehaviorSubject, StreamError, VirtualClock, concat, of, throw_error, timer};
use futures::{StreamExt, executor::block_on};

#[test]
fn synchronous_values_are_buffered_until_polled() {
    let items: Vec<_> = block_on(of([1, 2, 3]).into_stream().collect());
    assert_eq!(items, [Ok(1), Ok(2), Ok(3)]);
}

#[test]
fn failure_is_the_last_item() {
    let source = concat(vec![of([1]), throw_error("boom")]);
    let items: Vec<_> = block_on(source.into_stream().collect());
    assert_eq!(items, [Ok(1), Err(StreamError::new("boom"))]);
}

#[test]
fn only_pushed_values_are_visible_before_the_clock_moves() {
    let clock = VirtualClock::new();
    let mut stream = concat(vec![of([0]), timer(10, &clock)]).into_stream();

    assert_eq!(block_on(stream.next()), Some(Ok(0)));
    clock.advance_millis(10);
    assert_eq!(block_on(stream.next()), Some(Ok(0)));
    assert_eq!(block_on(stream.next()), None);
}

#[test]
fn dropping_the_stream_unsubscribes() {
    let subject = BehaviorSubject::new(7);
    let stream = subject.as_observable().into_stream();
    assert_eq!(subject.observer_count(), 1);
    assert!(!stream.subscription().is_closed());

    drop(stream);
    assert_eq!(subject.observer_count(), 0);
}
