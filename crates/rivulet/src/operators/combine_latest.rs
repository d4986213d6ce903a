use crate::{
    Observable,
    operators::join::{Join, JoinMode, Slot},
};

/// Combines the latest value of every input.
///
/// Nothing is emitted until each input has produced at least one value; from
/// then on every value from any input emits a fresh `Vec` holding the latest
/// value of each input, in input order. The result completes once every input
/// has completed, provided each of them emitted. An input that completes
/// without a value therefore silences the combination for good, so
/// side-effect-only streams (such as an update returning nothing) do not
/// belong here; see [`fork_join`](crate::fork_join) or
/// [`concat`](crate::concat) instead.
///
/// The first failure from any input is forwarded and every other input is
/// unsubscribed.
pub fn combine_latest<T>(sources: Vec<Observable<T>>) -> Observable<Vec<T>>
where
    T: Clone + 'static,
{
    Observable::new(move |downstream| {
        let slots: Vec<Slot<T>> = sources.iter().map(|_| Slot::new()).collect();
        let snapshot = {
            let slots = slots.clone();
            move || slots.iter().map(Slot::get).collect::<Option<Vec<T>>>()
        };
        let join = Join::new(JoinMode::Latest, sources.len(), downstream, snapshot);
        for (index, (source, slot)) in sources.iter().zip(slots).enumerate() {
            join.attach(index, source, slot);
        }
        join.start()
    })
}

/// Combines the latest values of two differently typed inputs.
///
/// Same semantics as [`combine_latest`].
///
/// # Example
///
/// ```
/// use rivulet::{BehaviorSubject, Recorder, combine_latest2, empty};
///
/// let tenant = BehaviorSubject::new("acme");
/// let page = BehaviorSubject::new(1);
///
/// let recorder = Recorder::new();
/// combine_latest2(tenant.as_observable(), page.as_observable()).subscribe(recorder.clone());
/// page.next(2);
/// assert_eq!(recorder.values(), [("acme", 1), ("acme", 2)]);
///
/// // A stream that never emits keeps the combination silent.
/// let silent = Recorder::new();
/// combine_latest2(empty::<()>(), page.as_observable()).subscribe(silent.clone());
/// assert_eq!(silent.next_count(), 0);
/// ```
pub fn combine_latest2<A, B>(a: Observable<A>, b: Observable<B>) -> Observable<(A, B)>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    Observable::new(move |downstream| {
        let (slot_a, slot_b) = (Slot::new(), Slot::new());
        let snapshot = {
            let (slot_a, slot_b) = (slot_a.clone(), slot_b.clone());
            move || Some((slot_a.get()?, slot_b.get()?))
        };
        let join = Join::new(JoinMode::Latest, 2, downstream, snapshot);
        join.attach(0, &a, slot_a);
        join.attach(1, &b, slot_b);
        join.start()
    })
}
