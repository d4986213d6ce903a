use std::collections::BTreeMap;

use crate::{
    Observable,
    operators::join::{Join, JoinMode, Slot},
};

/// Runs every input concurrently and emits once, after all of them complete.
///
/// The single emitted `Vec` holds, per input position, the last value that
/// input produced, or `None` if it completed without producing one. Value-less
/// inputs therefore never block the result. The stream completes right after
/// that emission. With no inputs at all it emits an empty `Vec` immediately.
///
/// The first failure from any input is forwarded, every other input is
/// unsubscribed, and nothing is emitted.
pub fn fork_join<T: 'static>(sources: Vec<Observable<T>>) -> Observable<Vec<Option<T>>> {
    Observable::new(move |downstream| {
        let slots: Vec<Slot<T>> = sources.iter().map(|_| Slot::new()).collect();
        let snapshot = {
            let slots = slots.clone();
            move || Some(slots.iter().map(Slot::take).collect())
        };
        let join = Join::new(JoinMode::Final, sources.len(), downstream, snapshot);
        for (index, (source, slot)) in sources.iter().zip(slots).enumerate() {
            join.attach(index, source, slot);
        }
        join.start()
    })
}

/// Fork-joins two differently typed inputs.
///
/// Same semantics as [`fork_join`].
///
/// # Example
///
/// ```
/// use rivulet::{Recorder, VirtualClock, empty, fork_join2, timer};
///
/// let clock = VirtualClock::new();
/// let update = timer(10, &clock).switch_map(|_| empty::<()>());
/// let fetch = timer(10, &clock).map(|_| vec!["Bern", "Matte"]);
///
/// let recorder = Recorder::new();
/// fork_join2(update, fetch).subscribe(recorder.clone());
/// clock.advance_millis(100);
///
/// assert_eq!(recorder.values(), [(None, Some(vec!["Bern", "Matte"]))]);
/// assert!(recorder.is_completed());
/// ```
pub fn fork_join2<A, B>(a: Observable<A>, b: Observable<B>) -> Observable<(Option<A>, Option<B>)>
where
    A: 'static,
    B: 'static,
{
    Observable::new(move |downstream| {
        let (slot_a, slot_b) = (Slot::new(), Slot::new());
        let snapshot = {
            let (slot_a, slot_b) = (slot_a.clone(), slot_b.clone());
            move || Some((slot_a.take(), slot_b.take()))
        };
        let join = Join::new(JoinMode::Final, 2, downstream, snapshot);
        join.attach(0, &a, slot_a);
        join.attach(1, &b, slot_b);
        join.start()
    })
}

/// Fork-joins a named set of inputs.
///
/// The emitted map has exactly the keys of `sources`; each maps to that
/// input's last value, or `None` if it produced none. Otherwise identical to
/// [`fork_join`].
pub fn fork_join_map<K, T>(sources: BTreeMap<K, Observable<T>>) -> Observable<BTreeMap<K, Option<T>>>
where
    K: Ord + Clone + 'static,
    T: 'static,
{
    let (keys, sources): (Vec<K>, Vec<Observable<T>>) = sources.into_iter().unzip();
    Observable::new(move |downstream| {
        let slots: Vec<Slot<T>> = sources.iter().map(|_| Slot::new()).collect();
        let snapshot = {
            let keys = keys.clone();
            let slots = slots.clone();
            move || {
                Some(
                    keys.iter()
                        .cloned()
                        .zip(slots.iter().map(Slot::take))
                        .collect(),
                )
            }
        };
        let join = Join::new(JoinMode::Final, sources.len(), downstream, snapshot);
        for (index, (source, slot)) in sources.iter().zip(slots).enumerate() {
            join.attach(index, source, slot);
        }
        join.start()
    })
}
