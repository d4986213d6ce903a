use core::{
    cell::{Cell, RefCell},
    fmt,
    time::Duration,
};
use std::{collections::BTreeMap, rc::Rc};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::clock::{Scheduler, Task, TimeSource, TimerId};

struct ClockInner {
    now: Cell<u64>,
    next_seq: Cell<u64>,
    queue: RefCell<BTreeMap<TimerId, Task>>,
}

/// A deterministic, manually advanced clock with a timer queue.
///
/// Nothing scheduled on a [`VirtualClock`] runs until the clock is advanced.
/// Advancing fires every task whose deadline falls inside the advanced
/// window, ordered by deadline and then by registration order. Tasks that are
/// scheduled by a firing task and land inside the same window fire in the
/// same advance, and logical time reads as the task's deadline while it runs.
///
/// The clock is a cheap handle: clones share the same time and queue. It is
/// single-threaded by construction (`!Send`), which matches the cooperative
/// scheduling model of the streams built on top of it.
///
/// # Example
///
/// ```
/// use std::{cell::RefCell, rc::Rc};
/// use rivulet::VirtualClock;
///
/// let clock = VirtualClock::new();
/// let log = Rc::new(RefCell::new(Vec::new()));
///
/// for (delay, label) in [(20, "b"), (10, "a"), (20, "c")] {
///     let log = Rc::clone(&log);
///     clock.schedule(delay, move || log.borrow_mut().push(label));
/// }
///
/// assert_eq!(clock.advance_millis(15), 1);
/// assert_eq!(clock.advance_millis(15), 2);
/// assert_eq!(*log.borrow(), ["a", "b", "c"]);
/// assert_eq!(clock.now_millis(), 30);
/// ```
#[derive(Clone)]
pub struct VirtualClock {
    inner: Rc<ClockInner>,
}

impl Default for VirtualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualClock {
    /// Creates a clock that reads `0` and has nothing scheduled.
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Creates a clock whose logical time starts at `millis`.
    pub fn starting_at(millis: u64) -> Self {
        Self {
            inner: Rc::new(ClockInner {
                now: Cell::new(millis),
                next_seq: Cell::new(0),
                queue: RefCell::new(BTreeMap::new()),
            }),
        }
    }

    /// The current logical time in milliseconds.
    pub fn now_millis(&self) -> u64 {
        self.inner.now.get()
    }

    /// Number of tasks that are scheduled and not yet fired or cancelled.
    pub fn pending(&self) -> usize {
        self.inner.queue.borrow().len()
    }

    /// The deadline of the earliest pending task, if any.
    pub fn next_deadline(&self) -> Option<u64> {
        self.inner
            .queue
            .borrow()
            .first_key_value()
            .map(|(id, _)| id.deadline)
    }

    /// Schedules `task` to run `delay_ms` milliseconds from now.
    ///
    /// A zero delay still defers the task: it runs on the next advance, even
    /// an advance by zero.
    pub fn schedule(&self, delay_ms: u64, task: impl FnOnce() + 'static) -> TimerId {
        let seq = self.inner.next_seq.get();
        self.inner.next_seq.set(seq + 1);
        let id = TimerId {
            deadline: self.now_millis().saturating_add(delay_ms),
            seq,
        };
        self.inner.queue.borrow_mut().insert(id, Box::new(task));
        #[cfg(feature = "tracing")]
        tracing::trace!(deadline = id.deadline, seq, "timer scheduled");
        id
    }

    /// Removes a pending task so that it never runs.
    ///
    /// Returns `false` if the task already fired or was cancelled before.
    pub fn cancel(&self, id: TimerId) -> bool {
        let removed = self.inner.queue.borrow_mut().remove(&id).is_some();
        #[cfg(feature = "tracing")]
        {
            if removed {
                tracing::trace!(deadline = id.deadline, seq = id.seq, "timer cancelled");
            }
        }
        removed
    }

    /// Advances logical time by `by`, firing every task that becomes due.
    ///
    /// Sub-millisecond remainders are truncated. Returns the number of tasks
    /// that ran.
    pub fn advance(&self, by: Duration) -> usize {
        self.advance_millis(u64::try_from(by.as_millis()).unwrap_or(u64::MAX))
    }

    /// Advances logical time by `delta_ms` milliseconds, firing every task whose
    /// deadline is at or before the new time.
    ///
    /// Returns the number of tasks that ran.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn advance_millis(&self, delta_ms: u64) -> usize {
        let target = self.now_millis().saturating_add(delta_ms);
        let mut fired = 0;
        while let Some(task) = self.pop_due(Some(target)) {
            task();
            fired += 1;
        }
        // A task may itself have advanced the clock past `target`.
        self.inner.now.set(target.max(self.now_millis()));
        fired
    }

    /// Fires pending tasks in order, jumping time to each deadline, until the
    /// queue is empty.
    ///
    /// This never returns while a producer keeps rescheduling itself.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn run_until_idle(&self) -> usize {
        let mut fired = 0;
        while let Some(task) = self.pop_due(None) {
            task();
            fired += 1;
        }
        fired
    }

    /// Pops the earliest task due at or before `limit` and moves time to its
    /// deadline. The queue borrow is released before the task runs.
    fn pop_due(&self, limit: Option<u64>) -> Option<Task> {
        let mut queue = self.inner.queue.borrow_mut();
        let entry = queue.first_entry()?;
        if limit.is_some_and(|limit| entry.key().deadline > limit) {
            return None;
        }
        let (id, task) = entry.remove_entry();
        if id.deadline > self.now_millis() {
            self.inner.now.set(id.deadline);
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(deadline = id.deadline, seq = id.seq, "timer fired");
        Some(task)
    }
}

impl Scheduler for VirtualClock {
    fn schedule(&self, delay_ms: u64, task: Task) -> TimerId {
        VirtualClock::schedule(self, delay_ms, task)
    }

    fn cancel(&self, id: TimerId) -> bool {
        VirtualClock::cancel(self, id)
    }
}

impl TimeSource<u64> for VirtualClock {
    fn current_millis(&self) -> u64 {
        self.now_millis()
    }
}

impl fmt::Debug for VirtualClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualClock")
            .field("now_millis", &self.now_millis())
            .field("pending", &self.pending())
            .finish()
    }
}
