/// A trait for time sources that return a logical timestamp.
///
/// This abstraction lets stream producers and stub services read "now"
/// without caring whether it comes from a manually advanced [`VirtualClock`]
/// or something else.
///
/// The timestamp type `T` is generic and the unit is **milliseconds**
/// relative to the clock's origin.
///
/// # Example
///
/// ```
/// use rivulet::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource<u64> for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
///
/// [`VirtualClock`]: crate::VirtualClock
pub trait TimeSource<T> {
    /// Returns the current time in milliseconds since the clock's origin.
    fn current_millis(&self) -> T;
}

/// A deferred unit of work owned by a [`Scheduler`].
pub type Task = Box<dyn FnOnce()>;

/// Identifies a scheduled task so it can be cancelled before it fires.
///
/// Ids are ordered by deadline first and registration order second, which is
/// exactly the order in which a [`VirtualClock`] fires them.
///
/// [`VirtualClock`]: crate::VirtualClock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId {
    pub(crate) deadline: u64,
    pub(crate) seq: u64,
}

impl TimerId {
    /// The logical time (in milliseconds) at which the task becomes due.
    pub fn deadline(&self) -> u64 {
        self.deadline
    }
}

/// Something that can run a task after a delay and cancel it again.
///
/// Implementations must never run a cancelled task, not even to discard its
/// result; `switch_map` relies on that to keep superseded inner streams silent.
pub trait Scheduler {
    /// Schedules `task` to run once `delay_ms` milliseconds of logical time have
    /// passed.
    fn schedule(&self, delay_ms: u64, task: Task) -> TimerId;

    /// Cancels a pending task.
    ///
    /// Returns `true` if the task was still pending, `false` if it already ran
    /// or was cancelled before.
    fn cancel(&self, id: TimerId) -> bool;
}
