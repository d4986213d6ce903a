use core::fmt;
use std::rc::Rc;

/// Type-erased view of a live subscription.
pub(crate) trait Dispose {
    fn dispose(&self);
    fn is_disposed(&self) -> bool;
}

/// A handle to a running subscription.
///
/// Calling [`Subscription::unsubscribe`] stops delivery and runs the
/// producer's cleanup exactly once. Further calls, and calls after the stream
/// already terminated, do nothing. Clones refer to the same subscription;
/// dropping a handle does **not** unsubscribe.
#[derive(Clone)]
pub struct Subscription {
    target: Rc<dyn Dispose>,
}

impl Subscription {
    pub(crate) fn new(target: Rc<dyn Dispose>) -> Self {
        Self { target }
    }

    /// Cancels the subscription and runs its cleanup if it has not run yet.
    pub fn unsubscribe(&self) {
        self.target.dispose();
    }

    /// Whether the subscription terminated or was unsubscribed.
    pub fn is_closed(&self) -> bool {
        self.target.is_disposed()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Cleanup a producer hands back from its subscribe function.
///
/// The cleanup runs once, when the subscription terminates or is cancelled,
/// whichever happens first. A producer that finished synchronously still has
/// its cleanup run, immediately after it returns.
#[must_use = "a teardown only runs once it is returned from a producer"]
pub struct Teardown(Option<Box<dyn FnOnce()>>);

impl Teardown {
    /// No cleanup.
    pub fn none() -> Self {
        Self(None)
    }

    /// Runs `cleanup` when the subscription ends.
    pub fn new(cleanup: impl FnOnce() + 'static) -> Self {
        Self(Some(Box::new(cleanup)))
    }

    /// Whether there is no cleanup to run.
    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }

    pub(crate) fn run(self) {
        if let Some(cleanup) = self.0 {
            cleanup();
        }
    }
}

impl Default for Teardown {
    fn default() -> Self {
        Self::none()
    }
}

impl From<Subscription> for Teardown {
    fn from(subscription: Subscription) -> Self {
        Self::new(move || subscription.unsubscribe())
    }
}

impl fmt::Debug for Teardown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Teardown").field(&self.0.is_some()).finish()
    }
}
