/// A result type whose error defaults to [`StreamError`].
pub type Result<T, E = StreamError> = core::result::Result<T, E>;

/// The terminal failure of a stream.
///
/// This is the only failure kind a stream can deliver. It reaches an observer
/// through [`Observer::error`] at most once per subscription and never
/// alongside a completion. The type is `Clone` because multicast sources and
/// join combinators may hand the same failure to several observers.
///
/// [`Observer::error`]: crate::Observer::error
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[error("stream failed: {reason}")]
pub struct StreamError {
    reason: String,
}

impl StreamError {
    /// Creates a failure carrying a human readable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The reason this stream failed.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl From<&str> for StreamError {
    fn from(reason: &str) -> Self {
        Self::new(reason)
    }
}

impl From<String> for StreamError {
    fn from(reason: String) -> Self {
        Self::new(reason)
    }
}
