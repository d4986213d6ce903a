use core::{cell::RefCell, fmt};
use std::rc::Rc;

use crate::{Observer, StreamError};

/// One call an observer received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification<T> {
    /// A value.
    Next(T),
    /// The terminal failure.
    Error(StreamError),
    /// The terminal completion.
    Complete,
}

impl<T> Notification<T> {
    /// Whether this is `Error` or `Complete`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Next(_))
    }
}

/// An observer that logs every notification it receives.
///
/// Clones share one log, so a clone can be handed to `subscribe` while the
/// first handle stays with the caller for assertions.
pub struct Recorder<T> {
    log: Rc<RefCell<Vec<Notification<T>>>>,
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            log: Rc::clone(&self.log),
        }
    }
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Recorder<T> {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self {
            log: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Number of values received.
    pub fn next_count(&self) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|n| matches!(n, Notification::Next(_)))
            .count()
    }

    /// Whether `complete` was received.
    pub fn is_completed(&self) -> bool {
        self.log
            .borrow()
            .iter()
            .any(|n| matches!(n, Notification::Complete))
    }

    /// The failure received, if any.
    pub fn error(&self) -> Option<StreamError> {
        self.log.borrow().iter().find_map(|n| match n {
            Notification::Error(err) => Some(err.clone()),
            _ => None,
        })
    }

    /// Whether a terminal notification was received.
    pub fn is_terminated(&self) -> bool {
        self.log.borrow().iter().any(Notification::is_terminal)
    }
}

impl<T: Clone> Recorder<T> {
    /// Every notification received, in order.
    pub fn notifications(&self) -> Vec<Notification<T>> {
        self.log.borrow().clone()
    }

    /// Every value received, in order.
    pub fn values(&self) -> Vec<T> {
        self.log
            .borrow()
            .iter()
            .filter_map(|n| match n {
                Notification::Next(value) => Some(value.clone()),
                _ => None,
            })
            .collect()
    }

    /// The most recent value received.
    pub fn last(&self) -> Option<T> {
        self.log.borrow().iter().rev().find_map(|n| match n {
            Notification::Next(value) => Some(value.clone()),
            _ => None,
        })
    }
}

impl<T> Observer<T> for Recorder<T> {
    fn next(&mut self, value: T) {
        self.log.borrow_mut().push(Notification::Next(value));
    }

    fn error(&mut self, err: StreamError) {
        self.log.borrow_mut().push(Notification::Error(err));
    }

    fn complete(&mut self) {
        self.log.borrow_mut().push(Notification::Complete);
    }
}

impl<T: fmt::Debug> fmt::Debug for Recorder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.log.borrow().iter()).finish()
    }
}
