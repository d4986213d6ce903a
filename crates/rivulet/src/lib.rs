//! Lazy push streams over a deterministic virtual clock.
//!
//! `rivulet` models the observable contract: a producer runs once per
//! subscription, pushes zero or more values, and terminates with at most one
//! `error` or `complete`. Deferred work goes through a [`VirtualClock`] that
//! only moves when a test or harness advances it, so every interleaving of
//! timers is reproducible.
//!
//! # Example
//!
//! ```
//! use rivulet::{Recorder, VirtualClock, fork_join2, timer};
//!
//! let clock = VirtualClock::new();
//! let left = timer(10, &clock).map(|_| "left");
//! let right = timer(20, &clock).map(|_| 2);
//!
//! let recorder = Recorder::new();
//! fork_join2(left, right).subscribe(recorder.clone());
//!
//! clock.advance_millis(15);
//! assert_eq!(recorder.next_count(), 0);
//!
//! clock.advance_millis(5);
//! assert_eq!(recorder.values(), vec![(Some("left"), Some(2))]);
//! assert!(recorder.is_completed());
//! ```
//!
//! # Feature Flags
//!
//! - `tracing`: emit `tracing` events for timer and subscription bookkeeping
//! - `futures`: bridge an [`Observable`] into a `futures::Stream`

mod clock;
mod error;
#[cfg(feature = "futures")]
mod futures;
mod observable;
mod operators;
mod subject;

pub use crate::clock::*;
pub use crate::error::*;
#[cfg(feature = "futures")]
pub use crate::futures::*;
pub use crate::observable::*;
pub use crate::operators::*;
pub use crate::subject::*;
