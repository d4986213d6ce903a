//! Stub collaborators for stream drills.
//!
//! Every service here answers through [`rivulet`] streams whose latency is
//! scheduled on a [`Scheduler`](rivulet::Scheduler), normally a
//! [`VirtualClock`](rivulet::VirtualClock). Nothing happens until the clock is
//! advanced, which makes call counts and emitted values exact.
//!
//! - [`LocationService`]: fetches locations and location groups, and appends
//!   updated locations to an in-memory store
//! - [`QueryService`]: autocomplete lookups that record every teardown
//! - [`TenantSettingsService`] and [`FilterService`]: multicast settings that
//!   replay their current value
//! - [`TypingSimulatorService`]: scripted keystrokes for switch-to-latest
//!   drills
//! - [`LocationForm`]: the validated edit form that saves through
//!   [`LocationService::update_location`]
//!
//! # Example
//!
//! ```
//! use rivulet::{Recorder, VirtualClock};
//! use rivulet_services::LocationService;
//!
//! let clock = VirtualClock::new();
//! let service = LocationService::new(&clock);
//!
//! let recorder = Recorder::new();
//! service.get_locations().subscribe(recorder.clone());
//! clock.advance_millis(100);
//!
//! let locations = recorder.last().unwrap_or_default();
//! assert_eq!(locations.len(), 3);
//! assert_eq!(locations[0].name, "Downtown");
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for the domain types, camelCase field
//!   names
//! - `tracing`: emit `tracing` events for service calls

mod error;
mod location;
mod query;
mod settings;

pub use crate::error::*;
pub use crate::location::*;
pub use crate::query::*;
pub use crate::settings::*;
