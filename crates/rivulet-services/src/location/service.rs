use core::{cell::RefCell, fmt};
use std::rc::Rc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use rivulet::{Observable, Scheduler, Teardown, timer};

use crate::location::{Location, LocationGroup, default_location_groups, default_locations};

/// Latency of every [`LocationService`] call unless configured otherwise.
pub const DEFAULT_SERVICE_LATENCY_MS: u64 = 10;

/// An in-memory location backend with scripted latency.
///
/// Every call returns a cold stream: nothing is read or written until it is
/// subscribed, and the work happens only once the scheduler reaches the
/// configured latency.
///
/// ## Features
/// - ✅ Fetches answer once, then complete
/// - ✅ Updates complete without a value, like a `204 No Content`
/// - ✅ Unsubscribing before the latency elapsed cancels the call
///
/// ## See Also
/// - [`LocationForm`] for the validated edit path into
///   [`LocationService::update_location`]
///
/// [`LocationForm`]: crate::LocationForm
///
/// Clones share the same store.
pub struct LocationService<S> {
    scheduler: S,
    latency_ms: u64,
    locations: Rc<RefCell<Vec<Location>>>,
    groups: Rc<[LocationGroup]>,
}

impl<S> Clone for LocationService<S>
where
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            scheduler: self.scheduler.clone(),
            latency_ms: self.latency_ms,
            locations: Rc::clone(&self.locations),
            groups: Rc::clone(&self.groups),
        }
    }
}

impl<S> LocationService<S>
where
    S: Scheduler + Clone + 'static,
{
    /// Creates a service seeded with [`default_locations`] and
    /// [`default_location_groups`], answering after
    /// [`DEFAULT_SERVICE_LATENCY_MS`].
    pub fn new(scheduler: &S) -> Self {
        Self::with_latency(scheduler, DEFAULT_SERVICE_LATENCY_MS)
    }

    /// Creates a seeded service answering after `latency_ms`.
    pub fn with_latency(scheduler: &S, latency_ms: u64) -> Self {
        Self {
            scheduler: scheduler.clone(),
            latency_ms,
            locations: Rc::new(RefCell::new(default_locations())),
            groups: default_location_groups().into(),
        }
    }

    pub fn latency_ms(&self) -> u64 {
        self.latency_ms
    }

    /// Emits every stored location once, then completes.
    ///
    /// The store is read when the answer is due, so updates that completed
    /// in the meantime are included.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self)))]
    pub fn get_locations(&self) -> Observable<Vec<Location>> {
        let store = Rc::clone(&self.locations);
        timer(self.latency_ms, &self.scheduler).map(move |_| store.borrow().clone())
    }

    /// Emits every location group once, then completes.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self)))]
    pub fn get_location_groups(&self) -> Observable<Vec<LocationGroup>> {
        let groups = Rc::clone(&self.groups);
        timer(self.latency_ms, &self.scheduler).map(move |_| groups.to_vec())
    }

    /// Appends `location` to the store once the latency elapsed, then
    /// completes without emitting.
    ///
    /// Each subscription appends again; unsubscribing before the latency
    /// elapsed appends nothing.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self)))]
    pub fn update_location(&self, location: Location) -> Observable<()> {
        let scheduler = self.scheduler.clone();
        let latency_ms = self.latency_ms;
        let store = Rc::clone(&self.locations);
        Observable::new(move |subscriber| {
            let task = {
                let store = Rc::clone(&store);
                let location = location.clone();
                Box::new(move || {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(name = %location.name, "location stored");
                    store.borrow_mut().push(location);
                    subscriber.complete();
                })
            };
            let id = scheduler.schedule(latency_ms, task);
            let scheduler = scheduler.clone();
            Teardown::new(move || {
                scheduler.cancel(id);
            })
        })
    }

    /// A copy of the stored locations, without latency.
    pub fn locations(&self) -> Vec<Location> {
        self.locations.borrow().clone()
    }
}

impl<S> fmt::Debug for LocationService<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationService")
            .field("latency_ms", &self.latency_ms)
            .field("locations", &self.locations.borrow().len())
            .field("groups", &self.groups.len())
            .finish()
    }
}
