use core::{cell::RefCell, fmt};
use std::rc::Rc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use rivulet::{Observable, Scheduler, Teardown, TimeSource};

/// Latency of an autocomplete lookup unless configured otherwise.
pub const DEFAULT_LOOKUP_LATENCY_MS: u64 = 250;

/// The suggestions every lookup answers with.
pub const SUGGESTIONS: [&str; 3] = ["Hello Dolly", "Hello Mr. Bond", "Hello World"];

#[derive(Default)]
struct QueryLog {
    queries: Vec<String>,
    unsubscribes: Vec<u64>,
    cancellations: Vec<u64>,
}

/// An autocomplete backend that records how its lookups end.
///
/// Every lookup registers a teardown. Its timestamp lands in
/// [`QueryService::unsubscribes`] whenever the lookup's subscription ends,
/// including after it completed normally. Lookups torn down before their
/// answer was delivered are additionally recorded in
/// [`QueryService::cancellations`].
///
/// Clones share the same log.
pub struct QueryService<S> {
    scheduler: S,
    latency_ms: u64,
    log: Rc<RefCell<QueryLog>>,
}

impl<S> Clone for QueryService<S>
where
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            scheduler: self.scheduler.clone(),
            latency_ms: self.latency_ms,
            log: Rc::clone(&self.log),
        }
    }
}

impl<S> QueryService<S>
where
    S: Scheduler + TimeSource<u64> + Clone + 'static,
{
    /// Creates a service answering after [`DEFAULT_LOOKUP_LATENCY_MS`].
    pub fn new(scheduler: &S) -> Self {
        Self::with_latency(scheduler, DEFAULT_LOOKUP_LATENCY_MS)
    }

    pub fn with_latency(scheduler: &S, latency_ms: u64) -> Self {
        Self {
            scheduler: scheduler.clone(),
            latency_ms,
            log: Rc::default(),
        }
    }

    pub fn latency_ms(&self) -> u64 {
        self.latency_ms
    }

    /// Emits [`SUGGESTIONS`] once the latency elapsed, then completes.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all))]
    pub fn lookup_autocomplete_suggestions(&self, query: impl AsRef<str>) -> Observable<Vec<String>> {
        let query = query.as_ref().to_owned();
        let scheduler = self.scheduler.clone();
        let latency_ms = self.latency_ms;
        let log = Rc::clone(&self.log);

        Observable::new(move |subscriber| {
            log.borrow_mut().queries.push(query.clone());
            let id = {
                let subscriber = subscriber.clone();
                scheduler.schedule(
                    latency_ms,
                    Box::new(move || {
                        subscriber.next(SUGGESTIONS.iter().map(|s| (*s).to_owned()).collect::<Vec<_>>());
                        subscriber.complete();
                    }),
                )
            };

            let scheduler = scheduler.clone();
            let log = Rc::clone(&log);
            Teardown::new(move || {
                let now = scheduler.current_millis();
                let cancelled = scheduler.cancel(id);
                let mut log = log.borrow_mut();
                log.unsubscribes.push(now);
                if cancelled {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(at = now, "lookup cancelled");
                    log.cancellations.push(now);
                }
            })
        })
    }

    /// Every query a lookup was started for, in subscription order.
    pub fn queries(&self) -> Vec<String> {
        self.log.borrow().queries.clone()
    }

    /// The time of every lookup teardown, whether cancelled or finished.
    pub fn unsubscribes(&self) -> Vec<u64> {
        self.log.borrow().unsubscribes.clone()
    }

    /// The time of every lookup torn down before it answered.
    pub fn cancellations(&self) -> Vec<u64> {
        self.log.borrow().cancellations.clone()
    }
}

impl<S> fmt::Debug for QueryService<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let log = self.log.borrow();
        f.debug_struct("QueryService")
            .field("latency_ms", &self.latency_ms)
            .field("queries", &log.queries.len())
            .field("unsubscribes", &log.unsubscribes.len())
            .field("cancellations", &log.cancellations.len())
            .finish()
    }
}
