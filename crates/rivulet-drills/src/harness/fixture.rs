use rivulet::VirtualClock;
use rivulet_services::{
    FilterService, Location, LocationService, QueryService, TenantSettingsService,
    TypingSimulatorService,
};

use crate::harness::config::{DrillConfig, SETTLE_TICK_MS};

/// Fresh services on a fresh clock, built for exactly one drill.
#[derive(Debug)]
pub struct Fixture {
    pub clock: VirtualClock,
    pub locations: LocationService<VirtualClock>,
    pub queries: QueryService<VirtualClock>,
    pub tenants: TenantSettingsService,
    pub filters: FilterService,
    pub typing: TypingSimulatorService,
    /// The prefixes the typing simulator emits, in order.
    pub prefixes: Vec<String>,
    pub keystroke_interval_ms: u64,
    pub lookup_settle_ms: u64,
}

impl Fixture {
    pub fn new(config: &DrillConfig) -> Self {
        let clock = VirtualClock::new();
        let prefixes = config
            .word
            .char_indices()
            .map(|(at, c)| config.word[..at + c.len_utf8()].to_owned())
            .collect();
        Self {
            locations: LocationService::with_latency(&clock, config.service_latency_ms),
            queries: QueryService::with_latency(&clock, config.lookup_latency_ms),
            tenants: TenantSettingsService::new(),
            filters: FilterService::new(),
            typing: TypingSimulatorService::with_timing(
                &clock,
                config.word.as_str(),
                config.keystroke_interval_ms,
                config.lookup_settle_ms,
            ),
            prefixes,
            keystroke_interval_ms: config.keystroke_interval_ms,
            lookup_settle_ms: config.lookup_settle_ms,
            clock,
        }
    }

    /// Advances far enough for any pending fetch to answer.
    pub fn settle(&self) -> usize {
        self.clock.advance_millis(SETTLE_TICK_MS)
    }

    /// The location the update drills store.
    pub fn my_new_location() -> Location {
        Location::new(42, "My Location")
    }
}
