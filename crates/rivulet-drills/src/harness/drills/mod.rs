//! The drill catalog.
//!
//! Every drill builds its streams from a fresh [`Fixture`], drives the
//! virtual clock, and checks exact call counts and values with
//! `anyhow::ensure!`. Groups mirror the progression of the exercises: service
//! sanity checks first, then the stream contract, the combinators, a bad
//! example, and the open-ended challenges.

mod bad;
mod basics;
mod challenges;
mod combine;
mod empty;
mod setup;

use crate::harness::fixture::Fixture;

pub type DrillFn = fn(&Fixture) -> anyhow::Result<()>;

/// One named, self-contained check.
#[derive(Clone, Copy)]
pub struct Drill {
    pub group: &'static str,
    pub name: &'static str,
    pub summary: &'static str,
    pub run: DrillFn,
}

impl Drill {
    const fn new(group: &'static str, name: &'static str, summary: &'static str, run: DrillFn) -> Self {
        Self {
            group,
            name,
            summary,
            run,
        }
    }

    /// `group/name`.
    pub fn id(&self) -> String {
        format!("{}/{}", self.group, self.name)
    }

    /// Whether `selector` names this drill or its group.
    pub fn matches(&self, selector: &str) -> bool {
        selector == self.group
            || selector
                .split_once('/')
                .is_some_and(|(group, name)| group == self.group && name == self.name)
    }
}

impl core::fmt::Debug for Drill {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Drill")
            .field("group", &self.group)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

pub const DRILLS: &[Drill] = &[
    // Service sanity checks
    Drill::new("setup", "fetch_locations", "get_locations emits 3 locations", setup::fetch_locations),
    Drill::new("setup", "fetch_location_groups", "get_location_groups emits 2 groups", setup::fetch_location_groups),
    Drill::new("setup", "update_is_empty", "update_location completes without a value", setup::update_is_empty),
    // Stream contract
    Drill::new("basics", "custom_observable", "a hand-written producer delivers in order", basics::custom_observable),
    Drill::new("basics", "teardown", "teardown runs after synchronous completion", basics::teardown),
    Drill::new("basics", "unsubscribe", "unsubscribing cancels the pending timer", basics::unsubscribe),
    // Value-less streams
    Drill::new("empty", "empty", "empty() completes without a value", empty::empty_completes),
    Drill::new("empty", "never", "never() neither emits nor completes", empty::never_stays_silent),
    Drill::new("empty", "of_nothing", "of over nothing completes without a value", empty::of_nothing),
    Drill::new("empty", "of_value", "just(()) emits once and completes", empty::of_value),
    Drill::new("empty", "started_empty_fork_join", "fork_join over a started empty() emits", empty::started_empty_fork_join),
    // Coordinating requests
    Drill::new("combine", "combine_latest", "combine_latest fetches in parallel", combine::combine_latest_parallel),
    Drill::new("combine", "fork_join", "fork_join fetches in parallel", combine::fork_join_parallel),
    Drill::new("combine", "concat", "concat updates, then fetches groups", combine::concat_update_then_groups),
    Drill::new("combine", "switch_map", "switch_map discards superseded lookups", combine::switch_map_discards_stale),
    // Misuse
    Drill::new("bad", "combine_latest_after_update", "combine_latest with a void update never emits", bad::combine_latest_after_update),
    // Challenges
    Drill::new("challenges", "parallel_requests", "1: locations and groups in parallel", challenges::parallel_requests),
    Drill::new("challenges", "refetch_on_tenant_change", "2: re-fetch on every tenant change", challenges::refetch_on_tenant_change),
    Drill::new("challenges", "update_then_refetch", "3: update, then reload all locations", challenges::update_then_refetch),
    Drill::new("challenges", "abort_ongoing_lookups", "4: abort superseded autocomplete lookups", challenges::abort_ongoing_lookups),
    Drill::new("challenges", "edit_form_then_refetch", "bonus: save the edit form, then reload", challenges::edit_form_then_refetch),
    Drill::new("challenges", "refetch_on_any_setting", "bonus: re-fetch when tenant or filter changes", challenges::refetch_on_any_setting),
];

/// Checks which of the three observer callbacks fired.
fn expect_callbacks<T>(
    recorder: &rivulet::Recorder<T>,
    next: bool,
    complete: bool,
    error: bool,
) -> anyhow::Result<()> {
    let fired = (
        recorder.next_count() > 0,
        recorder.is_completed(),
        recorder.error().is_some(),
    );
    anyhow::ensure!(
        fired == (next, complete, error),
        "expected (next, complete, error) = {:?}, observed {:?}",
        (next, complete, error),
        fired
    );
    Ok(())
}
