use std::collections::BTreeMap;

use anyhow::{Context, ensure};
use rivulet::{Observable, Recorder, Teardown, combine_latest2, concat, fork_join_map};
use rivulet_services::{LocationGroup, LocationsAndGroups};

use crate::harness::fixture::Fixture;

pub fn combine_latest_parallel(fx: &Fixture) -> anyhow::Result<()> {
    let recorder = Recorder::new();
    combine_latest2(fx.locations.get_locations(), fx.locations.get_location_groups())
        .map(|(locations, groups)| LocationsAndGroups { locations, groups })
        .subscribe(recorder.clone());
    fx.settle();

    let result = recorder.last().context("combine_latest never emitted")?;
    ensure!(result.locations.len() == 3, "expected 3 locations");
    ensure!(result.groups.len() == 2, "expected 2 groups");
    Ok(())
}

/// Both fetches keyed by name, the way a record of requests is fork-joined.
pub fn fork_join_parallel(fx: &Fixture) -> anyhow::Result<()> {
    #[derive(Clone)]
    enum Fetched {
        Locations(Vec<rivulet_services::Location>),
        Groups(Vec<LocationGroup>),
    }

    let mut requests = BTreeMap::new();
    requests.insert("locations", fx.locations.get_locations().map(Fetched::Locations));
    requests.insert("groups", fx.locations.get_location_groups().map(Fetched::Groups));

    let recorder = Recorder::new();
    fork_join_map(requests).subscribe(recorder.clone());
    fx.settle();

    let mut result = recorder.last().context("fork_join never emitted")?;
    let Some(Some(Fetched::Locations(locations))) = result.remove("locations") else {
        anyhow::bail!("locations missing from the fork_join result");
    };
    let Some(Some(Fetched::Groups(groups))) = result.remove("groups") else {
        anyhow::bail!("groups missing from the fork_join result");
    };
    ensure!(locations.len() == 3, "expected 3 locations, got {}", locations.len());
    ensure!(groups.len() == 2, "expected 2 groups, got {}", groups.len());
    ensure!(recorder.is_completed(), "fork_join did not complete");
    Ok(())
}

/// Update, and only once it completed, fetch the groups.
pub fn concat_update_then_groups(fx: &Fixture) -> anyhow::Result<()> {
    let recorder = Recorder::new();
    concat(vec![
        fx.locations
            .update_location(Fixture::my_new_location())
            .map(|()| Vec::new()),
        fx.locations.get_location_groups(),
    ])
    .subscribe(recorder.clone());
    fx.settle();

    let names: Vec<_> = recorder
        .last()
        .context("concat never emitted")?
        .into_iter()
        .map(|g| g.name)
        .collect();
    ensure!(names == ["Bern", "Matte"], "unexpected groups {names:?}");
    ensure!(recorder.next_count() == 1, "the update must not emit");
    Ok(())
}

/// A hand-written keystroke source switched onto lookups.
pub fn switch_map_discards_stale(fx: &Fixture) -> anyhow::Result<()> {
    let typing = {
        let clock = fx.clock.clone();
        let prefixes = fx.prefixes.clone();
        let interval = fx.keystroke_interval_ms;
        Observable::new(move |subscriber| {
            for (n, prefix) in (1u64..).zip(prefixes.iter().cloned()) {
                let subscriber = subscriber.clone();
                clock.schedule(interval.saturating_mul(n), move || subscriber.next(prefix));
            }
            Teardown::none()
        })
    };

    let recorder = Recorder::new();
    let queries = fx.queries.clone();
    typing
        .switch_map(move |input| queries.lookup_autocomplete_suggestions(input))
        .subscribe(recorder.clone());

    for superseded in 0..fx.prefixes.len() {
        fx.clock.advance_millis(fx.keystroke_interval_ms.saturating_add(1));
        let unsubscribes = fx.queries.unsubscribes().len();
        ensure!(
            unsubscribes == superseded,
            "after keystroke {}: expected {superseded} unsubscribes, got {unsubscribes}",
            superseded + 1
        );
    }
    ensure!(recorder.next_count() == 0, "a lookup answered before the last keystroke settled");

    fx.clock.advance_millis(fx.lookup_settle_ms);
    ensure!(
        fx.queries.unsubscribes().len() == fx.prefixes.len(),
        "the final lookup was not torn down after completing"
    );
    let results = recorder.last().context("the final lookup never answered")?;
    ensure!(results.len() == 3, "expected 3 suggestions, got {}", results.len());
    Ok(())
}
