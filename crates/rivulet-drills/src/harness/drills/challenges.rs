use anyhow::{Context, ensure};
use rivulet::{Recorder, combine_latest2, concat, fork_join2};
use rivulet_services::{Filter, LocationForm, LocationsAndGroups, TimeResolution};

use crate::harness::fixture::Fixture;

/// Locations and groups requested together, delivered together.
pub fn parallel_requests(fx: &Fixture) -> anyhow::Result<()> {
    let recorder = Recorder::new();
    fork_join2(fx.locations.get_locations(), fx.locations.get_location_groups())
        .map(|(locations, groups)| LocationsAndGroups {
            locations: locations.unwrap_or_default(),
            groups: groups.unwrap_or_default(),
        })
        .subscribe(recorder.clone());
    fx.settle();

    let result = recorder.last().context("no result")?;
    ensure!(result.locations.len() == 3, "expected 3 locations, got {}", result.locations.len());
    ensure!(result.groups.len() == 2, "expected 2 groups, got {}", result.groups.len());

    // The groups can now be populated with the fetched instances.
    let populated = result
        .groups
        .iter()
        .map(|group| result.members(group).count())
        .sum::<usize>();
    ensure!(populated == 4, "expected 4 group memberships, got {populated}");
    Ok(())
}

/// Every tenant change triggers a fresh fetch, continuously.
pub fn refetch_on_tenant_change(fx: &Fixture) -> anyhow::Result<()> {
    let recorder = Recorder::new();
    let locations = fx.locations.clone();
    fx.tenants
        .tenant_settings_changes()
        .switch_map(move |_| locations.get_locations())
        .subscribe(recorder.clone());
    fx.settle();
    ensure!(recorder.next_count() == 1, "expected 1 result for the initial tenant");

    fx.tenants.change_tenant("my-new-tenant-id");
    fx.settle();
    ensure!(
        recorder.next_count() == 2,
        "expected 2 results after one tenant change, got {}",
        recorder.next_count()
    );
    Ok(())
}

/// Update first, reload all locations afterwards, with a single subscription.
pub fn update_then_refetch(fx: &Fixture) -> anyhow::Result<()> {
    let recorder = Recorder::new();
    concat(vec![
        fx.locations
            .update_location(Fixture::my_new_location())
            .map(|()| Vec::new()),
        fx.locations.get_locations(),
    ])
    .subscribe(recorder.clone());
    fx.settle();

    let result = recorder.last().context("no result")?;
    ensure!(result.len() == 4, "expected 4 locations, got {}", result.len());
    ensure!(
        result[3].name == Fixture::my_new_location().name,
        "the 4th location is {:?}",
        result[3].name
    );
    Ok(())
}

/// Only the lookup for the latest keystroke may answer.
pub fn abort_ongoing_lookups(fx: &Fixture) -> anyhow::Result<()> {
    let simulator = fx.typing.typing_simulator();

    let recorder = Recorder::new();
    let queries = fx.queries.clone();
    simulator
        .on_key_up()
        .switch_map(move |input| queries.lookup_autocomplete_suggestions(input))
        .subscribe(recorder.clone());

    for superseded in 0..fx.prefixes.len() {
        simulator.next_key_stroke();
        let unsubscribes = fx.queries.unsubscribes().len();
        ensure!(
            unsubscribes == superseded,
            "after keystroke {}: expected {superseded} unsubscribes, got {unsubscribes}",
            superseded + 1
        );
    }
    ensure!(recorder.next_count() == 0, "a superseded lookup answered");

    simulator.wait_for_results();
    let unsubscribes = fx.queries.unsubscribes().len();
    ensure!(
        unsubscribes == fx.prefixes.len(),
        "expected {} unsubscribes, got {unsubscribes}",
        fx.prefixes.len()
    );
    ensure!(
        fx.queries.cancellations().len() == fx.prefixes.len() - 1,
        "expected every superseded lookup to be cancelled"
    );
    ensure!(
        fx.queries.queries() == fx.prefixes,
        "lookups ran for {:?}",
        fx.queries.queries()
    );
    let results = recorder.last().context("the final lookup never answered")?;
    ensure!(results.len() == 3, "expected 3 suggestions, got {}", results.len());
    Ok(())
}

/// The edit form saves in place, then the overview reloads.
pub fn edit_form_then_refetch(fx: &Fixture) -> anyhow::Result<()> {
    let mut location = Fixture::my_new_location();
    let mut form = LocationForm::new(&location);
    ensure!(!form.is_valid(), "a location without a city must not validate");

    form.set_city("Bern");
    let update = form.save(&mut location, &fx.locations)?;
    ensure!(
        location.city.as_deref() == Some("Bern"),
        "save did not write back the city"
    );

    let recorder = Recorder::new();
    update
        .map(|()| Vec::new())
        .concat_with(fx.locations.get_locations())
        .subscribe(recorder.clone());
    fx.settle();

    let result = recorder.last().context("no result")?;
    ensure!(result.last() == Some(&location), "the saved location was not reloaded");
    Ok(())
}

/// A change to either setting refetches; the latest settings drive the query.
pub fn refetch_on_any_setting(fx: &Fixture) -> anyhow::Result<()> {
    let recorder = Recorder::new();
    let locations = fx.locations.clone();
    combine_latest2(fx.tenants.tenant_settings_changes(), fx.filters.filter_changes())
        .switch_map(move |(tenant, filter)| {
            locations
                .get_locations()
                .map(move |found| (tenant.tenant_id.clone(), filter.time_resolution, found.len()))
        })
        .subscribe(recorder.clone());
    fx.settle();

    fx.tenants.change_tenant("my-new-tenant-id");
    fx.settle();
    fx.filters.set_filter(Filter {
        time_resolution: TimeResolution::Month,
    });
    fx.settle();

    let results = recorder.values();
    ensure!(results.len() == 3, "expected 3 fetches, got {}", results.len());
    ensure!(
        results.last()
            == Some(&(String::from("my-new-tenant-id"), TimeResolution::Month, 3)),
        "unexpected final fetch {:?}",
        results.last()
    );
    Ok(())
}
