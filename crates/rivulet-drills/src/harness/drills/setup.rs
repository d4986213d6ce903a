use anyhow::ensure;
use rivulet::Recorder;

use crate::harness::{drills::expect_callbacks, fixture::Fixture};

pub fn fetch_locations(fx: &Fixture) -> anyhow::Result<()> {
    let recorder = Recorder::new();
    fx.locations.get_locations().subscribe(recorder.clone());
    fx.settle();

    let result = recorder.last().unwrap_or_default();
    ensure!(result.len() == 3, "expected 3 locations, got {}", result.len());
    Ok(())
}

pub fn fetch_location_groups(fx: &Fixture) -> anyhow::Result<()> {
    let recorder = Recorder::new();
    fx.locations.get_location_groups().subscribe(recorder.clone());
    fx.settle();

    let result = recorder.last().unwrap_or_default();
    ensure!(result.len() == 2, "expected 2 groups, got {}", result.len());
    Ok(())
}

pub fn update_is_empty(fx: &Fixture) -> anyhow::Result<()> {
    let recorder = Recorder::new();
    fx.locations
        .update_location(Fixture::my_new_location())
        .subscribe(recorder.clone());
    fx.settle();

    expect_callbacks(&recorder, false, true, false)
}
