use anyhow::ensure;
use rivulet::{Recorder, combine_latest2};

use crate::harness::fixture::Fixture;

/// `combine_latest` needs a value from every input, and an update never
/// produces one.
pub fn combine_latest_after_update(fx: &Fixture) -> anyhow::Result<()> {
    let recorder = Recorder::new();
    combine_latest2(
        fx.locations.update_location(Fixture::my_new_location()),
        fx.locations.get_location_groups(),
    )
    .subscribe(recorder.clone());
    fx.settle();

    ensure!(
        recorder.next_count() == 0,
        "combine_latest emitted although the update is void"
    );
    Ok(())
}
