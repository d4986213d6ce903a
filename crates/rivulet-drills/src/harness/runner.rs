use anyhow::bail;

use crate::harness::{
    config::DrillConfig,
    drills::{DRILLS, Drill},
    fixture::Fixture,
};

/// Outcome of one run, as drill ids.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Report {
    pub passed: Vec<String>,
    pub failed: Vec<String>,
}

impl Report {
    pub fn total(&self) -> usize {
        self.passed.len() + self.failed.len()
    }
}

/// The drills selected by `only`, in catalog order. An empty selection means
/// every drill; a selector matching nothing is an error.
pub fn select<'a>(drills: &'a [Drill], only: &[String]) -> anyhow::Result<Vec<&'a Drill>> {
    if let Some(unknown) = only
        .iter()
        .find(|selector| !drills.iter().any(|drill| drill.matches(selector)))
    {
        bail!("No drill or drill group named `{unknown}` (see --list)");
    }

    Ok(drills
        .iter()
        .filter(|drill| only.is_empty() || only.iter().any(|selector| drill.matches(selector)))
        .collect())
}

/// Runs every selected drill on its own [`Fixture`].
///
/// A failing drill is logged and recorded; it does not stop the run.
pub fn run_drills(config: &DrillConfig) -> anyhow::Result<Report> {
    let mut report = Report::default();

    for drill in select(DRILLS, &config.only)? {
        let id = drill.id();
        let span = tracing::info_span!("drill", id = %id);
        let _entered = span.enter();

        let fixture = Fixture::new(config);
        match (drill.run)(&fixture) {
            Ok(()) => {
                tracing::info!(virtual_ms = fixture.clock.now_millis(), "Passed");
                report.passed.push(id);
            }
            Err(err) => {
                tracing::error!(error = %format!("{err:#}"), "Failed");
                report.failed.push(id);
            }
        }
    }

    Ok(report)
}
