//! Runs the stream drills against fresh stub services and reports every
//! result through `tracing`.
//!
//! ```bash
//! rivulet-drills --list
//! rivulet-drills --only combine --only challenges/abort_ongoing_lookups
//! RUST_LOG=debug rivulet-drills --log-format json
//! ```

mod harness;

use anyhow::bail;
use clap::Parser;
use harness::config::{CliArgs, DrillConfig};
use harness::drills::DRILLS;
use harness::runner::run_drills;
use harness::telemetry::init_telemetry;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = DrillConfig::try_from(args)?;

    if config.list {
        for drill in DRILLS {
            println!("{:<48} {}", drill.id(), drill.summary);
        }
        return Ok(());
    }

    init_telemetry(config.log_format)?;
    log_startup_info(&config);

    let report = run_drills(&config)?;
    tracing::info!(
        passed = report.passed.len(),
        failed = report.failed.len(),
        "Drills finished"
    );

    if !report.failed.is_empty() {
        bail!(
            "{} of {} drills failed: {}",
            report.failed.len(),
            report.total(),
            report.failed.join(", ")
        );
    }
    Ok(())
}

fn log_startup_info(config: &DrillConfig) {
    if cfg!(debug_assertions) {
        tracing::info!("Starting drills with full config: {:#?}", config);
    } else {
        tracing::info!(
            "Starting drills with {} ms service latency and {} ms lookup latency",
            config.service_latency_ms,
            config.lookup_latency_ms
        );
    }
}
