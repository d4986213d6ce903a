//! Drill harness: configuration, logging, the drill catalog, and the runner.
//!
//! ## Structure
//!
//! - [`config`] - CLI and environment configuration (`DrillConfig`).
//! - [`telemetry`] - `tracing-subscriber` setup.
//! - [`fixture`] - fresh stub services for one drill.
//! - [`drills`] - the drill catalog.
//! - [`runner`] - selects and runs drills, collecting a report.

pub mod config;
pub mod drills;
pub mod fixture;
pub mod runner;
pub mod telemetry;
#[cfg(test)]
mod tests;
