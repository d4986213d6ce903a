use std::collections::HashSet;

use clap::Parser;

use crate::harness::{
    config::{CliArgs, DrillConfig, LogFormat},
    drills::DRILLS,
    fixture::Fixture,
    runner::{run_drills, select},
};

fn parse(args: &[&str]) -> anyhow::Result<DrillConfig> {
    let args = CliArgs::try_parse_from(core::iter::once("rivulet-drills").chain(args.iter().copied()))?;
    DrillConfig::try_from(args)
}

fn error_of(args: &[&str]) -> String {
    match parse(args) {
        Ok(config) => panic!("expected {args:?} to be rejected, got {config:?}"),
        Err(err) => err.to_string(),
    }
}

#[test]
fn every_drill_passes_with_defaults() {
    let config = DrillConfig::default();
    for drill in DRILLS {
        let fixture = Fixture::new(&config);
        if let Err(err) = (drill.run)(&fixture) {
            panic!("{} failed: {err:#}", drill.id());
        }
    }
}

#[test]
fn every_drill_passes_with_other_timings() {
    let config = parse(&[
        "--service-latency-ms",
        "40",
        "--lookup-latency-ms",
        "120",
        "--keystroke-interval-ms",
        "90",
        "--word",
        "Grüezi",
    ])
    .unwrap();
    let report = run_drills(&config).unwrap();
    assert!(report.failed.is_empty(), "failed: {:?}", report.failed);
    assert_eq!(report.total(), DRILLS.len());
}

#[test]
fn drill_ids_are_unique() {
    let ids: HashSet<_> = DRILLS.iter().map(|drill| drill.id()).collect();
    assert_eq!(ids.len(), DRILLS.len());
}

#[test]
fn default_config_matches_parsed_defaults() {
    let parsed = parse(&[]).unwrap();
    let default = DrillConfig::default();
    assert_eq!(parsed.service_latency_ms, default.service_latency_ms);
    assert_eq!(parsed.lookup_latency_ms, default.lookup_latency_ms);
    assert_eq!(parsed.keystroke_interval_ms, default.keystroke_interval_ms);
    assert_eq!(parsed.lookup_settle_ms, 300);
    assert_eq!(parsed.word, "Hell");
    assert_eq!(parsed.keystrokes, 4);
    assert_eq!(parsed.log_format, LogFormat::Text);
}

#[test]
fn rejects_zero_service_latency() {
    assert!(error_of(&["--service-latency-ms", "0"]).contains("greater than 0"));
}

#[test]
fn rejects_service_latency_that_cannot_settle() {
    assert!(error_of(&["--service-latency-ms", "51"]).contains("too long"));
    assert!(parse(&["--service-latency-ms", "50"]).is_ok());
}

#[test]
fn rejects_empty_word() {
    assert!(error_of(&["--word", ""]).contains("must not be empty"));
}

#[test]
fn rejects_keystroke_interval_not_exceeding_keystrokes() {
    let err = error_of(&["--keystroke-interval-ms", "4", "--lookup-latency-ms", "250"]);
    assert!(err.contains("number of keystrokes"), "{err}");
}

#[test]
fn rejects_lookup_that_answers_before_the_next_keystroke() {
    // 200 ms interval plus one tick per each of the 4 keystrokes.
    let err = error_of(&["--lookup-latency-ms", "204"]);
    assert!(err.contains("supersedes a pending lookup"), "{err}");
    assert!(parse(&["--lookup-latency-ms", "205"]).is_ok());
}

#[test]
fn rejects_overflowing_keystroke_schedule() {
    let err = error_of(&[
        "--keystroke-interval-ms",
        "4611686018427387904",
        "--lookup-latency-ms",
        "4611686018427388000",
    ]);
    assert!(err.contains("overflow the clock"), "{err}");
}

#[test]
fn accepts_largest_keystroke_schedule() {
    // 4 keystrokes of 2^62 - 1 ms still fit in the clock.
    let config = parse(&[
        "--keystroke-interval-ms",
        "4611686018427387903",
        "--lookup-latency-ms",
        "4611686018427388000",
    ])
    .unwrap();
    assert_eq!(config.keystrokes, 4);
    assert_eq!(config.keystroke_interval_ms, 4_611_686_018_427_387_903);
}

#[test]
fn rejects_overflowing_lookup_settle() {
    let max = u64::MAX.to_string();
    assert!(error_of(&["--lookup-latency-ms", max.as_str()]).contains("Overflow"));
}

#[test]
fn parses_json_log_format() {
    assert_eq!(parse(&["--log-format", "json"]).unwrap().log_format, LogFormat::Json);
}

#[test]
fn selects_groups_and_single_drills() {
    let only = vec![String::from("setup"), String::from("combine/switch_map")];
    let ids: Vec<_> = select(DRILLS, &only)
        .unwrap()
        .into_iter()
        .map(|drill| drill.id())
        .collect();
    assert_eq!(
        ids,
        [
            "setup/fetch_locations",
            "setup/fetch_location_groups",
            "setup/update_is_empty",
            "combine/switch_map",
        ]
    );
}

#[test]
fn selects_everything_without_a_filter() {
    assert_eq!(select(DRILLS, &[]).unwrap().len(), DRILLS.len());
}

#[test]
fn matches_only_whole_names() {
    let drill = DRILLS[0];
    assert!(drill.matches("setup"));
    assert!(drill.matches("setup/fetch_locations"));
    assert!(!drill.matches("set"));
    assert!(!drill.matches("setup/fetch"));
    assert!(!drill.matches("fetch_locations"));
}

#[test]
fn unknown_selector_is_an_error() {
    let config = DrillConfig {
        only: vec![String::from("combine/zip")],
        ..DrillConfig::default()
    };
    let err = run_drills(&config).unwrap_err();
    assert!(err.to_string().contains("combine/zip"));
}

#[test]
fn report_counts_passed_and_failed() {
    let config = DrillConfig {
        only: vec![String::from("empty")],
        ..DrillConfig::default()
    };
    let report = run_drills(&config).unwrap();
    assert_eq!(report.passed.len(), 5);
    assert!(report.failed.is_empty());
    assert_eq!(report.total(), 5);
}
