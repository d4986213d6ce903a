use anyhow::bail;
use clap::{Parser, ValueEnum};
use rivulet_services::{
    DEFAULT_KEYSTROKE_INTERVAL_MS, DEFAULT_LOOKUP_LATENCY_MS, DEFAULT_SERVICE_LATENCY_MS,
    DEFAULT_WORD,
};

/// Virtual time every drill advances by to let a fetch settle.
pub const SETTLE_TICK_MS: u64 = 100;

/// Extra time beyond the lookup latency granted when waiting for the last
/// lookup to answer.
pub const LOOKUP_SETTLE_PADDING_MS: u64 = 50;

/// Output format of the log lines.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable, one line per event.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Runtime configuration for the `rivulet-drills` binary.
///
/// Timings are in virtual milliseconds. The defaults are the stub services'
/// own defaults; every value can be overridden through the CLI or the
/// environment (including a `.env` file).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "rivulet-drills",
    version,
    about = "Checks stream combinator behavior against scripted stub services"
)]
pub struct CliArgs {
    /// Latency of every location service call.
    ///
    /// Sequential drills chain two calls inside one settle tick, so twice
    /// this value must fit in 100 ms.
    ///
    /// Environment variable: `SERVICE_LATENCY_MS`
    #[arg(long, env = "SERVICE_LATENCY_MS", default_value_t = DEFAULT_SERVICE_LATENCY_MS)]
    pub service_latency_ms: u64,

    /// Latency of an autocomplete lookup.
    ///
    /// Must be long enough for the next keystroke to supersede a pending
    /// lookup.
    ///
    /// Environment variable: `LOOKUP_LATENCY_MS`
    #[arg(long, env = "LOOKUP_LATENCY_MS", default_value_t = DEFAULT_LOOKUP_LATENCY_MS)]
    pub lookup_latency_ms: u64,

    /// Time between two simulated keystrokes.
    ///
    /// Environment variable: `KEYSTROKE_INTERVAL_MS`
    #[arg(long, env = "KEYSTROKE_INTERVAL_MS", default_value_t = DEFAULT_KEYSTROKE_INTERVAL_MS)]
    pub keystroke_interval_ms: u64,

    /// Word typed by the keystroke simulator, one character per keystroke.
    ///
    /// Environment variable: `DRILL_WORD`
    #[arg(long, env = "DRILL_WORD", default_value_t = String::from(DEFAULT_WORD))]
    pub word: String,

    /// Run only the given drill or drill group. Repeatable.
    ///
    /// Example: `--only combine --only challenges/update_then_refetch`
    #[arg(long, value_name = "DRILL")]
    pub only: Vec<String>,

    /// Print the drill catalog and exit.
    #[arg(long, default_value_t = false)]
    pub list: bool,

    /// Log output format.
    ///
    /// Environment variable: `LOG_FORMAT`
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone)]
pub struct DrillConfig {
    pub service_latency_ms: u64,
    pub lookup_latency_ms: u64,
    pub keystroke_interval_ms: u64,
    /// How far waiting for lookup results advances the clock.
    pub lookup_settle_ms: u64,
    pub word: String,
    /// Number of keystrokes needed to type `word`.
    pub keystrokes: usize,
    pub only: Vec<String>,
    pub list: bool,
    pub log_format: LogFormat,
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self {
            service_latency_ms: DEFAULT_SERVICE_LATENCY_MS,
            lookup_latency_ms: DEFAULT_LOOKUP_LATENCY_MS,
            keystroke_interval_ms: DEFAULT_KEYSTROKE_INTERVAL_MS,
            lookup_settle_ms: DEFAULT_LOOKUP_LATENCY_MS + LOOKUP_SETTLE_PADDING_MS,
            word: String::from(DEFAULT_WORD),
            keystrokes: DEFAULT_WORD.chars().count(),
            only: Vec::new(),
            list: false,
            log_format: LogFormat::default(),
        }
    }
}

impl TryFrom<CliArgs> for DrillConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.service_latency_ms == 0 {
            bail!("SERVICE_LATENCY_MS must be greater than 0");
        }

        if args.service_latency_ms.saturating_mul(2) > SETTLE_TICK_MS {
            bail!(
                "SERVICE_LATENCY_MS ({}) is too long: two chained calls must settle within {} ms",
                args.service_latency_ms,
                SETTLE_TICK_MS
            );
        }

        if args.word.is_empty() {
            bail!("DRILL_WORD must not be empty");
        }

        let keystrokes = args.word.chars().count();
        // Keystroke `k` is observed at `k * (interval + 1)`, which must come
        // before keystroke `k + 1` fires.
        if args.keystroke_interval_ms <= keystrokes as u64 {
            bail!(
                "KEYSTROKE_INTERVAL_MS ({}) must exceed the number of keystrokes ({})",
                args.keystroke_interval_ms,
                keystrokes
            );
        }

        if args
            .keystroke_interval_ms
            .checked_mul(keystrokes as u64)
            .is_none()
        {
            bail!(
                "KEYSTROKE_INTERVAL_MS ({}) is too long: the last of {} keystrokes would overflow the clock",
                args.keystroke_interval_ms,
                keystrokes
            );
        }

        // Each keystroke is observed `keystroke_interval_ms + 1` after the
        // previous one; the lookup it superseded must still be pending then.
        let min_lookup = args
            .keystroke_interval_ms
            .saturating_add(keystrokes as u64);
        if args.lookup_latency_ms <= min_lookup {
            bail!(
                "LOOKUP_LATENCY_MS ({}) must exceed {} ms so every keystroke supersedes a pending lookup",
                args.lookup_latency_ms,
                min_lookup
            );
        }

        let lookup_settle_ms = args
            .lookup_latency_ms
            .checked_add(LOOKUP_SETTLE_PADDING_MS)
            .ok_or_else(|| anyhow::anyhow!("Overflow in lookup settle computation"))?;

        Ok(Self {
            service_latency_ms: args.service_latency_ms,
            lookup_latency_ms: args.lookup_latency_ms,
            keystroke_interval_ms: args.keystroke_interval_ms,
            lookup_settle_ms,
            word: args.word,
            keystrokes,
            only: args.only,
            list: args.list,
            log_format: args.log_format,
        })
    }
}
