use core::fmt;

use rivulet::{Observable, Teardown, VirtualClock};

/// The word typed by a default simulator.
pub const DEFAULT_WORD: &str = "Hell";

/// Time between two simulated keystrokes.
pub const DEFAULT_KEYSTROKE_INTERVAL_MS: u64 = 200;

/// How long [`TypingSimulator::wait_for_results`] advances by default.
pub const DEFAULT_SETTLE_MS: u64 = 300;

/// Builds [`TypingSimulator`]s on one clock.
#[derive(Clone)]
pub struct TypingSimulatorService {
    clock: VirtualClock,
    word: String,
    interval_ms: u64,
    settle_ms: u64,
}

impl TypingSimulatorService {
    /// Types [`DEFAULT_WORD`] one character every
    /// [`DEFAULT_KEYSTROKE_INTERVAL_MS`].
    pub fn new(clock: &VirtualClock) -> Self {
        Self::with_timing(
            clock,
            DEFAULT_WORD,
            DEFAULT_KEYSTROKE_INTERVAL_MS,
            DEFAULT_SETTLE_MS,
        )
    }

    /// Types `word` one character every `interval_ms`; waiting for results
    /// advances `settle_ms`.
    pub fn with_timing(
        clock: &VirtualClock,
        word: impl Into<String>,
        interval_ms: u64,
        settle_ms: u64,
    ) -> Self {
        Self {
            clock: clock.clone(),
            word: word.into(),
            interval_ms,
            settle_ms,
        }
    }

    pub fn typing_simulator(&self) -> TypingSimulator {
        TypingSimulator {
            on_key_up: keystrokes(&self.clock, &self.word, self.interval_ms),
            clock: self.clock.clone(),
            interval_ms: self.interval_ms,
            settle_ms: self.settle_ms,
        }
    }
}

impl fmt::Debug for TypingSimulatorService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypingSimulatorService")
            .field("word", &self.word)
            .field("interval_ms", &self.interval_ms)
            .field("settle_ms", &self.settle_ms)
            .finish()
    }
}

/// A scripted user typing into a search box.
///
/// [`TypingSimulator::on_key_up`] emits the growing prefixes of the word,
/// one per keystroke interval after subscription, and never completes. The
/// driver methods move the shared clock so a drill can observe the state
/// between keystrokes.
pub struct TypingSimulator {
    on_key_up: Observable<String>,
    clock: VirtualClock,
    interval_ms: u64,
    settle_ms: u64,
}

impl TypingSimulator {
    pub fn on_key_up(&self) -> Observable<String> {
        self.on_key_up.clone()
    }

    /// Advances just past the next keystroke.
    pub fn next_key_stroke(&self) -> usize {
        self.clock.advance_millis(self.interval_ms.saturating_add(1))
    }

    /// Advances far enough for the lookup of the last keystroke to answer.
    pub fn wait_for_results(&self) -> usize {
        self.clock.advance_millis(self.settle_ms)
    }
}

impl fmt::Debug for TypingSimulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypingSimulator")
            .field("interval_ms", &self.interval_ms)
            .field("settle_ms", &self.settle_ms)
            .finish_non_exhaustive()
    }
}

fn keystrokes(clock: &VirtualClock, word: &str, interval_ms: u64) -> Observable<String> {
    let prefixes: Vec<String> = word
        .char_indices()
        .map(|(at, c)| word[..at + c.len_utf8()].to_owned())
        .collect();
    let clock = clock.clone();

    Observable::new(move |subscriber| {
        let timers: Vec<_> = (1u64..)
            .zip(prefixes.iter().cloned())
            .map(|(n, prefix)| {
                let subscriber = subscriber.clone();
                clock.schedule(interval_ms.saturating_mul(n), move || subscriber.next(prefix))
            })
            .collect();

        let clock = clock.clone();
        Teardown::new(move || {
            for id in timers {
                clock.cancel(id);
            }
        })
    })
}
