//! Wipe and bang transitions
//!
//! A transition temporarily replaces the time with an alternate value
//! (normally the date) and then reverts. One full cycle is
//! `2 × in + hold + 2 × out` long and runs through four windows:
//!
//! | window | wipe | bang |
//! |---|---|---|
//! | blank-in (`in`) | blank digits left to right | blank all |
//! | reveal (`in`) | alternate digits left to right | alternate on all |
//! | hold (`hold`) | keep the live alternate value | keep the live alternate value |
//! | blank-out (`out`) | blank digits left to right | blank all |
//! | revert (`out`) | regular digits left to right | regular on all |
//!
//! Elapsed time is measured with saturating subtraction on the 64-bit
//! [`Instant`], so a `now` before the start instant counts as zero elapsed
//! and the counter never wraps in practice.

use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::config::TransitionTimings;
use crate::digits::{DIGIT_COUNT, Digits, DisplayType};
use crate::output::OutputManager;

const TRANSITION_WIPE: u8 = 1;
const TRANSITION_BANG: u8 = 2;

/// Known transition styles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum TransitionKind {
    /// Progress digit by digit, left to right
    Wipe = TRANSITION_WIPE,
    /// Act on all digits at once
    Bang = TRANSITION_BANG,
}

impl TransitionKind {
    /// Decode a raw id, `0` means transitions are switched off.
    pub const fn from_raw(value: u8) -> Option<Self> {
        match value {
            TRANSITION_WIPE => Some(Self::Wipe),
            TRANSITION_BANG => Some(Self::Bang),
            _ => None,
        }
    }
}

/// Window of the transition cycle `elapsed` falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Milliseconds into the blank-in window
    BlankIn(u64),
    Reveal(u64),
    Hold,
    BlankOut(u64),
    Revert(u64),
}

/// One transition effect with fixed phase durations.
#[derive(Debug, Clone)]
pub struct Transition {
    kind: TransitionKind,
    timings: TransitionTimings,
    started: Instant,
    end: Option<Instant>,
    regular: Digits,
    alternate: Digits,
}

impl Transition {
    /// Create an idle transition.
    pub const fn new(kind: TransitionKind, timings: TransitionTimings) -> Self {
        Self {
            kind,
            timings,
            started: Instant::from_millis(0),
            end: None,
            regular: [0; DIGIT_COUNT],
            alternate: [0; DIGIT_COUNT],
        }
    }

    pub const fn kind(&self) -> TransitionKind {
        self.kind
    }

    /// Total length of one cycle.
    pub fn total_duration(&self) -> Duration {
        let timings = &self.timings;
        timings.effect_in * 2 + timings.hold + timings.effect_out * 2
    }

    /// Begin the effect, snapshotting the regular and alternate digits.
    ///
    /// Does nothing while the effect is already on display. Returns true if a
    /// new cycle was started.
    pub fn start(&mut self, now: Instant, regular: Digits, alternate: Digits) -> bool {
        if self.is_message_on_display(now) {
            return false;
        }
        self.regular = regular;
        self.alternate = alternate;
        self.started = now;
        self.end = Some(now + self.total_duration());
        #[cfg(feature = "esp32-log")]
        println!("[Transition.start] {:?} at {}ms", self.kind, now.as_millis());
        true
    }

    /// True while the effect owns the display.
    pub fn is_message_on_display(&self, now: Instant) -> bool {
        matches!(self.end, Some(end) if now < end)
    }

    /// True until the effect has restored the regular display.
    pub const fn is_pending(&self) -> bool {
        self.end.is_some()
    }

    /// Instant the running effect finishes, `None` when idle.
    pub const fn end(&self) -> Option<Instant> {
        self.end
    }

    /// Abandon the effect, it reports not running from now on.
    pub fn cancel(&mut self) {
        self.end = None;
    }

    /// Keep the seconds of the regular snapshot current so the revert shows
    /// the live time.
    pub fn update_regular_display_seconds(&mut self, second: u8) {
        self.regular[DIGIT_COUNT - 2] = (second / 10) % 10;
        self.regular[DIGIT_COUNT - 1] = second % 10;
    }

    /// Digits restored by the revert phase.
    pub const fn regular_snapshot(&self) -> Digits {
        self.regular
    }

    /// Digits revealed during the hold phase.
    pub const fn alternate_snapshot(&self) -> Digits {
        self.alternate
    }

    /// Apply this tick's digit buffer changes.
    ///
    /// `live_alternate` is the current alternate value, reloaded during the
    /// hold window; `live_regular` is loaded once the cycle completes.
    /// Returns true while the effect is still running. On the first call at
    /// or after the end it restores the regular display and clears its
    /// deadline.
    pub fn run(
        &mut self,
        now: Instant,
        output: &mut OutputManager,
        live_regular: Digits,
        live_alternate: Digits,
        blank_leading: bool,
    ) -> bool {
        let Some(end) = self.end else {
            return false;
        };

        if now >= end {
            output.load(live_regular);
            output.all_normal(blank_leading);
            self.end = None;
            #[cfg(feature = "esp32-log")]
            println!("[Transition.run] {:?} finished", self.kind);
            return false;
        }

        let elapsed = now.saturating_duration_since(self.started).as_millis();
        let phase = self.phase(elapsed);
        match self.kind {
            TransitionKind::Wipe => self.wipe(phase, output, live_alternate, blank_leading),
            TransitionKind::Bang => self.bang(phase, output, live_alternate, blank_leading),
        }
        true
    }

    fn phase(&self, elapsed: u64) -> Phase {
        let effect_in = self.timings.effect_in.as_millis();
        let effect_out = self.timings.effect_out.as_millis();
        let hold = self.timings.hold.as_millis();

        if elapsed < effect_in {
            Phase::BlankIn(elapsed)
        } else if elapsed < effect_in * 2 {
            Phase::Reveal(elapsed - effect_in)
        } else if elapsed < effect_in * 2 + hold {
            Phase::Hold
        } else if elapsed < effect_in * 2 + hold + effect_out {
            Phase::BlankOut(elapsed - effect_in * 2 - hold)
        } else {
            Phase::Revert(elapsed - effect_in * 2 - hold - effect_out)
        }
    }

    fn wipe(
        &self,
        phase: Phase,
        output: &mut OutputManager,
        live_alternate: Digits,
        blank_leading: bool,
    ) {
        let effect_in = self.timings.effect_in.as_millis();
        let effect_out = self.timings.effect_out.as_millis();
        // Every digit the sweep has crossed is updated, so a slow tick rate
        // never leaves a digit behind
        match phase {
            Phase::BlankIn(ms) => {
                // DIGIT_COUNT + 1 steps so the last digit blanks before the window ends
                let crossed = sweep_index(ms, effect_in, DIGIT_COUNT + 1);
                for digit in 0..crossed {
                    output.set_display_type(digit, DisplayType::Blanked);
                }
            }
            Phase::Reveal(ms) => {
                let last = sweep_index(ms, effect_in, DIGIT_COUNT);
                for digit in 0..=last {
                    output.set_digit(digit, self.alternate[digit]);
                    output.set_display_type(digit, DisplayType::Normal);
                }
            }
            Phase::Hold => output.load(live_alternate),
            Phase::BlankOut(ms) => {
                let last = sweep_index(ms, effect_out, DIGIT_COUNT);
                for digit in 0..=last {
                    output.set_display_type(digit, DisplayType::Blanked);
                }
            }
            Phase::Revert(ms) => {
                let last = sweep_index(ms, effect_out, DIGIT_COUNT);
                for digit in 0..=last {
                    let value = self.regular[digit];
                    output.set_digit(digit, value);
                    if !blank_leading || digit != 0 || value != 0 {
                        output.set_display_type(digit, DisplayType::Normal);
                    }
                }
            }
        }
    }

    fn bang(
        &self,
        phase: Phase,
        output: &mut OutputManager,
        live_alternate: Digits,
        blank_leading: bool,
    ) {
        match phase {
            Phase::BlankIn(_) | Phase::BlankOut(_) => output.all_blanked(),
            Phase::Reveal(_) | Phase::Hold => {
                output.load(live_alternate);
                output.all_normal(false);
            }
            Phase::Revert(_) => {
                output.load(self.regular);
                output.all_normal(blank_leading);
            }
        }
    }
}

/// Digit index reached `ms` into a sweep of `steps` over `window`.
fn sweep_index(ms: u64, window: u64, steps: usize) -> usize {
    let window = window.max(1);
    #[allow(clippy::cast_possible_truncation)]
    let index = (ms * steps as u64 / window) as usize;
    index.min(steps - 1)
}
