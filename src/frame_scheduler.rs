//! Frame scheduling and timing utilities.
//!
//! Paces the refresh ticks without async/await or platform timers. The
//! caller sleeps between ticks for the returned duration.

use embassy_time::{Duration, Instant};

use crate::backlight::DiagnosticStatus;
use crate::renderer::{Renderer, TickInputs};
use crate::{LedDriver, TubeDriver};

/// Default refresh rate of the multiplexed display.
pub const DEFAULT_FPS: u32 = 100;

pub const DEFAULT_FRAME_DURATION: Duration = Duration::from_millis(1000 / DEFAULT_FPS as u64);

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame, zero when behind schedule.
    pub sleep_duration: Duration,
}

/// Drives the renderer at a fixed rate and pushes every frame to the tube
/// and LED drivers.
///
/// ```ignore
/// let mut scheduler = FrameScheduler::new(renderer, tubes, leds);
///
/// loop {
///     let inputs = TickInputs { now: Instant::now(), /* .. */ };
///     let result = scheduler.tick(&inputs);
///     sleep(result.sleep_duration);
/// }
/// ```
pub struct FrameScheduler<'a, T: TubeDriver, L: LedDriver, const INTENT_CHANNEL_SIZE: usize> {
    tubes: T,
    leds: L,
    renderer: Renderer<'a, INTENT_CHANNEL_SIZE>,
    next_frame: Instant,
    frame_duration: Duration,
}

impl<'a, T: TubeDriver, L: LedDriver, const INTENT_CHANNEL_SIZE: usize>
    FrameScheduler<'a, T, L, INTENT_CHANNEL_SIZE>
{
    /// Uses [`DEFAULT_FRAME_DURATION`] for frame timing.
    pub fn new(renderer: Renderer<'a, INTENT_CHANNEL_SIZE>, tubes: T, leds: L) -> Self {
        Self::with_frame_duration(renderer, tubes, leds, DEFAULT_FRAME_DURATION)
    }

    /// Create a scheduler with a custom frame duration.
    pub fn with_frame_duration(
        renderer: Renderer<'a, INTENT_CHANNEL_SIZE>,
        tubes: T,
        leds: L,
        frame_duration: Duration,
    ) -> Self {
        Self {
            tubes,
            leds,
            renderer,
            next_frame: Instant::from_millis(0),
            frame_duration,
        }
    }

    /// Render one tick, write it out and return the next deadline.
    pub fn tick(&mut self, inputs: &TickInputs<'_>) -> FrameResult {
        let now = inputs.now;
        // After a long stall skip the backlog instead of bursting to catch up
        let max_drift = self.frame_duration * 2;
        if now > self.next_frame + max_drift {
            self.next_frame = now;
        }

        let frame = self.renderer.render(inputs);
        self.tubes.write(frame.sub_frames);
        self.leds.write(frame.pixels);

        self.advance(now)
    }

    /// Write one power-on diagnostic frame.
    pub fn diagnostic(
        &mut self,
        now: Instant,
        value: u32,
        step: usize,
        status: DiagnosticStatus,
    ) -> FrameResult {
        let frame = self.renderer.render_diagnostic(value, step, status);
        self.tubes.write(frame.sub_frames);
        self.leds.write(frame.pixels);

        self.next_frame = now;
        self.advance(now)
    }

    fn advance(&mut self, now: Instant) -> FrameResult {
        self.next_frame += self.frame_duration;
        FrameResult {
            next_deadline: self.next_frame,
            sleep_duration: self.next_frame.saturating_duration_since(now),
        }
    }

    /// Returns the renderer.
    pub const fn renderer(&self) -> &Renderer<'a, INTENT_CHANNEL_SIZE> {
        &self.renderer
    }

    /// Returns the renderer mutably.
    pub const fn renderer_mut(&mut self) -> &mut Renderer<'a, INTENT_CHANNEL_SIZE> {
        &mut self.renderer
    }

    /// Returns the tube driver.
    pub const fn tube_driver(&self) -> &T {
        &self.tubes
    }

    /// Returns the LED driver.
    pub const fn led_driver(&self) -> &L {
        &self.leds
    }
}
