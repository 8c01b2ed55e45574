#![no_std]

pub mod backlight;
pub mod channel;
pub mod clock;
pub mod color;
pub mod config;
pub mod digits;
pub mod encoder;
pub mod filter;
pub mod frame_scheduler;
pub mod gamma;
pub mod intent_processor;
pub mod output;
pub mod renderer;
pub mod transition;

pub use backlight::{BacklightManager, BacklightMode, DiagnosticStatus, PIXEL_COUNT};
pub use clock::ClockTime;
pub use config::{
    BacklightConfig, DateFormat, DisplayConfig, SeparatorDim, TransitionTimings, TubeConfig,
};
pub use digits::{DIGIT_COUNT, DigitBuffer, Digits, DisplayType, ValueBuffer};
pub use encoder::{COUNTS_PER_DIGIT, SubFrames};
pub use filter::LevelInputs;
pub use frame_scheduler::FrameScheduler;
pub use gamma::dim_curve;
pub use intent_processor::{
    DisplayIntent, DisplayMode, IntentChannel, IntentEffects, IntentProcessor, IntentReceiver,
    IntentSender, ValueRequest,
};
pub use output::{OutputManager, TimeField};
pub use renderer::{Frame, Renderer, TickInputs};
pub use transition::{Transition, TransitionKind};

pub use color::Rgb;
pub use embassy_time::{Duration, Instant};

/// Shift-register driver for the two HV5622 chains.
///
/// Implement this trait to clock the sub-frames out on a given board.
pub trait TubeDriver {
    /// Write one tick's sub-frames, slot 0 first
    fn write(&mut self, frames: &SubFrames);
}

/// Addressable LED driver for the backlights and underlights.
pub trait LedDriver {
    /// Write colors to the LED chain
    fn write(&mut self, colors: &[Rgb]);
}
