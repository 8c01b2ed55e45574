//! LED brightness pipeline
//!
//! Every raw backlight channel goes through the same chain:
//! `raw × pulse × user dim × ambient`, truncated to a byte and then mapped
//! through [`crate::gamma::DIM_CURVE`]. Pulse and ambient only take part when
//! enabled in the [`BacklightConfig`].

use crate::color::Rgb;
use crate::config::BacklightConfig;
use crate::output::AMBIENT_MAX;

mod level;

pub use level::LevelFilter;

/// Length of one pulse period, the pulse value counts milliseconds into it.
pub const PULSE_PERIOD_MS: u16 = 1000;

pub(crate) trait Filter {
    /// Apply the filter to a frame of raw colours
    fn apply(&self, frame: &mut [Rgb]);
}

/// Readings the pipeline depends on, sampled once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelInputs {
    /// Ambient light, 0 = dark .. [`AMBIENT_MAX`] = bright
    pub ambient: u16,
    /// Milliseconds into the current second
    pub pulse_ms: u16,
    /// LEDs forced off
    pub blanked: bool,
}

/// Backlight and underlight level filters for one tick.
#[derive(Debug, Clone, Copy)]
pub struct FilterProcessor {
    pub backlight: LevelFilter,
    pub underlight: LevelFilter,
}

impl FilterProcessor {
    /// Build both filters for this tick.
    pub fn new(config: &BacklightConfig, inputs: LevelInputs) -> Self {
        let pulse = config
            .use_pulse
            .then(|| pulse_factor(inputs.pulse_ms));
        let ambient = config
            .use_ambient
            .then(|| ambient_factor(inputs.ambient));
        let level = |percent: u8| {
            if inputs.blanked {
                LevelFilter::off()
            } else {
                LevelFilter::new(pulse, percent_factor(percent), ambient)
            }
        };
        Self {
            backlight: level(config.backlight_dim),
            underlight: level(config.underlight_dim),
        }
    }

    /// Dim a raw backlight frame in place.
    pub fn apply_backlight(&self, frame: &mut [Rgb]) {
        self.backlight.apply(frame);
    }

    /// Dim a raw underlight frame in place.
    pub fn apply_underlight(&self, frame: &mut [Rgb]) {
        self.underlight.apply(frame);
    }
}

/// Pulse brightness, rising from 0 to 1 over each second.
pub fn pulse_factor(pulse_ms: u16) -> f32 {
    f32::from(pulse_ms.min(PULSE_PERIOD_MS)) / f32::from(PULSE_PERIOD_MS)
}

/// Ambient brightness, 0 in the dark and 1 in full light.
pub fn ambient_factor(ambient: u16) -> f32 {
    f32::from(ambient.min(AMBIENT_MAX)) / f32::from(AMBIENT_MAX)
}

/// User dim setting in percent as a factor.
pub fn percent_factor(percent: u8) -> f32 {
    f32::from(percent.min(100)) / 100.0
}
