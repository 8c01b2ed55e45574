//! Configuration snapshot
//!
//! The configuration is owned by the persistence collaborator and handed to
//! the renderer by reference on every tick. Nothing in the crate mutates it.

use embassy_time::Duration;

use crate::backlight::BacklightMode;
use crate::encoder::COUNTS_PER_DIGIT;
use crate::gamma::CHANNEL_STEP_MAX;

pub const FADE_STEPS_DEFAULT: u8 = 50;
pub const FADE_STEPS_MIN: u8 = 20;
pub const FADE_STEPS_MAX: u8 = 200;

pub const SCROLL_STEPS_DEFAULT: u8 = 4;
pub const SCROLL_STEPS_MIN: u8 = 1;
pub const SCROLL_STEPS_MAX: u8 = 80;

pub const MIN_DIM_DEFAULT: u8 = 4;
pub const MIN_DIM_MIN: u8 = 2;
pub const MIN_DIM_MAX: u8 = COUNTS_PER_DIGIT;

pub const CYCLE_SPEED_DEFAULT: u8 = 10;
pub const CYCLE_SPEED_MIN: u8 = 4;
pub const CYCLE_SPEED_MAX: u8 = 64;

pub const LED_DIM_PERCENT_MIN: u8 = 10;
pub const LED_DIM_PERCENT_MAX: u8 = 100;

const DATE_FORMAT_YYMMDD: u8 = 0;
const DATE_FORMAT_MMDDYY: u8 = 1;
const DATE_FORMAT_DDMMYY: u8 = 2;

const SEPARATOR_BRIGHT: u8 = 1;
const SEPARATOR_DIM: u8 = 2;

/// Digit order used when the date is shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum DateFormat {
    YyMmDd = DATE_FORMAT_YYMMDD,
    MmDdYy = DATE_FORMAT_MMDDYY,
    #[default]
    DdMmYy = DATE_FORMAT_DDMMYY,
}

impl DateFormat {
    /// Decode a stored raw id.
    pub const fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            DATE_FORMAT_YYMMDD => Self::YyMmDd,
            DATE_FORMAT_MMDDYY => Self::MmDdYy,
            DATE_FORMAT_DDMMYY => Self::DdMmYy,
            _ => return None,
        })
    }
}

/// How the separator indicator LEDs are driven relative to the tubes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum SeparatorDim {
    /// Same duty cycle as the tubes
    Bright = SEPARATOR_BRIGHT,
    /// A quarter of the tube duty cycle
    #[default]
    Dim = SEPARATOR_DIM,
}

impl SeparatorDim {
    /// Decode a stored raw id.
    pub const fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            SEPARATOR_BRIGHT => Self::Bright,
            SEPARATOR_DIM => Self::Dim,
            _ => return None,
        })
    }
}

/// Tube drive settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TubeConfig {
    /// Crossfade between changing digits
    pub fade: bool,
    /// Ticks a crossfade lasts
    pub fade_steps: u8,
    /// Roll digits down when they return to zero
    pub scroll: bool,
    /// Ticks per roll step
    pub scroll_steps: u8,
    /// Lowest duty cycle the ambient light can push the tubes to
    pub min_dim: u8,
    /// Follow the ambient light sensor
    pub use_ambient: bool,
    pub separator_dim: SeparatorDim,
    /// Blank the hours tens digit when it is zero
    pub blank_leading: bool,
    pub date_format: DateFormat,
    /// Show hours on a 12 hour dial
    pub hour_12: bool,
}

impl Default for TubeConfig {
    fn default() -> Self {
        Self {
            fade: true,
            fade_steps: FADE_STEPS_DEFAULT,
            scroll: false,
            scroll_steps: SCROLL_STEPS_DEFAULT,
            min_dim: MIN_DIM_DEFAULT,
            use_ambient: true,
            separator_dim: SeparatorDim::Dim,
            blank_leading: false,
            date_format: DateFormat::DdMmYy,
            hour_12: false,
        }
    }
}

/// Backlight and underlight settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BacklightConfig {
    pub mode: BacklightMode,
    /// Fixed colour channel steps, 0-15
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    /// Ticks between colour cycle steps
    pub cycle_speed: u8,
    /// Backlight brightness in percent
    pub backlight_dim: u8,
    /// Underlight brightness in percent
    pub underlight_dim: u8,
    /// Dim the LEDs with the ambient light
    pub use_ambient: bool,
    /// Modulate the LEDs with the once-a-second pulse
    pub use_pulse: bool,
}

impl Default for BacklightConfig {
    fn default() -> Self {
        Self {
            mode: BacklightMode::Cycle,
            red: 15,
            green: 0,
            blue: 0,
            cycle_speed: CYCLE_SPEED_DEFAULT,
            backlight_dim: LED_DIM_PERCENT_MAX,
            underlight_dim: LED_DIM_PERCENT_MAX,
            use_ambient: false,
            use_pulse: false,
        }
    }
}

/// Phase durations of the wipe and bang transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionTimings {
    pub effect_in: Duration,
    pub effect_out: Duration,
    pub hold: Duration,
}

impl Default for TransitionTimings {
    fn default() -> Self {
        Self {
            effect_in: Duration::from_millis(800),
            effect_out: Duration::from_millis(700),
            hold: Duration::from_millis(2800),
        }
    }
}

/// Everything the display core reads from the configuration store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayConfig {
    pub tubes: TubeConfig,
    pub backlight: BacklightConfig,
    pub transitions: TransitionTimings,
}

impl DisplayConfig {
    /// Copy with every numeric field forced into its valid range.
    #[must_use]
    pub fn clamped(&self) -> Self {
        let mut config = self.clone();
        let tubes = &mut config.tubes;
        tubes.fade_steps = tubes.fade_steps.clamp(FADE_STEPS_MIN, FADE_STEPS_MAX);
        tubes.scroll_steps = tubes.scroll_steps.clamp(SCROLL_STEPS_MIN, SCROLL_STEPS_MAX);
        tubes.min_dim = tubes.min_dim.clamp(MIN_DIM_MIN, MIN_DIM_MAX);

        let backlight = &mut config.backlight;
        backlight.red = backlight.red.min(CHANNEL_STEP_MAX);
        backlight.green = backlight.green.min(CHANNEL_STEP_MAX);
        backlight.blue = backlight.blue.min(CHANNEL_STEP_MAX);
        backlight.cycle_speed = backlight.cycle_speed.clamp(CYCLE_SPEED_MIN, CYCLE_SPEED_MAX);
        backlight.backlight_dim = backlight
            .backlight_dim
            .clamp(LED_DIM_PERCENT_MIN, LED_DIM_PERCENT_MAX);
        backlight.underlight_dim = backlight
            .underlight_dim
            .clamp(LED_DIM_PERCENT_MIN, LED_DIM_PERCENT_MAX);
        config
    }
}
