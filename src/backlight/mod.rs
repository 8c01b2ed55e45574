//! LED backlight manager
//!
//! Each digit has a backlight and an underlight pixel. The manager picks the
//! raw colours with the configured [`BacklightMode`], runs them through the
//! [`FilterProcessor`] and lays them out in the order the LED chain is wired:
//! backlights 0..5 in digit order, then underlights in reverse digit order.

mod cycle;

pub use cycle::{ColourCycle, DEFAULT_SEED};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::color::{self, BLACK, Rgb};
use crate::config::BacklightConfig;
use crate::digits::{DIGIT_COUNT, Digits};
use crate::filter::{FilterProcessor, LevelInputs};
use crate::gamma::channel_level;

/// Pixels on the LED chain.
pub const PIXEL_COUNT: usize = DIGIT_COUNT * 2;

/// Level of the digits a diagnostic run has not reached yet.
pub const DIAGNOSTIC_PENDING_LEVEL: u8 = 0x1f;

const BACKLIGHT_FIXED: u8 = 0;
const BACKLIGHT_CYCLE: u8 = 1;
const BACKLIGHT_COLOUR_TIME: u8 = 2;
const BACKLIGHT_DAY_OF_WEEK: u8 = 3;

const STATUS_RED: u8 = 0;
const STATUS_YELLOW: u8 = 1;
const STATUS_GREEN: u8 = 2;
const STATUS_BLUE: u8 = 3;

/// Colour strategy for the backlights and underlights.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum BacklightMode {
    /// One configured colour on every pixel
    Fixed = BACKLIGHT_FIXED,
    /// Slow random colour walk
    #[default]
    Cycle = BACKLIGHT_CYCLE,
    /// Colour follows the numeral shown on each tube
    ColourTime = BACKLIGHT_COLOUR_TIME,
    /// Colour follows the day of the week
    DayOfWeek = BACKLIGHT_DAY_OF_WEEK,
}

impl BacklightMode {
    /// Decode a stored raw id.
    pub const fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            BACKLIGHT_FIXED => Self::Fixed,
            BACKLIGHT_CYCLE => Self::Cycle,
            BACKLIGHT_COLOUR_TIME => Self::ColourTime,
            BACKLIGHT_DAY_OF_WEEK => Self::DayOfWeek,
            _ => return None,
        })
    }
}

/// Outcome of a power-on diagnostic step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum DiagnosticStatus {
    Red = STATUS_RED,
    Yellow = STATUS_YELLOW,
    Green = STATUS_GREEN,
    Blue = STATUS_BLUE,
}

impl DiagnosticStatus {
    /// Decode a stored raw id.
    pub const fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            STATUS_RED => Self::Red,
            STATUS_YELLOW => Self::Yellow,
            STATUS_GREEN => Self::Green,
            STATUS_BLUE => Self::Blue,
            _ => return None,
        })
    }

    /// LED colour of the status.
    pub const fn color(self) -> Rgb {
        match self {
            Self::Red => color::rgb(0xff, 0, 0),
            Self::Yellow => color::rgb(0xff, 0x7f, 0x0f),
            Self::Green => color::rgb(0, 0xff, 0),
            Self::Blue => color::rgb(0, 0, 0xff),
        }
    }
}

/// What the LEDs need to know about the display this tick.
#[derive(Debug, Clone, Copy)]
pub struct LedFrameInputs<'a> {
    pub levels: LevelInputs,
    /// Numerals currently shown on the tubes
    pub digits: &'a Digits,
    /// Day of week, 1 = Sunday .. 7 = Saturday
    pub weekday: u8,
}

/// Owns the backlight and underlight buffers.
#[derive(Debug, Clone)]
pub struct BacklightManager {
    backlight: [Rgb; DIGIT_COUNT],
    underlight: [Rgb; DIGIT_COUNT],
    pixels: [Rgb; PIXEL_COUNT],
    cycle: ColourCycle,
    sync_colour_time: bool,
}

impl Default for BacklightManager {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl BacklightManager {
    /// Create a manager whose colour cycle is seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            backlight: [BLACK; DIGIT_COUNT],
            underlight: [BLACK; DIGIT_COUNT],
            pixels: [BLACK; PIXEL_COUNT],
            cycle: ColourCycle::new(seed),
            sync_colour_time: false,
        }
    }

    /// Hold the colour-time pixels while the tubes show something other than
    /// the time.
    pub fn set_sync_colour_time(&mut self, value: bool) {
        self.sync_colour_time = value;
    }

    pub const fn sync_colour_time(&self) -> bool {
        self.sync_colour_time
    }

    /// Compute this tick's pixel buffer.
    pub fn process(
        &mut self,
        config: &BacklightConfig,
        inputs: &LedFrameInputs<'_>,
    ) -> &[Rgb; PIXEL_COUNT] {
        let filters = FilterProcessor::new(config, inputs.levels);

        if inputs.levels.blanked {
            self.backlight = [filters.backlight.color(BLACK); DIGIT_COUNT];
            self.underlight = [filters.underlight.color(BLACK); DIGIT_COUNT];
            return self.assemble();
        }

        let raw = match config.mode {
            BacklightMode::Fixed => Some(color::uniform(Rgb {
                r: channel_level(config.red),
                g: channel_level(config.green),
                b: channel_level(config.blue),
            })),
            BacklightMode::Cycle => Some(color::uniform(self.cycle.tick(config.cycle_speed))),
            BacklightMode::ColourTime if self.sync_colour_time => None,
            BacklightMode::ColourTime => Some(inputs.digits.map(color::colour_time)),
            BacklightMode::DayOfWeek => Some(color::uniform(color::day_of_week(inputs.weekday))),
        };

        if let Some(raw) = raw {
            self.backlight = raw;
            self.underlight = raw;
            filters.apply_backlight(&mut self.backlight);
            filters.apply_underlight(&mut self.underlight);
        }
        self.assemble()
    }

    /// Show the progress of a power-on diagnostic run.
    ///
    /// Digit `step` takes the status colour, digits past it glow dim white
    /// and earlier digits keep the colour of their own step.
    pub fn show_diagnostic(
        &mut self,
        step: usize,
        status: DiagnosticStatus,
    ) -> &[Rgb; PIXEL_COUNT] {
        #[cfg(feature = "esp32-log")]
        println!("[BacklightManager.show_diagnostic] step {} {:?}", step, status);
        let pending = color::rgb(
            DIAGNOSTIC_PENDING_LEVEL,
            DIAGNOSTIC_PENDING_LEVEL,
            DIAGNOSTIC_PENDING_LEVEL,
        );
        for idx in 0..DIGIT_COUNT {
            let color = if idx > step {
                pending
            } else if idx == step {
                status.color()
            } else {
                continue;
            };
            self.backlight[idx] = color;
            self.underlight[idx] = color;
        }
        self.assemble()
    }

    pub const fn backlight(&self) -> &[Rgb; DIGIT_COUNT] {
        &self.backlight
    }

    pub const fn underlight(&self) -> &[Rgb; DIGIT_COUNT] {
        &self.underlight
    }

    /// Last assembled LED buffer, backlights first.
    pub const fn pixels(&self) -> &[Rgb; PIXEL_COUNT] {
        &self.pixels
    }

    pub const fn cycle(&self) -> &ColourCycle {
        &self.cycle
    }

    fn assemble(&mut self) -> &[Rgb; PIXEL_COUNT] {
        let (back, under) = self.pixels.split_at_mut(DIGIT_COUNT);
        back.copy_from_slice(&self.backlight);
        for (pixel, color) in under.iter_mut().zip(self.underlight.iter().rev()) {
            *pixel = *color;
        }
        &self.pixels
    }
}
