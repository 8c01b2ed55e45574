//! Output manager
//!
//! Owns the digit and value buffers and turns them into packed sub-frames
//! once per refresh tick. Each tick it:
//!
//! 1. resolves the effective display type of every digit (tube blanking and
//!    value changes override the stored type),
//! 2. advances that digit's fade / scroll countdown and the shared blink
//!    phase,
//! 3. maps the type to a duty cycle and switch slot and emits the digit's
//!    column into the [`SubFrames`].

use crate::clock::ClockTime;
use crate::config::{DateFormat, SeparatorDim, TubeConfig};
use crate::digits::{
    DIGIT_COUNT, DigitBuffer, Digits, DisplayType, ValueBuffer, split_pair, split_wide,
};
use crate::encoder::{COUNTS_PER_DIGIT, COUNTS_PER_DIGIT_DIM, DigitDrive, SubFrames};

/// Brightest ambient light reading.
pub const AMBIENT_MAX: u16 = 1023;

/// Ticks blinking digits stay lit.
pub const BLINK_COUNT_ON: u8 = 70;

/// Ticks blinking digits stay dark.
pub const BLINK_COUNT_OFF: u8 = 55;

/// Duty cycle used for tubes at the given ambient reading.
///
/// Without ambient dimming the tubes run at full duty. With it the reading
/// (0 = dark, [`AMBIENT_MAX`] = bright) is mapped linearly onto
/// `min_dim..=COUNTS_PER_DIGIT`.
pub fn ambient_dim_factor(ambient: u16, tubes: &TubeConfig) -> u8 {
    if !tubes.use_ambient {
        return COUNTS_PER_DIGIT;
    }
    let min_dim = tubes.min_dim.clamp(1, COUNTS_PER_DIGIT);
    let span = f32::from(COUNTS_PER_DIGIT - min_dim);
    let ratio = f32::from(ambient.min(AMBIENT_MAX)) / f32::from(AMBIENT_MAX);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let extra = libm::roundf(ratio * span) as u8;
    min_dim.saturating_add(extra).min(COUNTS_PER_DIGIT)
}

/// Inputs that decide how a display type is driven this tick.
#[derive(Debug, Clone, Copy)]
pub struct PlanContext {
    /// Ambient-derived duty cycle
    pub ambient_dim: u8,
    pub fade_steps: u8,
    pub fade_progress: u8,
    /// Shared blink phase
    pub blink_on: bool,
}

/// Duty cycle and switch slot for one digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayPlan {
    pub dim_factor: u8,
    pub switch_time: u8,
    pub blanked: bool,
}

impl DisplayPlan {
    const fn lit(dim_factor: u8, switch_time: u8) -> Self {
        Self {
            dim_factor,
            switch_time,
            blanked: false,
        }
    }

    const BLANKED: Self = Self {
        dim_factor: COUNTS_PER_DIGIT,
        switch_time: 0,
        blanked: true,
    };
}

impl DisplayType {
    /// Duty cycle and switch slot used to drive this type.
    pub fn plan(self, ctx: &PlanContext) -> DisplayPlan {
        match self {
            Self::Blanked => DisplayPlan::BLANKED,
            Self::Dimmed => DisplayPlan::lit(COUNTS_PER_DIGIT_DIM, 0),
            Self::Normal | Self::Bright => DisplayPlan::lit(ctx.ambient_dim, 0),
            Self::Fade => DisplayPlan::lit(
                ctx.ambient_dim,
                fade_switch_time(ctx.ambient_dim, ctx.fade_progress, ctx.fade_steps),
            ),
            // Hold the previous value for the whole window until the roll completes
            Self::Scroll => DisplayPlan::lit(ctx.ambient_dim, 1),
            Self::Blink if ctx.blink_on => DisplayPlan::lit(ctx.ambient_dim, 0),
            Self::Blink => DisplayPlan::BLANKED,
        }
    }
}

/// Slot at which a fading digit switches from the new to the old value.
///
/// Never zero, zero would mean "show the new value for the whole window".
pub fn fade_switch_time(dim_factor: u8, fade_progress: u8, fade_steps: u8) -> u8 {
    let steps = u16::from(fade_steps.max(1));
    let done = steps.saturating_sub(u16::from(fade_progress));
    let switch = u16::from(dim_factor) * done / steps;
    u8::try_from(switch).unwrap_or(u8::MAX).max(1)
}

/// Type a digit is driven with once `current` has reached `target`.
///
/// Fade and scroll have nothing left to animate and show as normal, so their
/// countdown is never armed for a settled digit.
const fn settled_type(stored: DisplayType) -> DisplayType {
    if stored.is_animated() {
        DisplayType::Normal
    } else {
        stored
    }
}

/// Digit pairs that can be highlighted while a field is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    Hours,
    Minutes,
    Seconds,
    Days,
    Months,
    Years,
}

impl TimeField {
    /// Index of the first digit of the field's pair.
    pub const fn first_digit(self, date_format: DateFormat) -> usize {
        match (self, date_format) {
            (Self::Hours, _)
            | (Self::Years, DateFormat::YyMmDd)
            | (Self::Months, DateFormat::MmDdYy)
            | (Self::Days, DateFormat::DdMmYy) => 0,
            (Self::Minutes, _)
            | (Self::Months, DateFormat::YyMmDd | DateFormat::DdMmYy)
            | (Self::Days, DateFormat::MmDdYy) => 2,
            (Self::Seconds, _)
            | (Self::Days, DateFormat::YyMmDd)
            | (Self::Years, DateFormat::MmDdYy | DateFormat::DdMmYy) => 4,
        }
    }
}

/// Shared on/off phase of all blinking digits.
#[derive(Debug, Clone, Copy, Default)]
struct BlinkPhase {
    counter: u8,
    on: bool,
}

impl BlinkPhase {
    fn tick(&mut self) {
        self.counter = self.counter.saturating_sub(1);
        if self.counter == 0 {
            self.on = !self.on;
            self.counter = if self.on {
                BLINK_COUNT_ON
            } else {
                BLINK_COUNT_OFF
            };
        }
    }
}

/// Digit encoder and animation state machine.
#[derive(Debug, Clone)]
pub struct OutputManager {
    digits: DigitBuffer,
    values: ValueBuffer,
    frames: SubFrames,
    blink: BlinkPhase,
    blanked: bool,
    dim_factor: u8,
    separators: [bool; 2],
}

impl Default for OutputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputManager {
    /// All digits zero and normal, nothing animating.
    pub fn new() -> Self {
        Self {
            digits: DigitBuffer::new(),
            values: ValueBuffer::default(),
            frames: SubFrames::new(),
            blink: BlinkPhase::default(),
            blanked: false,
            dim_factor: COUNTS_PER_DIGIT,
            separators: [false; 2],
        }
    }

    /// Run one refresh tick and return the sub-frames to clock out.
    pub fn render(&mut self, tubes: &TubeConfig, ambient: u16, blank_tubes: bool) -> &SubFrames {
        self.blanked = blank_tubes;
        self.dim_factor = ambient_dim_factor(ambient, tubes);
        self.blink.tick();

        for idx in 0..DIGIT_COUNT {
            let display_type = self.resolve_type(idx, tubes);
            self.advance_animation(idx, display_type, tubes);

            let plan = display_type.plan(&PlanContext {
                ambient_dim: self.dim_factor,
                fade_steps: tubes.fade_steps,
                fade_progress: self.digits.fade_progress[idx],
                blink_on: self.blink.on,
            });
            self.emit(idx, plan);
        }

        let threshold = if self.blanked {
            0
        } else {
            match tubes.separator_dim {
                SeparatorDim::Bright => self.dim_factor,
                SeparatorDim::Dim => self.dim_factor / 4,
            }
        };
        self.frames
            .set_separators(threshold, self.separators[0], self.separators[1]);

        &self.frames
    }

    /// Effective display type of a digit for this tick.
    fn resolve_type(&mut self, idx: usize, tubes: &TubeConfig) -> DisplayType {
        if self.blanked {
            return DisplayType::Blanked;
        }

        let stored = self.digits.display_type[idx];
        let target = self.digits.target[idx];
        if target == self.digits.current[idx] {
            self.digits.fade_progress[idx] = 0;
            return settled_type(stored);
        }

        if target == 0 && tubes.scroll {
            DisplayType::Scroll
        } else if tubes.fade {
            DisplayType::Fade
        } else {
            // No animation configured, snap straight to the new value
            self.digits.current[idx] = target;
            self.digits.fade_progress[idx] = 0;
            settled_type(stored)
        }
    }

    fn advance_animation(&mut self, idx: usize, display_type: DisplayType, tubes: &TubeConfig) {
        let progress = &mut self.digits.fade_progress[idx];
        match display_type {
            DisplayType::Scroll => {
                if *progress == 0 {
                    *progress = tubes.scroll_steps.max(1);
                }
                if *progress == 1 {
                    *progress = 0;
                    self.digits.current[idx] = (self.digits.current[idx] + 9) % 10;
                } else {
                    *progress -= 1;
                }
            }
            DisplayType::Fade => {
                if *progress == 0 {
                    *progress = tubes.fade_steps.max(1);
                }
                if *progress == 1 {
                    *progress = 0;
                    self.digits.current[idx] = self.digits.target[idx];
                } else {
                    *progress -= 1;
                }
            }
            DisplayType::Blanked
            | DisplayType::Dimmed
            | DisplayType::Normal
            | DisplayType::Blink
            | DisplayType::Bright => {}
        }
    }

    fn emit(&mut self, idx: usize, plan: DisplayPlan) {
        let drive = DigitDrive {
            value: self.digits.target[idx],
            previous: self.digits.current[idx],
            dim_factor: plan.dim_factor,
            switch_time: plan.switch_time,
            blanked: plan.blanked,
        };
        self.frames.set_digit(idx, &drive.column());
    }

    /// Show a power-on self test value at full brightness straight away,
    /// bypassing the animation state machine.
    pub fn show_post_message(&mut self, value: u32) -> &SubFrames {
        self.load_wide(value);
        self.digits.current = self.digits.target;
        self.digits.fade_progress = [0; DIGIT_COUNT];
        for idx in 0..DIGIT_COUNT {
            self.emit(idx, DisplayPlan::lit(COUNTS_PER_DIGIT, 0));
        }
        &self.frames
    }

    /// Set the separator indicator LED states.
    pub fn set_separators(&mut self, first: bool, second: bool) {
        self.separators = [first, second];
    }

    // ---------------------------------------------------------------------
    // Status
    // ---------------------------------------------------------------------

    /// True if the last tick ran with tube blanking active.
    pub const fn is_blanked(&self) -> bool {
        self.blanked
    }

    /// Values the display is heading to.
    pub const fn digits(&self) -> Digits {
        self.digits.target
    }

    /// Values the tubes are showing right now.
    pub const fn current_digits(&self) -> Digits {
        self.digits.current
    }

    /// Stored display type of every digit.
    pub const fn display_types(&self) -> [DisplayType; DIGIT_COUNT] {
        self.digits.display_type
    }

    pub const fn digit_buffer(&self) -> &DigitBuffer {
        &self.digits
    }

    pub const fn sub_frames(&self) -> &SubFrames {
        &self.frames
    }

    pub const fn blink_on(&self) -> bool {
        self.blink.on
    }

    /// Ambient-derived duty cycle used by the last tick.
    pub const fn dim_factor(&self) -> u8 {
        self.dim_factor
    }

    // ---------------------------------------------------------------------
    // Indexed access, used by the transition engine
    // ---------------------------------------------------------------------

    /// Target value of a digit, the index wraps modulo six.
    pub const fn digit(&self, idx: usize) -> u8 {
        self.digits.target[idx % DIGIT_COUNT]
    }

    /// Set the target value of a digit, reduced modulo 10.
    pub fn set_digit(&mut self, idx: usize, value: u8) {
        self.digits.target[idx % DIGIT_COUNT] = value % 10;
    }

    /// Stored display type of a digit.
    pub const fn display_type(&self, idx: usize) -> DisplayType {
        self.digits.display_type[idx % DIGIT_COUNT]
    }

    /// Store the display type of a digit.
    pub fn set_display_type(&mut self, idx: usize, display_type: DisplayType) {
        self.digits.display_type[idx % DIGIT_COUNT] = display_type;
    }

    // ---------------------------------------------------------------------
    // Number loaders
    // ---------------------------------------------------------------------

    /// Load arbitrary digits, each reduced modulo 10.
    pub fn load(&mut self, digits: Digits) {
        self.digits.load(digits);
    }

    /// `HHMMSS`, in 12 hour form when configured.
    pub fn load_time(&mut self, time: &ClockTime, tubes: &TubeConfig) {
        self.load(time_digits(time, tubes));
    }

    /// The date in the configured order.
    pub fn load_date(&mut self, time: &ClockTime, tubes: &TubeConfig) {
        self.load(date_digits(time, tubes.date_format));
    }

    pub fn load_same_value(&mut self, value: u8) {
        self.load([value; DIGIT_COUNT]);
    }

    /// Load a value across all six digits.
    pub fn load_wide(&mut self, value: u32) {
        self.load(split_wide(value));
    }

    /// Four digit configuration value followed by the two digit item number.
    pub fn load_config_int(&mut self, value: u16, number: u8) {
        let [_, _, a, b, c, d] = split_wide(u32::from(value));
        let (tens, units) = split_pair(number);
        self.load([a, b, c, d, tens, units]);
    }

    /// Boolean configuration value in digit 3, item number in 4 and 5.
    pub fn load_config_bool(&mut self, value: bool, number: u8) {
        let (tens, units) = split_pair(number);
        self.load([0, 0, 0, u8::from(value), tens, units]);
    }

    /// Two octets of an IP address, three digits each.
    pub fn load_ip_pair(&mut self, first: u8, second: u8) {
        let (a, b) = (first / 100, first % 100);
        let (c, d) = (second / 100, second % 100);
        self.load([a, b / 10, b % 10, c, d / 10, d % 10]);
    }

    /// Ambient light reading in the first four digits.
    pub fn load_ambient(&mut self, ambient: u16) {
        let [_, _, a, b, c, d] = split_wide(u32::from(ambient));
        self.load([a, b, c, d, 0, 0]);
    }

    /// The first six hex characters of a device id, one nibble per digit
    /// reduced modulo 10.
    ///
    /// Non-hex characters read as zero, missing characters leave a zero.
    pub fn load_hex_id(&mut self, id: &str) {
        let mut digits = [0; DIGIT_COUNT];
        for (digit, ch) in digits.iter_mut().zip(id.chars()) {
            #[allow(clippy::cast_possible_truncation)]
            let nibble = ch.to_digit(16).unwrap_or(0) as u8;
            *digit = nibble;
        }
        self.load(digits);
    }

    /// A rolling sequence keyed on the current second, exercises every
    /// cathode over ten seconds.
    pub fn load_test_digits(&mut self, time: &ClockTime) {
        let mut digits = [0; DIGIT_COUNT];
        for (offset, digit) in digits.iter_mut().rev().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let offset = offset as u8;
            *digit = (time.second % 10 + offset) % 10;
        }
        self.load(digits);
    }

    /// Load the value buffer onto the display.
    pub fn load_value_to_show(&mut self) {
        self.load(self.values.digits());
    }

    // ---------------------------------------------------------------------
    // Display presets
    // ---------------------------------------------------------------------

    /// Every digit normal, optionally blanking a leading zero in digit 0.
    pub fn all_normal(&mut self, blank_leading: bool) {
        self.digits.set_all_types(DisplayType::Normal);
        self.apply_leading_blank(blank_leading);
    }

    pub fn all_blanked(&mut self) {
        self.digits.set_all_types(DisplayType::Blanked);
    }

    /// Blank the hours tens digit when it shows zero, otherwise make it normal.
    pub fn apply_leading_blank(&mut self, blank_leading: bool) {
        self.digits.display_type[0] = if blank_leading && self.digits.target[0] == 0 {
            DisplayType::Blanked
        } else {
            DisplayType::Normal
        };
    }

    /// Blink the digit pair starting at `first`, everything else normal.
    pub fn highlight_pair(&mut self, first: usize) {
        let first = first % DIGIT_COUNT;
        for (idx, display_type) in self.digits.display_type.iter_mut().enumerate() {
            *display_type = if idx == first || idx == first + 1 {
                DisplayType::Blink
            } else {
                DisplayType::Normal
            };
        }
    }

    /// Blink the digits of a time or date field.
    pub fn highlight_field(&mut self, field: TimeField, date_format: DateFormat) {
        self.highlight_pair(field.first_digit(date_format));
    }

    /// Configuration display: value steady, item number blinking.
    pub fn display_config(&mut self) {
        self.highlight_pair(4);
    }

    /// Apply the value buffer's per-digit types.
    pub fn load_value_display_types(&mut self) {
        self.digits.display_type = self.values.display_types();
    }

    // ---------------------------------------------------------------------
    // Value buffer
    // ---------------------------------------------------------------------

    /// Set the value for a temporary value display.
    pub fn set_value_to_show(&mut self, value: u32) {
        self.values.set_value(value);
    }

    /// Set the per-digit format of the value display.
    pub fn set_value_format(&mut self, format: u32) {
        self.values.set_format(format);
    }

    /// Seconds the value display stays up.
    pub fn set_value_display_time(&mut self, seconds: u8) {
        self.values.set_remaining_seconds(seconds);
    }

    pub const fn value_display_time(&self) -> u8 {
        self.values.remaining_seconds()
    }

    /// Count down one second of the value display, true once expired.
    pub fn dec_value_display_time(&mut self) -> bool {
        self.values.tick_second()
    }

    /// Secondary buffer behind the value display.
    pub const fn value_buffer(&self) -> &ValueBuffer {
        &self.values
    }
}

/// Time split into display digits, honouring the 12/24 hour setting.
pub fn time_digits(time: &ClockTime, tubes: &TubeConfig) -> Digits {
    let hour = if tubes.hour_12 {
        time.hour_12()
    } else {
        time.hour
    };
    let (h1, h2) = split_pair(hour);
    let (m1, m2) = split_pair(time.minute);
    let (s1, s2) = split_pair(time.second);
    [h1, h2, m1, m2, s1, s2]
}

/// Date split into display digits in the configured order.
pub fn date_digits(time: &ClockTime, date_format: DateFormat) -> Digits {
    let (y1, y2) = split_pair(time.short_year());
    let (m1, m2) = split_pair(time.month);
    let (d1, d2) = split_pair(time.day);
    match date_format {
        DateFormat::YyMmDd => [y1, y2, m1, m2, d1, d2],
        DateFormat::MmDdYy => [m1, m2, d1, d2, y1, y2],
        DateFormat::DdMmYy => [d1, d2, m1, m2, y1, y2],
    }
}
