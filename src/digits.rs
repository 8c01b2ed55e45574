//! Digit and value buffers shared by the output manager, the transition
//! engine and the backlight manager.

/// Number of tube positions on the display.
pub const DIGIT_COUNT: usize = 6;

/// Largest value that fits on the display plus one.
pub const VALUE_MODULUS: u32 = 1_000_000;

/// Six decimal digits, index 0 is the leftmost tube.
pub type Digits = [u8; DIGIT_COUNT];

const DISPLAY_TYPE_BLANKED: u8 = 0;
const DISPLAY_TYPE_DIMMED: u8 = 1;
const DISPLAY_TYPE_NORMAL: u8 = 2;
const DISPLAY_TYPE_FADE: u8 = 3;
const DISPLAY_TYPE_SCROLL: u8 = 4;
const DISPLAY_TYPE_BLINK: u8 = 5;
const DISPLAY_TYPE_BRIGHT: u8 = 6;

/// How a single digit is driven.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum DisplayType {
    /// Cathode never driven
    Blanked = DISPLAY_TYPE_BLANKED,
    /// Fixed reduced duty cycle
    Dimmed = DISPLAY_TYPE_DIMMED,
    /// Ambient-derived duty cycle
    #[default]
    Normal = DISPLAY_TYPE_NORMAL,
    /// Crossfade from the previous value
    Fade = DISPLAY_TYPE_FADE,
    /// Roll down towards zero
    Scroll = DISPLAY_TYPE_SCROLL,
    /// Shared on/off blink phase
    Blink = DISPLAY_TYPE_BLINK,
    /// Highlighted digit
    Bright = DISPLAY_TYPE_BRIGHT,
}

impl DisplayType {
    /// Every display type, in raw id order.
    pub const ALL: [Self; 7] = [
        Self::Blanked,
        Self::Dimmed,
        Self::Normal,
        Self::Fade,
        Self::Scroll,
        Self::Blink,
        Self::Bright,
    ];

    /// Decode a raw id, `None` for ids outside `0..=6`.
    pub const fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            DISPLAY_TYPE_BLANKED => Self::Blanked,
            DISPLAY_TYPE_DIMMED => Self::Dimmed,
            DISPLAY_TYPE_NORMAL => Self::Normal,
            DISPLAY_TYPE_FADE => Self::Fade,
            DISPLAY_TYPE_SCROLL => Self::Scroll,
            DISPLAY_TYPE_BLINK => Self::Blink,
            DISPLAY_TYPE_BRIGHT => Self::Bright,
            _ => return None,
        })
    }

    /// Decode a raw id, falling back to [`DisplayType::Normal`].
    pub const fn from_raw_or_normal(value: u8) -> Self {
        match Self::from_raw(value) {
            Some(display_type) => display_type,
            None => Self::Normal,
        }
    }

    /// Raw id as used in value format numbers.
    pub const fn as_raw(self) -> u8 {
        self as u8
    }

    /// Fade and scroll are the only types that animate between two values.
    pub const fn is_animated(self) -> bool {
        matches!(self, Self::Fade | Self::Scroll)
    }
}

/// Per-frame digit state.
///
/// `target` is what should eventually be shown, `current` is what the tube is
/// showing right now and lags `target` while a fade or scroll is running.
/// `fade_progress[i] == 0` means no animation is in flight for digit `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitBuffer {
    pub target: Digits,
    pub current: Digits,
    pub display_type: [DisplayType; DIGIT_COUNT],
    pub fade_progress: [u8; DIGIT_COUNT],
}

impl Default for DigitBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl DigitBuffer {
    /// All zeros, every digit normal and settled.
    pub const fn new() -> Self {
        Self {
            target: [0; DIGIT_COUNT],
            current: [0; DIGIT_COUNT],
            display_type: [DisplayType::Normal; DIGIT_COUNT],
            fade_progress: [0; DIGIT_COUNT],
        }
    }

    /// Load new target values, each reduced modulo 10.
    pub fn load(&mut self, digits: Digits) {
        for (target, digit) in self.target.iter_mut().zip(digits) {
            *target = digit % 10;
        }
    }

    /// Set every digit to the same display type.
    pub fn set_all_types(&mut self, display_type: DisplayType) {
        self.display_type = [display_type; DIGIT_COUNT];
    }

    /// True if no digit has an animation in flight.
    pub fn is_settled(&self) -> bool {
        self.fade_progress.iter().all(|progress| *progress == 0)
    }
}

/// Secondary buffer for temporary informational displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueBuffer {
    value: u32,
    display_types: [DisplayType; DIGIT_COUNT],
    remaining_seconds: u8,
}

impl Default for ValueBuffer {
    fn default() -> Self {
        Self {
            value: 0,
            display_types: [DisplayType::Normal; DIGIT_COUNT],
            remaining_seconds: 10,
        }
    }
}

impl ValueBuffer {
    /// Set the value to show, reduced to the six displayable digits.
    pub fn set_value(&mut self, value: u32) {
        self.value = value % VALUE_MODULUS;
    }

    /// Value to show, already reduced to six digits.
    pub const fn value(&self) -> u32 {
        self.value
    }

    /// Set the per-digit display types from a decimal format number.
    ///
    /// Each decimal digit of `format` is a raw [`DisplayType`] id, the
    /// rightmost decimal digit applying to the rightmost tube. Unknown ids
    /// fall back to [`DisplayType::Normal`].
    pub fn set_format(&mut self, mut format: u32) {
        for idx in (0..DIGIT_COUNT).rev() {
            #[allow(clippy::cast_possible_truncation)]
            let code = (format % 10) as u8;
            self.display_types[idx] = DisplayType::from_raw_or_normal(code);
            format /= 10;
        }
    }

    pub const fn display_types(&self) -> [DisplayType; DIGIT_COUNT] {
        self.display_types
    }

    /// Seconds left before the value display expires.
    pub fn set_remaining_seconds(&mut self, seconds: u8) {
        self.remaining_seconds = seconds;
    }

    pub const fn remaining_seconds(&self) -> u8 {
        self.remaining_seconds
    }

    /// Count down one second, returns true once the display has expired.
    pub fn tick_second(&mut self) -> bool {
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        self.remaining_seconds == 0
    }

    /// The value split into display digits.
    pub fn digits(&self) -> Digits {
        split_wide(self.value)
    }
}

/// Split a value into six decimal digits, most significant first.
///
/// Values above 999 999 keep only their lowest six digits.
#[allow(clippy::cast_possible_truncation)]
pub fn split_wide(value: u32) -> Digits {
    let mut digits = [0; DIGIT_COUNT];
    let mut rest = value;
    for digit in digits.iter_mut().rev() {
        *digit = (rest % 10) as u8;
        rest /= 10;
    }
    digits
}

/// Tens and units of a two digit field.
pub const fn split_pair(value: u8) -> (u8, u8) {
    ((value / 10) % 10, value % 10)
}
