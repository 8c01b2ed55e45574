//! Pixel type and the fixed backlight palettes

use smart_leds::RGB8;

use crate::digits::DIGIT_COUNT;

pub type Rgb = RGB8;

/// Pixel with every channel off.
pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

/// Colour shown behind each numeral in colour-time mode, indexed by numeral.
pub const COLOUR_TIME: [Rgb; 10] = [
    rgb(255, 0, 0),
    rgb(255, 153, 0),
    rgb(204, 192, 0),
    rgb(51, 192, 0),
    rgb(0, 255, 51),
    rgb(0, 192, 192),
    rgb(0, 102, 255),
    rgb(153, 0, 255),
    rgb(204, 0, 255),
    rgb(255, 0, 153),
];

/// Backlight colour per weekday, index 0 is Sunday.
pub const DAY_OF_WEEK: [Rgb; 7] = [
    rgb(255, 0, 0),
    rgb(255, 0, 153),
    rgb(204, 0, 192),
    rgb(51, 0, 255),
    rgb(0, 51, 255),
    rgb(0, 153, 153),
    rgb(0, 255, 0),
];

#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> Rgb {
    Rgb { r, g, b }
}

/// Colour for a numeral, reduced modulo 10.
#[inline]
pub const fn colour_time(numeral: u8) -> Rgb {
    COLOUR_TIME[(numeral % 10) as usize]
}

/// Colour for a weekday, 1 = Sunday .. 7 = Saturday.
///
/// Out of range days are clamped onto the table.
#[inline]
pub const fn day_of_week(weekday: u8) -> Rgb {
    let idx = if weekday == 0 {
        0
    } else if weekday as usize > DAY_OF_WEEK.len() {
        DAY_OF_WEEK.len() - 1
    } else {
        weekday as usize - 1
    };
    DAY_OF_WEEK[idx]
}

/// Same colour for every digit.
#[inline]
pub const fn uniform(color: Rgb) -> [Rgb; DIGIT_COUNT] {
    [color; DIGIT_COUNT]
}
