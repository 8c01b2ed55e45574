//! Perceptual brightness curves
//!
//! LED intensity is not perceived linearly, so every backlight channel is
//! passed through [`DIM_CURVE`] as the last step of the dimming pipeline.

/// 256-entry perceptual dimming curve for the LED channels.
pub const DIM_CURVE: [u8; 256] = [
    0, 1, 1, 2, 2, 2, 2, 2, 2, 3, 3, 3, 3, 3, 3, 3, //
    3, 3, 3, 3, 3, 3, 3, 4, 4, 4, 4, 4, 4, 4, 4, 4, //
    4, 4, 4, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 6, 6, 6, //
    6, 6, 6, 6, 6, 7, 7, 7, 7, 7, 7, 7, 8, 8, 8, 8, //
    8, 8, 9, 9, 9, 9, 9, 9, 10, 10, 10, 10, 10, 11, 11, 11, //
    11, 11, 12, 12, 12, 12, 12, 13, 13, 13, 13, 14, 14, 14, 14, 15, //
    15, 15, 16, 16, 16, 16, 17, 17, 17, 18, 18, 18, 19, 19, 19, 20, //
    20, 20, 21, 21, 22, 22, 22, 23, 23, 24, 24, 25, 25, 25, 26, 26, //
    27, 27, 28, 28, 29, 29, 30, 30, 31, 32, 32, 33, 33, 34, 35, 35, //
    36, 36, 37, 38, 38, 39, 40, 40, 41, 42, 43, 43, 44, 45, 46, 47, //
    48, 48, 49, 50, 51, 52, 53, 54, 55, 56, 57, 58, 59, 60, 61, 62, //
    63, 64, 65, 66, 68, 69, 70, 71, 73, 74, 75, 76, 78, 79, 81, 82, //
    83, 85, 86, 88, 90, 91, 93, 94, 96, 98, 99, 101, 103, 105, 107, 109, //
    110, 112, 114, 116, 118, 121, 123, 125, 127, 129, 132, 134, 136, 139, 141, 144, //
    146, 149, 151, 154, 157, 159, 162, 165, 168, 171, 174, 177, 180, 183, 186, 190, //
    193, 196, 200, 203, 207, 211, 214, 218, 222, 226, 230, 234, 238, 242, 248, 255,
];

/// Maps a configured colour channel step (0-15) to a raw 8-bit intensity.
pub const CHANNEL_CURVE: [u8; 16] = [
    0, 16, 32, 48, 64, 80, 99, 112, 128, 144, 160, 176, 192, 216, 240, 255,
];

/// Highest configurable colour channel step.
pub const CHANNEL_STEP_MAX: u8 = 15;

/// Apply the perceptual dimming curve to a linear intensity.
#[inline]
pub const fn dim_curve(value: u8) -> u8 {
    DIM_CURVE[value as usize]
}

/// Raw intensity for a colour channel step, clamped to the table.
#[inline]
pub const fn channel_level(step: u8) -> u8 {
    let step = if step > CHANNEL_STEP_MAX {
        CHANNEL_STEP_MAX
    } else {
        step
    };
    CHANNEL_CURVE[step as usize]
}
