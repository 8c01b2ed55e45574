//! Shift-register word format
//!
//! Each refresh tick produces [`COUNTS_PER_DIGIT`] sub-frames. A sub-frame is
//! two 32-bit words, one per HV5622 driver chain:
//!
//! ```text
//!  bit  31  30  29 ........ 20  19 ........ 10  9 ......... 0
//!      LED LED  position 2      position 1      position 0
//! ```
//!
//! * the first chain carries digits 3, 4, 5 at positions 0, 1, 2
//! * the second chain carries digits 0, 1, 2 at positions 0, 1, 2
//! * inside a position, numeral 0 drives bit 9 and numeral `n` drives bit
//!   `n - 1`
//! * bits 30 and 31 drive the separator indicator LEDs; the LED state selects
//!   which of the two lines is pulled
//!
//! Brightness is the number of sub-frames in which a position is driven.

use crate::digits::DIGIT_COUNT;

/// Sub-frames emitted per refresh tick; a digit driven in all of them is at
/// full brightness.
pub const COUNTS_PER_DIGIT: u8 = 20;

/// Duty cycle used by [`crate::DisplayType::Dimmed`].
pub const COUNTS_PER_DIGIT_DIM: u8 = 8;

const SLOTS: usize = COUNTS_PER_DIGIT as usize;

/// Width of one digit position in a chain word.
pub const BITS_PER_POSITION: u32 = 10;

/// Digit positions per chain.
pub const POSITIONS_PER_CHAIN: usize = 3;

const POSITION_MASK: u32 = (1 << BITS_PER_POSITION) - 1;

/// Cathode bit for each numeral.
pub const DECODE_DIGIT: [u16; 10] = [
    0x0200, 0x0001, 0x0002, 0x0004, 0x0008, 0x0010, 0x0020, 0x0040, 0x0080, 0x0100,
];

/// Indicator LED bit, indexed by the LED state.
pub const DECODE_SEPARATOR: [u32; 2] = [0x4000_0000, 0x8000_0000];

/// Bits reserved for the indicator LEDs.
pub const SEPARATOR_MASK: u32 = 0xC000_0000;

/// One of the two daisy-chained driver chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chain {
    /// Digits 3-5
    First,
    /// Digits 0-2
    Second,
}

/// Where a digit lives in the packed words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitSlot {
    pub chain: Chain,
    pub position: usize,
}

impl DigitSlot {
    /// Locate a digit, indices past the last digit wrap onto the display.
    pub const fn of(digit: usize) -> Self {
        let digit = digit % DIGIT_COUNT;
        if digit < POSITIONS_PER_CHAIN {
            Self {
                chain: Chain::Second,
                position: digit,
            }
        } else {
            Self {
                chain: Chain::First,
                position: digit - POSITIONS_PER_CHAIN,
            }
        }
    }
}

/// Cathode pattern of a numeral, the value is reduced modulo 10.
#[inline]
pub const fn encode_digit(value: u8) -> u16 {
    DECODE_DIGIT[(value % 10) as usize]
}

/// Numeral driven by a cathode pattern, `None` when off or ambiguous.
pub fn decode_pattern(pattern: u16) -> Option<u8> {
    DECODE_DIGIT
        .iter()
        .position(|bits| *bits == pattern)
        .and_then(|numeral| u8::try_from(numeral).ok())
}

/// Replace the bits of one position in a chain word.
#[inline]
pub const fn pack_position(word: u32, position: usize, pattern: u16) -> u32 {
    #[allow(clippy::cast_possible_truncation)]
    let shift = (position % POSITIONS_PER_CHAIN) as u32 * BITS_PER_POSITION;
    let pattern = (pattern as u32) & POSITION_MASK;
    (word & !(POSITION_MASK << shift)) | (pattern << shift)
}

/// Read back the bits of one position in a chain word.
#[inline]
pub const fn unpack_position(word: u32, position: usize) -> u16 {
    #[allow(clippy::cast_possible_truncation)]
    let shift = (position % POSITIONS_PER_CHAIN) as u32 * BITS_PER_POSITION;
    ((word >> shift) & POSITION_MASK) as u16
}

/// Parameters for one digit's sub-frame column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitDrive {
    /// Numeral shown from slot 0
    pub value: u8,
    /// Numeral shown from `switch_time`
    pub previous: u8,
    /// Number of driven slots, 1..=[`COUNTS_PER_DIGIT`]
    pub dim_factor: u8,
    /// Slot at which `previous` takes over, 0 for no switch
    pub switch_time: u8,
    /// Never drive the cathode
    pub blanked: bool,
}

impl DigitDrive {
    /// Clamp the duty cycle and switch slot into their valid ranges.
    ///
    /// `switch_time` always ends up strictly below `dim_factor`, and is zero
    /// when the duty cycle is a single slot.
    pub const fn clamped(self) -> Self {
        let dim_factor = if self.dim_factor < 1 {
            1
        } else if self.dim_factor > COUNTS_PER_DIGIT {
            COUNTS_PER_DIGIT
        } else {
            self.dim_factor
        };
        let switch_time = if self.switch_time >= dim_factor {
            dim_factor - 1
        } else {
            self.switch_time
        };
        Self {
            dim_factor,
            switch_time,
            ..self
        }
    }

    /// Build the cathode pattern of every sub-frame slot.
    pub fn column(self) -> [u16; SLOTS] {
        let drive = self.clamped();
        let mut column = [0; SLOTS];
        if drive.blanked {
            return column;
        }

        let mut pattern = 0;
        for (idx, slot) in column.iter_mut().enumerate() {
            if idx == 0 {
                pattern = encode_digit(drive.value);
            } else if idx == usize::from(drive.switch_time) {
                pattern = encode_digit(drive.previous);
            } else if idx == usize::from(drive.dim_factor) {
                pattern = 0;
            }
            *slot = pattern;
        }
        column
    }
}

/// One tick's worth of packed shift-register words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubFrames {
    first: [u32; SLOTS],
    second: [u32; SLOTS],
}

impl Default for SubFrames {
    fn default() -> Self {
        Self::new()
    }
}

impl SubFrames {
    /// All slots dark.
    pub const fn new() -> Self {
        Self {
            first: [0; SLOTS],
            second: [0; SLOTS],
        }
    }

    /// Words for a chain, one per sub-frame slot.
    pub const fn chain(&self, chain: Chain) -> &[u32; SLOTS] {
        match chain {
            Chain::First => &self.first,
            Chain::Second => &self.second,
        }
    }

    /// The `(first, second)` word pair clocked out for one slot.
    pub const fn slot(&self, idx: usize) -> (u32, u32) {
        (self.first[idx % SLOTS], self.second[idx % SLOTS])
    }

    /// Word pairs in slot order, first chain first.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.first.iter().copied().zip(self.second.iter().copied())
    }

    fn chain_mut(&mut self, chain: Chain) -> &mut [u32; SLOTS] {
        match chain {
            Chain::First => &mut self.first,
            Chain::Second => &mut self.second,
        }
    }

    /// Merge a digit's column into its chain, leaving other positions alone.
    pub fn set_digit(&mut self, digit: usize, column: &[u16; SLOTS]) {
        let slot = DigitSlot::of(digit);
        for (word, pattern) in self.chain_mut(slot.chain).iter_mut().zip(column) {
            *word = pack_position(*word, slot.position, *pattern);
        }
    }

    /// Cathode pattern of a digit in one slot.
    pub const fn digit_pattern(&self, digit: usize, idx: usize) -> u16 {
        let slot = DigitSlot::of(digit);
        let word = match slot.chain {
            Chain::First => self.first[idx % SLOTS],
            Chain::Second => self.second[idx % SLOTS],
        };
        unpack_position(word, slot.position)
    }

    /// Number of slots in which a digit is driven.
    pub fn duty(&self, digit: usize) -> usize {
        (0..SLOTS)
            .filter(|idx| self.digit_pattern(digit, *idx) != 0)
            .count()
    }

    /// Overwrite the indicator LED bits.
    ///
    /// Slots below `threshold` drive the line selected by each chain's LED
    /// state, the rest leave both lines undriven.
    pub fn set_separators(&mut self, threshold: u8, first_on: bool, second_on: bool) {
        let first_bits = DECODE_SEPARATOR[usize::from(first_on)];
        let second_bits = DECODE_SEPARATOR[usize::from(second_on)];
        for idx in 0..SLOTS {
            self.first[idx] &= !SEPARATOR_MASK;
            self.second[idx] &= !SEPARATOR_MASK;
            if idx < usize::from(threshold) {
                self.first[idx] |= first_bits;
                self.second[idx] |= second_bits;
            }
        }
    }

    /// Clear every slot.
    pub fn clear(&mut self) {
        self.first = [0; SLOTS];
        self.second = [0; SLOTS];
    }

    /// True when no cathode or LED line is driven in any slot.
    pub fn is_dark(&self) -> bool {
        self.first.iter().chain(self.second.iter()).all(|word| *word == 0)
    }
}
