use oorandom::Rand32;

use crate::color::Rgb;

/// Seed used when the caller has no entropy to offer.
pub const DEFAULT_SEED: u64 = 0x7e3b_c10c;

const CHANNELS: usize = 3;

/// Random walk where one channel at a time rises while the others fall.
///
/// Every step picks up where the last one left off: the dominant channel is
/// raised by one and the other two lowered by one until the dominant channel
/// saturates or the step budget runs out, then a new channel and budget are
/// drawn.
#[derive(Debug, Clone)]
pub struct ColourCycle {
    rng: Rand32,
    counter: u8,
    change_steps: u8,
    channel: usize,
    colour: [u8; CHANNELS],
}

impl Default for ColourCycle {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl ColourCycle {
    /// Start from black with a seeded generator.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Rand32::new(seed),
            counter: 0,
            change_steps: 0,
            channel: 0,
            colour: [0; CHANNELS],
        }
    }

    /// Current colour of the walk.
    pub const fn colour(&self) -> Rgb {
        Rgb {
            r: self.colour[0],
            g: self.colour[1],
            b: self.colour[2],
        }
    }

    /// Channel currently being raised, 0 = red, 1 = green, 2 = blue.
    pub const fn channel(&self) -> usize {
        self.channel
    }

    /// Steps left before a new channel is drawn.
    pub const fn change_steps(&self) -> u8 {
        self.change_steps
    }

    /// Advance the tick counter, stepping the walk every `speed` ticks.
    pub fn tick(&mut self, speed: u8) -> Rgb {
        self.counter = self.counter.saturating_add(1);
        if self.counter >= speed.max(1) {
            self.counter = 0;
            self.step();
        }
        self.colour()
    }

    /// Move the walk by one step.
    pub fn step(&mut self) {
        if self.change_steps == 0 {
            self.change_steps = u8::try_from(self.rng.rand_range(0..256)).unwrap_or(u8::MAX);
            self.channel = usize::try_from(self.rng.rand_range(0..3)).unwrap_or(0);
        }
        self.change_steps = self.change_steps.saturating_sub(1);

        if self.colour[self.channel] == u8::MAX {
            self.change_steps = 0;
            return;
        }
        for (idx, level) in self.colour.iter_mut().enumerate() {
            if idx == self.channel {
                *level += 1;
            } else {
                *level = level.saturating_sub(1);
            }
        }
    }
}
