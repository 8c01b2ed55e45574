use super::Filter;
use crate::color::Rgb;
use crate::gamma::dim_curve;

/// Scales raw channel values and applies the perceptual dim curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelFilter {
    pulse: Option<f32>,
    dim: f32,
    ambient: Option<f32>,
    off: bool,
}

impl LevelFilter {
    pub const fn new(pulse: Option<f32>, dim: f32, ambient: Option<f32>) -> Self {
        Self {
            pulse,
            dim,
            ambient,
            off: false,
        }
    }

    /// Filter that turns every channel off.
    pub const fn off() -> Self {
        Self {
            pulse: None,
            dim: 0.0,
            ambient: None,
            off: true,
        }
    }

    /// Output level of one channel.
    pub fn level(&self, raw: u8) -> u8 {
        if self.off {
            return dim_curve(0);
        }
        let mut value = f32::from(raw);
        if let Some(pulse) = self.pulse {
            value *= pulse;
        }
        value *= self.dim;
        if let Some(ambient) = self.ambient {
            value *= ambient;
        }
        // Float to int casts saturate, so this truncates into 0..=255
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let truncated = value as u8;
        dim_curve(truncated)
    }

    /// Apply the level pipeline to each channel.
    pub fn color(&self, raw: Rgb) -> Rgb {
        Rgb {
            r: self.level(raw.r),
            g: self.level(raw.g),
            b: self.level(raw.b),
        }
    }
}

impl Filter for LevelFilter {
    fn apply(&self, frame: &mut [Rgb]) {
        for pixel in frame.iter_mut() {
            *pixel = self.color(*pixel);
        }
    }
}
