use embassy_time::Instant;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::backlight::{BacklightManager, DiagnosticStatus, LedFrameInputs, PIXEL_COUNT};
use crate::clock::ClockTime;
use crate::color::Rgb;
use crate::config::{DisplayConfig, TubeConfig};
use crate::encoder::SubFrames;
use crate::filter::LevelInputs;
use crate::intent_processor::{
    DisplayMode, IntentEffects, IntentProcessor, IntentReceiver, TransitionRequest, ValueRequest,
};
use crate::output::{OutputManager, TimeField, date_digits, time_digits};
use crate::transition::{Transition, TransitionKind};

/// Everything sampled from the outside world for one tick.
#[derive(Debug, Clone, Copy)]
pub struct TickInputs<'c> {
    pub now: Instant,
    pub time: ClockTime,
    pub config: &'c DisplayConfig,
    /// Ambient light, 0 = dark .. 1023 = bright
    pub ambient: u16,
    /// Milliseconds into the current second
    pub pulse_ms: u16,
    pub blank_tubes: bool,
    pub blank_leds: bool,
    /// Separator indicator LED states, first and second chain
    pub separators: [bool; 2],
}

/// Buffers produced by one tick.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'r> {
    pub sub_frames: &'r SubFrames,
    pub pixels: &'r [Rgb; PIXEL_COUNT],
}

/// Display engine, runs one refresh tick at a time.
pub struct Renderer<'a, const INTENT_CHANNEL_SIZE: usize> {
    intent_processor: IntentProcessor<'a, INTENT_CHANNEL_SIZE>,

    mode: DisplayMode,
    transition: Option<Transition>,
    last_second: Option<u8>,

    output: OutputManager,
    leds: BacklightManager,
}

impl<'a, const INTENT_CHANNEL_SIZE: usize> Renderer<'a, INTENT_CHANNEL_SIZE> {
    /// Create a renderer showing the time, with the colour cycle seeded by
    /// `seed`.
    pub fn new(intents: IntentReceiver<'a, INTENT_CHANNEL_SIZE>, seed: u64) -> Self {
        Self {
            intent_processor: IntentProcessor::new(intents),
            mode: DisplayMode::Time,
            transition: None,
            last_second: None,
            output: OutputManager::new(),
            leds: BacklightManager::new(seed),
        }
    }

    /// Run one refresh tick.
    pub fn render(&mut self, inputs: &TickInputs<'_>) -> Frame<'_> {
        let config = inputs.config.clamped();

        let effects = self.intent_processor.process_pending();
        self.apply_effects(&effects, inputs, &config);

        let transition_running = self.run_transition(inputs, &config.tubes);
        if !transition_running {
            self.run_mode(inputs, &config.tubes);
        }
        self.last_second = Some(inputs.time.second);

        self.leds
            .set_sync_colour_time(transition_running || self.mode != DisplayMode::Time);

        self.output.set_separators(inputs.separators[0], inputs.separators[1]);
        self.output
            .render(&config.tubes, inputs.ambient, inputs.blank_tubes);

        let digits = self.output.current_digits();
        self.leds.process(
            &config.backlight,
            &LedFrameInputs {
                levels: LevelInputs {
                    ambient: inputs.ambient,
                    pulse_ms: inputs.pulse_ms,
                    blanked: inputs.blank_leds,
                },
                digits: &digits,
                weekday: inputs.time.weekday,
            },
        );

        Frame {
            sub_frames: self.output.sub_frames(),
            pixels: self.leds.pixels(),
        }
    }

    /// Power-on self test frame: a value at full brightness on the tubes and
    /// the diagnostic progress on the LEDs.
    pub fn render_diagnostic(
        &mut self,
        value: u32,
        step: usize,
        status: DiagnosticStatus,
    ) -> Frame<'_> {
        self.output.show_post_message(value);
        self.leds.show_diagnostic(step, status);
        Frame {
            sub_frames: self.output.sub_frames(),
            pixels: self.leds.pixels(),
        }
    }

    fn apply_effects(
        &mut self,
        effects: &IntentEffects,
        inputs: &TickInputs<'_>,
        config: &DisplayConfig,
    ) {
        if !effects.has_effects() {
            return;
        }

        if let Some(request) = effects.value {
            self.load_value(request);
        }

        if let Some(mode) = effects.mode {
            self.set_mode(mode, &config.tubes);
        }

        match effects.transition {
            Some(TransitionRequest::Start(kind)) => self.start_transition(kind, inputs, config),
            Some(TransitionRequest::Cancel) => self.cancel_transition(&config.tubes),
            None => {}
        }
    }

    fn load_value(&mut self, request: ValueRequest) {
        self.output.set_value_to_show(request.value);
        self.output.set_value_format(request.format);
        self.output.set_value_display_time(request.seconds);
    }

    /// Switch display mode and apply the mode's display types.
    fn set_mode(&mut self, mode: DisplayMode, tubes: &TubeConfig) {
        #[cfg(feature = "esp32-log")]
        println!("[Renderer.set_mode] {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        match mode {
            DisplayMode::Time => self.output.all_normal(tubes.blank_leading),
            DisplayMode::Value => self.output.load_value_display_types(),
            DisplayMode::TestDigits | DisplayMode::Ambient | DisplayMode::IpPair { .. } => {
                self.output.all_normal(false);
            }
            DisplayMode::ConfigInt { .. } | DisplayMode::ConfigBool { .. } => {
                self.output.display_config();
            }
            DisplayMode::SetTime(field) => {
                self.output.highlight_field(field, tubes.date_format);
            }
        }
    }

    /// Start a transition from the time to the date.
    ///
    /// Ignored outside the time display and while a transition is on display.
    fn start_transition(
        &mut self,
        kind: TransitionKind,
        inputs: &TickInputs<'_>,
        config: &DisplayConfig,
    ) {
        if self.mode != DisplayMode::Time || self.is_transition_on_display(inputs.now) {
            return;
        }
        let mut transition = Transition::new(kind, config.transitions);
        transition.start(
            inputs.now,
            time_digits(&inputs.time, &config.tubes),
            date_digits(&inputs.time, config.tubes.date_format),
        );
        self.transition = Some(transition);
    }

    fn cancel_transition(&mut self, tubes: &TubeConfig) {
        if self.transition.take().is_some() && self.mode == DisplayMode::Time {
            #[cfg(feature = "esp32-log")]
            println!("[Renderer.cancel_transition] restoring time display");
            self.output.all_normal(tubes.blank_leading);
        }
    }

    /// Let a pending transition drive the digit buffer, true while it runs.
    fn run_transition(&mut self, inputs: &TickInputs<'_>, tubes: &TubeConfig) -> bool {
        let Some(transition) = self.transition.as_mut() else {
            return false;
        };
        transition.update_regular_display_seconds(inputs.time.second);
        let running = transition.run(
            inputs.now,
            &mut self.output,
            time_digits(&inputs.time, tubes),
            date_digits(&inputs.time, tubes.date_format),
            tubes.blank_leading,
        );
        if !running {
            self.transition = None;
        }
        running
    }

    /// Load this tick's digits for the active mode.
    fn run_mode(&mut self, inputs: &TickInputs<'_>, tubes: &TubeConfig) {
        let time = &inputs.time;
        match self.mode {
            DisplayMode::Time => {
                self.output.load_time(time, tubes);
                self.output.apply_leading_blank(tubes.blank_leading);
            }
            DisplayMode::Value => {
                let new_second = self.last_second.is_some_and(|last| last != time.second);
                if new_second && self.output.dec_value_display_time() {
                    self.set_mode(DisplayMode::Time, tubes);
                    self.output.load_time(time, tubes);
                    self.output.apply_leading_blank(tubes.blank_leading);
                } else {
                    self.output.load_value_to_show();
                }
            }
            DisplayMode::TestDigits => self.output.load_test_digits(time),
            DisplayMode::ConfigInt { value, number } => self.output.load_config_int(value, number),
            DisplayMode::ConfigBool { value, number } => {
                self.output.load_config_bool(value, number);
            }
            DisplayMode::SetTime(field) => match field {
                TimeField::Hours | TimeField::Minutes | TimeField::Seconds => {
                    self.output.load_time(time, tubes);
                }
                TimeField::Days | TimeField::Months | TimeField::Years => {
                    self.output.load_date(time, tubes);
                }
            },
            DisplayMode::Ambient => self.output.load_ambient(inputs.ambient),
            DisplayMode::IpPair { first, second } => self.output.load_ip_pair(first, second),
        }
    }

    // ---------------------------------------------------------------------
    // Status
    // ---------------------------------------------------------------------

    /// Active display mode.
    pub const fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// True while a transition owns the tubes.
    pub fn is_transition_on_display(&self, now: Instant) -> bool {
        self.transition
            .as_ref()
            .is_some_and(|transition| transition.is_message_on_display(now))
    }

    /// Last started transition, if any.
    pub const fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    /// Returns the output manager.
    pub const fn output(&self) -> &OutputManager {
        &self.output
    }

    pub const fn leds(&self) -> &BacklightManager {
        &self.leds
    }
}
