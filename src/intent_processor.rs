//! Intent processing
//!
//! Trigger sources describe what they want shown with a [`DisplayIntent`];
//! the processor folds everything queued since the last tick into one set of
//! [`IntentEffects`] for the renderer to apply.

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::channel::{Channel, Receiver, Sender};
use crate::output::TimeField;
use crate::transition::TransitionKind;

/// What the tubes are busy showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayMode {
    /// Wall-clock time, the resting mode
    #[default]
    Time,
    /// The value buffer, until its display time runs out
    Value,
    /// Rolling cathode exercise
    TestDigits,
    /// Numeric setting and its item number
    ConfigInt { value: u16, number: u8 },
    /// On/off setting and its item number
    ConfigBool { value: bool, number: u8 },
    /// Time or date with the edited field blinking
    SetTime(TimeField),
    /// Raw ambient light reading
    Ambient,
    /// Two octets of the IP address
    IpPair { first: u8, second: u8 },
}

/// Value shown in [`DisplayMode::Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueRequest {
    pub value: u32,
    /// Decimal display type per digit, rightmost decimal digit is digit 5
    pub format: u32,
    pub seconds: u8,
}

/// Start or stop a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionRequest {
    Start(TransitionKind),
    Cancel,
}

/// Request from outside the render loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayIntent {
    /// Back to the time display
    ShowTime,
    ShowValue(ValueRequest),
    StartTransition(TransitionKind),
    CancelTransition,
    TestDigits,
    ShowConfigInt { value: u16, number: u8 },
    ShowConfigBool { value: bool, number: u8 },
    /// Highlight a field while the time is being set
    SetTime(TimeField),
    ShowAmbient,
    ShowIpPair { first: u8, second: u8 },
}

impl DisplayIntent {
    /// Display mode this intent switches to, if any.
    pub const fn mode(&self) -> Option<DisplayMode> {
        Some(match *self {
            Self::ShowTime => DisplayMode::Time,
            Self::ShowValue(_) => DisplayMode::Value,
            Self::TestDigits => DisplayMode::TestDigits,
            Self::ShowConfigInt { value, number } => DisplayMode::ConfigInt { value, number },
            Self::ShowConfigBool { value, number } => DisplayMode::ConfigBool { value, number },
            Self::SetTime(field) => DisplayMode::SetTime(field),
            Self::ShowAmbient => DisplayMode::Ambient,
            Self::ShowIpPair { first, second } => DisplayMode::IpPair { first, second },
            Self::StartTransition(_) | Self::CancelTransition => return None,
        })
    }
}

/// Changes the renderer applies after draining the intents.
///
/// Later intents override earlier ones of the same kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntentEffects {
    pub mode: Option<DisplayMode>,
    pub value: Option<ValueRequest>,
    pub transition: Option<TransitionRequest>,
}

impl IntentEffects {
    /// True if any intent changed something.
    pub const fn has_effects(&self) -> bool {
        self.mode.is_some() || self.value.is_some() || self.transition.is_some()
    }

    /// Fold one intent into the effects.
    pub fn push(&mut self, intent: &DisplayIntent) {
        if let Some(mode) = intent.mode() {
            self.mode = Some(mode);
        }
        match *intent {
            DisplayIntent::ShowValue(request) => {
                self.value = Some(request);
                self.transition = Some(TransitionRequest::Cancel);
            }
            DisplayIntent::StartTransition(kind) => {
                self.transition = Some(TransitionRequest::Start(kind));
            }
            DisplayIntent::CancelTransition => self.transition = Some(TransitionRequest::Cancel),
            // Any other intent is a mode change, which abandons a running transition
            _ => self.transition = Some(TransitionRequest::Cancel),
        }
    }
}

pub type IntentSender<'a, const SIZE: usize> = Sender<'a, DisplayIntent, SIZE>;

pub type IntentReceiver<'a, const SIZE: usize> = Receiver<'a, DisplayIntent, SIZE>;

pub type IntentChannel<const SIZE: usize> = Channel<DisplayIntent, SIZE>;

/// Drains the intent channel once per tick.
pub struct IntentProcessor<'a, const SIZE: usize> {
    intents: IntentReceiver<'a, SIZE>,
}

impl<'a, const SIZE: usize> IntentProcessor<'a, SIZE> {
    /// Create a processor reading from the given receiver.
    pub const fn new(intents: IntentReceiver<'a, SIZE>) -> Self {
        Self { intents }
    }

    /// Process all pending intents without blocking.
    pub fn process_pending(&mut self) -> IntentEffects {
        let mut effects = IntentEffects::default();
        for intent in self.intents.drain() {
            #[cfg(feature = "esp32-log")]
            println!("[IntentProcessor.process_pending] {:?}", intent);
            effects.push(&intent);
        }
        effects
    }
}
