//! Buzzer and RGB LED feedback.
//!
//! Update only writes requests into [`FeedbackTimers`]. The feedback task runs
//! [`FeedbackDriver::step`] under the lock every [`FEEDBACK_PERIOD_MS`] and
//! applies the returned [`FeedbackOutput`] to the hardware once it has
//! released the lock.
//!
//! The buzzer is shared between one-shot tones and the background melody; a
//! pending tone always wins.

mod melody;

pub use melody::{MelodyCursor, Note, Track};

use crate::config::FEEDBACK_PERIOD_MS;
use crate::game::{GameState, Phase};

const CHARGE_BLINK_MAX_MS: u32 = 150;
const CHARGE_BLINK_MIN_MS: u32 = 30;
const IDLE_BLINK_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LedColor {
    #[default]
    Off,
    Red,
    Green,
    Blue,
    White,
}

impl LedColor {
    pub const fn levels(self) -> RgbLevels {
        match self {
            Self::Off => RgbLevels::OFF,
            Self::Red => RgbLevels::new(true, false, false),
            Self::Green => RgbLevels::new(false, true, false),
            Self::Blue => RgbLevels::BLUE,
            Self::White => RgbLevels::new(true, true, true),
        }
    }
}

/// On/off state of the three LED channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RgbLevels {
    pub red: bool,
    pub green: bool,
    pub blue: bool,
}

impl RgbLevels {
    pub const OFF: Self = Self::new(false, false, false);
    pub const BLUE: Self = Self::new(false, false, true);

    pub const fn new(red: bool, green: bool, blue: bool) -> Self {
        Self { red, green, blue }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneCommand {
    Play(u16),
    Stop,
}

/// A one-shot tone waiting to be played out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneRequest {
    pub freq: u16,
    pub remaining_ms: i32,
}

/// Feedback requests written by update and consumed by the driver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackTimers {
    pub led_color: LedColor,
    pub led_remaining_ms: i32,
    pub tone: Option<ToneRequest>,
    pub melody: MelodyCursor,
}

impl FeedbackTimers {
    pub const fn new() -> Self {
        Self {
            led_color: LedColor::Off,
            led_remaining_ms: 0,
            tone: None,
            melody: MelodyCursor::new(),
        }
    }

    /// Replace any pending one-shot tone.
    pub fn tone(&mut self, freq: u16, dur_ms: u16) {
        self.tone = Some(ToneRequest {
            freq,
            remaining_ms: dur_ms as i32,
        });
    }

    pub fn flash(&mut self, color: LedColor, dur_ms: u16) {
        self.led_color = color;
        self.led_remaining_ms = dur_ms as i32;
    }
}

/// Sinks for the buzzer and LED.
pub trait ToneOutput {
    fn start(&mut self, freq: u16);
    fn stop(&mut self);

    fn apply(&mut self, command: ToneCommand) {
        match command {
            ToneCommand::Play(freq) => self.start(freq),
            ToneCommand::Stop => self.stop(),
        }
    }
}

pub trait RgbLed {
    fn set(&mut self, levels: RgbLevels);
}

/// Result of one driver pass, applied after the lock is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeedbackOutput {
    /// `None` leaves the buzzer as it is.
    pub tone: Option<ToneCommand>,
    pub led: RgbLevels,
}

/// Turns the requests in [`GameState`] into buzzer and LED changes.
#[derive(Debug, Default)]
pub struct FeedbackDriver {
    sounding: Option<u16>,
}

impl FeedbackDriver {
    pub const fn new() -> Self {
        Self { sounding: None }
    }

    pub fn step(&mut self, state: &mut GameState, now_ms: u64) -> FeedbackOutput {
        let timers = &mut state.feedback;
        let mut command = None;

        if let Some(tone) = timers.tone.as_mut() {
            if tone.remaining_ms > 0 {
                command = Some(ToneCommand::Play(tone.freq));
                tone.remaining_ms -= FEEDBACK_PERIOD_MS as i32;
            } else {
                timers.tone = None;
                command = Some(ToneCommand::Stop);
            }
        }

        if timers.tone.is_none()
            && let Some(melody) = timers.melody.advance(now_ms)
        {
            command = Some(melody);
        }

        let led = if state.input.charging {
            let interval = CHARGE_BLINK_MAX_MS
                .saturating_sub(state.input.hold_ms / 7)
                .max(CHARGE_BLINK_MIN_MS);
            if (now_ms / interval as u64) % 2 == 0 {
                RgbLevels::BLUE
            } else {
                RgbLevels::OFF
            }
        } else if timers.led_remaining_ms > 0 {
            timers.led_remaining_ms -= FEEDBACK_PERIOD_MS as i32;
            timers.led_color.levels()
        } else if matches!(state.phase, Phase::Intro | Phase::Menu)
            && (now_ms / IDLE_BLINK_MS) % 2 == 1
        {
            RgbLevels::BLUE
        } else {
            RgbLevels::OFF
        };

        FeedbackOutput {
            tone: command.and_then(|c| self.dedupe(c)),
            led,
        }
    }

    fn dedupe(&mut self, command: ToneCommand) -> Option<ToneCommand> {
        let next = match command {
            ToneCommand::Play(freq) => Some(freq),
            ToneCommand::Stop => None,
        };
        if next == self.sounding {
            return None;
        }
        self.sounding = next;
        Some(command)
    }
}
