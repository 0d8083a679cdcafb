//! Tap/hold classifier for the single fire button.
//!
//! The input task polls every [`INPUT_PERIOD_MS`]. A short press fires one
//! normal shot on release; holding for [`HOLD_TRIGGER_MS`] fires the laser
//! while the button is still down, and the release of that press is then
//! swallowed. A press never produces both.

use crate::config::{CHARGE_VISIBLE_MS, HOLD_TRIGGER_MS, INPUT_PERIOD_MS};
use crate::sensors::AccelSample;

/// Single-consumer request flag.
///
/// The producer raises it; the consumer clears it on the same pass that acts
/// on it. Raising an already raised flag coalesces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OneShot(bool);

impl OneShot {
    pub const fn new() -> Self {
        Self(false)
    }

    pub fn raise(&mut self) {
        self.0 = true;
    }

    /// Consume the request, returning whether it was pending.
    pub fn take(&mut self) -> bool {
        core::mem::take(&mut self.0)
    }

    pub const fn is_raised(&self) -> bool {
        self.0
    }
}

/// What the input task read from the hardware on one poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawInput {
    pub accel: AccelSample,
    /// Logical state: `true` while pressed.
    pub pressed: bool,
}

/// Latest input as seen by update, renderer and feedback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub accel: AccelSample,
    pub button: bool,
    pub prev_button: bool,
    pub hold_ms: u32,
    /// Laser already fired for the current press.
    pub laser_latched: bool,
    pub charging: bool,
    pub laser_trigger: OneShot,
    pub fire_request: OneShot,
}

impl InputSnapshot {
    pub const fn new() -> Self {
        Self {
            accel: AccelSample::ZERO,
            button: false,
            prev_button: false,
            hold_ms: 0,
            laser_latched: false,
            charging: false,
            laser_trigger: OneShot::new(),
            fire_request: OneShot::new(),
        }
    }

    /// Fold one poll into the snapshot.
    pub fn poll(&mut self, raw: RawInput) {
        self.accel = raw.accel;
        self.prev_button = self.button;
        self.button = raw.pressed;

        if raw.pressed {
            self.hold_ms = self.hold_ms.saturating_add(INPUT_PERIOD_MS as u32);
            if self.hold_ms >= HOLD_TRIGGER_MS && !self.laser_latched {
                self.laser_trigger.raise();
                self.laser_latched = true;
            }
            self.charging = self.hold_ms > CHARGE_VISIBLE_MS && !self.laser_latched;
        } else {
            if self.prev_button && !self.laser_latched && self.hold_ms < HOLD_TRIGGER_MS {
                self.fire_request.raise();
            }
            self.hold_ms = 0;
            self.charging = false;
            self.laser_latched = false;
        }
    }

    /// Drop pending requests and the hold state, keeping the raw readings.
    pub fn clear_requests(&mut self) {
        self.laser_trigger = OneShot::new();
        self.fire_request = OneShot::new();
        self.charging = false;
        self.laser_latched = false;
    }
}
