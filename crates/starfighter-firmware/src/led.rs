//! Discrete RGB LED on three GPIOs.

use esp_hal::gpio::{Level, Output};
use starfighter_core::feedback::{RgbLed, RgbLevels};

pub struct RgbPins {
    red: Output<'static>,
    green: Output<'static>,
    blue: Output<'static>,
}

impl RgbPins {
    pub fn new(red: Output<'static>, green: Output<'static>, blue: Output<'static>) -> Self {
        Self { red, green, blue }
    }
}

impl RgbLed for RgbPins {
    fn set(&mut self, levels: RgbLevels) {
        self.red.set_level(Level::from(levels.red));
        self.green.set_level(Level::from(levels.green));
        self.blue.set_level(Level::from(levels.blue));
    }
}
