//! ESP32 board support for the Starfighter handheld
//!
//! This crate holds everything that only builds for the device: I2C bus
//! bring-up, the SSD1306 panel, the RGB LED pins and the square-wave buzzer.
//! Each module adapts one peripheral to the matching trait from
//! `starfighter-core` so the shared task loops can drive it.

#![no_std]

pub mod buzzer;
pub mod hardware;
pub mod led;
pub mod oled;
