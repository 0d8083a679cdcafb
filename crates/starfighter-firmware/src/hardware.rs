//! Board pin map and bus construction.
//!
//! | Signal        | GPIO | Notes                         |
//! |---------------|------|-------------------------------|
//! | OLED SDA/SCL  | 5/4  | I2C0, panel at 0x3C           |
//! | OLED reset    | 16   | active low                    |
//! | IMU SDA/SCL   | 25/26| I2C1, BMI160 at 0x69          |
//! | Fire button   | 15   | to ground, internal pull-up   |
//! | Buzzer        | 2    | shared with the onboard LED   |
//! | LED R/G/B     | 13/12/14 | active high               |

use esp_hal::Async;
use esp_hal::gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull};
use esp_hal::i2c::master::{Config as I2cConfig, I2c};
use esp_hal::peripherals::{GPIO4, GPIO5, GPIO12, GPIO13, GPIO14, GPIO15, GPIO25, GPIO26, I2C0, I2C1};
use esp_hal::time::Rate;

use crate::led::RgbPins;

/// I2C address of the SSD1306 panel.
pub const OLED_ADDRESS: u8 = 0x3C;

const OLED_BUS_KHZ: u32 = 400;
const IMU_BUS_KHZ: u32 = 400;

/// Bus for the display.
pub fn create_oled_bus(
    i2c0: I2C0<'static>,
    sda: GPIO5<'static>,
    scl: GPIO4<'static>,
) -> I2c<'static, Async> {
    I2c::new(
        i2c0,
        I2cConfig::default().with_frequency(Rate::from_khz(OLED_BUS_KHZ)),
    )
    .expect("valid I2C0 configuration")
    .with_sda(sda)
    .with_scl(scl)
    .into_async()
}

/// Bus for the accelerometer, kept apart from the display so a slow panel
/// flush never delays an input poll.
pub fn create_imu_bus(
    i2c1: I2C1<'static>,
    sda: GPIO25<'static>,
    scl: GPIO26<'static>,
) -> I2c<'static, Async> {
    I2c::new(
        i2c1,
        I2cConfig::default().with_frequency(Rate::from_khz(IMU_BUS_KHZ)),
    )
    .expect("valid I2C1 configuration")
    .with_sda(sda)
    .with_scl(scl)
    .into_async()
}

pub fn fire_button(pin: GPIO15<'static>) -> Input<'static> {
    Input::new(pin, InputConfig::default().with_pull(Pull::Up))
}

pub fn rgb_led(red: GPIO13<'static>, green: GPIO12<'static>, blue: GPIO14<'static>) -> RgbPins {
    let off = OutputConfig::default();
    RgbPins::new(
        Output::new(red, Level::Low, off),
        Output::new(green, Level::Low, off),
        Output::new(blue, Level::Low, off),
    )
}
