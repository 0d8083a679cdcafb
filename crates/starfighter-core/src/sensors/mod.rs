//! Motion sensing for tilt control
//!
//! The game only needs raw accelerometer counts. Drivers implement
//! [`Accelerometer`]; a missing or failing chip is logged and the game falls
//! back to button-only control.

mod bmi160;

pub use bmi160::{BMI160_ADDRESS, Bmi160};

use thiserror_no_std::Error;

/// Raw accelerometer reading in sensor LSBs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccelSample {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl AccelSample {
    pub const ZERO: Self = Self { x: 0, y: 0, z: 0 };

    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Bus transaction failed
    #[error("{sensor}: bus error during {operation}")]
    Bus {
        sensor: &'static str,
        operation: &'static str,
    },

    /// Device answered with an unexpected identity
    #[error("{sensor}: unexpected chip id 0x{found:02X} (expected 0x{expected:02X})")]
    WrongChipId {
        sensor: &'static str,
        expected: u8,
        found: u8,
    },
}

/// Source of tilt readings for the input task.
pub trait Accelerometer {
    fn read(&mut self) -> impl Future<Output = Result<AccelSample, SensorError>>;
}
