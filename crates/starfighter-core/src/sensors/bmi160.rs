use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use log::{error, info, warn};

use super::{AccelSample, Accelerometer, SensorError};

/// Default address with SDO pulled high.
pub const BMI160_ADDRESS: u8 = 0x69;

const REG_CHIP_ID: u8 = 0x00;
const REG_ACC_X_LSB: u8 = 0x12;
const REG_CMD: u8 = 0x7E;

const CHIP_ID: u8 = 0xD1;
const CMD_SOFT_RESET: u8 = 0xB6;
const CMD_ACC_NORMAL: u8 = 0x11;

const RESET_DELAY_MS: u32 = 100;
const POWER_UP_DELAY_MS: u32 = 50;

const NAME: &str = "BMI160";

/// Bosch BMI160 accelerometer, used in accel-only normal mode.
pub struct Bmi160<I, D> {
    i2c: I,
    delay: D,
    address: u8,
}

impl<I: I2c, D: DelayNs> Bmi160<I, D> {
    pub fn new(i2c: I, delay: D) -> Self {
        Self {
            i2c,
            delay,
            address: BMI160_ADDRESS,
        }
    }

    /// Reset the chip, check its id and power up the accelerometer.
    ///
    /// Returns `None` (after logging) when the chip is missing or does not
    /// identify as a BMI160; the game then runs on the button alone.
    pub async fn probe(i2c: I, delay: D) -> Option<Self> {
        let mut sensor = Self::new(i2c, delay);
        match sensor.initialize().await {
            Ok(()) => {
                info!("{NAME}: accelerometer ready");
                Some(sensor)
            }
            Err(e) => {
                warn!("{e}; falling back to button-only control");
                None
            }
        }
    }

    async fn initialize(&mut self) -> Result<(), SensorError> {
        self.write_register(REG_CMD, CMD_SOFT_RESET, "soft reset")
            .await?;
        self.delay.delay_ms(RESET_DELAY_MS).await;

        let mut id = [0u8; 1];
        self.read_registers(REG_CHIP_ID, &mut id, "read chip id")
            .await?;
        if id[0] != CHIP_ID {
            return Err(SensorError::WrongChipId {
                sensor: NAME,
                expected: CHIP_ID,
                found: id[0],
            });
        }

        self.write_register(REG_CMD, CMD_ACC_NORMAL, "enable accelerometer")
            .await?;
        self.delay.delay_ms(POWER_UP_DELAY_MS).await;
        Ok(())
    }

    async fn write_register(
        &mut self,
        register: u8,
        value: u8,
        operation: &'static str,
    ) -> Result<(), SensorError> {
        self.i2c
            .write(self.address, &[register, value])
            .await
            .map_err(|e| {
                error!("{NAME} {operation} failed: {:?}", e);
                SensorError::Bus {
                    sensor: NAME,
                    operation,
                }
            })
    }

    async fn read_registers(
        &mut self,
        register: u8,
        buf: &mut [u8],
        operation: &'static str,
    ) -> Result<(), SensorError> {
        self.i2c
            .write_read(self.address, &[register], buf)
            .await
            .map_err(|e| {
                error!("{NAME} {operation} failed: {:?}", e);
                SensorError::Bus {
                    sensor: NAME,
                    operation,
                }
            })
    }
}

impl<I: I2c, D: DelayNs> Accelerometer for Bmi160<I, D> {
    async fn read(&mut self) -> Result<AccelSample, SensorError> {
        let mut data = [0u8; 6];
        self.read_registers(REG_ACC_X_LSB, &mut data, "read acceleration")
            .await?;

        Ok(AccelSample {
            x: i16::from_le_bytes([data[0], data[1]]),
            y: i16::from_le_bytes([data[2], data[3]]),
            z: i16::from_le_bytes([data[4], data[5]]),
        })
    }
}
