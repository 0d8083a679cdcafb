//! SSD1306 128x64 panel as the render task's [`FrameSink`].

use display_interface::DisplayError;
use embassy_time::{Duration, Timer};
use embedded_hal::digital::OutputPin;
use embedded_hal_async::i2c::I2c;
use log::{info, warn};
use ssd1306::mode::BufferedGraphicsModeAsync;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306Async};
use starfighter_core::framebuffer::{FrameBuffer, FrameSink};

const RESET_PULSE: Duration = Duration::from_millis(10);

type Panel<I> =
    Ssd1306Async<I2CInterface<I>, DisplaySize128x64, BufferedGraphicsModeAsync<DisplaySize128x64>>;

pub struct Oled<I> {
    panel: Panel<I>,
}

impl<I: I2c> Oled<I> {
    /// Pulse the reset line, then bring the controller up blank.
    pub async fn init<R: OutputPin>(
        i2c: I,
        address: u8,
        reset: &mut R,
    ) -> Result<Self, DisplayError> {
        if let Err(e) = reset.set_low() {
            warn!("OLED reset low failed: {:?}", e);
        }
        Timer::after(RESET_PULSE).await;
        if let Err(e) = reset.set_high() {
            warn!("OLED reset high failed: {:?}", e);
        }
        Timer::after(RESET_PULSE).await;

        let interface = I2CDisplayInterface::new_custom_address(i2c, address);
        let mut panel = Ssd1306Async::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        panel.init().await?;
        panel.clear_buffer();
        panel.flush().await?;

        info!("OLED ready");
        Ok(Self { panel })
    }
}

impl<I: I2c> FrameSink for Oled<I> {
    type Error = DisplayError;

    async fn present(&mut self, frame: &mut FrameBuffer) -> Result<(), Self::Error> {
        if !frame.is_dirty() {
            return Ok(());
        }
        frame.flush(&mut self.panel)?;
        self.panel.flush().await
    }
}
