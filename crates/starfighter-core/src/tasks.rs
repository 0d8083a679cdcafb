//! The four periodic task loops.
//!
//! Each loop wakes on an absolute-time ticker, takes the game lock for one
//! pass, and does its peripheral I/O with the lock released. Board crates
//! wrap these in their executor's task attribute and hand in the peripherals
//! each task owns.

use embassy_time::{Duration, Instant, Ticker};
use embedded_hal::digital::InputPin;
use log::{debug, warn};

use crate::config::{FEEDBACK_PERIOD_MS, FRAME_TIME_MS, INPUT_PERIOD_MS};
use crate::feedback::{FeedbackDriver, RgbLed, ToneOutput};
use crate::framebuffer::{FrameBuffer, FrameSink};
use crate::game::SharedGame;
use crate::input::RawInput;
use crate::render::Renderer;
use crate::sensors::{AccelSample, Accelerometer};

/// Sample tilt and the fire button at 100 Hz.
///
/// A missing accelerometer or a failed read counts as level. The button is
/// wired to ground with a pull-up, so low means pressed.
pub async fn input_task<A, B>(shared: &SharedGame, mut accel: Option<A>, mut button: B) -> !
where
    A: Accelerometer,
    B: InputPin,
{
    let mut ticker = Ticker::every(Duration::from_millis(INPUT_PERIOD_MS));
    loop {
        let sample = match accel.as_mut() {
            Some(sensor) => sensor.read().await.unwrap_or_else(|e| {
                debug!("accelerometer read failed: {e}");
                AccelSample::ZERO
            }),
            None => AccelSample::ZERO,
        };
        let pressed = button.is_low().unwrap_or(false);

        shared.lock().await.input.poll(RawInput {
            accel: sample,
            pressed,
        });
        ticker.next().await;
    }
}

/// Advance the game at the frame rate.
pub async fn update_task(shared: &SharedGame) -> ! {
    let mut ticker = Ticker::every(Duration::from_millis(FRAME_TIME_MS));
    loop {
        shared.lock().await.step();
        ticker.next().await;
    }
}

/// Draw each frame under the lock, then present it after releasing.
pub async fn render_task<S: FrameSink>(shared: &SharedGame, mut sink: S) -> ! {
    let mut ticker = Ticker::every(Duration::from_millis(FRAME_TIME_MS));
    let mut frame = FrameBuffer::new();
    let mut renderer = Renderer::default();
    loop {
        {
            let state = shared.lock().await;
            let Ok(()) = renderer.draw(&state, &mut frame);
        }

        if let Err(e) = sink.present(&mut frame).await {
            warn!("display flush failed: {:?}", e);
        }
        ticker.next().await;
    }
}

/// Service tone requests, the melody and the LED.
pub async fn feedback_task<T, L>(shared: &SharedGame, mut tone: T, mut led: L) -> !
where
    T: ToneOutput,
    L: RgbLed,
{
    let mut ticker = Ticker::every(Duration::from_millis(FEEDBACK_PERIOD_MS));
    let mut driver = FeedbackDriver::new();
    loop {
        let output = {
            let mut state = shared.lock().await;
            driver.step(&mut state, Instant::now().as_millis())
        };

        if let Some(command) = output.tone {
            tone.apply(command);
        }
        led.set(output.led);
        ticker.next().await;
    }
}
