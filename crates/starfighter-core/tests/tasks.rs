//! Run each task loop for a short while against fake peripherals.

use core::convert::Infallible;
use std::cell::{Cell, RefCell};

use embassy_futures::block_on;
use embassy_futures::select::select;
use embassy_time::Timer;
use starfighter_core::feedback::{RgbLed, RgbLevels, ToneOutput};
use starfighter_core::framebuffer::{FrameBuffer, FrameSink};
use starfighter_core::sensors::{AccelSample, Accelerometer, SensorError};
use starfighter_core::tasks::{feedback_task, input_task, render_task, update_task};
use starfighter_core::{GameState, Phase, SharedGame};

const RUN_MS: u64 = 250;

struct HeldButton;

impl embedded_hal::digital::ErrorType for HeldButton {
    type Error = Infallible;
}

impl embedded_hal::digital::InputPin for HeldButton {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(false)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(true)
    }
}

struct Tilted;

impl Accelerometer for Tilted {
    async fn read(&mut self) -> Result<AccelSample, SensorError> {
        Ok(AccelSample::new(4000, -3000, 16384))
    }
}

struct Broken;

impl Accelerometer for Broken {
    async fn read(&mut self) -> Result<AccelSample, SensorError> {
        Err(SensorError::Bus {
            sensor: "fake",
            operation: "read",
        })
    }
}

struct CountingSink<'a>(&'a Cell<u32>);

impl FrameSink for CountingSink<'_> {
    type Error = Infallible;

    async fn present(&mut self, frame: &mut FrameBuffer) -> Result<(), Self::Error> {
        self.0.set(self.0.get() + 1);
        let _ = frame.is_dirty();
        Ok(())
    }
}

struct Buzzer<'a>(&'a RefCell<Vec<Option<u16>>>);

impl ToneOutput for Buzzer<'_> {
    fn start(&mut self, freq: u16) {
        self.0.borrow_mut().push(Some(freq));
    }

    fn stop(&mut self) {
        self.0.borrow_mut().push(None);
    }
}

struct Led<'a>(&'a Cell<Option<RgbLevels>>);

impl RgbLed for Led<'_> {
    fn set(&mut self, levels: RgbLevels) {
        self.0.set(Some(levels));
    }
}

fn run_for<F: Future>(task: F) {
    block_on(select(task, Timer::after_millis(RUN_MS)));
}

#[test]
fn input_task_records_tilt_and_hold() {
    let shared = SharedGame::new(GameState::new());
    run_for(input_task(&shared, Some(Tilted), HeldButton));

    let state = block_on(shared.lock());
    assert!(state.input.button);
    assert!(state.input.hold_ms > 0);
    assert_eq!(state.input.accel, AccelSample::new(4000, -3000, 16384));
}

#[test]
fn input_task_treats_failed_reads_as_level() {
    let shared = SharedGame::new(GameState::new());
    run_for(input_task(&shared, Some(Broken), HeldButton));
    assert_eq!(block_on(shared.lock()).input.accel, AccelSample::ZERO);

    let shared = SharedGame::new(GameState::new());
    run_for(input_task(&shared, None::<Tilted>, HeldButton));
    assert_eq!(block_on(shared.lock()).input.accel, AccelSample::ZERO);
}

#[test]
fn update_task_advances_frames() {
    let shared = SharedGame::new(GameState::new());
    run_for(update_task(&shared));

    let state = block_on(shared.lock());
    assert!(state.frame >= 2);
    assert_eq!(state.phase, Phase::Intro);
}

#[test]
fn render_task_presents_every_frame() {
    let shared = SharedGame::new(GameState::new());
    let presented = Cell::new(0);
    run_for(render_task(&shared, CountingSink(&presented)));
    assert!(presented.get() >= 2);
}

#[test]
fn feedback_task_plays_intro_and_drives_led() {
    let shared = SharedGame::new(GameState::new());
    let tones = RefCell::new(Vec::new());
    let led = Cell::new(None);
    run_for(feedback_task(&shared, Buzzer(&tones), Led(&led)));

    assert_eq!(tones.borrow().first(), Some(&Some(523)));
    assert!(led.get().is_some());
}
