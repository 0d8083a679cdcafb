//! Desktop simulator for the ESP Starfighter handheld.
//!
//! Runs the starfighter-core game in an SDL2 window via
//! `embedded-graphics-simulator`. The keyboard stands in for the board: the
//! arrow keys tilt the "accelerometer" and space is the fire button, so taps
//! and one-second holds behave as they do on the device. Buzzer and LED
//! changes are written to the log.
//!
//! # Key bindings
//!
//! | Key        | Action                          |
//! |------------|---------------------------------|
//! | Arrows     | Tilt (move the ship)            |
//! | Space      | Fire (hold 1 s for the laser)   |
//! | Q / Escape | Quit                            |

use std::time::{Duration, Instant};

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    BinaryColorTheme, OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window,
    sdl2::Keycode,
};
use log::{debug, info};

use starfighter_core::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use starfighter_core::feedback::{FeedbackDriver, RgbLed, RgbLevels, ToneOutput};
use starfighter_core::framebuffer::FrameBuffer;
use starfighter_core::input::RawInput;
use starfighter_core::render::Renderer;
use starfighter_core::sensors::AccelSample;
use starfighter_core::GameState;

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// Pixel scale factor for the simulator window.
const WINDOW_SCALE: u32 = 4;

/// One input poll; everything else runs on a multiple of it.
const TICK: Duration = Duration::from_millis(10);

/// Ticks per game frame (~33 FPS, close to the device's 33 ms period).
const TICKS_PER_FRAME: u32 = 3;

/// Tilt reported while an arrow key is held, well past the deadzone.
const KEY_TILT: i16 = 12_000;

// ---------------------------------------------------------------------------
// Keyboard stand-ins for the board peripherals
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Keys {
    left: bool,
    right: bool,
    up: bool,
    down: bool,
    fire: bool,
}

impl Keys {
    fn set(&mut self, keycode: Keycode, down: bool) {
        let slot = match keycode {
            Keycode::Left => &mut self.left,
            Keycode::Right => &mut self.right,
            Keycode::Up => &mut self.up,
            Keycode::Down => &mut self.down,
            Keycode::Space => &mut self.fire,
            _ => return,
        };
        *slot = down;
    }

    fn axis(negative: bool, positive: bool) -> i16 {
        match (negative, positive) {
            (true, false) => -KEY_TILT,
            (false, true) => KEY_TILT,
            _ => 0,
        }
    }

    fn raw(&self) -> RawInput {
        RawInput {
            accel: AccelSample::new(
                Self::axis(self.left, self.right),
                Self::axis(self.up, self.down),
                0,
            ),
            pressed: self.fire,
        }
    }
}

/// Buzzer that only logs.
struct LogBuzzer;

impl ToneOutput for LogBuzzer {
    fn start(&mut self, freq: u16) {
        debug!("buzzer {freq} Hz");
    }

    fn stop(&mut self) {
        debug!("buzzer off");
    }
}

/// LED that logs colour changes.
#[derive(Default)]
struct LogLed {
    last: RgbLevels,
}

impl RgbLed for LogLed {
    fn set(&mut self, levels: RgbLevels) {
        if levels != self.last {
            debug!(
                "led r={} g={} b={}",
                levels.red as u8, levels.green as u8, levels.blue as u8
            );
            self.last = levels;
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();
    info!("Starting Starfighter simulator");
    info!(
        "Display: {}×{} (scale {}×)",
        SCREEN_WIDTH, SCREEN_HEIGHT, WINDOW_SCALE
    );
    info!("Keys: arrows=tilt  space=fire (hold for laser)  Q=Quit");

    let mut display =
        SimulatorDisplay::<BinaryColor>::new(Size::new(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32));
    let output_settings = OutputSettingsBuilder::new()
        .scale(WINDOW_SCALE)
        .theme(BinaryColorTheme::OledBlue)
        .build();
    let mut window = Window::new("Starfighter Simulator", &output_settings);

    let mut state = GameState::new();
    let mut frame = FrameBuffer::new();
    let mut renderer = Renderer::default();
    let mut feedback = FeedbackDriver::new();
    let mut buzzer = LogBuzzer;
    let mut led = LogLed::default();
    let mut keys = Keys::default();

    // The SDL window is lazily initialized on the first `update()` call.
    // We must call `update()` once before `events()` or it will panic.
    window.update(&display);

    let mut tick: u32 = 0;

    // -----------------------------------------------------------------------
    // Main loop
    // -----------------------------------------------------------------------
    'running: loop {
        let tick_start = Instant::now();

        // --- SDL events ---------------------------------------------------
        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,
                SimulatorEvent::KeyDown { keycode, .. } => {
                    if keycode == Keycode::Q || keycode == Keycode::Escape {
                        break 'running;
                    }
                    keys.set(keycode, true);
                }
                SimulatorEvent::KeyUp { keycode, .. } => {
                    keys.set(keycode, false);
                }
                _ => {}
            }
        }

        // --- Input poll ---------------------------------------------------
        state.input.poll(keys.raw());

        if tick % TICKS_PER_FRAME == 0 {
            // --- Update ---------------------------------------------------
            state.step();

            // --- Render ---------------------------------------------------
            let Ok(()) = renderer.draw(&state, &mut frame);
            let Ok(()) = frame.flush(&mut display);
            window.update(&display);

            // --- Feedback -------------------------------------------------
            let output = feedback.step(&mut state, embassy_time::Instant::now().as_millis());
            if let Some(command) = output.tone {
                buzzer.apply(command);
            }
            led.set(output.led);
        }

        tick = tick.wrapping_add(1);

        // --- Pacing -------------------------------------------------------
        let elapsed = tick_start.elapsed();
        if elapsed < TICK {
            std::thread::sleep(TICK - elapsed);
        }
    }

    info!("Simulator exiting");
}
