//! Passive buzzer driven as a GPIO square wave.
//!
//! The feedback task only posts [`ToneCommand`]s; a dedicated task owns the
//! pin and toggles it at the requested pitch until the next command arrives.
//! The latest command wins, so a tone posted while another is playing simply
//! replaces it.

use embassy_futures::select::{Either, select};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Timer};
use embedded_hal::digital::{OutputPin, PinState};
use log::{trace, warn};
use starfighter_core::feedback::{ToneCommand, ToneOutput};

pub type BuzzerSignal = Signal<CriticalSectionRawMutex, ToneCommand>;

/// Lowest pitch the piezo reproduces; anything below is treated as a rest.
const MIN_FREQ_HZ: u16 = 20;

/// [`ToneOutput`] half, handed to the feedback task.
#[derive(Clone, Copy)]
pub struct BuzzerHandle {
    signal: &'static BuzzerSignal,
}

impl BuzzerHandle {
    pub const fn new(signal: &'static BuzzerSignal) -> Self {
        Self { signal }
    }
}

impl ToneOutput for BuzzerHandle {
    fn start(&mut self, freq: u16) {
        self.signal.signal(ToneCommand::Play(freq));
    }

    fn stop(&mut self) {
        self.signal.signal(ToneCommand::Stop);
    }
}

fn half_period(command: ToneCommand) -> Option<Duration> {
    match command {
        ToneCommand::Play(freq) if freq >= MIN_FREQ_HZ => {
            Some(Duration::from_micros(500_000 / freq as u64))
        }
        _ => None,
    }
}

/// Pin-owning half. Never returns.
pub async fn run<P: OutputPin>(mut pin: P, signal: &'static BuzzerSignal) -> ! {
    let mut half = None;
    let mut high = false;
    let mut pin_failed = false;
    loop {
        high = half.is_some() && !high;
        // logged once; the wave toggles thousands of times a second
        if let Err(e) = pin.set_state(PinState::from(high))
            && !pin_failed
        {
            warn!("buzzer pin write failed: {:?}", e);
            pin_failed = true;
        }

        let command = match half {
            None => signal.wait().await,
            Some(period) => match select(signal.wait(), Timer::after(period)).await {
                Either::First(command) => command,
                Either::Second(()) => continue,
            },
        };
        trace!("buzzer: {command:?}");
        half = half_period(command);
    }
}
