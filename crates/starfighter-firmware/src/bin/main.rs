#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]

use embassy_executor::Spawner;
use embassy_time::{Delay, Duration, Timer};
use esp_hal::Async;
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{Input, Level, Output, OutputConfig};
use esp_hal::i2c::master::I2c;
use esp_hal::interrupt::software::SoftwareInterruptControl;
use esp_hal::system::Stack;
use esp_hal::timer::timg::TimerGroup;
use log::{error, info};
use static_cell::StaticCell;

use starfighter_core::sensors::Bmi160;
use starfighter_core::tasks::{feedback_task, input_task, render_task, update_task};
use starfighter_core::{GameState, SharedGame};
use starfighter_firmware::buzzer::{self, BuzzerHandle, BuzzerSignal};
use starfighter_firmware::hardware::{self, OLED_ADDRESS};
use starfighter_firmware::led::RgbPins;
use starfighter_firmware::oled::Oled;

const CORE1_STACK_SIZE: usize = 8192;

type Accel = Bmi160<I2c<'static, Async>, Delay>;
type Panel = Oled<I2c<'static, Async>>;

static GAME: StaticCell<SharedGame> = StaticCell::new();
static BUZZER: BuzzerSignal = BuzzerSignal::new();
static CORE1_STACK: StaticCell<Stack<CORE1_STACK_SIZE>> = StaticCell::new();
static CORE1_EXECUTOR: StaticCell<esp_rtos::embassy::Executor> = StaticCell::new();

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    rtt_target::rprintln!("PANIC: {}", info);
    loop {}
}

// This creates a default app-descriptor required by the esp-idf bootloader.
// For more information see: <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/system/app_image_format.html#application-description>
esp_bootloader_esp_idf::esp_app_desc!();

#[embassy_executor::task]
async fn input(shared: &'static SharedGame, accel: Option<Accel>, button: Input<'static>) {
    input_task(shared, accel, button).await
}

#[embassy_executor::task]
async fn update(shared: &'static SharedGame) {
    update_task(shared).await
}

#[embassy_executor::task]
async fn render(shared: &'static SharedGame, panel: Panel) {
    render_task(shared, panel).await
}

#[embassy_executor::task]
async fn feedback(shared: &'static SharedGame, led: RgbPins) {
    feedback_task(shared, BuzzerHandle::new(&BUZZER), led).await
}

#[embassy_executor::task]
async fn tone(pin: Output<'static>) {
    buzzer::run(pin, &BUZZER).await
}

#[allow(
    clippy::large_stack_frames,
    reason = "it's not unusual to allocate larger buffers etc. in main"
)]
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    rtt_target::rtt_init_log!();

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(size: 64 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    info!("Embassy initialized!");

    // Display first: without it there is no game to play.
    let oled_bus = hardware::create_oled_bus(peripherals.I2C0, peripherals.GPIO5, peripherals.GPIO4);
    let mut oled_reset = Output::new(peripherals.GPIO16, Level::High, OutputConfig::default());
    let panel = match Oled::init(oled_bus, OLED_ADDRESS, &mut oled_reset).await {
        Ok(panel) => panel,
        Err(e) => {
            error!("display init failed: {:?}; halting", e);
            loop {
                Timer::after(Duration::from_secs(600)).await;
            }
        }
    };

    let imu_bus = hardware::create_imu_bus(peripherals.I2C1, peripherals.GPIO25, peripherals.GPIO26);
    let accel = Bmi160::probe(imu_bus, Delay).await;

    let button = hardware::fire_button(peripherals.GPIO15);
    let led = hardware::rgb_led(peripherals.GPIO13, peripherals.GPIO12, peripherals.GPIO14);
    let buzzer_pin = Output::new(peripherals.GPIO2, Level::Low, OutputConfig::default());

    let shared: &'static SharedGame = GAME.init(SharedGame::new(GameState::new()));

    // Simulation and drawing get the second core to themselves.
    let sw_ints = SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    let core1_stack = CORE1_STACK.init(Stack::new());
    esp_rtos::start_second_core::<CORE1_STACK_SIZE>(
        peripherals.CPU_CTRL,
        sw_ints.software_interrupt0,
        sw_ints.software_interrupt1,
        core1_stack,
        move || {
            let executor = CORE1_EXECUTOR.init(esp_rtos::embassy::Executor::new());
            executor.run(|spawner| {
                spawner.must_spawn(update(shared));
                spawner.must_spawn(render(shared, panel));
            });
        },
    );

    spawner.must_spawn(input(shared, accel, button));
    spawner.must_spawn(feedback(shared, led));
    spawner.must_spawn(tone(buzzer_pin));

    info!("Starfighter running");

    loop {
        Timer::after(Duration::from_secs(600)).await;
    }
}
