//! Thermopress - Heated Press Controller Firmware
//!
//! RP2040 firmware for a two-platen heated press: a 20x4 LCD with a rotary
//! encoder menu, two MAX6675 thermocouples and a solid state relay for the
//! heater. All control logic lives in thermopress-core; this binary only
//! wires the peripherals and runs the polling loop.

#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::spi::{self, Spi};
use embassy_time::Delay;
use embedded_hal_bus::spi::RefCellDevice;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use thermopress_core::{PressConfig, Scheduler};
use thermopress_drivers::display::{LcdI2c, DEFAULT_ADDRESS};
use thermopress_drivers::heater::GpioHeater;
use thermopress_drivers::input::EncoderPins;
use thermopress_drivers::sensor::Max6675;

use crate::tasks::{SpiBus, TICK_INTERVAL_MS};

mod tasks;

include!(concat!(env!("OUT_DIR"), "/press_config.rs"));

/// SPI0 is shared by both thermocouple converters
static SPI_BUS: StaticCell<RefCell<SpiBus>> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Thermopress firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");
    info!("Config: {}", PRESS_CONFIG);

    // Heater: SSR on GP7, indicator LED on GP11, both low at reset
    let heater = GpioHeater::new_active_high(
        Output::new(p.PIN_7, Level::Low),
        Output::new(p.PIN_11, Level::Low),
    );

    // Thermocouples: SPI0 (SCK GP18, MISO GP16), chip selects GP17 and GP20
    let mut spi_config = spi::Config::default();
    spi_config.frequency = 1_000_000;
    let bus: &'static RefCell<SpiBus> = SPI_BUS.init(RefCell::new(Spi::new_blocking(
        p.SPI0, p.PIN_18, p.PIN_19, p.PIN_16, spi_config,
    )));
    let cs0 = Output::new(p.PIN_17, Level::High);
    let cs1 = Output::new(p.PIN_20, Level::High);
    let sensor0 = Max6675::new(unwrap!(RefCellDevice::new(bus, cs0, Delay)));
    let sensor1 = Max6675::new(unwrap!(RefCellDevice::new(bus, cs1, Delay)));

    // LCD: I2C0 (SDA GP4, SCL GP5), PCF8574 backpack at 0x27
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c::Config::default());
    let mut lcd = LcdI2c::new(i2c, Delay, DEFAULT_ADDRESS);
    if lcd.init().is_err() {
        error!("LCD init failed; running without display");
    }

    // Encoder: CLK GP2, DT GP3, button GP6 to ground
    let input = EncoderPins::new(
        Input::new(p.PIN_2, Pull::Up),
        Input::new(p.PIN_3, Pull::Up),
        Input::new(p.PIN_6, Pull::Up),
    );

    let press = Scheduler::new(PRESS_CONFIG, heater, sensor0, sensor1, lcd, input);
    info!(
        "Polling every {} ms, refresh every {} ms",
        TICK_INTERVAL_MS, PRESS_CONFIG.refresh_interval_ms
    );

    unwrap!(spawner.spawn(tasks::control_task(press)));
}
