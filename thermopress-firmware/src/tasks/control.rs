//! Control loop task
//!
//! Drives the scheduler from a fixed-rate ticker. Every poll is short and
//! never blocks, so the ticker period is the input sampling rate.

use defmt::*;
use embassy_rp::gpio::{Input, Output};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{I2C0, SPI0};
use embassy_rp::spi::{self, Spi};
use embassy_time::{Delay, Duration, Instant, Ticker};
use embedded_hal_bus::spi::RefCellDevice;

use thermopress_core::Scheduler;
use thermopress_drivers::display::LcdI2c;
use thermopress_drivers::heater::GpioHeater;
use thermopress_drivers::input::EncoderPins;
use thermopress_drivers::sensor::Max6675;

/// Poll interval in milliseconds
pub const TICK_INTERVAL_MS: u64 = 1;

/// Blocking SPI0 shared by the thermocouples
pub type SpiBus = Spi<'static, SPI0, spi::Blocking>;

type Thermocouple = Max6675<RefCellDevice<'static, SpiBus, Output<'static>, Delay>>;

/// The assembled controller
pub type Press = Scheduler<
    GpioHeater<Output<'static>, Output<'static>>,
    Thermocouple,
    Thermocouple,
    LcdI2c<I2c<'static, I2C0, i2c::Blocking>, Delay>,
    EncoderPins<Input<'static>, Input<'static>, Input<'static>>,
>;

/// Control task - polls the scheduler forever
#[embassy_executor::task]
pub async fn control_task(mut press: Press) {
    info!("Control task started");

    press.start(Instant::now().as_millis());

    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS));
    let mut reported_trips = 0;

    loop {
        ticker.next().await;
        press.poll(Instant::now().as_millis());

        if press.safety_trips() != reported_trips {
            reported_trips = press.safety_trips();
            warn!("Safety trips since boot: {}", reported_trips);
        }
    }
}
