//! Hardware driver implementations
//!
//! Concrete implementations of the traits defined in thermopress-core,
//! written against embedded-hal 1.0 so any HAL can supply the pins and buses:
//!
//! - Heater output (SSR plus indicator LED on GPIO)
//! - MAX6675 thermocouple converter (SPI)
//! - HD44780 character LCD behind a PCF8574 I2C backpack
//! - Rotary encoder and push button on GPIO inputs

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod display;
pub mod heater;
pub mod input;
pub mod sensor;
