//! Board-agnostic core logic for the thermopress controller
//!
//! This crate contains everything that does not touch a specific chip:
//!
//! - Hardware abstraction traits (heater output, thermocouple, display, inputs)
//! - The menu state machine and its press/rotate transition table
//! - The heating-cycle countdown, gated on the melting threshold
//! - The heater controller (single authority over the output line)
//! - Rotary encoder and push-button event decoding
//! - The polling scheduler that ties it all together
//! - Safety monitoring (over-temperature cutoff, sensor fault budget)
//! - Timing configuration

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod log;

pub mod config;
pub mod cycle;
pub mod display;
pub mod heater;
pub mod input;
pub mod menu;
pub mod safety;
pub mod scheduler;
pub mod sensor;
pub mod traits;

pub use config::{ConfigError, PressConfig};
pub use cycle::{CycleComplete, CycleState, CycleTimer};
pub use display::RenderFrame;
pub use heater::HeaterController;
pub use input::{ButtonClassifier, InputEvent, RotaryDecoder};
pub use menu::{MenuContext, MenuEngine, MenuError, MenuState};
pub use safety::{SafetyMonitor, SafetyStatus};
pub use scheduler::Scheduler;
pub use sensor::{SensorFault, TemperatureSample, ThermocouplePair};
