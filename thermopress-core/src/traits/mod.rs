//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations.

pub mod display;
pub mod heater;
pub mod input;

pub use display::DisplaySink;
pub use heater::{HeaterOutput, SensorError, TemperatureSensor};
pub use input::{InputLevels, InputSource};
