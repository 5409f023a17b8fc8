//! Encoder and button input drivers

pub mod gpio;

pub use gpio::EncoderPins;
