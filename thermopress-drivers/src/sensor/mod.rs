//! Temperature sensor implementations

pub mod max6675;

pub use max6675::{Max6675, Max6675Error};
