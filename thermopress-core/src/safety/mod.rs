//! Safety monitoring
//!
//! Software cutoff for the heater, evaluated on every sample taken while
//! the heater is on.

pub mod monitor;

pub use monitor::{SafetyMonitor, SafetyStatus, TripReason};
