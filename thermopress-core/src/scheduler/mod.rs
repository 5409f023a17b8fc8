//! Control loop scheduler
//!
//! Polls inputs every call and fires the periodic refresh tick that
//! advances the cycle timer and redraws live screens.

pub mod executor;

pub use executor::Scheduler;
